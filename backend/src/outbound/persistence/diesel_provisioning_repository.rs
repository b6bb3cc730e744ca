//! PostgreSQL-backed provisioning adapter.
//!
//! Implements the `ProvisioningRepository` port: one Diesel transaction
//! wraps the plan lookup, the city get-or-create, and the five insert
//! statements, so every row becomes visible atomically or not at all. No
//! mail or file I/O happens in here; delivery runs after commit in the
//! signup service.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    DEFAULT_APARTMENT_FLOOR, DEFAULT_APARTMENT_KIND, DEFAULT_APARTMENT_NUMBER, NewProvisioning,
    ProvisionedAccount, ProvisioningError, ProvisioningRepository,
};
use crate::domain::signup::EmailAddress;
use crate::domain::{AccountId, AccountRole, AccountStatus};

use super::models::{
    NewApartmentRow, NewCityRow, NewMemberRow, NewPaymentRow, NewResidenceRow,
    NewSyndicAssignmentRow, PlanRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{apartments, cities, members, payments, plans, residences, syndic_assignments};

/// Diesel-backed implementation of the `ProvisioningRepository` port.
#[derive(Clone)]
pub struct DieselProvisioningRepository {
    pool: DbPool,
}

impl DieselProvisioningRepository {
    /// Create a new adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Transaction-internal error: either a domain outcome decided mid-flight
/// (unknown plan, vanished city row) or a raw Diesel failure mapped after
/// rollback.
#[derive(Debug)]
enum TxError {
    Domain(ProvisioningError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// Map pool errors to domain provisioning errors.
fn map_pool_error(error: PoolError) -> ProvisioningError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProvisioningError::connection(message)
        }
    }
}

/// Map Diesel errors to domain provisioning errors.
///
/// A unique violation reaching commit can only be the members email
/// constraint: the cities insert is guarded by `ON CONFLICT DO NOTHING`.
/// This is the authoritative arbiter for concurrent duplicate submissions
/// that slipped past the validator pre-check.
fn map_diesel_error(error: diesel::result::Error) -> ProvisioningError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ProvisioningError::duplicate_email()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            ProvisioningError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => ProvisioningError::query(info.message().to_owned()),
        other => ProvisioningError::query(other.to_string()),
    }
}

fn map_tx_error(error: TxError) -> ProvisioningError {
    match error {
        TxError::Domain(domain) => domain,
        TxError::Diesel(diesel_error) => map_diesel_error(diesel_error),
    }
}

/// Resolve the city id for `name`, creating the row when absent.
///
/// Concurrent submissions for a brand-new city name race benignly: the
/// insert is `ON CONFLICT DO NOTHING` and the lookup is retried once, so
/// whichever insert wins, both transactions observe the same row.
async fn get_or_create_city<C>(conn: &mut C, name: &str) -> Result<Uuid, TxError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let existing: Option<Uuid> = cities::table
        .filter(cities::name.eq(name))
        .select(cities::id)
        .first(conn)
        .await
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    diesel::insert_into(cities::table)
        .values(&NewCityRow {
            id: Uuid::new_v4(),
            name,
        })
        .on_conflict(cities::name)
        .do_nothing()
        .execute(conn)
        .await?;

    let resolved: Option<Uuid> = cities::table
        .filter(cities::name.eq(name))
        .select(cities::id)
        .first(conn)
        .await
        .optional()?;
    resolved.ok_or_else(|| {
        TxError::Domain(ProvisioningError::query(
            "city row absent after get-or-create",
        ))
    })
}

#[async_trait]
impl ProvisioningRepository for DieselProvisioningRepository {
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, ProvisioningError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let matches: i64 = members::table
            .filter(members::email.eq(email.as_ref()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(matches > 0)
    }

    async fn provision(
        &self,
        provisioning: NewProvisioning,
    ) -> Result<ProvisionedAccount, ProvisioningError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let NewProvisioning {
            request,
            plan_id,
            password_hash,
            admin_id,
            requested_at,
        } = provisioning;

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let plan: Option<PlanRow> = plans::table
                        .filter(plans::id.eq(plan_id.as_uuid()))
                        .select(PlanRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let plan =
                        plan.ok_or(TxError::Domain(ProvisioningError::PlanNotFound))?;

                    let city_id = get_or_create_city(conn, request.city.as_ref()).await?;

                    let residence_id = Uuid::new_v4();
                    diesel::insert_into(residences::table)
                        .values(&NewResidenceRow {
                            id: residence_id,
                            city_id,
                            name: request.company_name.as_ref(),
                            address: request.address.as_deref(),
                        })
                        .execute(conn)
                        .await?;

                    let member_id = Uuid::new_v4();
                    diesel::insert_into(members::table)
                        .values(&NewMemberRow {
                            id: member_id,
                            full_name: request.full_name.as_ref(),
                            email: request.email.as_ref(),
                            password_hash: password_hash.as_ref(),
                            phone: request.phone.as_ref(),
                            role: AccountRole::Syndic.as_str(),
                            status: AccountStatus::Active.as_str(),
                            created_at: requested_at,
                        })
                        .execute(conn)
                        .await?;

                    diesel::insert_into(apartments::table)
                        .values(&NewApartmentRow {
                            id: Uuid::new_v4(),
                            residence_id,
                            member_id,
                            kind: DEFAULT_APARTMENT_KIND,
                            floor: DEFAULT_APARTMENT_FLOOR,
                            number: DEFAULT_APARTMENT_NUMBER,
                        })
                        .execute(conn)
                        .await?;

                    diesel::insert_into(syndic_assignments::table)
                        .values(&NewSyndicAssignmentRow {
                            id: Uuid::new_v4(),
                            admin_id,
                            member_id,
                            assigned_at: requested_at,
                        })
                        .execute(conn)
                        .await?;

                    diesel::insert_into(payments::table)
                        .values(&NewPaymentRow {
                            id: Uuid::new_v4(),
                            admin_id,
                            member_id,
                            plan_id: *plan_id.as_uuid(),
                            amount_cents: plan.price_cents,
                            paid_at: requested_at,
                        })
                        .execute(conn)
                        .await?;

                    Ok(ProvisionedAccount {
                        account_id: AccountId::from_uuid(member_id),
                        plan_name: plan.name,
                        amount_cents: plan.price_cents,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        Ok(outcome)
    }
}
