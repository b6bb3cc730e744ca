//! PostgreSQL-backed `PlanRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PlanRepository, PlanRepositoryError};
use crate::domain::{Plan, PlanId};

use super::models::PlanRow;
use super::pool::{DbPool, PoolError};
use super::schema::plans;

/// Diesel-backed implementation of the `PlanRepository` port.
#[derive(Clone)]
pub struct DieselPlanRepository {
    pool: DbPool,
}

impl DieselPlanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain plan repository errors.
fn map_pool_error(error: PoolError) -> PlanRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PlanRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain plan repository errors.
fn map_diesel_error(error: diesel::result::Error) -> PlanRepositoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PlanRepositoryError::connection("database connection error")
        }
        _ => PlanRepositoryError::query("database error"),
    }
}

#[async_trait]
impl PlanRepository for DieselPlanRepository {
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PlanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PlanRow> = plans::table
            .filter(plans::id.eq(id.as_uuid()))
            .select(PlanRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Plan::from))
    }

    async fn list_active(&self) -> Result<Vec<Plan>, PlanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PlanRow> = plans::table
            .filter(plans::is_active.eq(true))
            .order(plans::price_cents.asc())
            .select(PlanRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }
}
