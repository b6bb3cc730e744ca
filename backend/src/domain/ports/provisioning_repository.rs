//! Port abstraction for the provisioning transaction.
//!
//! The adapter behind this port owns the only multi-write sequence in the
//! system: creating the member, residence, apartment, syndic assignment,
//! and payment rows (plus the city row when absent) as a single atomic
//! unit. No external I/O happens behind this port; notification runs after
//! commit so a delivery failure can never unwind a provisioned account.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::credential::CredentialHash;
use crate::domain::signup::{EmailAddress, SignupRequest};
use crate::domain::{Account, AccountId, AccountRole, AccountStatus, Plan, PlanId};

use super::define_port_error;

/// Default attributes for the bootstrap apartment created with every account.
pub const DEFAULT_APARTMENT_KIND: &str = "Standard";
/// Floor label assigned to the bootstrap apartment.
pub const DEFAULT_APARTMENT_FLOOR: &str = "1";
/// Unit number assigned to the bootstrap apartment.
pub const DEFAULT_APARTMENT_NUMBER: i32 = 1;

define_port_error! {
    /// Failures surfaced by provisioning adapters.
    pub enum ProvisioningError {
        /// The referenced plan does not exist.
        PlanNotFound => "plan not found",
        /// Another account already owns the submitted email address.
        DuplicateEmail => "an account with this email already exists",
        /// Repository connection could not be established.
        Connection { message: String } => "provisioning storage connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "provisioning storage query failed: {message}",
    }
}

/// Everything the provisioning transaction needs, assembled by the signup
/// service before any storage is touched.
#[derive(Debug, Clone)]
pub struct NewProvisioning {
    /// Validated, normalised submission.
    pub request: SignupRequest,
    /// Plan being purchased.
    pub plan_id: PlanId,
    /// Hash of the generated credential; the plaintext never crosses this port.
    pub password_hash: CredentialHash,
    /// Configured default administrative owner.
    pub admin_id: Uuid,
    /// Timestamp recorded on the assignment and payment rows.
    pub requested_at: DateTime<Utc>,
}

/// Outcome of a committed provisioning transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    /// Identifier of the freshly created account.
    pub account_id: AccountId,
    /// Name of the purchased plan, for the credential notice.
    pub plan_name: String,
    /// Amount charged, copied from the plan at purchase time.
    pub amount_cents: i64,
}

/// Driven port executing the atomic provisioning sequence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisioningRepository: Send + Sync {
    /// Read-only duplicate pre-check used by the validator stage.
    ///
    /// Storage-level uniqueness remains the authoritative arbiter; this
    /// exists only to avoid transactional work for obvious duplicates.
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, ProvisioningError>;

    /// Execute the six-insert transaction; all rows commit or none do.
    async fn provision(
        &self,
        provisioning: NewProvisioning,
    ) -> Result<ProvisionedAccount, ProvisioningError>;
}

/// One fully provisioned account as held by the in-memory adapter.
#[derive(Debug, Clone)]
pub struct ProvisionedRecord {
    /// The member row.
    pub account: Account,
    /// Stored credential hash.
    pub password_hash: CredentialHash,
    /// Residence (company) name.
    pub residence_name: String,
    /// Optional street address.
    pub residence_address: Option<String>,
    /// City row the residence references.
    pub city_id: Uuid,
    /// Bootstrap apartment attributes.
    pub apartment_kind: String,
    /// Floor label of the bootstrap apartment.
    pub apartment_floor: String,
    /// Unit number of the bootstrap apartment.
    pub apartment_number: i32,
    /// Administrative owner linked by the assignment row.
    pub admin_id: Uuid,
    /// Plan referenced by the payment row.
    pub plan_id: PlanId,
    /// Amount charged at purchase time.
    pub amount_cents: i64,
    /// Payment timestamp.
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    cities: HashMap<String, Uuid>,
    records: Vec<ProvisionedRecord>,
}

/// In-memory provisioning adapter.
///
/// Enforces the same observable contract as the database adapter (email
/// uniqueness, city reuse, atomic visibility) and backs both the
/// integration tests and the no-database server mode.
#[derive(Debug, Default)]
pub struct InMemoryProvisioningRepository {
    plans: Mutex<Vec<Plan>>,
    state: Mutex<InMemoryState>,
}

impl InMemoryProvisioningRepository {
    /// Build an adapter over a plan catalogue.
    pub fn new(plans: Vec<Plan>) -> Self {
        Self {
            plans: Mutex::new(plans),
            state: Mutex::new(InMemoryState::default()),
        }
    }

    fn poisoned() -> ProvisioningError {
        ProvisioningError::query("in-memory state lock poisoned")
    }

    /// Snapshot of all committed records.
    pub fn records(&self) -> Vec<ProvisionedRecord> {
        self.state
            .lock()
            .map(|state| state.records.clone())
            .unwrap_or_default()
    }

    /// Number of distinct city rows.
    pub fn city_count(&self) -> usize {
        self.state.lock().map(|state| state.cities.len()).unwrap_or(0)
    }

    /// Look up a city id by name, if one has been created.
    pub fn city_id(&self, name: &str) -> Option<Uuid> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.cities.get(name).copied())
    }

    /// Re-price a plan after the fact; committed payments must not change.
    pub fn set_plan_price(&self, plan_id: PlanId, price_cents: i64) {
        if let Ok(mut plans) = self.plans.lock() {
            if let Some(plan) = plans.iter_mut().find(|plan| plan.id == plan_id) {
                plan.price_cents = price_cents;
            }
        }
    }
}

#[async_trait]
impl ProvisioningRepository for InMemoryProvisioningRepository {
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, ProvisioningError> {
        let state = self.state.lock().map_err(|_| Self::poisoned())?;
        Ok(state
            .records
            .iter()
            .any(|record| record.account.email == email.as_ref()))
    }

    async fn provision(
        &self,
        provisioning: NewProvisioning,
    ) -> Result<ProvisionedAccount, ProvisioningError> {
        let plan = {
            let plans = self.plans.lock().map_err(|_| Self::poisoned())?;
            plans
                .iter()
                .find(|plan| plan.id == provisioning.plan_id)
                .cloned()
                .ok_or_else(ProvisioningError::plan_not_found)?
        };

        let mut state = self.state.lock().map_err(|_| Self::poisoned())?;
        let NewProvisioning {
            request,
            plan_id,
            password_hash,
            admin_id,
            requested_at,
        } = provisioning;

        if state
            .records
            .iter()
            .any(|record| record.account.email == request.email.as_ref())
        {
            return Err(ProvisioningError::duplicate_email());
        }

        let city_id = *state
            .cities
            .entry(request.city.as_ref().to_owned())
            .or_insert_with(Uuid::new_v4);

        let account = Account {
            id: AccountId::random(),
            full_name: request.full_name.as_ref().to_owned(),
            email: request.email.as_ref().to_owned(),
            phone: request.phone.as_ref().to_owned(),
            role: AccountRole::Syndic,
            status: AccountStatus::Active,
            created_at: requested_at,
        };
        let account_id = account.id;

        state.records.push(ProvisionedRecord {
            account,
            password_hash,
            residence_name: request.company_name.as_ref().to_owned(),
            residence_address: request.address,
            city_id,
            apartment_kind: DEFAULT_APARTMENT_KIND.to_owned(),
            apartment_floor: DEFAULT_APARTMENT_FLOOR.to_owned(),
            apartment_number: DEFAULT_APARTMENT_NUMBER,
            admin_id,
            plan_id,
            amount_cents: plan.price_cents,
            paid_at: requested_at,
        });

        Ok(ProvisionedAccount {
            account_id,
            plan_name: plan.name,
            amount_cents: plan.price_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::signup::SignupForm;
    use rstest::rstest;

    fn sample_plan(price_cents: i64) -> Plan {
        Plan {
            id: PlanId::random(),
            name: "Essential".into(),
            price_cents,
            duration_months: 12,
            max_residents: 100,
            max_apartments: 40,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn request_for(email: &str, city: &str) -> SignupRequest {
        let form = SignupForm {
            syndic_name: "Jane Doe".into(),
            syndic_email: email.into(),
            syndic_phone: "0600000000".into(),
            company_name: "Sunset Towers".into(),
            company_city: city.into(),
            company_address: String::new(),
        };
        SignupRequest::try_from_form(&form).expect("valid form")
    }

    fn provisioning_for(plan_id: PlanId, email: &str, city: &str) -> NewProvisioning {
        NewProvisioning {
            request: request_for(email, city),
            plan_id,
            password_hash: CredentialHash::from_hashed("$2b$12$fixture"),
            admin_id: Uuid::new_v4(),
            requested_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn provision_commits_the_full_record_shape() {
        let plan = sample_plan(100);
        let repo = InMemoryProvisioningRepository::new(vec![plan.clone()]);

        let outcome = repo
            .provision(provisioning_for(plan.id, "jane@example.com", "Casablanca"))
            .await
            .expect("provision");

        assert_eq!(outcome.plan_name, "Essential");
        assert_eq!(outcome.amount_cents, 100);

        let records = repo.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.account.id, outcome.account_id);
        assert_eq!(record.account.email, "jane@example.com");
        assert_eq!(record.apartment_number, DEFAULT_APARTMENT_NUMBER);
        assert_eq!(record.apartment_kind, DEFAULT_APARTMENT_KIND);
        assert_eq!(repo.city_id("Casablanca"), Some(record.city_id));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_plan_commits_nothing() {
        let repo = InMemoryProvisioningRepository::new(vec![]);
        let err = repo
            .provision(provisioning_for(
                PlanId::random(),
                "jane@example.com",
                "Casablanca",
            ))
            .await
            .expect_err("plan is unknown");

        assert_eq!(err, ProvisioningError::PlanNotFound);
        assert!(repo.records().is_empty());
        assert_eq!(repo.city_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected_and_leaves_one_account() {
        let plan = sample_plan(100);
        let repo = InMemoryProvisioningRepository::new(vec![plan.clone()]);

        repo.provision(provisioning_for(plan.id, "jane@example.com", "Casablanca"))
            .await
            .expect("first provision");
        let err = repo
            .provision(provisioning_for(plan.id, "jane@example.com", "Rabat"))
            .await
            .expect_err("second provision duplicates the email");

        assert_eq!(err, ProvisioningError::DuplicateEmail);
        assert_eq!(repo.records().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn same_city_is_reused_across_accounts() {
        let plan = sample_plan(100);
        let repo = InMemoryProvisioningRepository::new(vec![plan.clone()]);

        repo.provision(provisioning_for(plan.id, "jane@example.com", "Casablanca"))
            .await
            .expect("first provision");
        repo.provision(provisioning_for(plan.id, "omar@example.com", "Casablanca"))
            .await
            .expect("second provision");

        assert_eq!(repo.city_count(), 1);
        let records = repo.records();
        assert_eq!(records[0].city_id, records[1].city_id);
    }

    #[rstest]
    #[tokio::test]
    async fn later_price_change_never_rewrites_payment_history() {
        let plan = sample_plan(100);
        let repo = InMemoryProvisioningRepository::new(vec![plan.clone()]);

        repo.provision(provisioning_for(plan.id, "jane@example.com", "Casablanca"))
            .await
            .expect("provision");
        repo.set_plan_price(plan.id, 250);

        let records = repo.records();
        assert_eq!(records[0].amount_cents, 100);
    }

    #[rstest]
    #[tokio::test]
    async fn email_exists_reflects_committed_accounts() {
        let plan = sample_plan(100);
        let repo = InMemoryProvisioningRepository::new(vec![plan.clone()]);
        let email = EmailAddress::parse("jane@example.com").expect("valid email");

        assert!(!repo.email_exists(&email).await.expect("check"));
        repo.provision(provisioning_for(plan.id, "jane@example.com", "Casablanca"))
            .await
            .expect("provision");
        assert!(repo.email_exists(&email).await.expect("check"));
    }
}
