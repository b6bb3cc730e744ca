//! Port abstraction for plan lookup adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Plan, PlanId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by plan repository adapters.
    pub enum PlanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "plan repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "plan repository query failed: {message}",
    }
}

/// Driven port for reading subscription plans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Fetch a plan by identifier, active or not.
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PlanRepositoryError>;

    /// List plans currently offered for purchase.
    async fn list_active(&self) -> Result<Vec<Plan>, PlanRepositoryError>;
}

/// In-memory plan catalogue used by tests and the no-database server mode.
#[derive(Debug, Clone, Default)]
pub struct FixturePlanRepository {
    plans: Vec<Plan>,
}

impl FixturePlanRepository {
    /// Build a fixture over a static plan list.
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }
}

#[async_trait]
impl PlanRepository for FixturePlanRepository {
    async fn find_by_id(&self, id: PlanId) -> Result<Option<Plan>, PlanRepositoryError> {
        Ok(self.plans.iter().find(|plan| plan.id == id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Plan>, PlanRepositoryError> {
        Ok(self
            .plans
            .iter()
            .filter(|plan| plan.is_active)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn plan(name: &str, is_active: bool) -> Plan {
        Plan {
            id: PlanId::random(),
            name: name.into(),
            price_cents: 4_900,
            duration_months: 12,
            max_residents: 100,
            max_apartments: 40,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_finds_by_id_and_filters_inactive() {
        let active = plan("Essential", true);
        let retired = plan("Legacy", false);
        let repo = FixturePlanRepository::new(vec![active.clone(), retired.clone()]);

        let found = repo.find_by_id(retired.id).await.expect("lookup");
        assert_eq!(found, Some(retired));

        let listed = repo.list_active().await.expect("list");
        assert_eq!(listed, vec![active]);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_misses_unknown_id() {
        let repo = FixturePlanRepository::default();
        let found = repo.find_by_id(PlanId::random()).await.expect("lookup");
        assert!(found.is_none());
    }
}
