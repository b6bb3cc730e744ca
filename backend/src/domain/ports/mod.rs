//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_notifier;
mod plan_repository;
mod provisioning_repository;

#[cfg(test)]
pub use credential_notifier::MockCredentialNotifier;
pub use credential_notifier::{
    CredentialNotice, CredentialNotifier, DeliveryReceipt, NotificationError, RecordingNotifier,
};
#[cfg(test)]
pub use plan_repository::MockPlanRepository;
pub use plan_repository::{FixturePlanRepository, PlanRepository, PlanRepositoryError};
#[cfg(test)]
pub use provisioning_repository::MockProvisioningRepository;
pub use provisioning_repository::{
    DEFAULT_APARTMENT_FLOOR, DEFAULT_APARTMENT_KIND, DEFAULT_APARTMENT_NUMBER,
    InMemoryProvisioningRepository, NewProvisioning, ProvisionedAccount, ProvisionedRecord,
    ProvisioningError, ProvisioningRepository,
};
