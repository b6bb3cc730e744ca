//! Domain layer: entities, the purchase workflow, and its ports.

mod account;
pub mod credential;
mod error;
mod plan;
pub mod ports;
pub mod signup;
mod signup_service;

pub use account::{Account, AccountId, AccountRole, AccountStatus};
pub use credential::{CredentialHash, PlaintextCredential};
pub use error::{Error, ErrorCode};
pub use plan::{Plan, PlanId};
pub use signup_service::{
    CredentialDelivery, DeliveryChannel, SignupOutcome, SignupRejection, SignupService,
};
