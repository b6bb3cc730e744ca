//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and use-cases and remain testable without I/O.

use std::sync::Arc;

use crate::domain::SignupService;
use crate::domain::ports::PlanRepository;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Plan catalogue reads for the listing and form endpoints.
    pub plans: Arc<dyn PlanRepository>,
    /// The purchase submission use-case.
    pub signup: SignupService,
}

impl HttpState {
    /// Construct state from the plan port and signup use-case.
    pub fn new(plans: Arc<dyn PlanRepository>, signup: SignupService) -> Self {
        Self { plans, signup }
    }
}
