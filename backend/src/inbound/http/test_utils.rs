//! Shared helpers for HTTP adapter tests.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use mockable::DefaultClock;
use uuid::Uuid;

use crate::domain::ports::{
    FixturePlanRepository, InMemoryProvisioningRepository, RecordingNotifier,
};
use crate::domain::{Plan, SignupService};
use crate::inbound::http::state::HttpState;

/// Session middleware with an ephemeral key and lax cookies for test apps.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build()
}

/// Full fixture wiring with handles kept for assertions.
pub(crate) struct TestState {
    pub state: HttpState,
    pub repo: Arc<InMemoryProvisioningRepository>,
    pub transport: Arc<RecordingNotifier>,
    pub capture: Arc<RecordingNotifier>,
}

/// Build an [`HttpState`] whose ports all run in memory over `plans`.
pub(crate) fn test_state(plans: Vec<Plan>) -> TestState {
    let repo = Arc::new(InMemoryProvisioningRepository::new(plans.clone()));
    let transport = Arc::new(RecordingNotifier::new());
    let capture = Arc::new(RecordingNotifier::new());
    let signup = SignupService::new(
        repo.clone(),
        transport.clone(),
        capture.clone(),
        Arc::new(DefaultClock),
        Uuid::new_v4(),
    );
    TestState {
        state: HttpState::new(Arc::new(FixturePlanRepository::new(plans)), signup),
        repo,
        transport,
        capture,
    }
}

/// Build an [`HttpState`] over an explicit plan fixture, with signup wired
/// to empty in-memory ports; used by tests that only read the catalogue.
pub(crate) fn state_with_plans(plans: FixturePlanRepository) -> HttpState {
    let repo = Arc::new(InMemoryProvisioningRepository::default());
    let signup = SignupService::new(
        repo,
        Arc::new(RecordingNotifier::new()),
        Arc::new(RecordingNotifier::new()),
        Arc::new(DefaultClock),
        Uuid::new_v4(),
    );
    HttpState::new(Arc::new(plans), signup)
}
