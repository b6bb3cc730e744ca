//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::{AppSettings, ServerConfig};

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use chrono::Utc;
use mockable::DefaultClock;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    CredentialNotifier, FixturePlanRepository, InMemoryProvisioningRepository, PlanRepository,
    ProvisioningRepository,
};
use crate::domain::{Plan, PlanId, SignupService};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::plans::{get_plan, list_plans};
use crate::inbound::http::signup::{purchase_form, purchase_success, submit_purchase};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::mail::{FileCaptureNotifier, HttpMailer};
use crate::outbound::persistence::{DieselPlanRepository, DieselProvisioningRepository};
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

/// Demo catalogue served when no database pool is configured.
fn fixture_plans() -> Vec<Plan> {
    let created_at = Utc::now();
    vec![
        Plan {
            id: PlanId::random(),
            name: "Essential".into(),
            price_cents: 4_900,
            duration_months: 12,
            max_residents: 100,
            max_apartments: 40,
            is_active: true,
            created_at,
        },
        Plan {
            id: PlanId::random(),
            name: "Premium".into(),
            price_cents: 9_900,
            duration_months: 12,
            max_residents: 400,
            max_apartments: 160,
            is_active: true,
            created_at,
        },
    ]
}

/// Build the port implementations for the configured storage mode.
///
/// A configured pool selects the Diesel adapters; otherwise the in-memory
/// fixtures serve requests so the workflow stays drivable in development.
fn build_ports(
    config: &ServerConfig,
) -> (Arc<dyn PlanRepository>, Arc<dyn ProvisioningRepository>) {
    match &config.db_pool {
        Some(pool) => (
            Arc::new(DieselPlanRepository::new(pool.clone())),
            Arc::new(DieselProvisioningRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; serving from in-memory fixtures");
            let plans = fixture_plans();
            (
                Arc::new(FixturePlanRepository::new(plans.clone())),
                Arc::new(InMemoryProvisioningRepository::new(plans)),
            )
        }
    }
}

fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let (plans, provisioning) = build_ports(config);

    let transport: Arc<dyn CredentialNotifier> =
        Arc::new(HttpMailer::new(config.mail_relay.clone()).map_err(|err| {
            std::io::Error::other(format!("mail relay client construction failed: {err}"))
        })?);
    let capture: Arc<dyn CredentialNotifier> =
        Arc::new(FileCaptureNotifier::new(config.capture_dir.clone()));

    let signup = SignupService::new(
        provisioning,
        transport,
        capture,
        Arc::new(DefaultClock),
        config.admin_id,
    );
    Ok(HttpState::new(plans, signup))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1").service(list_plans).service(get_plan);

    let purchase = web::scope("")
        .wrap(session)
        .service(purchase_form)
        .service(submit_purchase)
        .service(purchase_success)
        .service(api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(purchase);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket or constructing an
/// outbound client fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        admin_id: _,
        mail_relay: _,
        capture_dir: _,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Resolve the default administrative owner, warning when unset.
///
/// Development environments may omit it; production must configure
/// `SYNDICA_DEFAULT_ADMIN_ID` so ownership rows reference a real admin.
pub fn resolve_admin_id(settings: &AppSettings) -> Uuid {
    settings.default_admin_id.unwrap_or_else(|| {
        warn!("SYNDICA_DEFAULT_ADMIN_ID is not configured; using the nil owner id");
        Uuid::nil()
    })
}
