//! Backend entry-point: loads settings, wires adapters, runs the server.

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig as _;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use syndica::inbound::http::health::HealthState;
use syndica::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use syndica::server::{AppSettings, ServerConfig, create_server, resolve_admin_id};

fn session_key(settings: &AppSettings) -> color_eyre::Result<Key> {
    let Some(path) = settings.session_key_file.as_deref() else {
        if cfg!(debug_assertions) {
            warn!("no session key file configured; using a temporary key (dev only)");
            return Ok(Key::generate());
        }
        color_eyre::eyre::bail!("SYNDICA_SESSION_KEY_FILE must be configured in release builds");
    };
    let bytes = std::fs::read(path)
        .wrap_err_with(|| format!("failed to read session key at {}", path.display()))?;
    Ok(Key::derive_from(&bytes))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let key = session_key(&settings)?;
    let admin_id = resolve_admin_id(&settings);

    let mut config = ServerConfig::new(key, &settings, SameSite::Lax, admin_id);
    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("failed to build the database pool")?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(make_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await.wrap_err("server terminated with an error")
}

#[cfg(feature = "metrics")]
fn make_metrics() -> color_eyre::Result<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("syndica")
        .endpoint("/metrics")
        .build()
        .map_err(|err| color_eyre::eyre::eyre!("configure Prometheus metrics: {err}"))
}
