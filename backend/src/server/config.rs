//! Application settings and server configuration.
//!
//! [`AppSettings`] is the declarative half, loaded by OrthoConfig from CLI
//! flags, environment (prefix `SYNDICA_`), and config files. The default
//! administrative owner id lives here so it is injected into the workflow
//! rather than buried in logic.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_PORT: u16 = 8080;
const DEFAULT_CAPTURE_DIR: &str = "var/outbox";
const DEFAULT_MAIL_RELAY_URL: &str = "http://127.0.0.1:8025/api/send";

/// Configuration values loaded at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SYNDICA")]
pub struct AppSettings {
    /// Socket address to bind; defaults to `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. Absent selects the in-memory adapters
    /// (development and tests only).
    pub database_url: Option<String>,
    /// Default administrative owner written to assignment and payment rows.
    pub default_admin_id: Option<Uuid>,
    /// Mail relay endpoint the transport notifier POSTs to.
    pub mail_relay_url: Option<Url>,
    /// Directory the capture notifier writes artifacts under.
    pub capture_dir: Option<PathBuf>,
    /// Mark session cookies `Secure`; disable only for local HTTP.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// File holding the session key material.
    pub session_key_file: Option<PathBuf>,
}

impl AppSettings {
    /// Bind address, falling back to the default port on all interfaces.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_BIND_PORT)))
    }

    /// Capture directory, falling back to the default outbox path.
    pub fn capture_dir(&self) -> PathBuf {
        self.capture_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CAPTURE_DIR))
    }

    /// Mail relay endpoint, falling back to the local development relay.
    ///
    /// # Panics
    ///
    /// Never panics: the fallback literal is a valid URL by construction
    /// and covered by a test.
    pub fn mail_relay_url(&self) -> Url {
        self.mail_relay_url.clone().unwrap_or_else(|| {
            Url::parse(DEFAULT_MAIL_RELAY_URL).unwrap_or_else(|err| {
                panic!("default mail relay URL failed to parse: {err}")
            })
        })
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) admin_id: Uuid,
    pub(crate) mail_relay: Url,
    pub(crate) capture_dir: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from resolved settings.
    #[must_use]
    pub fn new(
        key: Key,
        settings: &AppSettings,
        same_site: SameSite,
        admin_id: Uuid,
    ) -> Self {
        Self {
            key,
            cookie_secure: settings.cookie_secure,
            same_site,
            bind_addr: settings.bind_addr(),
            admin_id,
            mail_relay: settings.mail_relay_url(),
            capture_dir: settings.capture_dir(),
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the Diesel-backed adapters; otherwise
    /// the in-memory fixtures serve requests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and fallbacks.
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("syndica")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_configured() {
        let _guard = lock_env([
            ("SYNDICA_BIND_ADDR", None::<String>),
            ("SYNDICA_DATABASE_URL", None),
            ("SYNDICA_DEFAULT_ADMIN_ID", None),
            ("SYNDICA_MAIL_RELAY_URL", None),
            ("SYNDICA_CAPTURE_DIR", None),
            ("SYNDICA_COOKIE_SECURE", None),
        ]);
        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().port(), DEFAULT_BIND_PORT);
        assert_eq!(settings.capture_dir(), PathBuf::from(DEFAULT_CAPTURE_DIR));
        assert_eq!(settings.mail_relay_url().as_str(), DEFAULT_MAIL_RELAY_URL);
        assert!(settings.cookie_secure);
        assert!(settings.database_url.is_none());
        assert!(settings.default_admin_id.is_none());
    }

    #[rstest]
    fn environment_overrides_are_honoured() {
        let _guard = lock_env([
            ("SYNDICA_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("SYNDICA_CAPTURE_DIR", Some("/tmp/outbox".to_owned())),
            (
                "SYNDICA_DEFAULT_ADMIN_ID",
                Some("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned()),
            ),
        ]);
        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().port(), 9000);
        assert_eq!(settings.capture_dir(), PathBuf::from("/tmp/outbox"));
        assert_eq!(
            settings.default_admin_id.map(|id| id.to_string()).as_deref(),
            Some("3fa85f64-5717-4562-b3fc-2c963f66afa6")
        );
    }
}
