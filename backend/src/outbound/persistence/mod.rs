//! PostgreSQL persistence adapters behind the domain ports.

mod diesel_plan_repository;
mod diesel_provisioning_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_plan_repository::DieselPlanRepository;
pub use diesel_provisioning_repository::DieselProvisioningRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// SQL migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations before the pool starts serving requests.
///
/// Migration running is synchronous in Diesel, so the work runs on a
/// blocking thread over its own short-lived connection.
///
/// # Errors
///
/// Returns [`PoolError::Build`] when the connection or a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        use diesel::Connection;

        let mut conn = diesel::PgConnection::establish(&url)
            .map_err(|err| PoolError::build(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| PoolError::build(err.to_string()))
    })
    .await
    .map_err(|err| PoolError::build(err.to_string()))?
}
