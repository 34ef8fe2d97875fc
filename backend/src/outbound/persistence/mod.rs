//! Persistence adapters backed by PostgreSQL via Diesel.

mod diesel_country_repository;
mod models;
mod pool;
pub mod schema;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

pub use diesel_country_repository::DieselCountryRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Embedded migrations from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a short-lived synchronous connection.
///
/// Runs once at startup, before the async pool begins serving requests.
pub fn run_migrations(database_url: &str) -> Result<(), PoolError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| PoolError::build(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(err.to_string()))?;
    for migration in applied {
        info!(%migration, "applied migration");
    }
    Ok(())
}
