/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root and
/// are embedded at compile time via `sqlx::migrate!`. They run on startup
/// before the server binds.

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the connection is
/// lost mid-run; a failing migration is rolled back.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// Useful for development and tests; in production the database should
/// already exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
