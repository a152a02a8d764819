/// Database connection pool management
///
/// PostgreSQL connection pool built on sqlx, with a startup health check.
///
/// # Example
///
/// ```no_run
/// use castdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL").unwrap(),
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the database connection pool
///
/// All timeouts are in seconds for ease of configuration from environment
/// variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// How long a connection can remain idle before being closed (seconds)
    pub idle_timeout_seconds: Option<u64>,

    /// Maximum lifetime of a connection before forced recycling (seconds)
    pub max_lifetime_seconds: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_seconds: 30,
            idle_timeout_seconds: Some(600),
            max_lifetime_seconds: Some(1800),
        }
    }
}

/// Creates and initializes a PostgreSQL connection pool
///
/// Performs a health check before returning, so a misconfigured database URL
/// fails at startup rather than on the first request.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the database is unreachable, or
/// the health check fails.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        connect_timeout_seconds = config.connect_timeout_seconds,
        "Creating database connection pool"
    );

    let mut pool_options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds));

    if let Some(idle_timeout) = config.idle_timeout_seconds {
        pool_options = pool_options.idle_timeout(Duration::from_secs(idle_timeout));
    }
    if let Some(max_lifetime) = config.max_lifetime_seconds {
        pool_options = pool_options.max_lifetime(Duration::from_secs(max_lifetime));
    }

    let pool = pool_options.connect(&config.url).await?;

    health_check(&pool).await?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// Executes a trivial query to verify the database is reachable.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool during shutdown
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
