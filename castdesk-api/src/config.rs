/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `JWT_SECRET`: Secret key for JWT signing (required, >= 32 bytes)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: Access token lifetime (default: 30)
/// - `REFRESH_TOKEN_EXPIRE_DAYS`: Refresh token lifetime (default: 7)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, or `*` (default: *)
/// - `RUST_LOG`: Log filter (default: info)

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: Must be kept secret and at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expire_days: i64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()?;

        let refresh_token_expire_days = env::var("REFRESH_TOKEN_EXPIRE_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<i64>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expire_minutes,
                refresh_token_expire_days,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Access token lifetime as a duration
    pub fn access_token_lifetime(&self) -> Duration {
        Duration::minutes(self.jwt.access_token_expire_minutes)
    }

    /// Refresh token lifetime as a duration
    pub fn refresh_token_lifetime(&self) -> Duration {
        Duration::days(self.jwt.refresh_token_expire_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                access_token_expire_minutes: 30,
                refresh_token_expire_days: 7,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_token_lifetimes() {
        let config = test_config();
        assert_eq!(config.access_token_lifetime(), Duration::minutes(30));
        assert_eq!(config.refresh_token_lifetime(), Duration::days(7));
    }
}
