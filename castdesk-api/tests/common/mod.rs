/// Common test utilities for integration tests
///
/// Provides a [`TestContext`] that connects to the database named by
/// `DATABASE_URL`, runs migrations, seeds an admin account and builds the
/// full router. Tests that need it should bail out early when the variable
/// is not set.

use castdesk_api::app::{build_router, AppState};
use castdesk_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use castdesk_shared::auth::jwt::{create_token, Claims, TokenType};
use castdesk_shared::auth::password::hash_password;
use castdesk_shared::models::client::{Client, CreateClient};
use castdesk_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

/// Plaintext password of every user seeded through this module
pub const TEST_PASSWORD: &str = "S3cure-test-password";

const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing the app, pool and a seeded admin
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub admin: User,
    pub admin_token: String,
}

impl TestContext {
    /// Creates a new test context against `DATABASE_URL`
    pub async fn new() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| TEST_JWT_SECRET.to_string());

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: database_url.clone(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expire_minutes: 30,
                refresh_token_expire_days: 7,
            },
        };

        let db = PgPool::connect(&database_url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let admin = seed_user(&db, UserRole::Admin, &format!("admin-{}", Uuid::new_v4())).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        let admin_token = issue_access_token(&admin, &config)?;

        Ok(TestContext {
            db,
            app,
            config,
            admin,
            admin_token,
        })
    }

    /// Returns the admin's authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    /// Issues an access token for an arbitrary seeded user
    pub fn token_for(&self, user: &User) -> anyhow::Result<String> {
        issue_access_token(user, &self.config)
    }

    /// Removes the seeded admin
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Approval decisions reference the deciding admin
        sqlx::query("UPDATE fact_sheets SET approved_by_id = NULL WHERE approved_by_id = $1")
            .bind(self.admin.id)
            .execute(&self.db)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.admin.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

fn issue_access_token(user: &User, config: &Config) -> anyhow::Result<String> {
    let claims = Claims::new(
        user.id,
        &user.username,
        user.email.clone(),
        TokenType::Access,
        config.access_token_lifetime(),
    );
    Ok(create_token(&claims, &config.jwt.secret)?)
}

/// Seeds a user with [`TEST_PASSWORD`] and the given role
pub async fn seed_user(pool: &PgPool, role: UserRole, username: &str) -> anyhow::Result<User> {
    let user = User::create(
        pool,
        CreateUser {
            name: Some("Test User".to_string()),
            username: username.to_string(),
            email: Some(format!("{}@example.com", username)),
            phone: None,
            password_hash: hash_password(TEST_PASSWORD)?,
            role,
        },
    )
    .await?;

    Ok(user)
}

/// Seeds a client with a unique email
pub async fn seed_client(ctx: &TestContext) -> anyhow::Result<Client> {
    let client = Client::create(
        &ctx.db,
        CreateClient {
            name: format!("Test Client {}", Uuid::new_v4()),
            phone: None,
            email: format!("client-{}@example.com", Uuid::new_v4()),
            address: None,
        },
    )
    .await?;

    Ok(client)
}
