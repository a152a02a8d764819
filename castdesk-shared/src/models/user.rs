/// User model and database operations
///
/// Users are the authentication principals. Every user carries exactly one
/// [`UserRole`] that the authorization guard checks on each request, and a
/// lifecycle [`UserStatus`]. Accounts are never hard-deleted through the API;
/// removal sets `deleted_at`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(100),
///     username VARCHAR(100) NOT NULL UNIQUE,
///     email VARCHAR(255) UNIQUE,
///     phone VARCHAR(20),
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL,
///     status user_status NOT NULL DEFAULT 'active',
///     profile_picture_url TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use castdesk_shared::models::user::{CreateUser, User, UserRole};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let new_user = CreateUser {
///     name: Some("Agency Admin".to_string()),
///     username: "agency_admin".to_string(),
///     email: Some("admin@example.com".to_string()),
///     phone: None,
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::Admin,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Authorization role, one per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Agency staff with full access
    Admin,

    /// Talent account
    Model,

    /// Project account tied to a single project by username
    Project,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Model => "model",
            UserRole::Project => "project",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "model" => Ok(UserRole::Model),
            "project" => Ok(UserRole::Project),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i32,

    /// Optional display name
    pub name: Option<String>,

    /// Login identity and token subject
    ///
    /// Must be unique across all users
    pub username: String,

    /// Email address (unique when present)
    pub email: Option<String>,

    /// Optional phone number
    pub phone: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Authorization role
    pub role: UserRole,

    /// Lifecycle status; only `active` accounts may authenticate
    pub status: UserStatus,

    /// Optional profile picture URL
    pub profile_picture_url: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete marker (None for live accounts)
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    pub role: UserRole,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name (use Some(None) to clear)
    pub name: Option<Option<String>>,

    /// New email address
    pub email: Option<Option<String>>,

    /// New phone number
    pub phone: Option<Option<String>>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New role
    pub role: Option<UserRole>,

    /// New lifecycle status
    pub status: Option<UserStatus>,

    /// New profile picture URL
    pub profile_picture_url: Option<Option<String>>,
}

/// Filters for listing users
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive match against name, username, and email
    pub search: Option<String>,

    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

const USER_COLUMNS: &str = "id, name, username, email, phone, password_hash, role, status, \
                            profile_picture_url, created_at, updated_at, deleted_at";

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, username, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.username)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a live user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a live user by username
    ///
    /// This is the resolution path for token subjects.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 AND deleted_at IS NULL",
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a live user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL",
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a live user by username or email
    ///
    /// Login accepts either identifier in the same field.
    pub async fn find_by_identifier(pool: &PgPool, identifier: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE (username = $1 OR email = $1) AND deleted_at IS NULL
            "#,
        ))
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are updated. `updated_at` is set to the
    /// current time. Returns None if the user does not exist or is deleted.
    pub async fn update(pool: &PgPool, id: i32, data: UpdateUser) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.phone.is_some() {
            bind_count += 1;
            query.push_str(&format!(", phone = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.profile_picture_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", profile_picture_url = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND deleted_at IS NULL RETURNING {USER_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(phone) = data.phone {
            q = q.bind(phone);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(url) = data.profile_picture_url {
            q = q.bind(url);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Soft-deletes a user
    ///
    /// Returns true if a live user was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists live users with filtering and pagination
    ///
    /// Returns the page of users plus the total count matching the filter,
    /// ordered by creation date (newest first).
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut conditions = String::from("deleted_at IS NULL");
        let mut bind_count = 0;

        if filter.search.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(
                " AND (name ILIKE ${n} OR username ILIKE ${n} OR email ILIKE ${n})",
                n = bind_count
            ));
        }
        if filter.role.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND role = ${}", bind_count));
        }
        if filter.status.is_some() {
            bind_count += 1;
            conditions.push_str(&format!(" AND status = ${}", bind_count));
        }

        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let count_query = format!("SELECT COUNT(*) FROM users WHERE {}", conditions);
        let mut count_q = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(ref pattern) = search_pattern {
            count_q = count_q.bind(pattern);
        }
        if let Some(role) = filter.role {
            count_q = count_q.bind(role);
        }
        if let Some(status) = filter.status {
            count_q = count_q.bind(status);
        }
        let (total,) = count_q.fetch_one(pool).await?;

        let list_query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            conditions,
            bind_count + 1,
            bind_count + 2
        );
        let mut list_q = sqlx::query_as::<_, User>(&list_query);
        if let Some(ref pattern) = search_pattern {
            list_q = list_q.bind(pattern);
        }
        if let Some(role) = filter.role {
            list_q = list_q.bind(role);
        }
        if let Some(status) = filter.status {
            list_q = list_q.bind(status);
        }
        let users = list_q.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((users, total))
    }
}
