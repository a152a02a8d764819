/// Bearer-token authentication middleware for Axum
///
/// Validates the `Authorization: Bearer <token>` header, then resolves the
/// token subject to a live user record. The resolved identity is inserted into
/// request extensions as [`CurrentUser`], which handlers and the role guard
/// read via Axum's `Extension` extractor.
///
/// The authorization role is always read from the database record, never from
/// token claims, so a role change takes effect on the next request.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use castdesk_shared::auth::middleware::create_bearer_auth;
/// use sqlx::PgPool;
///
/// async fn handler() -> &'static str {
///     "Protected route"
/// }
///
/// fn setup(pool: PgPool) -> Router {
///     Router::new()
///         .route("/protected", get(handler))
///         .layer(middleware::from_fn(create_bearer_auth(pool, "secret")))
/// }
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::{User, UserRole, UserStatus};

/// Authenticated caller identity added to request extensions
///
/// Present on every request that passed bearer authentication. Handlers
/// extract it with `Extension(user): Extension<CurrentUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id
    pub id: i32,

    /// Username (the token subject)
    pub username: String,

    /// Email, when the account has one
    pub email: Option<String>,

    /// Role as stored in the database at request time
    pub role: UserRole,
}

impl CurrentUser {
    /// Builds the request identity from a resolved user record
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat(String),

    /// Token has expired
    ExpiredToken,

    /// Token validation failed
    InvalidToken(String),

    /// Token subject does not resolve to a usable account
    UserNotFound,

    /// Account exists but is suspended or removed
    InactiveUser,

    /// Caller's role is not in the route's allowed set
    Forbidden(String),

    /// Database error during user resolution
    DatabaseError(String),
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> String {
        match self {
            AuthError::MissingCredentials => "Missing credentials".to_string(),
            AuthError::InvalidFormat(msg) => msg.clone(),
            AuthError::ExpiredToken => "Token expired".to_string(),
            AuthError::InvalidToken(msg) => msg.clone(),
            AuthError::UserNotFound => "Invalid credentials".to_string(),
            AuthError::InactiveUser => "Account is not active".to_string(),
            AuthError::Forbidden(msg) => msg.clone(),
            AuthError::DatabaseError(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match status {
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::INTERNAL_SERVER_ERROR => "internal_error",
            _ => "unauthorized",
        };

        if let AuthError::DatabaseError(ref msg) = self {
            tracing::error!(error = %msg, "Authentication database lookup failed");
        }

        let body = Json(json!({
            "error": error,
            "message": self.message(),
        }));

        (status, body).into_response()
    }
}

/// Bearer-token authentication middleware
///
/// Validates the access token, resolves its subject to a user row, and rejects
/// callers whose account is suspended or soft-deleted.
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing or not `Bearer <token>`
/// - Token is expired, malformed, or fails signature validation
/// - Token subject has no active user record
pub async fn bearer_auth_middleware(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    // The role comes from the database row, not the token
    let user = User::find_by_username(&pool, &claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UserNotFound)?;

    if user.status != UserStatus::Active || user.deleted_at.is_some() {
        return Err(AuthError::InactiveUser);
    }

    req.extensions_mut().insert(CurrentUser::from_user(&user));

    Ok(next.run(req).await)
}

/// Creates a bearer authentication middleware closure
///
/// Captures the pool and JWT secret so the middleware can be layered with
/// `middleware::from_fn`.
pub fn create_bearer_auth(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(bearer_auth_middleware(pool, secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{UserRole, UserStatus};
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: 42,
            name: Some("Agency Admin".to_string()),
            username: "agency_admin".to_string(),
            email: Some("admin@example.com".to_string()),
            phone: None,
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            profile_picture_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_current_user_from_user() {
        let user = sample_user();
        let current = CurrentUser::from_user(&user);

        assert_eq!(current.id, 42);
        assert_eq!(current.username, "agency_admin");
        assert_eq!(current.email.as_deref(), Some("admin@example.com"));
        assert_eq!(current.role, UserRole::Admin);
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidFormat("x".to_string()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExpiredToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InactiveUser.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Forbidden("nope".to_string()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::DatabaseError("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_hides_detail() {
        let err = AuthError::DatabaseError("connection refused at 10.0.0.5".to_string());
        assert_eq!(err.message(), "Internal server error");
    }
}
