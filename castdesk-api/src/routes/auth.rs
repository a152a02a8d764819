/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login with username or email and get tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for a new pair

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Json};
use castdesk_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login identity
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Password (also validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    /// Optional phone number
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user ID
    pub user_id: i32,

    pub username: String,

    /// Access/refresh token pair
    #[serde(flatten)]
    pub tokens: jwt::TokenPair,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: i32,
    pub username: String,
    pub role: UserRole,

    #[serde(flatten)]
    pub tokens: jwt::TokenPair,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Registers a new user
///
/// The password is strength-checked and stored as an Argon2id hash. Accounts
/// are always created as `model`; this route is public, so privileged roles
/// can only be assigned by administrators after the fact.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: username or email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            username: req.username,
            email: req.email,
            phone: req.phone,
            password_hash,
            role: UserRole::Model,
        },
    )
    .await?;

    let tokens = jwt::create_token_pair(
        user.id,
        &user.username,
        user.email.clone(),
        state.jwt_secret(),
        state.config.access_token_lifetime(),
        state.config.refresh_token_lifetime(),
    )?;

    Ok(Json(RegisterResponse {
        user_id: user.id,
        username: user.username,
        tokens,
    }))
}

/// Login endpoint
///
/// Accepts a username or email in the same `identifier` field. Every
/// credential failure maps to the same 401 to avoid account enumeration.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_identifier(&state.db, &req.identifier)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    if user.status != castdesk_shared::models::user::UserStatus::Active {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let tokens = jwt::create_token_pair(
        user.id,
        &user.username,
        user.email.clone(),
        state.jwt_secret(),
        state.config.access_token_lifetime(),
        state.config.refresh_token_lifetime(),
    )?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        role: user.role,
        tokens,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a valid refresh token for a new access/refresh pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<jwt::TokenPair>> {
    let tokens = jwt::refresh_token_pair(
        &req.refresh_token,
        state.jwt_secret(),
        state.config.access_token_lifetime(),
        state.config.refresh_token_lifetime(),
    )?;

    Ok(Json(tokens))
}
