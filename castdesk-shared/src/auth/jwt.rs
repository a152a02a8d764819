/// JWT issuance and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) using a process-wide secret that
/// is injected from configuration at startup; this module never reads ambient
/// state. Each token carries identity claims plus a type tag distinguishing
/// short-lived access tokens from long-lived refresh tokens.
///
/// # Claims
///
/// - `sub`: username (the lookup key for user resolution)
/// - `user_id`: numeric user id
/// - `username`, `email`: identity convenience claims
/// - `iat`, `exp`: validity window (Unix timestamps)
/// - `jti`: unique token id
/// - `type`: `access` or `refresh`
///
/// # Failure taxonomy
///
/// Verification distinguishes three cases, all of which reject the token in
/// full: [`JwtError::Expired`] (clock past `exp`), [`JwtError::Malformed`]
/// (token structure cannot be parsed), and [`JwtError::Invalid`] (signature or
/// claim mismatch).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create a token
    #[error("Failed to create token: {0}")]
    Creation(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token structure could not be parsed
    #[error("Malformed token: {0}")]
    Malformed(String),

    /// Signature or claim validation failed
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Token type tag carried in the `type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token used for API authentication
    Access,

    /// Long-lived token exchanged for new access tokens
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims for castdesk tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username, resolved to a user record on each request
    pub sub: String,

    /// Numeric user id
    pub user_id: i32,

    /// Username (mirrors `sub`)
    pub username: String,

    /// Email, when the account has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Unique token id
    pub jti: Uuid,

    /// Access or refresh
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims valid from now for `lifetime`
    pub fn new(
        user_id: i32,
        username: &str,
        email: Option<String>,
        token_type: TokenType,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: username.to_string(),
            user_id,
            username: username.to_string(),
            email,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    /// Checks if the validity window has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact JWT string
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::Creation(format!("Token encoding failed: {}", e)))
}

/// Validates a token's signature and expiry, returning its claims
///
/// Any failure rejects the token in full; there is no partial trust.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => JwtError::Malformed(e.to_string()),
            _ => JwtError::Invalid(e.to_string()),
        }
    })?;

    Ok(data.claims)
}

/// Validates a token and requires the `access` type tag
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::Invalid(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates a token and requires the `refresh` type tag
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::Invalid(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,

    /// Always `"bearer"`; kept for client convenience
    pub token_type: String,
}

/// Issues an access/refresh pair for the same identity
pub fn create_token_pair(
    user_id: i32,
    username: &str,
    email: Option<String>,
    secret: &str,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(user_id, username, email.clone(), TokenType::Access, access_lifetime);
    let refresh_claims = Claims::new(user_id, username, email, TokenType::Refresh, refresh_lifetime);

    Ok(TokenPair {
        access_token: create_token(&access_claims, secret)?,
        refresh_token: create_token(&refresh_claims, secret)?,
        token_type: "bearer".to_string(),
    })
}

/// Exchanges a valid refresh token for a new token pair
///
/// The new pair carries the same identity claims; expiry and `jti` are fresh.
pub fn refresh_token_pair(
    refresh_token: &str,
    secret: &str,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
) -> Result<TokenPair, JwtError> {
    let claims = validate_refresh_token(refresh_token, secret)?;

    create_token_pair(
        claims.user_id,
        &claims.username,
        claims.email,
        secret,
        access_lifetime,
        refresh_lifetime,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn access_claims() -> Claims {
        Claims::new(
            7,
            "casting_desk",
            Some("desk@example.com".to_string()),
            TokenType::Access,
            Duration::minutes(30),
        )
    }

    #[test]
    fn test_claims_window() {
        let claims = access_claims();
        assert_eq!(claims.sub, "casting_desk");
        assert_eq!(claims.user_id, 7);
        assert!(!claims.is_expired());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_jti_is_unique_per_token() {
        let a = access_claims();
        let b = access_claims();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_create_and_validate_roundtrip() {
        let claims = access_claims();
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, "casting_desk");
        assert_eq!(validated.user_id, 7);
        assert_eq!(validated.email.as_deref(), Some("desk@example.com"));
        assert_eq!(validated.token_type, TokenType::Access);
        assert_eq!(validated.jti, claims.jti);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token(&access_claims(), SECRET).unwrap();

        let err = validate_token(&token, "another-secret-also-32-bytes-long!").unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn test_expired_token() {
        // Expired well past jsonwebtoken's default leeway
        let claims = Claims::new(7, "casting_desk", None, TokenType::Access, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let err = validate_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, JwtError::Expired));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = validate_token("not-a-jwt-at-all", SECRET).unwrap_err();
        assert!(matches!(err, JwtError::Malformed(_)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = create_token(&access_claims(), SECRET).unwrap();

        // Flip one character of the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_type_tag_enforced() {
        let access = create_token(&access_claims(), SECRET).unwrap();
        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_refresh_token(&access, SECRET).is_err());

        let refresh_claims =
            Claims::new(7, "casting_desk", None, TokenType::Refresh, Duration::days(7));
        let refresh = create_token(&refresh_claims, SECRET).unwrap();
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
        assert!(validate_access_token(&refresh, SECRET).is_err());
    }

    #[test]
    fn test_refresh_pair() {
        let pair = create_token_pair(
            7,
            "casting_desk",
            None,
            SECRET,
            Duration::minutes(30),
            Duration::days(7),
        )
        .unwrap();
        assert_eq!(pair.token_type, "bearer");

        let renewed =
            refresh_token_pair(&pair.refresh_token, SECRET, Duration::minutes(30), Duration::days(7))
                .unwrap();
        let validated = validate_access_token(&renewed.access_token, SECRET).unwrap();
        assert_eq!(validated.user_id, 7);
        assert_eq!(validated.username, "casting_desk");
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let access = create_token(&access_claims(), SECRET).unwrap();
        let result = refresh_token_pair(&access, SECRET, Duration::minutes(30), Duration::days(7));
        assert!(result.is_err());
    }
}
