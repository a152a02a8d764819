/// Authentication and authorization utilities
///
/// This module provides the security primitives for castdesk:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token issuance and validation
/// - [`middleware`]: Bearer-token authentication middleware (resolves the
///   caller to a [`middleware::CurrentUser`])
/// - [`guard`]: Role-based route guards composed at route registration
///
/// # Request flow
///
/// ```text
/// Authorization header -> middleware (validate token, resolve user)
///                      -> guard (role in allowed set?)
///                      -> handler
/// ```
///
/// Any failure before the handler is terminal for the request: 401 for
/// authentication failures, 403 for authorization failures.

pub mod guard;
pub mod jwt;
pub mod middleware;
pub mod password;
