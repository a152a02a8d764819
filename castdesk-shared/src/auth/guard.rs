/// Role-based route guards
///
/// A guard is composed at route registration with a fixed set of allowed
/// roles and layered after (inside) the bearer authentication middleware. It
/// reads the [`CurrentUser`] extension and rejects the request with 403 when
/// the caller's role is not in the set. A missing extension means the guard
/// was layered without authentication in front of it; that request is
/// rejected with 401 rather than let through.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use castdesk_shared::auth::guard::{require_roles, ADMIN_ONLY};
///
/// let admin_routes: Router = Router::new()
///     .route("/users", get(|| async { "OK" }))
///     .layer(middleware::from_fn(require_roles(ADMIN_ONLY)));
/// ```

use axum::{extract::Request, middleware::Next, response::Response};

use super::middleware::{AuthError, CurrentUser};
use crate::models::user::UserRole;

/// Routes restricted to administrators
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Routes shared between administrators and project accounts
pub const ADMIN_OR_PROJECT: &[UserRole] = &[UserRole::Admin, UserRole::Project];

/// Checks a caller's role against an allowed set
pub fn check_role(user: &CurrentUser, allowed: &[UserRole]) -> Result<(), AuthError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "Role '{}' is not permitted for this resource",
            user.role.as_str()
        )))
    }
}

/// Role guard middleware
///
/// Expects [`CurrentUser`] in request extensions; the authentication layer
/// puts it there.
pub async fn role_guard_middleware(
    allowed: &'static [UserRole],
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AuthError::MissingCredentials)?;

    check_role(user, allowed)?;

    Ok(next.run(req).await)
}

/// Creates a role guard middleware closure for a fixed allowed set
///
/// The set is a `'static` slice so an empty or misspelled role cannot be
/// introduced at runtime; guards are fully determined at composition.
pub fn require_roles(
    allowed: &'static [UserRole],
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    move |req, next| Box::pin(role_guard_middleware(allowed, req, next))
}
