/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use castdesk_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = castdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use castdesk_shared::auth::{
    guard::{require_roles, ADMIN_ONLY, ADMIN_OR_PROJECT},
    middleware::create_bearer_auth,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Liveness + DB check (public)
/// └── /v1/
///     ├── /auth/                    # register, login, refresh (public)
///     ├── /users                    # admin
///     ├── /clients                  # admin
///     ├── /projects                 # admin
///     ├── /roles                    # list: admin|project, rest: admin
///     ├── /role-options             # admin
///     ├── /project-notes            # admin
///     ├── /role-notes               # admin
///     ├── /project-favorites        # admin (scoped to caller)
///     └── /fact-sheets/:project_id  # admin|project
/// ```
///
/// Every group below `/v1` except `/auth` sits behind the bearer
/// authentication middleware; role guards are composed per group, inside the
/// authentication layer so they see the resolved [`CurrentUser`] extension.
///
/// [`CurrentUser`]: castdesk_shared::auth::middleware::CurrentUser
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    let client_routes = Router::new()
        .route(
            "/",
            post(routes::clients::create_client).get(routes::clients::list_clients),
        )
        .route("/:id", put(routes::clients::update_client))
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    // Role list is shared with project accounts (scoped in the handler);
    // everything else is admin-only.
    let casting_role_routes = Router::new()
        .route("/", post(routes::casting_roles::create_role))
        .route(
            "/:id",
            get(routes::casting_roles::get_role)
                .put(routes::casting_roles::update_role)
                .delete(routes::casting_roles::delete_role),
        )
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)))
        .merge(
            Router::new()
                .route("/", get(routes::casting_roles::list_roles))
                .route_layer(axum::middleware::from_fn(require_roles(ADMIN_OR_PROJECT))),
        );

    let role_option_routes = Router::new()
        .route(
            "/",
            post(routes::role_options::create_role_option)
                .get(routes::role_options::list_role_options),
        )
        .route("/:id", put(routes::role_options::update_role_option))
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    let project_note_routes = Router::new()
        .route(
            "/",
            post(routes::project_notes::create_project_note)
                .get(routes::project_notes::list_project_notes),
        )
        .route(
            "/:id",
            get(routes::project_notes::get_project_note)
                .put(routes::project_notes::update_project_note)
                .delete(routes::project_notes::delete_project_note),
        )
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    let role_note_routes = Router::new()
        .route(
            "/",
            post(routes::role_notes::create_role_note).get(routes::role_notes::list_role_notes),
        )
        .route(
            "/:id",
            get(routes::role_notes::get_role_note)
                .put(routes::role_notes::update_role_note)
                .delete(routes::role_notes::delete_role_note),
        )
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    let favorite_routes = Router::new()
        .route(
            "/",
            post(routes::favorites::create_favorite).get(routes::favorites::list_favorites),
        )
        .route(
            "/:id",
            get(routes::favorites::get_favorite).delete(routes::favorites::delete_favorite),
        )
        .route(
            "/:kind/:id",
            axum::routing::delete(routes::favorites::delete_favorite_by_target),
        )
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_ONLY)));

    let fact_sheet_routes = Router::new()
        .route(
            "/:project_id",
            get(routes::fact_sheets::get_fact_sheet).put(routes::fact_sheets::update_fact_sheet),
        )
        .route_layer(axum::middleware::from_fn(require_roles(ADMIN_OR_PROJECT)));

    // Authenticated subtree; the auth layer is outermost so it runs before
    // the role guards.
    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/clients", client_routes)
        .nest("/projects", project_routes)
        .nest("/roles", casting_role_routes)
        .nest("/role-options", role_option_routes)
        .nest("/project-notes", project_note_routes)
        .nest("/role-notes", role_note_routes)
        .nest("/project-favorites", favorite_routes)
        .nest("/fact-sheets", fact_sheet_routes)
        .layer(axum::middleware::from_fn(create_bearer_auth(
            state.db.clone(),
            state.config.jwt.secret.clone(),
        )));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
