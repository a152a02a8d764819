/// User administration endpoints
///
/// # Endpoints
///
/// - `GET /v1/users` - List users (admin)

use crate::{
    app::AppState,
    error::ApiResult,
    pagination::{Paginated, PaginationQuery},
};
use axum::{
    extract::{Query, State},
    Json,
};
use castdesk_shared::models::user::{User, UserFilter, UserRole, UserStatus};
use serde::Deserialize;

/// Query parameters for the user list
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Case-insensitive match against name, username, and email
    pub search: Option<String>,

    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,

    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Lists users with filtering and pagination
///
/// Password hashes are never serialized in the response.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Paginated<User>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let filter = UserFilter {
        search: query.search,
        role: query.role,
        status: query.status,
    };

    let (users, total) = User::list(
        &state.db,
        &filter,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(users, &pagination, total)))
}
