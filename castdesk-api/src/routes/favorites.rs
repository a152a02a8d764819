/// Favorite endpoints
///
/// Favorites are always scoped to the authenticated user; one user can never
/// see or delete another user's bookmarks.
///
/// # Endpoints
///
/// - `POST /v1/project-favorites` - Favorite a project or role (admin)
/// - `GET /v1/project-favorites` - List own favorites (admin)
/// - `GET /v1/project-favorites/:id` - Get an own favorite (admin)
/// - `DELETE /v1/project-favorites/:id` - Remove a favorite by id (admin)
/// - `DELETE /v1/project-favorites/:kind/:id` - Remove a favorite by target (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    pagination::{Paginated, PaginationQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use castdesk_shared::{
    auth::middleware::CurrentUser,
    models::favorite::{CreateFavorite, Favorite, FavoriteKind},
};
use serde::Deserialize;

/// Create favorite request
#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub kind: FavoriteKind,
    pub favoritable_id: i32,
}

/// Query parameters for the favorite list
#[derive(Debug, Default, Deserialize)]
pub struct ListFavoritesQuery {
    pub kind: Option<FavoriteKind>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Favorites a project or casting role for the caller
///
/// # Errors
///
/// - `409 Conflict`: the caller already favorited this target
pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateFavoriteRequest>,
) -> ApiResult<(StatusCode, Json<Favorite>)> {
    let favorite = Favorite::create(
        &state.db,
        CreateFavorite {
            user_id: user.id,
            kind: req.kind,
            favoritable_id: req.favoritable_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Lists the caller's favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListFavoritesQuery>,
) -> ApiResult<Json<Paginated<Favorite>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let (favorites, total) = Favorite::list(
        &state.db,
        user.id,
        query.kind,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(favorites, &pagination, total)))
}

/// Gets one of the caller's favorites by id
pub async fn get_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Favorite>> {
    let favorite = Favorite::find_by_id(&state.db, id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Favorite not found".to_string()))?;

    Ok(Json(favorite))
}

/// Removes one of the caller's favorites by id
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Favorite::delete(&state.db, id, user.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Removes one of the caller's favorites by its target
///
/// Lets a client unfavorite a project or role without knowing the favorite's
/// own id.
pub async fn delete_favorite_by_target(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((kind, favoritable_id)): Path<(FavoriteKind, i32)>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Favorite::delete_by_target(&state.db, user.id, kind, favoritable_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
