/// Role note endpoints
///
/// # Endpoints
///
/// - `POST /v1/role-notes` - Create a note (admin)
/// - `GET /v1/role-notes` - List notes (admin)
/// - `GET /v1/role-notes/:id` - Get a note (admin)
/// - `PUT /v1/role-notes/:id` - Update a note (admin)
/// - `DELETE /v1/role-notes/:id` - Delete a note (admin)

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
    models::{
        casting_role::CastingRole,
        role_note::{CreateRoleNote, RoleNote, UpdateRoleNote},
    },
};
use serde::Deserialize;
use validator::Validate;

/// Create role note request
///
/// The note's project is taken from the role, not from the body, so the two
/// can never disagree.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleNoteRequest {
    pub role_id: i32,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,
}

/// Query parameters for the note list
#[derive(Debug, Default, Deserialize)]
pub struct ListRoleNotesQuery {
    pub project_id: Option<i32>,
    pub role_id: Option<i32>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Creates a role note
pub async fn create_role_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateRoleNoteRequest>,
) -> ApiResult<(StatusCode, Json<RoleNote>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let role = CastingRole::find_by_id(&state.db, req.role_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    let note = RoleNote::create(
        &state.db,
        CreateRoleNote {
            project_id: role.project_id,
            role_id: role.id,
            title: req.title,
            description: req.description,
            added_by_user_id: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Lists role notes
pub async fn list_role_notes(
    State(state): State<AppState>,
    Query(query): Query<ListRoleNotesQuery>,
) -> ApiResult<Json<Paginated<RoleNote>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let (notes, total) = RoleNote::list(
        &state.db,
        query.project_id,
        query.role_id,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(notes, &pagination, total)))
}

/// Gets a role note by id
pub async fn get_role_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<RoleNote>> {
    let note = RoleNote::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Updates a role note
pub async fn update_role_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateRoleNote>,
) -> ApiResult<Json<RoleNote>> {
    let note = RoleNote::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Deletes a role note
pub async fn delete_role_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = RoleNote::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
