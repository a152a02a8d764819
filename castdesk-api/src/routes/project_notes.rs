/// Project note endpoints
///
/// # Endpoints
///
/// - `POST /v1/project-notes` - Create a note (admin)
/// - `GET /v1/project-notes` - List notes (admin)
/// - `GET /v1/project-notes/:id` - Get a note (admin)
/// - `PUT /v1/project-notes/:id` - Update a note (admin)
/// - `DELETE /v1/project-notes/:id` - Delete a note (admin)

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
        project::Project,
        project_note::{CreateProjectNote, ProjectNote, UpdateProjectNote},
    },
};
use serde::Deserialize;
use validator::Validate;

/// Create project note request
///
/// The author is the authenticated caller, never taken from the body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectNoteRequest {
    pub project_id: i32,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,
}

/// Query parameters for the note list
#[derive(Debug, Default, Deserialize)]
pub struct ListProjectNotesQuery {
    pub project_id: Option<i32>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Creates a project note
pub async fn create_project_note(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateProjectNoteRequest>,
) -> ApiResult<(StatusCode, Json<ProjectNote>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::find_by_id(&state.db, req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let note = ProjectNote::create(
        &state.db,
        CreateProjectNote {
            project_id: project.id,
            title: req.title,
            description: req.description,
            added_by_user_id: user.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Lists project notes
pub async fn list_project_notes(
    State(state): State<AppState>,
    Query(query): Query<ListProjectNotesQuery>,
) -> ApiResult<Json<Paginated<ProjectNote>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let (notes, total) = ProjectNote::list(
        &state.db,
        query.project_id,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(notes, &pagination, total)))
}

/// Gets a project note by id
pub async fn get_project_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ProjectNote>> {
    let note = ProjectNote::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Updates a project note
pub async fn update_project_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProjectNote>,
) -> ApiResult<Json<ProjectNote>> {
    let note = ProjectNote::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;

    Ok(Json(note))
}

/// Deletes a project note
pub async fn delete_project_note(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = ProjectNote::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Note not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
