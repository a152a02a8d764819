/// Project endpoints
///
/// Creating a project also creates its pending fact sheet, so every project
/// has exactly one sheet from the moment it exists.
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create a project and its fact sheet (admin)
/// - `GET /v1/projects` - List projects (admin)
/// - `GET /v1/projects/:id` - Get a project (admin)
/// - `PUT /v1/projects/:id` - Update a project (admin)
/// - `DELETE /v1/projects/:id` - Soft-delete a project (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    pagination::{Paginated, PaginationQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use castdesk_shared::models::{
    client::Client,
    fact_sheet::FactSheet,
    project::{CreateProject, Project, ProjectFilter, UpdateProject},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Login identity of the project account that will own this project
    #[validate(length(min = 3, max = 100, message = "Username must be 3-100 characters"))]
    pub username: String,

    pub client_id: i32,
    pub deadline: Option<NaiveDate>,
}

/// Project plus its fact sheet, returned on creation
#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    #[serde(flatten)]
    pub project: Project,

    pub fact_sheet: FactSheet,
}

/// Query parameters for the project list
#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub search: Option<String>,
    pub client_id: Option<i32>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Creates a project and its pending fact sheet
///
/// # Errors
///
/// - `404 Not Found`: client does not exist
/// - `409 Conflict`: project username already taken
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<CreateProjectResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let client = Client::find_by_id(&state.db, req.client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    // Project and sheet are inserted atomically; a project without its
    // sheet would be unrepairable since sheets have no create route.
    let mut tx = state.db.begin().await?;

    let project = Project::create(
        &mut *tx,
        CreateProject {
            name: req.name,
            username: req.username,
            client_id: client.id,
            deadline: req.deadline,
        },
    )
    .await?;

    let fact_sheet = FactSheet::create_for_project(&mut *tx, project.id, client.id).await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProjectResponse {
            project,
            fact_sheet,
        }),
    ))
}

/// Lists projects with filtering and pagination
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<Paginated<Project>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let filter = ProjectFilter {
        search: query.search,
        client_id: query.client_id,
        status: query.status,
    };

    let (projects, total) = Project::list(
        &state.db,
        &filter,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(projects, &pagination, total)))
}

/// Gets a project by id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Updates a project
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    let project = Project::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Soft-deletes a project
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Project::soft_delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
