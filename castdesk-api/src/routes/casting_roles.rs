/// Casting role endpoints
///
/// The list endpoint is shared with project accounts: a `project`-role caller
/// only sees the roles of the project whose username matches their own.
///
/// # Endpoints
///
/// - `POST /v1/roles` - Create a casting role (admin)
/// - `GET /v1/roles` - List casting roles (admin | project)
/// - `GET /v1/roles/:id` - Get a casting role (admin)
/// - `PUT /v1/roles/:id` - Update a casting role (admin)
/// - `DELETE /v1/roles/:id` - Delete a casting role (admin)

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
        casting_role::{CastingRole, CastingRoleFilter, CreateCastingRole, UpdateCastingRole},
        project::Project,
        user::UserRole,
    },
};
use serde::Deserialize;
use validator::Validate;

/// Create casting role request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCastingRoleRequest {
    pub project_id: i32,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub language: Option<String>,
    pub native_language: Option<String>,

    #[validate(range(min = 0, max = 120, message = "Age must be 0-120"))]
    pub age_from: Option<i32>,

    #[validate(range(min = 0, max = 120, message = "Age must be 0-120"))]
    pub age_to: Option<i32>,

    pub height_from: Option<f64>,
    pub height_to: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub hair_color: Option<String>,
}

/// Query parameters for the role list
#[derive(Debug, Default, Deserialize)]
pub struct ListRolesQuery {
    pub search: Option<String>,
    pub project_id: Option<i32>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub category: Option<String>,
    pub age_from: Option<i32>,
    pub age_to: Option<i32>,
    pub height_from: Option<f64>,
    pub height_to: Option<f64>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Creates a casting role
pub async fn create_role(
    State(state): State<AppState>,
    Json(req): Json<CreateCastingRoleRequest>,
) -> ApiResult<(StatusCode, Json<CastingRole>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::find_by_id(&state.db, req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let role = CastingRole::create(
        &state.db,
        CreateCastingRole {
            project_id: project.id,
            name: req.name,
            gender: req.gender,
            ethnicity: req.ethnicity,
            language: req.language,
            native_language: req.native_language,
            age_from: req.age_from,
            age_to: req.age_to,
            height_from: req.height_from,
            height_to: req.height_to,
            tags: req.tags,
            category: req.category,
            hair_color: req.hair_color,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(role)))
}

/// Lists casting roles with filtering and pagination
///
/// A `project`-role caller is restricted to their own project; any requested
/// `project_id` is overridden by it.
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListRolesQuery>,
) -> ApiResult<Json<Paginated<CastingRole>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let project_id = if user.role == UserRole::Project {
        let project = Project::find_by_username(&state.db, &user.username)
            .await?
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
        Some(project.id)
    } else {
        query.project_id
    };

    let filter = CastingRoleFilter {
        search: query.search,
        project_id,
        status: query.status,
        gender: query.gender,
        category: query.category,
        age_from: query.age_from,
        age_to: query.age_to,
        height_from: query.height_from,
        height_to: query.height_to,
    };

    let (roles, total) = CastingRole::list(
        &state.db,
        &filter,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(roles, &pagination, total)))
}

/// Gets a casting role by id
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CastingRole>> {
    let role = CastingRole::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    Ok(Json(role))
}

/// Updates a casting role
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCastingRole>,
) -> ApiResult<Json<CastingRole>> {
    let role = CastingRole::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    Ok(Json(role))
}

/// Deletes a casting role
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = CastingRole::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Role not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
