/// Role option endpoints (lookup values for casting-role categories)
///
/// # Endpoints
///
/// - `POST /v1/role-options` - Create an option (admin)
/// - `GET /v1/role-options` - List options (admin)
/// - `PUT /v1/role-options/:id` - Update an option (admin)

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
use castdesk_shared::models::role_option::{CreateRoleOption, RoleOption, UpdateRoleOption};
use serde::Deserialize;
use validator::Validate;

/// Create role option request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleOptionRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Option family; defaults to "category"
    pub option_type: Option<String>,
}

/// Query parameters for the option list
#[derive(Debug, Default, Deserialize)]
pub struct ListRoleOptionsQuery {
    pub option_type: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Creates a role option
pub async fn create_role_option(
    State(state): State<AppState>,
    Json(req): Json<CreateRoleOptionRequest>,
) -> ApiResult<(StatusCode, Json<RoleOption>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let option = RoleOption::create(
        &state.db,
        CreateRoleOption {
            name: req.name,
            option_type: req.option_type,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(option)))
}

/// Lists role options
pub async fn list_role_options(
    State(state): State<AppState>,
    Query(query): Query<ListRoleOptionsQuery>,
) -> ApiResult<Json<Paginated<RoleOption>>> {
    let pagination = PaginationQuery {
        page: query.page,
        size: query.size,
    };

    let (options, total) = RoleOption::list(
        &state.db,
        query.option_type.as_deref(),
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(options, &pagination, total)))
}

/// Updates a role option
pub async fn update_role_option(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateRoleOption>,
) -> ApiResult<Json<RoleOption>> {
    let option = RoleOption::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role option not found".to_string()))?;

    Ok(Json(option))
}
