/// Fact sheet endpoints
///
/// The approval workflow splits the sheet between the two roles:
///
/// - a `project` account reads and edits the content of its own project's
///   sheet, but only while the sheet is pending and never its status
/// - an `admin` reads any sheet and decides its status, but does not edit
///   content through this endpoint
///
/// # Endpoints
///
/// - `GET /v1/fact-sheets/:project_id` - Get a sheet (admin | project)
/// - `PUT /v1/fact-sheets/:project_id` - Edit content or decide status (admin | project)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use castdesk_shared::{
    auth::middleware::CurrentUser,
    models::{
        fact_sheet::{FactSheet, FactSheetStatus, UpdateFactSheetContent},
        project::Project,
        user::UserRole,
    },
};
use serde::Deserialize;

/// Fact sheet update request
///
/// Content fields and `status` are both accepted here; which of them the
/// caller may actually touch depends on their role.
#[derive(Debug, Deserialize)]
pub struct UpdateFactSheetRequest {
    #[serde(flatten)]
    pub content: UpdateFactSheetContent,

    pub status: Option<FactSheetStatus>,
}

/// Checks that a `project` caller owns the project behind this sheet
async fn ensure_own_project(
    state: &AppState,
    user: &CurrentUser,
    project_id: i32,
) -> ApiResult<()> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fact sheet not found".to_string()))?;

    if project.username != user.username {
        return Err(ApiError::Forbidden(
            "Fact sheet belongs to another project".to_string(),
        ));
    }

    Ok(())
}

/// Gets a project's fact sheet
pub async fn get_fact_sheet(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<i32>,
) -> ApiResult<Json<FactSheet>> {
    if user.role == UserRole::Project {
        ensure_own_project(&state, &user, project_id).await?;
    }

    let sheet = FactSheet::find_by_project_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Fact sheet not found".to_string()))?;

    Ok(Json(sheet))
}

/// Edits a fact sheet's content or decides its status
///
/// # Errors
///
/// - `403 Forbidden`: a project account sent `status`, touched another
///   project's sheet, or edited a sheet that is no longer pending; or an
///   admin sent content fields
/// - `400 Bad Request`: an admin sent no `status`
pub async fn update_fact_sheet(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<i32>,
    Json(req): Json<UpdateFactSheetRequest>,
) -> ApiResult<Json<FactSheet>> {
    match user.role {
        UserRole::Project => {
            if req.status.is_some() {
                return Err(ApiError::Forbidden(
                    "Project accounts cannot change fact sheet status".to_string(),
                ));
            }

            ensure_own_project(&state, &user, project_id).await?;

            let sheet = FactSheet::find_by_project_id(&state.db, project_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Fact sheet not found".to_string()))?;

            if sheet.status != FactSheetStatus::Pending {
                return Err(ApiError::Forbidden(
                    "Fact sheet is no longer editable".to_string(),
                ));
            }

            let sheet = FactSheet::update_content(&state.db, project_id, req.content)
                .await?
                .ok_or_else(|| ApiError::NotFound("Fact sheet not found".to_string()))?;

            Ok(Json(sheet))
        }
        UserRole::Admin => {
            if !req.content.is_empty() {
                return Err(ApiError::Forbidden(
                    "Admins decide fact sheet status only".to_string(),
                ));
            }

            let status = req.status.ok_or_else(|| {
                ApiError::BadRequest("Missing status".to_string())
            })?;

            let sheet = FactSheet::set_status(&state.db, project_id, status, user.id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Fact sheet not found".to_string()))?;

            Ok(Json(sheet))
        }
        _ => Err(ApiError::Forbidden("Insufficient permissions".to_string())),
    }
}
