/// Project endpoints
///
/// Project creation is gated on the Project Manager role; the created
/// project is always owned by the authenticated caller.
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create project (PM only)
/// - `GET  /v1/projects` - List projects
/// - `GET  /v1/projects/:id` - Fetch one project

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use bugtrack_shared::{
    auth::{authorization::require_project_manager, middleware::CurrentUser},
    models::{
        project::{CreateProject, Project},
        user::UserRole,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project title
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Create a new project (PM only)
///
/// The owner is always the authenticated caller; the request body cannot
/// designate a different PM.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not a Project Manager
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    require_project_manager(&user)?;
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            title: req.title,
            description: req.description,
            pm_id: user.id,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, pm_id = %user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// List projects
///
/// Project Managers see the projects they own; other roles see all projects
/// (they need them to browse and file issues).
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = match user.role {
        UserRole::ProjectManager => Project::list_by_pm(&state.db, user.id).await?,
        _ => Project::list(&state.db, 100, 0).await?,
    };

    Ok(Json(projects))
}

/// Fetch one project
///
/// # Errors
///
/// - `404 Not Found`: no project with that id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_validation() {
        let valid = CreateProjectRequest {
            title: "Tracker rewrite".to_string(),
            description: Some("Q3 initiative".to_string()),
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateProjectRequest {
            title: String::new(),
            description: None,
        };
        assert!(empty_title.validate().is_err());

        let oversized = CreateProjectRequest {
            title: "x".repeat(256),
            description: None,
        };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_create_project_request_has_no_owner_field() {
        // Ownership always comes from the authenticated caller; a pm_id in
        // the body is ignored at deserialization.
        let json = serde_json::json!({
            "title": "Tracker rewrite",
            "pm_id": Uuid::new_v4(),
        });
        let req: CreateProjectRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.title, "Tracker rewrite");
    }
}
