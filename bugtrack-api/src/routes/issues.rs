/// Issue endpoints
///
/// Issue creation is open to any authenticated user; the creator is always
/// the caller and new issues always start at OPEN. Assignment is restricted
/// to the owning project's PM. Status updates accept any value from the
/// fixed vocabulary and reject everything else before touching storage.
///
/// # Endpoints
///
/// - `POST /v1/issues` - Create issue
/// - `GET  /v1/issues?project_id=` - List issues for a project
/// - `GET  /v1/issues/assigned` - List issues assigned to the caller
/// - `GET  /v1/issues/:id` - Fetch one issue
/// - `PUT  /v1/issues/:id/assign` - Assign to a user (owning PM only)
/// - `PUT  /v1/issues/:id/status` - Set workflow status

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use bugtrack_shared::{
    auth::{authorization::require_project_owner, middleware::CurrentUser},
    models::{
        issue::{CreateIssue, Issue, IssuePriority, IssueStatus, IssueType},
        project::Project,
        user::User,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create issue request
///
/// There is deliberately no status field (new issues always start OPEN) and
/// no creator field (the creator is the authenticated caller).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateIssueRequest {
    /// Short summary
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority (LOW, MEDIUM, HIGH, CRITICAL)
    pub priority: IssuePriority,

    /// Classification (BUG, TASK, FEATURE, ENHANCEMENT)
    pub issue_type: IssueType,

    /// Project the issue belongs to
    pub project_id: Uuid,
}

/// Assign issue request
#[derive(Debug, Deserialize)]
pub struct AssignIssueRequest {
    /// Target assignee
    pub assigned_to_id: Uuid,
}

/// Status update request
///
/// The status arrives as a raw string and is parsed against the fixed
/// vocabulary so an out-of-vocabulary value is a validation failure, not a
/// deserialization artifact.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status (OPEN, ASSIGNED, IN_PROGRESS, REVIEW, COMPLETED)
    pub status: String,
}

/// List issues query
#[derive(Debug, Deserialize)]
pub struct ListIssuesQuery {
    /// Project to list issues for
    pub project_id: Uuid,

    /// Page size (default 100)
    pub limit: Option<i64>,

    /// Page offset (default 0)
    pub offset: Option<i64>,
}

/// Create a new issue
///
/// # Errors
///
/// - `404 Not Found`: the referenced project does not exist
/// - `422 Unprocessable Entity`: validation failed (an out-of-vocabulary
///   priority or type is rejected at deserialization)
pub async fn create_issue(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateIssueRequest>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    req.validate()?;

    // The project reference must resolve before anything is written
    Project::find_by_id(&state.db, req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let issue = Issue::create(
        &state.db,
        CreateIssue {
            title: req.title,
            description: req.description,
            priority: req.priority,
            issue_type: req.issue_type,
            project_id: req.project_id,
            created_by_id: user.id,
        },
    )
    .await?;

    tracing::info!(issue_id = %issue.id, project_id = %issue.project_id, "Issue created");

    Ok((StatusCode::CREATED, Json(issue)))
}

/// List issues for a project
pub async fn list_issues(
    State(state): State<AppState>,
    Query(query): Query<ListIssuesQuery>,
) -> ApiResult<Json<Vec<Issue>>> {
    let issues = Issue::list_by_project(
        &state.db,
        query.project_id,
        query.limit.unwrap_or(100),
        query.offset.unwrap_or(0),
    )
    .await?;

    Ok(Json(issues))
}

/// List issues assigned to the authenticated caller
pub async fn list_assigned_issues(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Issue>>> {
    let issues = Issue::list_by_assignee(&state.db, user.id).await?;

    Ok(Json(issues))
}

/// Fetch one issue
///
/// # Errors
///
/// - `404 Not Found`: no issue with that id
pub async fn get_issue(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Issue>> {
    let issue = Issue::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    Ok(Json(issue))
}

/// Assign an issue to a user
///
/// Only the owning project's PM may assign. The authorization check runs
/// before the target lookup, and the target lookup before the mutation, so
/// a failed request leaves `assigned_to_id` untouched.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not the owning project's PM
/// - `404 Not Found`: issue or target user does not exist
pub async fn assign_issue(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignIssueRequest>,
) -> ApiResult<Json<Issue>> {
    let issue = Issue::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    let project = Project::find_by_id(&state.db, issue.project_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Issue references missing project".to_string()))?;

    require_project_owner(&user, &project)?;

    User::find_by_id(&state.db, req.assigned_to_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let issue = Issue::assign(&state.db, id, req.assigned_to_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    tracing::info!(
        issue_id = %issue.id,
        assigned_to_id = %req.assigned_to_id,
        "Issue assigned"
    );

    Ok(Json(issue))
}

/// Set an issue's workflow status
///
/// Accepts any of the five recognized statuses; the workflow is
/// deliberately permissive about ordering (COMPLETED back to OPEN is
/// allowed). An unrecognized value fails validation before any persistence
/// call, leaving the stored status unchanged.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: status outside the fixed vocabulary
/// - `404 Not Found`: issue does not exist
pub async fn update_issue_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Issue>> {
    let status: IssueStatus = req.status.parse().map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "status".to_string(),
            message,
        }])
    })?;

    let issue = Issue::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Issue not found".to_string()))?;

    tracing::info!(issue_id = %issue.id, status = %issue.status, "Issue status updated");

    Ok(Json(issue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issue_request_validation() {
        let json = serde_json::json!({
            "title": "Login page 500s",
            "priority": "HIGH",
            "issue_type": "BUG",
            "project_id": Uuid::new_v4(),
        });
        let req: CreateIssueRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.priority, IssuePriority::High);
        assert_eq!(req.issue_type, IssueType::Bug);
    }

    #[test]
    fn test_create_issue_request_ignores_status_and_creator() {
        // A caller-supplied status or creator has nowhere to land: the DTO
        // has no such fields, so OPEN and the authenticated caller always win.
        let json = serde_json::json!({
            "title": "Login page 500s",
            "priority": "LOW",
            "issue_type": "TASK",
            "project_id": Uuid::new_v4(),
            "status": "COMPLETED",
            "created_by_id": Uuid::new_v4(),
        });
        let req: CreateIssueRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_issue_request_rejects_unknown_priority() {
        let json = serde_json::json!({
            "title": "t",
            "priority": "URGENT",
            "issue_type": "BUG",
            "project_id": Uuid::new_v4(),
        });
        assert!(serde_json::from_value::<CreateIssueRequest>(json).is_err());
    }

    #[test]
    fn test_status_parse_maps_to_validation_error() {
        let parsed = "CLOSED".parse::<IssueStatus>().map_err(|message| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "status".to_string(),
                message,
            }])
        });

        match parsed {
            Err(ApiError::ValidationError(details)) => {
                assert_eq!(details[0].field, "status");
                assert!(details[0].message.contains("CLOSED"));
            }
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_status_parse_accepts_full_vocabulary() {
        for wire in ["OPEN", "ASSIGNED", "IN_PROGRESS", "REVIEW", "COMPLETED"] {
            assert!(wire.parse::<IssueStatus>().is_ok(), "rejected {}", wire);
        }
    }
}
