/// Issue model, state vocabulary, and transition operations
///
/// Issues are the core entity of the tracker. Each issue belongs to exactly
/// one project, always records its creator, and is optionally assigned to
/// one user. The two user references (creator, assignee) are distinct
/// columns resolved independently.
///
/// # Status vocabulary
///
/// ```text
/// OPEN → ASSIGNED → IN_PROGRESS → REVIEW → COMPLETED
/// ```
///
/// New issues always start at OPEN. The status-update operation accepts any
/// of the five statuses; ordering above is the expected workflow, not an
/// enforced transition table.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE issue_status AS ENUM
///     ('OPEN', 'ASSIGNED', 'IN_PROGRESS', 'REVIEW', 'COMPLETED');
/// CREATE TYPE issue_priority AS ENUM ('LOW', 'MEDIUM', 'HIGH', 'CRITICAL');
/// CREATE TYPE issue_type AS ENUM ('BUG', 'TASK', 'FEATURE', 'ENHANCEMENT');
///
/// CREATE TABLE issues (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status issue_status NOT NULL DEFAULT 'OPEN',
///     priority issue_priority NOT NULL,
///     issue_type issue_type NOT NULL,
///     project_id UUID NOT NULL REFERENCES projects(id),
///     assigned_to_id UUID REFERENCES users(id),
///     created_by_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use bugtrack_shared::models::issue::{CreateIssue, Issue, IssuePriority, IssueStatus, IssueType};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid, caller_id: Uuid) -> Result<(), sqlx::Error> {
/// let issue = Issue::create(&pool, CreateIssue {
///     title: "Login page 500s".to_string(),
///     description: None,
///     priority: IssuePriority::High,
///     issue_type: IssueType::Bug,
///     project_id,
///     created_by_id: caller_id,
/// }).await?;
///
/// assert_eq!(issue.status, IssueStatus::Open);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Issue workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_status")]
pub enum IssueStatus {
    /// Newly created, nobody working on it
    #[serde(rename = "OPEN")]
    #[sqlx(rename = "OPEN")]
    Open,

    /// Assigned to a user
    #[serde(rename = "ASSIGNED")]
    #[sqlx(rename = "ASSIGNED")]
    Assigned,

    /// Work in progress
    #[serde(rename = "IN_PROGRESS")]
    #[sqlx(rename = "IN_PROGRESS")]
    InProgress,

    /// Awaiting review
    #[serde(rename = "REVIEW")]
    #[sqlx(rename = "REVIEW")]
    Review,

    /// Done
    #[serde(rename = "COMPLETED")]
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

impl IssueStatus {
    /// Wire string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "OPEN",
            IssueStatus::Assigned => "ASSIGNED",
            IssueStatus::InProgress => "IN_PROGRESS",
            IssueStatus::Review => "REVIEW",
            IssueStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(IssueStatus::Open),
            "ASSIGNED" => Ok(IssueStatus::Assigned),
            "IN_PROGRESS" => Ok(IssueStatus::InProgress),
            "REVIEW" => Ok(IssueStatus::Review),
            "COMPLETED" => Ok(IssueStatus::Completed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Issue priority
///
/// Flat set; variant order doubles as escalation order for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl IssuePriority {
    /// Wire string for this priority
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "LOW",
            IssuePriority::Medium => "MEDIUM",
            IssuePriority::High => "HIGH",
            IssuePriority::Critical => "CRITICAL",
        }
    }
}

impl FromStr for IssuePriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(IssuePriority::Low),
            "MEDIUM" => Ok(IssuePriority::Medium),
            "HIGH" => Ok(IssuePriority::High),
            "CRITICAL" => Ok(IssuePriority::Critical),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Issue classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "issue_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueType {
    Bug,
    Task,
    Feature,
    Enhancement,
}

impl IssueType {
    /// Wire string for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Bug => "BUG",
            IssueType::Task => "TASK",
            IssueType::Feature => "FEATURE",
            IssueType::Enhancement => "ENHANCEMENT",
        }
    }
}

impl FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUG" => Ok(IssueType::Bug),
            "TASK" => Ok(IssueType::Task),
            "FEATURE" => Ok(IssueType::Feature),
            "ENHANCEMENT" => Ok(IssueType::Enhancement),
            other => Err(format!("unknown issue type: {}", other)),
        }
    }
}

/// Issue record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Issue {
    /// Unique issue ID
    pub id: Uuid,

    /// Short summary
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current workflow status
    pub status: IssueStatus,

    /// Priority
    pub priority: IssuePriority,

    /// Classification
    pub issue_type: IssueType,

    /// Project this issue belongs to
    pub project_id: Uuid,

    /// Assignee, if any
    pub assigned_to_id: Option<Uuid>,

    /// The user who created the issue; immutable after creation
    pub created_by_id: Uuid,

    /// When the issue was created
    pub created_at: DateTime<Utc>,

    /// When the issue was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new issue
///
/// Deliberately has no status field (new issues always start OPEN) and the
/// creator is supplied by the authenticated caller, never the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssue {
    /// Short summary
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority
    pub priority: IssuePriority,

    /// Classification
    pub issue_type: IssueType,

    /// Project this issue belongs to
    pub project_id: Uuid,

    /// The authenticated creator
    pub created_by_id: Uuid,
}

impl Issue {
    /// Creates a new issue in OPEN status
    ///
    /// Status is taken from the column default, not from input.
    ///
    /// # Errors
    ///
    /// Returns an error if a foreign key is violated or the database
    /// operation fails.
    pub async fn create(pool: &PgPool, data: CreateIssue) -> Result<Self, sqlx::Error> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (title, description, priority, issue_type, project_id, created_by_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, status, priority, issue_type,
                      project_id, assigned_to_id, created_by_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.issue_type)
        .bind(data.project_id)
        .bind(data.created_by_id)
        .fetch_one(pool)
        .await?;

        Ok(issue)
    }

    /// Finds an issue by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, title, description, status, priority, issue_type,
                   project_id, assigned_to_id, created_by_id, created_at, updated_at
            FROM issues
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(issue)
    }

    /// Lists issues for a project, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let issues = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, title, description, status, priority, issue_type,
                   project_id, assigned_to_id, created_by_id, created_at, updated_at
            FROM issues
            WHERE project_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(issues)
    }

    /// Lists issues assigned to a user, newest first
    pub async fn list_by_assignee(
        pool: &PgPool,
        assigned_to_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let issues = sqlx::query_as::<_, Issue>(
            r#"
            SELECT id, title, description, status, priority, issue_type,
                   project_id, assigned_to_id, created_by_id, created_at, updated_at
            FROM issues
            WHERE assigned_to_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(assigned_to_id)
        .fetch_all(pool)
        .await?;

        Ok(issues)
    }

    /// Assigns the issue to a user
    ///
    /// Single atomic UPDATE; re-assigning to the same user is idempotent at
    /// the data level (only `updated_at` moves).
    ///
    /// # Returns
    ///
    /// The updated issue, or None if the issue does not exist.
    pub async fn assign(
        pool: &PgPool,
        id: Uuid,
        assigned_to_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            UPDATE issues
            SET assigned_to_id = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, priority, issue_type,
                      project_id, assigned_to_id, created_by_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(assigned_to_id)
        .fetch_optional(pool)
        .await?;

        Ok(issue)
    }

    /// Sets the issue status
    ///
    /// Accepts any status in the vocabulary; ordering is not enforced.
    /// Single atomic UPDATE.
    ///
    /// # Returns
    ///
    /// The updated issue, or None if the issue does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: IssueStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let issue = sqlx::query_as::<_, Issue>(
            r#"
            UPDATE issues
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, priority, issue_type,
                      project_id, assigned_to_id, created_by_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(IssueStatus::Open.as_str(), "OPEN");
        assert_eq!(IssueStatus::Assigned.as_str(), "ASSIGNED");
        assert_eq!(IssueStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(IssueStatus::Review.as_str(), "REVIEW");
        assert_eq!(IssueStatus::Completed.as_str(), "COMPLETED");
    }

    #[test]
    fn test_status_from_str_round_trip() {
        for status in [
            IssueStatus::Open,
            IssueStatus::Assigned,
            IssueStatus::InProgress,
            IssueStatus::Review,
            IssueStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<IssueStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_out_of_vocabulary_values() {
        assert!("CLOSED".parse::<IssueStatus>().is_err());
        assert!("open".parse::<IssueStatus>().is_err());
        assert!("In Progress".parse::<IssueStatus>().is_err());
        assert!("".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn test_status_serde_wire_strings() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::from_str::<IssueStatus>("\"REVIEW\"").unwrap(),
            IssueStatus::Review
        );
        assert!(serde_json::from_str::<IssueStatus>("\"DONE\"").is_err());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(IssuePriority::Low < IssuePriority::Medium);
        assert!(IssuePriority::Medium < IssuePriority::High);
        assert!(IssuePriority::High < IssuePriority::Critical);
    }

    #[test]
    fn test_priority_serde_round_trip() {
        for (priority, wire) in [
            (IssuePriority::Low, "\"LOW\""),
            (IssuePriority::Medium, "\"MEDIUM\""),
            (IssuePriority::High, "\"HIGH\""),
            (IssuePriority::Critical, "\"CRITICAL\""),
        ] {
            assert_eq!(serde_json::to_string(&priority).unwrap(), wire);
            assert_eq!(serde_json::from_str::<IssuePriority>(wire).unwrap(), priority);
        }
    }

    #[test]
    fn test_issue_type_round_trip() {
        for issue_type in [
            IssueType::Bug,
            IssueType::Task,
            IssueType::Feature,
            IssueType::Enhancement,
        ] {
            assert_eq!(issue_type.as_str().parse::<IssueType>().unwrap(), issue_type);
            let wire = serde_json::to_string(&issue_type).unwrap();
            assert_eq!(wire, format!("\"{}\"", issue_type.as_str()));
        }
        assert!("DEFECT".parse::<IssueType>().is_err());
    }

    #[test]
    fn test_create_issue_has_no_status_or_creator_override() {
        // The DTO shape itself guarantees creation invariants: status is not
        // representable and the creator comes from the caller field only.
        let json = serde_json::json!({
            "title": "t",
            "description": null,
            "priority": "LOW",
            "issue_type": "BUG",
            "project_id": Uuid::new_v4(),
            "created_by_id": Uuid::new_v4(),
        });
        let data: CreateIssue = serde_json::from_value(json).unwrap();
        assert_eq!(data.priority, IssuePriority::Low);
    }
}
