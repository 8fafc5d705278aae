use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// Represents a task as stored in the database and returned by the API.
///
/// Soft-deleted rows carry a `deleted_at` timestamp and are filtered out of
/// every read by the store; they never reach this type.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// User the task is assigned to, if any.
    pub assigned_to: Option<i32>,
    /// User who created the task.
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task. New tasks always start at TODO.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub assigned_to: Option<i32>,
}

/// Partial update for a task; absent fields keep their stored values.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub assigned_to: Option<i32>,
}

/// Query parameters for the task listing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// 1-based page number, default 1.
    pub page: Option<i64>,
    /// Page size, default 10.
    pub limit: Option<i64>,
    pub status: Option<TaskStatus>,
    /// Filter by assignee. Ignored for USER callers, whose listing is always
    /// scoped to their own assignments.
    pub assigned_to: Option<i32>,
}

/// One page of the task listing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&TaskStatus::Todo).unwrap(), "\"TODO\"");
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), "\"DONE\"");
    }

    #[test]
    fn test_task_input_validation() {
        let valid = TaskInput {
            title: "Ship the release".to_string(),
            description: Some("Cut the tag and publish".to_string()),
            assigned_to: Some(3),
        };
        assert!(valid.validate().is_ok());

        let empty_title = TaskInput {
            title: "".to_string(),
            description: None,
            assigned_to: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = TaskInput {
            title: "a".repeat(201),
            description: None,
            assigned_to: None,
        };
        assert!(long_title.validate().is_err());

        let long_description = TaskInput {
            title: "ok".to_string(),
            description: Some("b".repeat(1001)),
            assigned_to: None,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_task_update_allows_absent_fields() {
        let update: TaskUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.validate().is_ok());
        assert!(update.title.is_none());
        assert!(update.status.is_none());

        let update: TaskUpdate =
            serde_json::from_str(r#"{"status": "IN_PROGRESS", "assignedTo": 5}"#).unwrap();
        assert_eq!(update.status, Some(TaskStatus::InProgress));
        assert_eq!(update.assigned_to, Some(5));
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            status: TaskStatus::Todo,
            assigned_to: Some(2),
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("assignedTo").is_some());
        assert!(json.get("createdBy").is_some());
        assert!(json.get("assigned_to").is_none());
    }
}
