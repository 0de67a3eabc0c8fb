//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use teamcollab_core::error::AppError;
use teamcollab_core::types::{RoomId, UserId};
use teamcollab_entity::task::{CreateTask, TaskPatch, TaskPriority, TaskStatus};

/// Runs `validator` rules and maps failures to a validation error.
pub fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))
}

/// Create task request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title.
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial column.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Priority.
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    /// Due date.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Assignee.
    #[serde(default)]
    pub assignee: Option<UserId>,
}

impl CreateTaskRequest {
    /// Converts into store input, applying board defaults.
    pub fn into_create(self, created_by: UserId) -> CreateTask {
        CreateTask {
            title: self.title,
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            assignee: self.assignee.filter(|a| !a.is_empty()),
            created_by,
        }
    }
}

/// Update task request body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title.
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New column.
    pub status: Option<TaskStatus>,
    /// New priority.
    pub priority: Option<TaskPriority>,
    /// New due date.
    pub due_date: Option<DateTime<Utc>>,
    /// New assignee.
    pub assignee: Option<UserId>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        TaskPatch {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
            assignee: req.assignee,
        }
    }
}

/// Create room request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    /// Room name.
    #[serde(default)]
    #[validate(length(min = 1, message = "Room name is required"))]
    pub name: String,
    /// Initial members besides the creator.
    #[serde(default)]
    pub member_ids: Vec<UserId>,
}

/// `GET /api/messages` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    /// Peer of a direct conversation with the caller.
    pub with_user_id: Option<UserId>,
    /// Room to read.
    pub room_id: Option<RoomId>,
    /// Page size.
    pub limit: Option<usize>,
    /// Only messages created before this instant (RFC 3339).
    pub before: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_requires_title() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        assert!(validate(&req).is_err());

        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title":"Plan","status":"in-progress"}"#).unwrap();
        assert!(validate(&req).is_ok());
        let input = req.into_create(UserId::new("u1"));
        assert_eq!(input.status, TaskStatus::InProgress);
        assert_eq!(input.priority, TaskPriority::Medium);
        assert_eq!(input.description, "");
    }

    #[test]
    fn test_update_rejects_empty_title_only_when_present() {
        assert!(validate(&UpdateTaskRequest::default()).is_ok());
        let req = UpdateTaskRequest {
            title: Some(String::new()),
            ..UpdateTaskRequest::default()
        };
        assert!(validate(&req).is_err());
    }
}
