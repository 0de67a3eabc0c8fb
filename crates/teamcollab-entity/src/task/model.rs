//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teamcollab_core::types::{TaskId, UserId};

use super::status::{TaskPriority, TaskStatus};

/// A task on the shared board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Board column.
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Optional assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserId>,
    /// Creator; the only non-admin allowed to delete the task.
    pub created_by: UserId,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materializes a new task.
    pub fn create(id: TaskId, input: CreateTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            assignee: input.assignee,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = Some(assignee);
        }
        self.updated_at = now;
    }

    /// Whether `user` created this task.
    pub fn is_created_by(&self, user: &UserId) -> bool {
        &self.created_by == user
    }
}

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Initial column.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional assignee.
    pub assignee: Option<UserId>,
    /// Creating user.
    pub created_by: UserId,
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New title.
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
