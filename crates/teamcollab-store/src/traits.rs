//! Store traits implemented by persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use teamcollab_core::result::AppResult;
use teamcollab_core::types::{MessageId, RoomId, TaskId, UserId};
use teamcollab_entity::message::{Message, NewMessage};
use teamcollab_entity::room::{CreateRoom, Room};
use teamcollab_entity::task::{CreateTask, Task, TaskPatch};

/// Filter for the message history endpoint.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    /// User asking; anchors the `with_user` conversation.
    pub requester: UserId,
    /// Direct conversation between `requester` and this user.
    pub with_user: Option<UserId>,
    /// Messages posted to this room.
    pub room: Option<RoomId>,
    /// Only messages created strictly before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Maximum number of messages returned.
    pub limit: usize,
}

impl HistoryQuery {
    /// Whether `msg` passes every filter set on the query.
    pub fn matches(&self, msg: &Message) -> bool {
        if let Some(peer) = &self.with_user {
            if !msg.is_between(&self.requester, peer) {
                return false;
            }
        }
        if let Some(room) = &self.room {
            if msg.room_id() != Some(room) {
                return false;
            }
        }
        if let Some(before) = self.before {
            if msg.created_at() >= before {
                return false;
            }
        }
        true
    }
}

/// Chat message persistence.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persists a new message with status `sent`.
    async fn create(&self, input: NewMessage) -> AppResult<Message>;

    /// Loads the messages that exist among `ids`.
    async fn find_by_ids(&self, ids: &[MessageId]) -> AppResult<Vec<Message>>;

    /// Adds `reader` to the read set of every existing message in `ids` and
    /// advances its status to `read`. Unknown ids are skipped.
    ///
    /// Returns the updated messages.
    async fn mark_read(&self, ids: &[MessageId], reader: &UserId) -> AppResult<Vec<Message>>;

    /// Newest `query.limit` matching messages, returned oldest first.
    async fn history(&self, query: &HistoryQuery) -> AppResult<Vec<Message>>;
}

/// Room persistence.
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug + 'static {
    /// Creates a room; the creator is always a member.
    async fn create_room(&self, input: CreateRoom) -> AppResult<Room>;

    /// Looks up one room.
    async fn find_room(&self, id: &RoomId) -> AppResult<Option<Room>>;

    /// Rooms that list `user` as a member.
    async fn rooms_for_member(&self, user: &UserId) -> AppResult<Vec<Room>>;
}

/// Task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync + std::fmt::Debug + 'static {
    /// All tasks, oldest first.
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    /// Looks up one task.
    async fn find_task(&self, id: &TaskId) -> AppResult<Option<Task>>;

    /// Creates a task.
    async fn create_task(&self, input: CreateTask) -> AppResult<Task>;

    /// Applies `patch`; `None` when the task does not exist.
    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> AppResult<Option<Task>>;

    /// Removes a task; `None` when the task does not exist.
    async fn delete_task(&self, id: &TaskId) -> AppResult<Option<Task>>;
}
