//! Server → client events.

use serde::Serialize;
use serde_json::Value;

use teamcollab_core::types::{MessageId, RoomId, TaskId, UserId};
use teamcollab_entity::message::Message;
use teamcollab_entity::task::Task;

/// Membership change announced in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    /// A session joined.
    Join,
    /// A session left.
    Leave,
}

/// Events pushed to clients, framed as `{"event": .., "data": ..}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Room membership notice.
    System {
        /// `join` or `leave`.
        #[serde(rename = "type")]
        kind: SystemKind,
        /// Who joined or left.
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// Typing indicator.
    #[serde(rename_all = "camelCase")]
    Typing {
        /// Who is typing.
        user_id: UserId,
        /// Started or stopped.
        is_typing: bool,
        /// Set for room-scoped indicators.
        #[serde(skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },
    /// A persisted chat message.
    Message(Message),
    /// Read receipt.
    #[serde(rename_all = "camelCase")]
    Read {
        /// Message that was read.
        message_id: MessageId,
        /// Reader.
        user_id: UserId,
    },
    /// Task created through the REST surface.
    TaskCreated(Task),
    /// Task updated through the REST surface.
    TaskUpdated(Task),
    /// Task deleted through the REST surface.
    TaskDeleted {
        /// Deleted task.
        id: TaskId,
    },
}

impl ServerEvent {
    /// Event name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::Typing { .. } => "typing",
            Self::Message(_) => "message",
            Self::Read { .. } => "read",
            Self::TaskCreated(_) => "taskCreated",
            Self::TaskUpdated(_) => "taskUpdated",
            Self::TaskDeleted { .. } => "taskDeleted",
        }
    }

    /// Serializes the event into a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result carried by an ack frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AckReply {
    /// Whether the message was persisted.
    pub ok: bool,
    /// The persisted message on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckReply {
    /// Successful send.
    pub fn ok(message: Message) -> Self {
        Self {
            ok: true,
            message: Some(message),
            error: None,
        }
    }

    /// Failed send. Clients only ever see the generic reason.
    pub fn failed() -> Self {
        Self {
            ok: false,
            message: None,
            error: Some("failed".to_string()),
        }
    }
}

/// `{"event":"ack","id":<client id>,"data":{..}}`
#[derive(Debug, Clone, Serialize)]
pub struct AckFrame {
    event: &'static str,
    /// Correlation id echoed from the client frame.
    pub id: Value,
    /// The reply.
    pub data: AckReply,
}

impl AckFrame {
    /// Wraps `reply` for the client correlation id `id`.
    pub fn new(id: Value, reply: AckReply) -> Self {
        Self {
            event: "ack",
            id,
            data: reply,
        }
    }

    /// Serializes the ack into a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
