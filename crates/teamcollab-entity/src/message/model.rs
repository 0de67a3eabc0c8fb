//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teamcollab_core::types::{MessageId, RoomId, UserId};

use super::kind::MessageKind;
use super::status::MessageStatus;

/// Where a message is addressed. Exactly one target exists per message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageTarget {
    /// Private message to a single user.
    Direct(UserId),
    /// Message to everyone currently joined to a room.
    Room(RoomId),
}

impl MessageTarget {
    /// Builds a target from the optional receiver/room pair sent by a client.
    ///
    /// Returns `None` unless exactly one side is present and non-empty.
    pub fn from_parts(receiver: Option<UserId>, room: Option<RoomId>) -> Option<Self> {
        let receiver = receiver.filter(|r| !r.is_empty());
        let room = room.filter(|r| !r.is_empty());
        match (receiver, room) {
            (Some(user), None) => Some(Self::Direct(user)),
            (None, Some(room)) => Some(Self::Room(room)),
            _ => None,
        }
    }
}

/// Input for persisting a new message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    /// Author.
    pub sender: UserId,
    /// Recipient user or room.
    pub target: MessageTarget,
    /// Message body.
    pub content: String,
    /// Content kind.
    pub kind: MessageKind,
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "MessageRecord", try_from = "MessageRecord")]
pub struct Message {
    /// Unique message ID.
    pub id: MessageId,
    /// Author.
    pub sender: UserId,
    target: MessageTarget,
    /// Message body.
    pub content: String,
    /// Content kind.
    pub kind: MessageKind,
    status: MessageStatus,
    read_by: Vec<UserId>,
    created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Materializes a new message with status `sent` and an empty read set.
    pub fn create(id: MessageId, input: NewMessage, now: DateTime<Utc>) -> Self {
        Self {
            id,
            sender: input.sender,
            target: input.target,
            content: input.content,
            kind: input.kind,
            status: MessageStatus::Sent,
            read_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Recipient user or room.
    pub fn target(&self) -> &MessageTarget {
        &self.target
    }

    /// Recipient user for direct messages.
    pub fn receiver(&self) -> Option<&UserId> {
        match &self.target {
            MessageTarget::Direct(user) => Some(user),
            MessageTarget::Room(_) => None,
        }
    }

    /// Room for room messages.
    pub fn room_id(&self) -> Option<&RoomId> {
        match &self.target {
            MessageTarget::Room(room) => Some(room),
            MessageTarget::Direct(_) => None,
        }
    }

    /// Current delivery status.
    pub fn status(&self) -> MessageStatus {
        self.status
    }

    /// Users who have read the message, in first-read order.
    pub fn read_by(&self) -> &[UserId] {
        &self.read_by
    }

    /// Immutable creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moves the status forward. Lower statuses are ignored.
    pub fn advance_status(&mut self, next: MessageStatus, now: DateTime<Utc>) {
        let advanced = self.status.advance_to(next);
        if advanced != self.status {
            self.status = advanced;
            self.updated_at = now;
        }
    }

    /// Records `user` as a reader and advances the status to `read`.
    ///
    /// Returns `true` when the message changed.
    pub fn mark_read_by(&mut self, user: &UserId, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if !self.read_by.contains(user) {
            self.read_by.push(user.clone());
            changed = true;
        }
        if self.status < MessageStatus::Read {
            self.status = MessageStatus::Read;
            changed = true;
        }
        if changed {
            self.updated_at = now;
        }
        changed
    }

    /// Whether this is a direct message exchanged between `a` and `b`.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        match &self.target {
            MessageTarget::Direct(receiver) => {
                (&self.sender == a && receiver == b) || (&self.sender == b && receiver == a)
            }
            MessageTarget::Room(_) => false,
        }
    }
}

/// Flat wire/storage shape of a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRecord {
    id: MessageId,
    sender: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    receiver: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    room_id: Option<RoomId>,
    content: String,
    #[serde(rename = "type", default)]
    kind: MessageKind,
    #[serde(default)]
    status: MessageStatus,
    #[serde(default)]
    read_by: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Message> for MessageRecord {
    fn from(msg: Message) -> Self {
        let (receiver, room_id) = match msg.target {
            MessageTarget::Direct(user) => (Some(user), None),
            MessageTarget::Room(room) => (None, Some(room)),
        };
        Self {
            id: msg.id,
            sender: msg.sender,
            receiver,
            room_id,
            content: msg.content,
            kind: msg.kind,
            status: msg.status,
            read_by: msg.read_by,
            created_at: msg.created_at,
            updated_at: msg.updated_at,
        }
    }
}

impl TryFrom<MessageRecord> for Message {
    type Error = String;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let target = MessageTarget::from_parts(record.receiver, record.room_id)
            .ok_or_else(|| "message must have exactly one of receiver or roomId".to_string())?;
        Ok(Self {
            id: record.id,
            sender: record.sender,
            target,
            content: record.content,
            kind: record.kind,
            status: record.status,
            read_by: record.read_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(from: &str, to: &str) -> Message {
        Message::create(
            MessageId::new("m1"),
            NewMessage {
                sender: UserId::new(from),
                target: MessageTarget::Direct(UserId::new(to)),
                content: "hi".to_string(),
                kind: MessageKind::Text,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_target_requires_exactly_one_side() {
        assert!(MessageTarget::from_parts(None, None).is_none());
        assert!(
            MessageTarget::from_parts(Some(UserId::new("u2")), Some(RoomId::new("r1"))).is_none()
        );
        assert!(MessageTarget::from_parts(Some(UserId::new("")), None).is_none());
        assert_eq!(
            MessageTarget::from_parts(None, Some(RoomId::new("r1"))),
            Some(MessageTarget::Room(RoomId::new("r1")))
        );
    }

    #[test]
    fn test_json_shape_for_direct_message() {
        let msg = direct("u1", "u2");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "u1");
        assert_eq!(json["receiver"], "u2");
        assert!(json.get("roomId").is_none());
        assert_eq!(json["type"], "text");
        assert_eq!(json["status"], "sent");
        assert_eq!(json["readBy"], serde_json::json!([]));
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_deserialize_rejects_both_targets() {
        let raw = serde_json::json!({
            "id": "m1",
            "sender": "u1",
            "receiver": "u2",
            "roomId": "r1",
            "content": "hi",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<Message>(raw).is_err());
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut msg = direct("u1", "u2");
        let reader = UserId::new("u2");

        assert!(msg.mark_read_by(&reader, Utc::now()));
        assert_eq!(msg.status(), MessageStatus::Read);
        assert_eq!(msg.read_by().len(), 1);

        assert!(!msg.mark_read_by(&reader, Utc::now()));
        assert_eq!(msg.read_by().len(), 1);
    }

    #[test]
    fn test_advance_status_ignores_regression() {
        let mut msg = direct("u1", "u2");
        msg.mark_read_by(&UserId::new("u2"), Utc::now());
        msg.advance_status(MessageStatus::Delivered, Utc::now());
        assert_eq!(msg.status(), MessageStatus::Read);
    }

    #[test]
    fn test_is_between_matches_both_directions() {
        let msg = direct("u1", "u2");
        assert!(msg.is_between(&UserId::new("u1"), &UserId::new("u2")));
        assert!(msg.is_between(&UserId::new("u2"), &UserId::new("u1")));
        assert!(!msg.is_between(&UserId::new("u1"), &UserId::new("u3")));
    }
}
