//! Client → server events.
//!
//! Frames are decoded in two steps: the envelope first, then the payload
//! for the named event. Anything that fails either step is reported as
//! `None` so the caller can drop it without replying.

use serde::Deserialize;
use serde_json::Value;

use teamcollab_core::types::{MessageId, RoomId, UserId};

/// Raw envelope: `{"event": "...", "data": ..., "ack": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    /// Event name.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: Value,
    /// Client correlation id; asks for an acknowledgment.
    #[serde(default)]
    pub ack: Option<Value>,
}

/// `join` / `leave` payload: either a bare room id or `{roomId}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RoomRef {
    /// `"r1"`
    Bare(RoomId),
    /// `{"roomId": "r1"}`
    Object {
        /// Room to join or leave.
        #[serde(rename = "roomId")]
        room_id: RoomId,
    },
}

impl RoomRef {
    /// The referenced room, or `None` for an empty id.
    pub fn room_id(self) -> Option<RoomId> {
        let id = match self {
            Self::Bare(id) => id,
            Self::Object { room_id } => room_id,
        };
        (!id.is_empty()).then_some(id)
    }
}

/// `typing` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    /// Room the user is typing in.
    #[serde(default)]
    pub room_id: Option<RoomId>,
    /// Peer the user is typing to.
    #[serde(default)]
    pub to_user_id: Option<UserId>,
    /// Whether typing started or stopped.
    #[serde(default)]
    pub is_typing: bool,
}

/// `read` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadPayload {
    /// Messages the caller has read.
    pub message_ids: Vec<MessageId>,
}

/// `message` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPayload {
    /// Message body.
    #[serde(default)]
    pub content: String,
    /// Direct recipient.
    #[serde(default)]
    pub to_user_id: Option<UserId>,
    /// Target room.
    #[serde(default)]
    pub room_id: Option<RoomId>,
    /// `text`, `image` or `file`; defaults to `text`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A decoded client event.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Subscribe to `room:<id>`.
    Join(RoomId),
    /// Unsubscribe from `room:<id>`.
    Leave(RoomId),
    /// Typing indicator.
    Typing(TypingPayload),
    /// Read receipts.
    Read(ReadPayload),
    /// Chat message.
    Message(SendPayload),
}

impl ClientEvent {
    /// Decodes the payload for `frame.event`.
    ///
    /// Returns `None` for unknown events and malformed payloads.
    pub fn decode(frame: &InboundFrame) -> Option<Self> {
        let data = frame.data.clone();
        match frame.event.as_str() {
            "join" => parse::<RoomRef>(data)?.room_id().map(Self::Join),
            "leave" => parse::<RoomRef>(data)?.room_id().map(Self::Leave),
            "typing" => parse(data).map(Self::Typing),
            "read" => parse(data).map(Self::Read),
            "message" => parse(data).map(Self::Message),
            _ => None,
        }
    }

    /// Event name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "join",
            Self::Leave(_) => "leave",
            Self::Typing(_) => "typing",
            Self::Read(_) => "read",
            Self::Message(_) => "message",
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(data: Value) -> Option<T> {
    serde_json::from_value(data).ok()
}
