//! Chat message broker.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info};

use teamcollab_entity::message::{Message, MessageKind, MessageTarget, NewMessage};
use teamcollab_store::MessageStore;

use crate::channel::types::ChannelKey;
use crate::connection::handle::ConnectionHandle;
use crate::connection::manager::ConnectionManager;
use crate::message::inbound::SendPayload;
use crate::message::outbound::{AckReply, ServerEvent};
use crate::message::validator;
use crate::metrics::RealtimeMetrics;

/// What happened to one `message` event.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Invalid payload; nothing stored, nothing sent, no ack.
    Dropped,
    /// Stored and fanned out.
    Persisted(Message),
    /// Store rejected the message; nothing was broadcast.
    Failed,
}

impl SendOutcome {
    /// The ack owed to the sender, if any.
    pub fn ack_reply(&self) -> Option<AckReply> {
        match self {
            Self::Dropped => None,
            Self::Persisted(message) => Some(AckReply::ok(message.clone())),
            Self::Failed => Some(AckReply::failed()),
        }
    }
}

/// Per-channel locks held from persistence until the fan-out is queued.
#[derive(Debug, Default)]
struct ChannelLocks(DashMap<ChannelKey, Arc<Mutex<()>>>);

impl ChannelLocks {
    /// Locks every key in a fixed order so overlapping sets cannot deadlock.
    async fn acquire(&self, keys: &[ChannelKey]) -> Vec<OwnedMutexGuard<()>> {
        let mut ordered: Vec<(String, &ChannelKey)> =
            keys.iter().map(|k| (k.to_string(), k)).collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        ordered.dedup_by(|a, b| a.0 == b.0);

        let mut guards = Vec::with_capacity(ordered.len());
        for (_, key) in ordered {
            let lock = self.0.entry(key.clone()).or_default().clone();
            guards.push(lock.lock_owned().await);
        }
        guards
    }
}

/// Validates, persists, then fans out chat messages.
#[derive(Debug)]
pub struct MessageBroker {
    manager: Arc<ConnectionManager>,
    store: Arc<dyn MessageStore>,
    metrics: Arc<RealtimeMetrics>,
    locks: ChannelLocks,
}

impl MessageBroker {
    /// Creates a broker over `store`.
    pub fn new(
        manager: Arc<ConnectionManager>,
        store: Arc<dyn MessageStore>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            manager,
            store,
            metrics,
            locks: ChannelLocks::default(),
        }
    }

    /// Handles one `message` event from `sender`.
    ///
    /// The message is stored before anything is broadcast, and the store is
    /// called at most once. Direct messages go to both personal channels;
    /// room messages go to the room channel only. The target channels stay
    /// locked until the fan-out is queued, so each channel sees messages in
    /// the order they were persisted.
    pub async fn send(&self, sender: &ConnectionHandle, payload: SendPayload) -> SendOutcome {
        if validator::validate_content(&payload.content).is_err() {
            debug!(conn_id = %sender.id, "Dropping message with empty content");
            self.metrics.silent_drop();
            return SendOutcome::Dropped;
        }

        let Some(target) = MessageTarget::from_parts(payload.to_user_id, payload.room_id) else {
            debug!(conn_id = %sender.id, "Dropping message without exactly one target");
            self.metrics.silent_drop();
            return SendOutcome::Dropped;
        };

        let kind = match parse_kind(payload.kind) {
            Some(kind) => kind,
            None => {
                debug!(conn_id = %sender.id, "Rejecting message with unknown type");
                self.metrics.persistence_failed();
                return SendOutcome::Failed;
            }
        };

        let channels = match &target {
            MessageTarget::Direct(receiver) => {
                vec![ChannelKey::user(receiver), ChannelKey::user(&sender.user_id)]
            }
            MessageTarget::Room(room) => vec![ChannelKey::room(room)],
        };

        let input = NewMessage {
            sender: sender.user_id.clone(),
            target,
            content: payload.content,
            kind,
        };

        let _guards = self.locks.acquire(&channels).await;
        let message = match self.store.create(input).await {
            Ok(message) => message,
            Err(e) => {
                error!(conn_id = %sender.id, user_id = %sender.user_id, error = %e, "Failed to persist message");
                self.metrics.persistence_failed();
                return SendOutcome::Failed;
            }
        };
        self.metrics.message_persisted();

        let delivered = self
            .manager
            .broadcast_many(&channels, &ServerEvent::Message(message.clone()), None);

        info!(
            message_id = %message.id,
            sender = %message.sender,
            recipients = delivered,
            "Message delivered"
        );

        SendOutcome::Persisted(message)
    }
}

fn parse_kind(raw: Option<String>) -> Option<MessageKind> {
    match raw {
        None => Some(MessageKind::Text),
        Some(s) => serde_json::from_value(Value::String(s)).ok(),
    }
}
