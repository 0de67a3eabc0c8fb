//! Individual connection handle (the in-memory session).

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use teamcollab_auth::VerifiedIdentity;
use teamcollab_core::types::UserId;
use teamcollab_entity::user::UserRole;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// A frame queued for the transport writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Serialized JSON event.
    Text(String),
    /// Keepalive probe.
    Ping,
    /// Ask the writer to close the socket.
    Close,
}

/// Result of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Frame accepted by the queue.
    Queued,
    /// Queue full; this frame was dropped for this connection only.
    Full,
    /// Connection already gone.
    Closed,
}

/// A handle to a single live connection.
///
/// Holds the sender for pushing frames to the client, plus the identity of
/// the authenticated user. Created on a successful handshake, dropped when
/// the connection ends.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// User's role
    pub role: UserRole,
    /// Sender for outbound frames
    sender: mpsc::Sender<Outbound>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last inbound activity, unix millis
    last_seen_ms: AtomicI64,
    /// Cancelled once the connection is dead
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(identity: &VerifiedIdentity, sender: mpsc::Sender<Outbound>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: identity.user_id.clone(),
            role: identity.role,
            sender,
            connected_at: now,
            last_seen_ms: AtomicI64::new(now.timestamp_millis()),
            closed: CancellationToken::new(),
        }
    }

    /// Queue a frame without waiting.
    pub fn send(&self, frame: Outbound) -> SendStatus {
        if !self.is_alive() {
            return SendStatus::Closed;
        }
        match self.sender.try_send(frame) {
            Ok(()) => SendStatus::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                SendStatus::Full
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                SendStatus::Closed
            }
        }
    }

    /// Queue a serialized event.
    pub fn send_text(&self, text: impl Into<String>) -> SendStatus {
        self.send(Outbound::Text(text.into()))
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        !self.closed.is_cancelled()
    }

    /// Mark connection as dead and wake whoever waits on [`Self::closed`].
    pub fn mark_dead(&self) {
        self.closed.cancel();
    }

    /// Resolves once the connection has been marked dead.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Record inbound activity.
    pub fn touch(&self) {
        self.last_seen_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Milliseconds since the last inbound activity.
    pub fn idle_millis(&self) -> i64 {
        Utc::now().timestamp_millis() - self.last_seen_ms.load(Ordering::Relaxed)
    }
}
