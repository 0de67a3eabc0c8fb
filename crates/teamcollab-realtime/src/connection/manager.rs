//! Connection manager: session lifecycle and the broadcast primitive.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use teamcollab_auth::VerifiedIdentity;
use teamcollab_core::config::RealtimeConfig;
use teamcollab_core::types::{RoomId, UserId};

use crate::channel::registry::ChannelRegistry;
use crate::channel::types::ChannelKey;
use crate::message::outbound::{ServerEvent, SystemKind};
use crate::metrics::RealtimeMetrics;

use super::handle::{ConnectionHandle, ConnectionId, Outbound, SendStatus};
use super::pool::ConnectionPool;

/// Owns every live session and delivers events to them.
///
/// All fan-out goes through [`ConnectionManager::broadcast`]: the recipient
/// set is snapshotted from the registry, the event is serialized once, and
/// the same text is enqueued to each recipient without waiting.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: ConnectionPool,
    /// Channel registry.
    channels: Arc<ChannelRegistry>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        channels: Arc<ChannelRegistry>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            channels,
            metrics,
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// The session is subscribed to its personal channel before it becomes
    /// visible to any broadcast. Returns the handle and the receiving end of
    /// its outbound queue.
    pub fn register(
        &self,
        identity: &VerifiedIdentity,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(identity, tx));

        self.channels
            .join(&ChannelKey::user(&handle.user_id), handle.id);
        self.pool.insert(handle.clone());
        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            user_id = %handle.user_id,
            role = %handle.role,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Removes a session from the pool and from every channel it joined.
    ///
    /// Safe to call more than once.
    pub fn unregister(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let handle = self.pool.remove(conn_id)?;
        handle.mark_dead();
        let left = self.channels.leave_all(*conn_id);
        self.metrics.connection_closed();

        info!(
            conn_id = %conn_id,
            user_id = %handle.user_id,
            channels = left.len(),
            "WebSocket connection unregistered"
        );

        Some(handle)
    }

    /// Looks up a live session.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Subscribes `handle` to `room:<id>` and announces it to the room,
    /// the joiner included.
    ///
    /// Room membership is not consulted; any authenticated session may
    /// join any room by id.
    pub fn join_room(&self, handle: &ConnectionHandle, room: &RoomId) {
        let key = ChannelKey::room(room);
        self.channels.join(&key, handle.id);
        self.broadcast(
            &key,
            &ServerEvent::System {
                kind: SystemKind::Join,
                user_id: handle.user_id.clone(),
            },
            None,
        );
    }

    /// Unsubscribes `handle` from `room:<id>` and announces it to the
    /// remaining members.
    pub fn leave_room(&self, handle: &ConnectionHandle, room: &RoomId) {
        let key = ChannelKey::room(room);
        self.channels.leave(&key, handle.id);
        self.broadcast(
            &key,
            &ServerEvent::System {
                kind: SystemKind::Leave,
                user_id: handle.user_id.clone(),
            },
            None,
        );
    }

    /// Delivers `event` to every session subscribed to `channel`, except
    /// `exclude`.
    ///
    /// Unknown or empty channels are a no-op. Returns the number of
    /// sessions the frame was queued for.
    pub fn broadcast(
        &self,
        channel: &ChannelKey,
        event: &ServerEvent,
        exclude: Option<ConnectionId>,
    ) -> usize {
        self.broadcast_many(std::slice::from_ref(channel), event, exclude)
    }

    /// Like [`Self::broadcast`] over the union of several channels. A session
    /// subscribed to more than one of them receives a single copy.
    pub fn broadcast_many(
        &self,
        channels: &[ChannelKey],
        event: &ServerEvent,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let mut seen = HashSet::new();
        let recipients: Vec<ConnectionId> = channels
            .iter()
            .flat_map(|ch| self.channels.subscribers(ch))
            .filter(|id| Some(*id) != exclude && seen.insert(*id))
            .collect();

        if recipients.is_empty() {
            debug!(event = event.name(), "Broadcast has no recipients");
            return 0;
        }

        let Some(text) = self.serialize(event) else {
            return 0;
        };

        let handles = recipients.iter().filter_map(|id| self.pool.get(id));
        self.deliver(handles, &text)
    }

    /// Delivers `event` to every live session.
    pub fn broadcast_all(&self, event: &ServerEvent) -> usize {
        let Some(text) = self.serialize(event) else {
            return 0;
        };
        self.deliver(self.pool.snapshot().into_iter(), &text)
    }

    /// Queues an already serialized frame for one session.
    pub fn send_to(&self, handle: &ConnectionHandle, text: String) -> SendStatus {
        let status = handle.send_text(text);
        self.record(status);
        status
    }

    /// Marks every session dead and forgets it.
    pub fn close_all(&self) -> usize {
        let all = self.pool.snapshot();
        for conn in &all {
            let _ = conn.send(Outbound::Close);
            conn.mark_dead();
            self.pool.remove(&conn.id);
            self.metrics.connection_closed();
        }
        self.channels.clear();
        info!(count = all.len(), "All connections closed");
        all.len()
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.len()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Checks if a user is currently connected.
    pub fn is_user_connected(&self, user_id: &UserId) -> bool {
        !self.pool.for_user(user_id).is_empty()
    }

    /// The shared channel registry.
    pub fn channels(&self) -> &Arc<ChannelRegistry> {
        &self.channels
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    fn serialize(&self, event: &ServerEvent) -> Option<String> {
        match event.to_frame() {
            Ok(text) => Some(text),
            Err(e) => {
                error!(event = event.name(), error = %e, "Failed to serialize broadcast event");
                None
            }
        }
    }

    fn deliver<I>(&self, handles: I, text: &str) -> usize
    where
        I: Iterator<Item = Arc<ConnectionHandle>>,
    {
        let mut queued = 0;
        for handle in handles {
            let status = handle.send_text(text);
            self.record(status);
            if status == SendStatus::Queued {
                queued += 1;
            }
        }
        queued
    }

    fn record(&self, status: SendStatus) {
        match status {
            SendStatus::Queued => self.metrics.frames_delivered(1),
            SendStatus::Full => self.metrics.frame_dropped(),
            SendStatus::Closed => {}
        }
    }
}
