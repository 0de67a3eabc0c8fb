//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info};

use teamcollab_auth::{TokenVerifier, VerifiedIdentity};
use teamcollab_core::config::RealtimeConfig;
use teamcollab_core::error::AppError;
use teamcollab_store::MessageStore;

use crate::bridge::task_events::TaskEventBroadcaster;
use crate::broker::message_broker::MessageBroker;
use crate::channel::registry::ChannelRegistry;
use crate::connection::gateway::{ConnectionGateway, HandshakeCredentials};
use crate::connection::handle::{ConnectionHandle, ConnectionId, Outbound};
use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::message::inbound::ClientEvent;
use crate::message::outbound::AckFrame;
use crate::message::validator;
use crate::metrics::RealtimeMetrics;
use crate::presence::typing::TypingNotifier;
use crate::receipt::aggregator::ReadReceiptAggregator;

/// Central real-time engine that coordinates all WebSocket subsystems.
///
/// Constructed explicitly with its collaborators; nothing here is global.
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Handshake authentication.
    pub gateway: ConnectionGateway,
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Channel registry.
    pub channels: Arc<ChannelRegistry>,
    /// Chat message broker.
    pub broker: Arc<MessageBroker>,
    /// Typing notifier.
    pub typing: Arc<TypingNotifier>,
    /// Read-receipt aggregator.
    pub receipts: Arc<ReadReceiptAggregator>,
    /// Task event broadcaster.
    pub tasks: TaskEventBroadcaster,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .field("channels", &self.channels.channel_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(
        config: RealtimeConfig,
        verifier: Arc<dyn TokenVerifier>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let channels = Arc::new(ChannelRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config.clone(),
            channels.clone(),
            metrics.clone(),
        ));
        let broker = Arc::new(MessageBroker::new(
            connections.clone(),
            messages.clone(),
            metrics.clone(),
        ));
        let typing = Arc::new(TypingNotifier::new(connections.clone(), metrics.clone()));
        let receipts = Arc::new(ReadReceiptAggregator::new(
            connections.clone(),
            messages,
            metrics.clone(),
        ));
        let tasks = TaskEventBroadcaster::new(connections.clone(), metrics.clone());

        info!("Real-time engine initialized");

        Self {
            gateway: ConnectionGateway::new(verifier),
            connections,
            channels,
            broker,
            typing,
            receipts,
            tasks,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// Verifies a handshake. Refusals carry the reason `Unauthorized`.
    pub async fn authenticate(
        &self,
        credentials: &HandshakeCredentials,
    ) -> Result<VerifiedIdentity, AppError> {
        self.gateway.authenticate(credentials).await
    }

    /// Creates the session for an authenticated connection.
    pub fn connect(
        &self,
        identity: &VerifiedIdentity,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<Outbound>) {
        self.connections.register(identity)
    }

    /// Destroys a session and every channel membership it held.
    pub fn disconnect(&self, conn_id: &ConnectionId) {
        self.connections.unregister(conn_id);
    }

    /// Handles one inbound text frame to completion.
    ///
    /// Callers must await this before reading the connection's next frame,
    /// which keeps per-connection handling in receipt order. Invalid input
    /// is discarded without any reply to the client.
    pub async fn handle_text(&self, handle: &ConnectionHandle, raw: &str) {
        handle.touch();
        self.metrics.frame_received();

        let frame = match validator::parse_frame(raw, self.config.max_frame_bytes) {
            Ok(frame) => frame,
            Err(e) => {
                debug!(conn_id = %handle.id, reason = %e.message, "Dropping invalid frame");
                self.metrics.silent_drop();
                return;
            }
        };

        let Some(event) = ClientEvent::decode(&frame) else {
            debug!(conn_id = %handle.id, event = %frame.event, "Dropping unknown or malformed event");
            self.metrics.silent_drop();
            return;
        };

        debug!(conn_id = %handle.id, event = event.name(), "Inbound event");

        match event {
            ClientEvent::Join(room) => self.connections.join_room(handle, &room),
            ClientEvent::Leave(room) => self.connections.leave_room(handle, &room),
            ClientEvent::Typing(payload) => {
                self.typing.typing(handle, payload);
            }
            ClientEvent::Read(payload) => {
                // Store errors are logged by the aggregator; the client gets nothing.
                let _ = self.receipts.mark_read(handle, &payload.message_ids).await;
            }
            ClientEvent::Message(payload) => {
                let outcome = self.broker.send(handle, payload).await;
                if let (Some(id), Some(reply)) = (frame.ack, outcome.ack_reply()) {
                    self.send_ack(handle, AckFrame::new(id, reply));
                }
            }
        }
    }

    /// Heartbeat timings for connection tasks.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        HeartbeatConfig::from(&self.config)
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        // Signal all tasks to stop
        let _ = self.shutdown_tx.send(());

        let closed = self.connections.close_all();

        info!(closed, "Real-time engine shut down");
        Ok(())
    }

    fn send_ack(&self, handle: &ConnectionHandle, ack: AckFrame) {
        match ack.to_frame() {
            Ok(text) => {
                self.connections.send_to(handle, text);
            }
            Err(e) => error!(conn_id = %handle.id, error = %e, "Failed to serialize ack"),
        }
    }
}
