//! # teamcollab-realtime
//!
//! Real-time collaboration core for TeamCollab. Provides:
//!
//! - Connection gateway: bearer-token handshake and per-connection sessions
//! - Channel membership registry with `user:<id>` / `room:<id>` channels
//! - Message broker: validate, persist, fan out, acknowledge
//! - Typing notifier (ephemeral, sender excluded)
//! - Read-receipt aggregator (batch mark-read, global `read` events)
//! - Task event bridge from the REST layer to every live connection

pub mod bridge;
pub mod broker;
pub mod channel;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod receipt;
pub mod server;

pub use bridge::task_events::{TaskEvent, TaskEventBroadcaster};
pub use broker::message_broker::{MessageBroker, SendOutcome};
pub use channel::registry::ChannelRegistry;
pub use channel::types::ChannelKey;
pub use connection::gateway::{ConnectionGateway, HandshakeCredentials};
pub use connection::handle::{ConnectionHandle, ConnectionId, Outbound};
pub use connection::heartbeat::{HeartbeatConfig, run_heartbeat};
pub use connection::manager::ConnectionManager;
pub use metrics::{MetricsSnapshot, RealtimeMetrics};
pub use presence::typing::TypingNotifier;
pub use receipt::aggregator::ReadReceiptAggregator;
pub use server::RealtimeEngine;

#[cfg(test)]
pub(crate) mod testing;
