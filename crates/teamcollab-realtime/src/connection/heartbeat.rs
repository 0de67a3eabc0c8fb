//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, warn};

use teamcollab_core::config::RealtimeConfig;

use super::handle::{ConnectionHandle, Outbound, SendStatus};

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Inbound silence after which the connection is considered dead
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds.max(1)),
        }
    }
}

/// Run heartbeat loop for a connection.
///
/// Queues a ping every interval. When nothing has been received for longer
/// than the timeout, asks the writer to close and marks the handle dead;
/// the transport task then performs the usual disconnect cleanup.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval_at(Instant::now() + config.ping_interval, config.ping_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = handle.closed() => break,
        }

        let idle = Duration::from_millis(handle.idle_millis().max(0) as u64);
        if idle > config.ping_timeout {
            warn!(
                conn_id = %handle.id,
                idle_ms = idle.as_millis() as u64,
                "Connection heartbeat timeout"
            );
            let _ = handle.send(Outbound::Close);
            handle.mark_dead();
            break;
        }

        if handle.send(Outbound::Ping) == SendStatus::Closed {
            debug!(conn_id = %handle.id, "Ping send failed, connection closed");
            break;
        }
    }

    debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
