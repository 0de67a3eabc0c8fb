//! Typing indicators. Never persisted, never acknowledged.

use std::sync::Arc;

use tracing::debug;

use crate::channel::types::ChannelKey;
use crate::connection::handle::ConnectionHandle;
use crate::connection::manager::ConnectionManager;
use crate::message::inbound::TypingPayload;
use crate::message::outbound::ServerEvent;
use crate::metrics::RealtimeMetrics;

/// Relays typing state to a room or a peer, never back to the typing session.
#[derive(Debug)]
pub struct TypingNotifier {
    manager: Arc<ConnectionManager>,
    metrics: Arc<RealtimeMetrics>,
}

impl TypingNotifier {
    /// Creates a notifier.
    pub fn new(manager: Arc<ConnectionManager>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self { manager, metrics }
    }

    /// Broadcasts one typing update.
    ///
    /// A room target takes precedence over a peer target. Payloads naming
    /// neither are dropped. Returns the number of sessions notified.
    pub fn typing(&self, sender: &ConnectionHandle, payload: TypingPayload) -> usize {
        let room = payload.room_id.filter(|r| !r.is_empty());
        let peer = payload.to_user_id.filter(|u| !u.is_empty());

        let (channel, room_id) = match (room, peer) {
            (Some(room), _) => (ChannelKey::room(&room), Some(room)),
            (None, Some(peer)) => (ChannelKey::user(&peer), None),
            (None, None) => {
                debug!(conn_id = %sender.id, "Dropping typing event without target");
                self.metrics.silent_drop();
                return 0;
            }
        };

        let event = ServerEvent::Typing {
            user_id: sender.user_id.clone(),
            is_typing: payload.is_typing,
            room_id,
        };
        self.manager.broadcast(&channel, &event, Some(sender.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::registry::ChannelRegistry;
    use crate::testing::{drain, identity};
    use teamcollab_core::config::RealtimeConfig;
    use teamcollab_core::types::{RoomId, UserId};

    fn setup() -> (Arc<ConnectionManager>, TypingNotifier) {
        let metrics = Arc::new(RealtimeMetrics::new());
        let manager = Arc::new(ConnectionManager::new(
            RealtimeConfig::default(),
            Arc::new(ChannelRegistry::new()),
            metrics.clone(),
        ));
        (manager.clone(), TypingNotifier::new(manager, metrics))
    }

    #[test]
    fn test_room_typing_excludes_sender() {
        let (manager, notifier) = setup();
        let room = RoomId::new("r1");
        let (a, mut rx_a) = manager.register(&identity("u1"));
        let (b, mut rx_b) = manager.register(&identity("u2"));
        manager.join_room(&a, &room);
        manager.join_room(&b, &room);
        drain(&mut rx_a);
        drain(&mut rx_b);

        let sent = notifier.typing(
            &a,
            TypingPayload {
                room_id: Some(room),
                to_user_id: None,
                is_typing: true,
            },
        );

        assert_eq!(sent, 1);
        assert!(drain(&mut rx_a).is_empty());
        let frames = drain(&mut rx_b);
        assert_eq!(frames[0]["event"], "typing");
        assert_eq!(frames[0]["data"]["userId"], "u1");
        assert_eq!(frames[0]["data"]["isTyping"], true);
        assert_eq!(frames[0]["data"]["roomId"], "r1");
    }

    #[test]
    fn test_direct_typing_reaches_peer_devices_only() {
        let (manager, notifier) = setup();
        let (a, mut rx_a) = manager.register(&identity("u1"));
        let (_a2, mut rx_a2) = manager.register(&identity("u1"));
        let (_b, mut rx_b) = manager.register(&identity("u2"));

        notifier.typing(
            &a,
            TypingPayload {
                room_id: None,
                to_user_id: Some(UserId::new("u2")),
                is_typing: false,
            },
        );

        assert!(drain(&mut rx_a).is_empty());
        assert!(drain(&mut rx_a2).is_empty());
        let frames = drain(&mut rx_b);
        assert_eq!(frames.len(), 1);
        assert!(frames[0]["data"].get("roomId").is_none());
    }

    #[test]
    fn test_no_target_is_dropped() {
        let (manager, notifier) = setup();
        let (a, _rx) = manager.register(&identity("u1"));
        let sent = notifier.typing(
            &a,
            TypingPayload {
                room_id: None,
                to_user_id: None,
                is_typing: true,
            },
        );
        assert_eq!(sent, 0);
    }
}
