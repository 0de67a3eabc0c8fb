//! Channel registry: manages all channels and subscriptions.

use dashmap::DashMap;
use tracing::debug;

use crate::connection::handle::ConnectionId;

use super::channel::Channel;
use super::subscription::SubscriptionTracker;
use super::types::ChannelKey;

/// Process-wide map from channel key to the sessions subscribed to it.
///
/// Every mutation touches one map shard at a time, and readers get a
/// copied snapshot of a channel's subscriber set, so a disconnect running
/// concurrently with a broadcast never invalidates the broadcast's view.
/// Channels exist only while they have at least one subscriber.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Channel key → channel.
    channels: DashMap<ChannelKey, Channel>,
    /// Reverse index used for disconnect cleanup.
    subscriptions: SubscriptionTracker,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn_id` to `channel`. Idempotent.
    ///
    /// Returns `true` if the subscription is new.
    pub fn join(&self, channel: &ChannelKey, conn_id: ConnectionId) -> bool {
        let added = self
            .channels
            .entry(channel.clone())
            .or_insert_with(|| Channel::new(channel.clone()))
            .subscribe(conn_id);

        self.subscriptions.add(conn_id, channel.clone());

        if added {
            debug!(conn_id = %conn_id, channel = %channel, "Joined channel");
        }
        added
    }

    /// Removes `conn_id` from `channel`. Idempotent.
    ///
    /// Returns `true` if a subscription was removed.
    pub fn leave(&self, channel: &ChannelKey, conn_id: ConnectionId) -> bool {
        let removed = self
            .channels
            .get_mut(channel)
            .map(|mut ch| ch.unsubscribe(conn_id))
            .unwrap_or(false);

        self.channels.remove_if(channel, |_, ch| ch.is_empty());
        self.subscriptions.remove(conn_id, channel);

        if removed {
            debug!(conn_id = %conn_id, channel = %channel, "Left channel");
        }
        removed
    }

    /// Removes `conn_id` from every channel it joined.
    ///
    /// Returns the channels that were left.
    pub fn leave_all(&self, conn_id: ConnectionId) -> Vec<ChannelKey> {
        let channels = self.subscriptions.remove_all(conn_id);
        for channel in &channels {
            if let Some(mut ch) = self.channels.get_mut(channel) {
                ch.unsubscribe(conn_id);
            }
            self.channels.remove_if(channel, |_, ch| ch.is_empty());
        }
        channels.into_iter().collect()
    }

    /// Snapshot of the connections subscribed to `channel`.
    ///
    /// Unknown channels yield an empty list.
    pub fn subscribers(&self, channel: &ChannelKey) -> Vec<ConnectionId> {
        self.channels
            .get(channel)
            .map(|ch| ch.snapshot())
            .unwrap_or_default()
    }

    /// Whether `conn_id` is currently subscribed to `channel`.
    pub fn is_member(&self, channel: &ChannelKey, conn_id: ConnectionId) -> bool {
        self.channels
            .get(channel)
            .map(|ch| ch.contains(conn_id))
            .unwrap_or(false)
    }

    /// Returns the subscription count for a connection.
    pub fn subscription_count(&self, conn_id: ConnectionId) -> usize {
        self.subscriptions.count(conn_id)
    }

    /// Returns subscriber count for a channel.
    pub fn channel_subscriber_count(&self, channel: &ChannelKey) -> usize {
        self.channels
            .get(channel)
            .map(|ch| ch.subscriber_count())
            .unwrap_or(0)
    }

    /// Returns total number of active channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Drops every channel and subscription.
    pub fn clear(&self) {
        self.channels.clear();
        self.subscriptions.clear();
    }
}
