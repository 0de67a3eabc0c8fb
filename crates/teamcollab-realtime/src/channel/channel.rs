//! Single channel with subscriber tracking.

use std::collections::HashSet;

use crate::connection::handle::ConnectionId;

use super::types::ChannelKey;

/// A single channel and the sessions currently subscribed to it.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Channel key.
    pub key: ChannelKey,
    /// Subscribed connection IDs.
    subscribers: HashSet<ConnectionId>,
}

impl Channel {
    /// Creates a new empty channel.
    pub fn new(key: ChannelKey) -> Self {
        Self {
            key,
            subscribers: HashSet::new(),
        }
    }

    /// Adds a subscriber. Returns `false` if it was already present.
    pub fn subscribe(&mut self, conn_id: ConnectionId) -> bool {
        self.subscribers.insert(conn_id)
    }

    /// Removes a subscriber. Returns `false` if it was not present.
    pub fn unsubscribe(&mut self, conn_id: ConnectionId) -> bool {
        self.subscribers.remove(&conn_id)
    }

    /// Whether `conn_id` is subscribed.
    pub fn contains(&self, conn_id: ConnectionId) -> bool {
        self.subscribers.contains(&conn_id)
    }

    /// Returns subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns whether the channel has any subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Copies out the current subscriber set.
    pub fn snapshot(&self) -> Vec<ConnectionId> {
        self.subscribers.iter().copied().collect()
    }
}
