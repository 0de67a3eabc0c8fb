//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level counters. All updates are relaxed; readers only need
/// eventually-consistent totals.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_opened: AtomicU64,
    connections_active: AtomicU64,
    frames_received: AtomicU64,
    frames_delivered: AtomicU64,
    frames_dropped: AtomicU64,
    silent_drops: AtomicU64,
    messages_persisted: AtomicU64,
    persistence_failures: AtomicU64,
    read_receipts: AtomicU64,
    task_events: AtomicU64,
}

impl RealtimeMetrics {
    /// Create zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// A session was registered.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// A session was unregistered.
    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// An inbound text frame arrived.
    pub fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// `n` frames were queued for delivery.
    pub fn frames_delivered(&self, n: u64) {
        self.frames_delivered.fetch_add(n, Ordering::Relaxed);
    }

    /// A frame was dropped because a session queue was full.
    pub fn frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Invalid client input was discarded without a reply.
    pub fn silent_drop(&self) {
        self.silent_drops.fetch_add(1, Ordering::Relaxed);
    }

    /// A chat message was stored.
    pub fn message_persisted(&self) {
        self.messages_persisted.fetch_add(1, Ordering::Relaxed);
    }

    /// Storing a chat message failed.
    pub fn persistence_failed(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// `n` read receipts were applied.
    pub fn read_receipts(&self, n: u64) {
        self.read_receipts.fetch_add(n, Ordering::Relaxed);
    }

    /// A task event was broadcast.
    pub fn task_event(&self) {
        self.task_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            silent_drops: self.silent_drops.load(Ordering::Relaxed),
            messages_persisted: self.messages_persisted.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            read_receipts: self.read_receipts.load(Ordering::Relaxed),
            task_events: self.task_events.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Sessions ever registered
    pub connections_opened: u64,
    /// Sessions currently registered
    pub connections_active: u64,
    /// Inbound text frames
    pub frames_received: u64,
    /// Outbound frames queued
    pub frames_delivered: u64,
    /// Outbound frames dropped on full queues
    pub frames_dropped: u64,
    /// Invalid inbound events discarded
    pub silent_drops: u64,
    /// Chat messages stored
    pub messages_persisted: u64,
    /// Chat message store failures
    pub persistence_failures: u64,
    /// Read receipts applied
    pub read_receipts: u64,
    /// Task events broadcast
    pub task_events: u64,
}
