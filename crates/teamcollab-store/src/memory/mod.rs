//! In-memory store backed by `DashMap`.
//!
//! Single-node only; contents are lost on restart. Each record lives in
//! one map entry, so every mutation is atomic with respect to concurrent
//! readers of that record.

mod message;
mod room;
mod task;

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use teamcollab_core::types::{MessageId, RoomId, TaskId};
use teamcollab_entity::message::Message;
use teamcollab_entity::room::Room;
use teamcollab_entity::task::Task;

/// Process-local implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    messages: DashMap<MessageId, StoredMessage>,
    /// Insertion counter; breaks `created_at` ties in history order.
    sequence: AtomicU64,
    rooms: DashMap<RoomId, Room>,
    tasks: DashMap<TaskId, Task>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of persisted tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

#[derive(Debug)]
struct StoredMessage {
    seq: u64,
    message: Message,
}
