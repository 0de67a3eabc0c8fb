//! Task event fan-out.
//!
//! Task mutations happen in the REST layer; once a mutation is stored the
//! handler publishes it here and every live session is told. Delivery is
//! best-effort: sessions that are offline at that moment never see it.

use std::sync::Arc;

use tracing::debug;

use teamcollab_core::types::TaskId;
use teamcollab_entity::task::Task;

use crate::connection::manager::ConnectionManager;
use crate::message::outbound::ServerEvent;
use crate::metrics::RealtimeMetrics;

/// A stored task mutation.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// Task created.
    Created(Task),
    /// Task updated.
    Updated(Task),
    /// Task deleted.
    Deleted(TaskId),
}

impl From<TaskEvent> for ServerEvent {
    fn from(event: TaskEvent) -> Self {
        match event {
            TaskEvent::Created(task) => ServerEvent::TaskCreated(task),
            TaskEvent::Updated(task) => ServerEvent::TaskUpdated(task),
            TaskEvent::Deleted(id) => ServerEvent::TaskDeleted { id },
        }
    }
}

/// Broadcasts task events to every connected session.
#[derive(Debug, Clone)]
pub struct TaskEventBroadcaster {
    manager: Arc<ConnectionManager>,
    metrics: Arc<RealtimeMetrics>,
}

impl TaskEventBroadcaster {
    /// Creates a broadcaster.
    pub fn new(manager: Arc<ConnectionManager>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self { manager, metrics }
    }

    /// Publishes one event. Returns the number of sessions it was queued for.
    pub fn publish(&self, event: TaskEvent) -> usize {
        let event = ServerEvent::from(event);
        let delivered = self.manager.broadcast_all(&event);
        self.metrics.task_event();
        debug!(event = event.name(), delivered, "Task event broadcast");
        delivered
    }

    /// Shorthand for [`TaskEvent::Created`].
    pub fn created(&self, task: Task) -> usize {
        self.publish(TaskEvent::Created(task))
    }

    /// Shorthand for [`TaskEvent::Updated`].
    pub fn updated(&self, task: Task) -> usize {
        self.publish(TaskEvent::Updated(task))
    }

    /// Shorthand for [`TaskEvent::Deleted`].
    pub fn deleted(&self, id: TaskId) -> usize {
        self.publish(TaskEvent::Deleted(id))
    }
}
