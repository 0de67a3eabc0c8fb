//! Domain event bridge from the REST layer into live connections.

pub mod task_events;

pub use task_events::{TaskEvent, TaskEventBroadcaster};
