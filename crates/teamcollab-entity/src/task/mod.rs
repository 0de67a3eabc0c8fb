//! Task-board domain entities.

pub mod model;
pub mod status;

pub use model::{CreateTask, Task, TaskPatch};
pub use status::{TaskPriority, TaskStatus};
