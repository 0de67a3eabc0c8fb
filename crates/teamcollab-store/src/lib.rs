//! # teamcollab-store
//!
//! Persistence seams for TeamCollab. The real-time core and the REST
//! handlers only ever talk to the traits in [`traits`]; [`memory`] holds
//! the default process-local implementation.

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{HistoryQuery, MessageStore, RoomStore, TaskStore};
