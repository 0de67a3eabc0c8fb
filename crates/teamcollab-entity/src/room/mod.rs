//! Chat room domain entities.

pub mod model;

pub use model::{CreateRoom, Room};
