//! Chat message domain entities.

pub mod kind;
pub mod model;
pub mod status;

pub use kind::MessageKind;
pub use model::{Message, MessageTarget, NewMessage};
pub use status::MessageStatus;
