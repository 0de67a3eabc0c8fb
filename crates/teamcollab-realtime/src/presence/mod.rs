//! Ephemeral typing presence.

pub mod typing;

pub use typing::TypingNotifier;
