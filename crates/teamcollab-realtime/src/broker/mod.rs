//! Chat message broker.

pub mod message_broker;

pub use message_broker::{MessageBroker, SendOutcome};
