//! Pub/sub channel system.

pub mod channel;
pub mod registry;
pub mod subscription;
pub mod types;

pub use registry::ChannelRegistry;
pub use types::ChannelKey;
