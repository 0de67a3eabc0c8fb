//! WebSocket connection management: handshake, sessions, pool, heartbeat.

pub mod gateway;
pub mod handle;
pub mod heartbeat;
pub mod manager;
pub mod pool;

pub use gateway::{ConnectionGateway, HandshakeCredentials};
pub use handle::{ConnectionHandle, ConnectionId, Outbound, SendStatus};
pub use manager::ConnectionManager;
