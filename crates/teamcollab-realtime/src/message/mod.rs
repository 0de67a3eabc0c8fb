//! WebSocket wire types and validation.

pub mod inbound;
pub mod outbound;
pub mod validator;

pub use inbound::{ClientEvent, InboundFrame};
pub use outbound::{AckFrame, AckReply, ServerEvent, SystemKind};
