//! Route handlers organized by domain.

pub mod health;
pub mod identity;
pub mod messages;
pub mod rooms;
pub mod tasks;
pub mod ws;
