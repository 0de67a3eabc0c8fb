//! # teamcollab-entity
//!
//! Domain entity models for TeamCollab. Every struct in this crate is
//! either a persisted record (messages, rooms, tasks) or a domain value
//! object. All entities derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize`, and serialize with the camelCase field names clients see
//! on the wire.

pub mod message;
pub mod room;
pub mod task;
pub mod user;
