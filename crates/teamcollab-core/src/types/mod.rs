//! Core type definitions used across the TeamCollab workspace.

pub mod id;

pub use id::*;
