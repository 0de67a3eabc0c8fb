//! # teamcollab-api
//!
//! HTTP API layer for TeamCollab built on Axum.
//!
//! Provides the WebSocket upgrade into the real-time core, the REST
//! endpoints for tasks, rooms and message history, middleware (CORS,
//! logging), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server, serve};
pub use error::ApiError;
pub use state::AppState;
