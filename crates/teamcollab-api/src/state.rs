//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use teamcollab_auth::{JwtDecoder, TokenVerifier};
use teamcollab_core::config::AppConfig;
use teamcollab_realtime::RealtimeEngine;
use teamcollab_store::{MemoryStore, MessageStore, RoomStore, TaskStore};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Bearer token verifier (REST and WebSocket)
    pub verifier: Arc<dyn TokenVerifier>,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Chat message store
    pub messages: Arc<dyn MessageStore>,
    /// Room store
    pub rooms: Arc<dyn RoomStore>,
    /// Task store
    pub tasks: Arc<dyn TaskStore>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Wires the engine around the given collaborators.
    pub fn new(
        config: AppConfig,
        verifier: Arc<dyn TokenVerifier>,
        messages: Arc<dyn MessageStore>,
        rooms: Arc<dyn RoomStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(
            config.realtime.clone(),
            verifier.clone(),
            messages.clone(),
        ));

        Self {
            config: Arc::new(config),
            verifier,
            realtime,
            messages,
            rooms,
            tasks,
            started_at: Instant::now(),
        }
    }

    /// State backed by the JWT decoder and a single in-memory store.
    pub fn in_memory(config: AppConfig) -> Self {
        let verifier = Arc::new(JwtDecoder::new(&config.auth));
        let store = Arc::new(MemoryStore::new());
        Self::new(config, verifier, store.clone(), store.clone(), store)
    }
}
