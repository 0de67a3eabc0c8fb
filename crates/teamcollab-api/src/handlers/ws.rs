//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use teamcollab_auth::VerifiedIdentity;
use teamcollab_realtime::{HandshakeCredentials, Outbound, RealtimeEngine, run_heartbeat};

use crate::error::ApiError;
use crate::state::AppState;

/// How long the writer may take to flush after the session ends.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Handshake query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct WsQuery {
    /// Explicit auth field, e.g. `Bearer <jwt>`.
    pub auth: Option<String>,
    /// Raw token fallback.
    pub token: Option<String>,
}

/// GET /ws: authenticate, then upgrade.
///
/// A refused handshake answers 401 and no session is created.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let credentials = HandshakeCredentials {
        auth_field: query.auth,
        authorization_header: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        query_token: query.token,
    };

    let identity = state.realtime.authenticate(&credentials).await?;
    let engine = state.realtime.clone();

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(engine, identity, socket)))
}

/// Drives one established connection until it ends, then cleans up.
async fn handle_ws_connection(
    engine: Arc<RealtimeEngine>,
    identity: VerifiedIdentity,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (handle, mut outbound_rx) = engine.connect(&identity);
    let conn_id = handle.id;

    // Outbound writer
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let msg = match frame {
                Outbound::Text(text) => Message::Text(text.into()),
                Outbound::Ping => Message::Ping(Default::default()),
                Outbound::Close => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            };
            if ws_tx.send(msg).await.is_err() {
                break;
            }
        }
    });
    let writer_abort = writer.abort_handle();

    let heartbeat = tokio::spawn(run_heartbeat(handle.clone(), engine.heartbeat_config()));
    let mut shutdown = engine.shutdown_receiver();

    // Frames are handled one at a time, in receipt order.
    loop {
        tokio::select! {
            _ = handle.closed() => break,
            _ = shutdown.recv() => break,
            next = ws_rx.next() => match next {
                Some(Ok(Message::Text(text))) => {
                    engine.handle_text(&handle, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => handle.touch(),
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
        }
    }

    engine.disconnect(&conn_id);
    heartbeat.abort();
    drop(handle);

    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
        debug!(conn_id = %conn_id, "Writer did not drain in time");
        writer_abort.abort();
    }

    info!(
        conn_id = %conn_id,
        user_id = %identity.user_id,
        "WebSocket connection closed"
    );
}
