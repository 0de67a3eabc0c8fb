//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use teamcollab_api::{AppState, build_app, serve};
use teamcollab_auth::JwtEncoder;
use teamcollab_core::config::AppConfig;
use teamcollab_core::types::UserId;
use teamcollab_entity::user::UserRole;

/// Upper bound for anything a test waits on.
const WAIT: Duration = Duration::from_secs(5);

/// A client WebSocket.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state; the same engine backs REST and WebSocket
    pub state: AppState,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application over fresh in-memory stores
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with a custom config
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::in_memory(config.clone());
        let router = build_app(state.clone());

        Self {
            router,
            state,
            config,
        }
    }

    /// Mint a token signed with the test secret
    pub fn token(&self, user: &str, role: UserRole) -> String {
        JwtEncoder::new(&self.config.auth)
            .issue(&UserId::new(user), role, Some(&format!("{user}@test.com")))
            .expect("Failed to issue token")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A server listening on an ephemeral port.
pub struct TestServer {
    /// Same state the server runs on, for REST calls and assertions
    pub app: TestApp,
    /// Bound address
    pub addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Bind `127.0.0.1:0` and serve in the background
    pub async fn spawn() -> Self {
        Self::spawn_with(AppConfig::default()).await
    }

    /// Serve with a custom config
    pub async fn spawn_with(config: AppConfig) -> Self {
        let app = TestApp::with_config(config);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");

        let (tx, rx) = oneshot::channel::<()>();
        let state = app.state.clone();
        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = rx.await;
            };
            serve(listener, state, shutdown)
                .await
                .expect("Server failed");
        });

        Self {
            app,
            addr,
            shutdown: Some(tx),
            task,
        }
    }

    /// WebSocket URL carrying `token` as a query parameter
    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.addr, token)
    }

    /// Connect as `user` and wait until the server has registered the session
    pub async fn connect(&self, user: &str) -> WsClient {
        let before = self.app.state.realtime.connections.connection_count();
        let token = self.app.token(user, UserRole::User);
        let (ws, _) = tokio_tungstenite::connect_async(self.ws_url(&token))
            .await
            .expect("WebSocket handshake failed");
        self.wait_for_connections(before + 1).await;
        ws
    }

    /// Poll until exactly `n` sessions are live
    pub async fn wait_for_connections(&self, n: usize) {
        let connections = &self.app.state.realtime.connections;
        tokio::time::timeout(WAIT, async {
            while connections.connection_count() != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "expected {n} connections, have {}",
                connections.connection_count()
            )
        });
    }

    /// Trigger graceful shutdown and wait for the server task
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(WAIT, &mut self.task)
            .await
            .expect("Server did not stop")
            .expect("Server task panicked");
    }
}

/// Send one JSON frame
pub async fn send_json(ws: &mut WsClient, frame: Value) {
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send frame");
}

/// Next JSON text frame, skipping control frames
pub async fn next_json(ws: &mut WsClient) -> Value {
    tokio::time::timeout(WAIT, async {
        loop {
            let msg = ws
                .next()
                .await
                .expect("Stream ended")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str::<Value>(text.as_str()).expect("Invalid JSON");
            }
        }
    })
    .await
    .expect("Timed out waiting for a frame")
}

/// Assert no text frame arrives within a short window
pub async fn expect_silence(ws: &mut WsClient) {
    let outcome = tokio::time::timeout(Duration::from_millis(200), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.as_str().to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(text)) = outcome {
        panic!("unexpected frame: {text}");
    }
}
