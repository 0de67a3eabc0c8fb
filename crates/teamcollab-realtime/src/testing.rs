//! Shared fakes for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use teamcollab_auth::{TokenVerifier, VerifiedIdentity};
use teamcollab_core::error::AppError;
use teamcollab_core::result::AppResult;
use teamcollab_core::types::{MessageId, UserId};
use teamcollab_entity::message::{Message, NewMessage};
use teamcollab_entity::user::UserRole;
use teamcollab_store::{HistoryQuery, MessageStore};

use crate::connection::handle::Outbound;

/// Verifier that knows a fixed set of tokens.
#[derive(Debug, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticVerifier {
    pub fn accepting(token: &str, user: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(token.to_string(), UserId::new(user));
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        self.tokens
            .get(token)
            .map(|user_id| VerifiedIdentity {
                user_id: user_id.clone(),
                role: UserRole::User,
                email: None,
            })
            .ok_or_else(|| AppError::unauthorized("Invalid token signature"))
    }
}

/// Message store whose every call fails.
#[derive(Debug, Default)]
pub struct FailingMessageStore;

#[async_trait]
impl MessageStore for FailingMessageStore {
    async fn create(&self, _input: NewMessage) -> AppResult<Message> {
        Err(AppError::persistence("store offline"))
    }

    async fn find_by_ids(&self, _ids: &[MessageId]) -> AppResult<Vec<Message>> {
        Err(AppError::persistence("store offline"))
    }

    async fn mark_read(&self, _ids: &[MessageId], _reader: &UserId) -> AppResult<Vec<Message>> {
        Err(AppError::persistence("store offline"))
    }

    async fn history(&self, _query: &HistoryQuery) -> AppResult<Vec<Message>> {
        Err(AppError::persistence("store offline"))
    }
}

pub fn identity(user: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        user_id: UserId::new(user),
        role: UserRole::User,
        email: None,
    }
}

/// Pulls every queued text frame, parsed as JSON.
pub fn drain(rx: &mut mpsc::Receiver<Outbound>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        if let Outbound::Text(text) = frame {
            frames.push(serde_json::from_str(&text).unwrap());
        }
    }
    frames
}
