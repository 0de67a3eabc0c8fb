use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use teamcollab_core::result::AppResult;
use teamcollab_core::types::{MessageId, UserId};
use teamcollab_entity::message::{Message, NewMessage};

use super::{MemoryStore, StoredMessage};
use crate::traits::{HistoryQuery, MessageStore};

#[async_trait]
impl MessageStore for MemoryStore {
    async fn create(&self, input: NewMessage) -> AppResult<Message> {
        let message = Message::create(MessageId::generate(), input, Utc::now());
        let stored = StoredMessage {
            seq: self.next_sequence(),
            message: message.clone(),
        };
        self.messages.insert(message.id.clone(), stored);
        Ok(message)
    }

    async fn find_by_ids(&self, ids: &[MessageId]) -> AppResult<Vec<Message>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.messages.get(id).map(|entry| entry.message.clone()))
            .collect())
    }

    async fn mark_read(&self, ids: &[MessageId], reader: &UserId) -> AppResult<Vec<Message>> {
        let now = Utc::now();
        let mut updated = Vec::with_capacity(ids.len());

        for id in ids {
            match self.messages.get_mut(id) {
                Some(mut entry) => {
                    entry.message.mark_read_by(reader, now);
                    updated.push(entry.message.clone());
                }
                None => debug!(message_id = %id, "Skipping read receipt for unknown message"),
            }
        }

        Ok(updated)
    }

    async fn history(&self, query: &HistoryQuery) -> AppResult<Vec<Message>> {
        let mut matching: Vec<(u64, Message)> = self
            .messages
            .iter()
            .filter(|entry| query.matches(&entry.message))
            .map(|entry| (entry.seq, entry.message.clone()))
            .collect();

        // Newest first, keep the page, then flip back to chronological order.
        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| seq_b.cmp(seq_a))
        });
        matching.truncate(query.limit);
        matching.reverse();

        Ok(matching.into_iter().map(|(_, msg)| msg).collect())
    }
}
