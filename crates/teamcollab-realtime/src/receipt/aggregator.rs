//! Read-receipt aggregation.

use std::sync::Arc;

use tracing::{debug, error};

use teamcollab_core::result::AppResult;
use teamcollab_core::types::MessageId;
use teamcollab_store::MessageStore;

use crate::connection::handle::ConnectionHandle;
use crate::connection::manager::ConnectionManager;
use crate::message::outbound::ServerEvent;
use crate::metrics::RealtimeMetrics;

/// Applies read receipts in batches and announces them to every session.
#[derive(Debug)]
pub struct ReadReceiptAggregator {
    manager: Arc<ConnectionManager>,
    store: Arc<dyn MessageStore>,
    metrics: Arc<RealtimeMetrics>,
}

impl ReadReceiptAggregator {
    /// Creates an aggregator over `store`.
    pub fn new(
        manager: Arc<ConnectionManager>,
        store: Arc<dyn MessageStore>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            manager,
            store,
            metrics,
        }
    }

    /// Marks `ids` read by the session's user.
    ///
    /// Unknown ids are skipped by the store. Once the batch is stored, one
    /// global `read` event per requested id goes out, whether or not the
    /// stored state changed. Nothing is broadcast if the store fails.
    pub async fn mark_read(
        &self,
        reader: &ConnectionHandle,
        ids: &[MessageId],
    ) -> AppResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let updated = self
            .store
            .mark_read(ids, &reader.user_id)
            .await
            .inspect_err(|e| {
                error!(conn_id = %reader.id, error = %e, "Failed to store read receipts");
            })?;
        self.metrics.read_receipts(updated.len() as u64);

        debug!(
            user_id = %reader.user_id,
            requested = ids.len(),
            updated = updated.len(),
            "Read receipts stored"
        );

        for id in ids {
            self.manager.broadcast_all(&ServerEvent::Read {
                message_id: id.clone(),
                user_id: reader.user_id.clone(),
            });
        }

        Ok(updated.len())
    }
}
