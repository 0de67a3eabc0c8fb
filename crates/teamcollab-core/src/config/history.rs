//! Message history query limits.

use serde::{Deserialize, Serialize};

/// Bounds applied to `GET /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Page size used when the client sends no `limit`.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Hard cap on `limit`.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl HistoryConfig {
    /// Resolves a client-requested limit against the configured bounds.
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}

fn default_limit() -> usize {
    50
}

fn default_max_limit() -> usize {
    200
}
