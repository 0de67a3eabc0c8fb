//! Message delivery status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery status of a message.
///
/// Variants are declared in lifecycle order so the derived `Ord` matches
/// `Sent < Delivered < Read`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Persisted and handed to fan-out.
    #[default]
    Sent,
    /// Reached at least one recipient device.
    Delivered,
    /// Marked read by at least one recipient.
    Read,
}

impl MessageStatus {
    /// Returns the later of `self` and `next`. Status never regresses.
    pub fn advance_to(self, next: MessageStatus) -> MessageStatus {
        self.max(next)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
