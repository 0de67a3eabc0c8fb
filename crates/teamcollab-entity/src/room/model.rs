//! Room entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teamcollab_core::types::{RoomId, UserId};

/// A named group of users that chat together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room ID.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Member user IDs, unique.
    pub members: Vec<UserId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Whether `user` is listed as a member.
    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }
}

/// Input for creating a room.
#[derive(Debug, Clone)]
pub struct CreateRoom {
    /// Display name.
    pub name: String,
    /// Creating user; always becomes a member.
    pub creator: UserId,
    /// Additional members.
    pub member_ids: Vec<UserId>,
}

impl CreateRoom {
    /// Creator first, then the requested members, without duplicates.
    pub fn members(&self) -> Vec<UserId> {
        let mut members = vec![self.creator.clone()];
        for id in &self.member_ids {
            if !id.is_empty() && !members.contains(id) {
                members.push(id.clone());
            }
        }
        members
    }
}
