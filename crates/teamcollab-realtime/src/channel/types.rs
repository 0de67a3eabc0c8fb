//! Channel keys.

use std::fmt;

use teamcollab_core::types::{RoomId, UserId};

/// Logical broadcast group.
///
/// Renders as `user:<id>` for a personal channel and `room:<id>` for a
/// group channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelKey {
    /// Personal channel every session of a user is subscribed to.
    User(UserId),
    /// Group channel joined explicitly by room id.
    Room(RoomId),
}

impl ChannelKey {
    /// Personal channel for `user`.
    pub fn user(user: &UserId) -> Self {
        Self::User(user.clone())
    }

    /// Group channel for `room`.
    pub fn room(room: &RoomId) -> Self {
        Self::Room(room.clone())
    }

    /// Parses `user:<id>` or `room:<id>`.
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, id) = s.split_once(':')?;
        if id.is_empty() {
            return None;
        }
        match kind {
            "user" => Some(Self::User(UserId::new(id))),
            "room" => Some(Self::Room(RoomId::new(id))),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Room(id) => write!(f, "room:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let key = ChannelKey::room(&RoomId::new("r1"));
        assert_eq!(key.to_string(), "room:r1");
        assert_eq!(ChannelKey::parse("room:r1"), Some(key));
        assert_eq!(
            ChannelKey::parse("user:u1"),
            Some(ChannelKey::User(UserId::new("u1")))
        );
        assert_eq!(ChannelKey::parse("folder:1"), None);
        assert_eq!(ChannelKey::parse("room:"), None);
    }
}
