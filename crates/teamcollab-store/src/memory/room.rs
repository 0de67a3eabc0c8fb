use async_trait::async_trait;
use chrono::Utc;

use teamcollab_core::result::AppResult;
use teamcollab_core::types::{RoomId, UserId};
use teamcollab_entity::room::{CreateRoom, Room};

use super::MemoryStore;
use crate::traits::RoomStore;

#[async_trait]
impl RoomStore for MemoryStore {
    async fn create_room(&self, input: CreateRoom) -> AppResult<Room> {
        let room = Room {
            id: RoomId::generate(),
            members: input.members(),
            name: input.name,
            created_at: Utc::now(),
        };
        self.rooms.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn find_room(&self, id: &RoomId) -> AppResult<Option<Room>> {
        Ok(self.rooms.get(id).map(|entry| entry.value().clone()))
    }

    async fn rooms_for_member(&self, user: &UserId) -> AppResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|entry| entry.value().has_member(user))
            .map(|entry| entry.value().clone())
            .collect();
        rooms.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rooms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rooms_for_member() {
        let store = MemoryStore::new();
        let room = store
            .create_room(CreateRoom {
                name: "design".to_string(),
                creator: UserId::new("u1"),
                member_ids: vec![UserId::new("u2")],
            })
            .await
            .unwrap();

        let for_u2 = store.rooms_for_member(&UserId::new("u2")).await.unwrap();
        assert_eq!(for_u2, vec![room.clone()]);
        assert!(store.rooms_for_member(&UserId::new("u3")).await.unwrap().is_empty());
        assert_eq!(store.find_room(&room.id).await.unwrap(), Some(room));
    }
}
