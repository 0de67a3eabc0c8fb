//! Live sessions, addressable by connection id and by user.

use std::sync::Arc;

use dashmap::DashMap;

use teamcollab_core::types::UserId;

use super::handle::{ConnectionHandle, ConnectionId};

/// Every live session of this node.
///
/// A user may hold several sessions at once (one per device); `sessions`
/// owns the handles while `devices` only indexes their ids.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    sessions: DashMap<ConnectionId, Arc<ConnectionHandle>>,
    devices: DashMap<UserId, Vec<ConnectionId>>,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted session.
    pub fn insert(&self, handle: Arc<ConnectionHandle>) {
        self.devices
            .entry(handle.user_id.clone())
            .or_default()
            .push(handle.id);
        self.sessions.insert(handle.id, handle);
    }

    /// Forgets a session. The user's entry goes away with their last device.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.sessions.remove(conn_id)?;
        if let Some(mut ids) = self.devices.get_mut(&handle.user_id) {
            ids.retain(|id| id != conn_id);
        }
        self.devices.remove_if(&handle.user_id, |_, ids| ids.is_empty());
        Some(handle)
    }

    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.sessions.get(conn_id).map(|s| Arc::clone(s.value()))
    }

    /// Sessions currently open for `user_id`.
    pub fn for_user(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        let ids = match self.devices.get(user_id) {
            Some(ids) => ids.value().clone(),
            None => return Vec::new(),
        };
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of distinct users with at least one session.
    pub fn user_count(&self) -> usize {
        self.devices.len()
    }

    /// Point-in-time copy of every session handle.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.sessions.iter().map(|s| Arc::clone(s.value())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamcollab_auth::VerifiedIdentity;
    use teamcollab_entity::user::UserRole;
    use tokio::sync::mpsc;

    fn handle(user: &str) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(4);
        let identity = VerifiedIdentity {
            user_id: UserId::new(user),
            role: UserRole::User,
            email: None,
        };
        Arc::new(ConnectionHandle::new(&identity, tx))
    }

    #[test]
    fn test_multi_device_user() {
        let pool = ConnectionPool::new();
        let a = handle("u1");
        let b = handle("u1");
        pool.insert(a.clone());
        pool.insert(b.clone());

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.user_count(), 1);

        pool.remove(&a.id);
        assert_eq!(pool.for_user(&UserId::new("u1")).len(), 1);

        pool.remove(&b.id);
        assert_eq!(pool.user_count(), 0);
        assert!(pool.remove(&b.id).is_none());
        assert!(pool.is_empty());
    }
}
