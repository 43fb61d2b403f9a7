//! In-memory `FriendshipRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::friendship::{Friendship, FriendshipStatus};
use crate::domain::ports::{FriendshipRepository, FriendshipRepositoryError};

/// Map-backed friendship store.
#[derive(Default)]
pub struct MemoryFriendshipRepository {
    friendships: RwLock<HashMap<Uuid, Friendship>>,
}

impl MemoryFriendshipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FriendshipRepository for MemoryFriendshipRepository {
    async fn insert(&self, friendship: &Friendship) -> Result<(), FriendshipRepositoryError> {
        self.friendships
            .write()
            .await
            .insert(friendship.id, friendship.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        Ok(self.friendships.read().await.get(&id).cloned())
    }

    async fn find_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        let friendships = self.friendships.read().await;
        Ok(friendships.values().find(|f| f.links(a, b)).cloned())
    }

    async fn list_involving(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Friendship>, FriendshipRepositoryError> {
        let friendships = self.friendships.read().await;
        Ok(friendships
            .values()
            .filter(|f| f.involves(user_id))
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: FriendshipStatus,
    ) -> Result<bool, FriendshipRepositoryError> {
        let mut friendships = self.friendships.write().await;
        match friendships.get_mut(&id) {
            Some(friendship) => {
                friendship.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, FriendshipRepositoryError> {
        Ok(self.friendships.write().await.remove(&id).is_some())
    }

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, FriendshipRepositoryError> {
        let mut friendships = self.friendships.write().await;
        let before = friendships.len();
        friendships.retain(|_, f| !f.involves(user_id));
        Ok((before - friendships.len()) as u64)
    }
}
