//! In-memory `UserRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{DmSettings, KarmaSnapshot, NotificationSettings, User};

/// Map-backed user store enforcing username uniqueness.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, id: Uuid, apply: F) -> Result<bool, UserRepositoryError>
    where
        F: FnOnce(&mut User) -> bool,
    {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => Ok(apply(user)),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(UserRepositoryError::duplicate_username(
                user.username.clone(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool, UserRepositoryError> {
        self.mutate(id, |user| {
            user.is_banned = banned;
            true
        })
        .await
    }

    async fn set_admin(&self, id: Uuid, admin: bool) -> Result<bool, UserRepositoryError> {
        self.mutate(id, |user| {
            user.is_admin = admin;
            true
        })
        .await
    }

    async fn set_notification_settings(
        &self,
        id: Uuid,
        settings: &NotificationSettings,
    ) -> Result<bool, UserRepositoryError> {
        let settings = *settings;
        self.mutate(id, move |user| {
            user.notification_settings = settings;
            true
        })
        .await
    }

    async fn set_dm_settings(
        &self,
        id: Uuid,
        settings: &DmSettings,
    ) -> Result<bool, UserRepositoryError> {
        let settings = *settings;
        self.mutate(id, move |user| {
            user.dm_settings = settings;
            true
        })
        .await
    }

    async fn set_icon_positions(
        &self,
        id: Uuid,
        positions: &Value,
    ) -> Result<bool, UserRepositoryError> {
        let positions = positions.clone();
        self.mutate(id, move |user| {
            user.icon_positions = positions;
            true
        })
        .await
    }

    async fn set_karma(
        &self,
        id: Uuid,
        karma: &KarmaSnapshot,
    ) -> Result<bool, UserRepositoryError> {
        let karma = *karma;
        self.mutate(id, move |user| {
            user.karma = karma;
            true
        })
        .await
    }

    async fn add_bookmark(&self, id: Uuid, post_id: Uuid) -> Result<bool, UserRepositoryError> {
        self.mutate(id, move |user| {
            if user.bookmarks.contains(&post_id) {
                false
            } else {
                user.bookmarks.push(post_id);
                true
            }
        })
        .await
    }

    async fn remove_bookmark(&self, id: Uuid, post_id: Uuid) -> Result<bool, UserRepositoryError> {
        self.mutate(id, move |user| {
            let before = user.bookmarks.len();
            user.bookmarks.retain(|b| *b != post_id);
            user.bookmarks.len() != before
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}
