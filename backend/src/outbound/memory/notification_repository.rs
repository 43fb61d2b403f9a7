//! In-memory `NotificationRepository` adapter.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};

/// Vec-backed notification store.
#[derive(Default)]
pub struct MemoryNotificationRepository {
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_recent(
        &self,
        recipient_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let notifications = self.notifications.read().await;
        let mut recent: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self, recipient_id: Uuid) -> Result<u64, NotificationRepositoryError> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| n.recipient_id != recipient_id);
        Ok((before - notifications.len()) as u64)
    }

    async fn delete_matching(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut notifications = self.notifications.write().await;
        let position = notifications.iter().position(|n| {
            n.recipient_id == recipient_id
                && n.sender_id == Some(sender_id)
                && n.kind == kind
                && n.post_id == post_id
        });
        match position {
            Some(index) => {
                notifications.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, NotificationRepositoryError> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| n.recipient_id != user_id && n.sender_id != Some(user_id));
        Ok((before - notifications.len()) as u64)
    }
}
