//! Ports for notification persistence and dispatch.
//!
//! Two seams live here. [`NotificationRepository`] is the driven port over
//! the notification collection. [`Notifier`] is the dispatch seam that
//! content services (posts, messages, friendships) call to fan out events;
//! it is injected explicitly so no service reaches for shared global state.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notification::{Notification, NotificationDraft, NotificationKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Port for the notification collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification)
        -> Result<(), NotificationRepositoryError>;

    /// The `limit` newest rows for a recipient, newest first.
    async fn list_recent(
        &self,
        recipient_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Mark one of the recipient's rows read; `false` when no row matched.
    async fn mark_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Delete all of the recipient's rows; returns how many were removed.
    async fn clear(&self, recipient_id: Uuid) -> Result<u64, NotificationRepositoryError>;

    /// Delete at most one row matching recipient, sender, kind, and post.
    /// Used to retract a like notification when the like is toggled off.
    async fn delete_matching(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    ) -> Result<bool, NotificationRepositoryError>;

    async fn delete_involving(&self, user_id: Uuid)
        -> Result<u64, NotificationRepositoryError>;
}

/// Dispatch seam used by content services to emit and retract notifications.
///
/// Both operations are fire-and-forget: implementations apply the recipient's
/// preference gate, swallow persistence failures after logging them, and
/// never fail the triggering action.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, draft: NotificationDraft);

    async fn retract(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    );
}
