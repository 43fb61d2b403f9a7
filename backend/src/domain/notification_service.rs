//! Notification dispatch and inbox reads.
//!
//! [`NotificationService`] implements the [`Notifier`] seam used by the
//! content services. Emission applies the recipient's preference gate and is
//! fire-and-forget: failures are logged and swallowed so the triggering
//! action (a like, a message, a friend request) always completes on its own
//! terms.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::notification::{Notification, NotificationDraft, NotificationKind};
use crate::domain::ports::{
    NotificationRepository, NotificationRepositoryError, Notifier, UserRepository,
    UserRepositoryError,
};
use crate::domain::user::NotificationSettings;

/// How many rows an inbox read returns.
const INBOX_LIMIT: usize = 50;

fn map_repository_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        _ => Error::internal(error.to_string()),
    }
}

/// Notification inbox service; the concrete [`Notifier`] implementation.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            notifications,
            users,
        }
    }

    /// The recipient's newest rows, capped at the inbox limit.
    pub async fn list(&self, recipient_id: Uuid) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_recent(recipient_id, INBOX_LIMIT)
            .await
            .map_err(map_repository_error)
    }

    /// Mark one of the recipient's rows read.
    pub async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> Result<(), Error> {
        let matched = self
            .notifications
            .mark_read(id, recipient_id)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(Error::not_found("Notification not found"));
        }
        Ok(())
    }

    /// Delete all of the recipient's rows.
    pub async fn clear(&self, recipient_id: Uuid) -> Result<u64, Error> {
        self.notifications
            .clear(recipient_id)
            .await
            .map_err(map_repository_error)
    }

    /// Replace the user's notification toggles.
    pub async fn update_settings(
        &self,
        user_id: Uuid,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings, Error> {
        let matched = self
            .users
            .set_notification_settings(user_id, &settings)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("User not found"));
        }
        Ok(settings)
    }
}

#[async_trait]
impl Notifier for NotificationService {
    async fn notify(&self, draft: NotificationDraft) {
        if draft.sender_id == Some(draft.recipient_id) {
            debug!(recipient = %draft.recipient_id, "self-notification suppressed");
            return;
        }

        let recipient = match self.users.find_by_id(draft.recipient_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!(recipient = %draft.recipient_id, "notification dropped: unknown recipient");
                return;
            }
            Err(error) => {
                warn!(%error, recipient = %draft.recipient_id, "notification dropped: recipient lookup failed");
                return;
            }
        };

        if !draft.kind.permitted_by(&recipient.notification_settings) {
            debug!(
                recipient = %draft.recipient_id,
                kind = draft.kind.as_str(),
                "notification suppressed by recipient settings"
            );
            return;
        }

        let row = draft.into_notification();
        if let Err(error) = self.notifications.insert(&row).await {
            warn!(%error, recipient = %row.recipient_id, "notification write failed");
        }
    }

    async fn retract(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    ) {
        if let Err(error) = self
            .notifications
            .delete_matching(recipient_id, sender_id, kind, post_id)
            .await
        {
            warn!(%error, recipient = %recipient_id, "notification retraction failed");
        }
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
