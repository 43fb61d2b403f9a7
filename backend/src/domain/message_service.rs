//! Direct messaging: the DM acceptance gate, threads, and conversation
//! summaries.
//!
//! The gate runs on every send. `allow_dms` admits anyone; with it off,
//! `allow_dms_from_friends` admits only accepted friendships; with both off
//! nobody gets through. Nothing is cached, so flipping a setting applies to
//! the very next send.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::friendship::FriendshipStatus;
use crate::domain::message::Message;
use crate::domain::notification::{NotificationDraft, NotificationKind};
use crate::domain::ports::{
    FriendshipRepository, FriendshipRepositoryError, MessageRepository, MessageRepositoryError,
    Notifier, UserRepository, UserRepositoryError,
};
use crate::domain::user::{User, UserSummary};

fn map_repository_error(error: MessageRepositoryError) -> Error {
    match error {
        MessageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("message store unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            Error::internal(format!("message store error: {message}"))
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

fn map_friendship_error(error: FriendshipRepositoryError) -> Error {
    match error {
        FriendshipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("friendship store unavailable: {message}"))
        }
        FriendshipRepositoryError::Query { message } => {
            Error::internal(format!("friendship store error: {message}"))
        }
    }
}

/// One entry in the conversation list: the partner, the latest message, and
/// how many of their messages the viewer has not read yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub user: UserSummary,
    pub last_message: Message,
    pub unread_count: u64,
}

/// Messaging service over the message collection.
#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
    friendships: Arc<dyn FriendshipRepository>,
    notifier: Arc<dyn Notifier>,
}

impl MessageService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        users: Arc<dyn UserRepository>,
        friendships: Arc<dyn FriendshipRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            messages,
            users,
            friendships,
            notifier,
        }
    }

    /// Whether `recipient` accepts a message from `sender` right now.
    async fn gate_permits(&self, sender: &User, recipient: &User) -> Result<bool, Error> {
        if recipient.dm_settings.allow_dms {
            return Ok(true);
        }
        if recipient.dm_settings.allow_dms_from_friends {
            let friendship = self
                .friendships
                .find_between(sender.id, recipient.id)
                .await
                .map_err(map_friendship_error)?;
            return Ok(friendship
                .is_some_and(|f| f.status == FriendshipStatus::Accepted));
        }
        Ok(false)
    }

    /// Send a direct message, applying the recipient's acceptance gate.
    #[instrument(skip_all, fields(sender = %sender.id, recipient = %recipient_id))]
    pub async fn send(
        &self,
        sender: &User,
        recipient_id: Uuid,
        content: &str,
    ) -> Result<Message, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::invalid_request("Message cannot be empty"));
        }
        if sender.id == recipient_id {
            return Err(Error::invalid_request("You cannot message yourself"));
        }

        let recipient = self
            .users
            .find_by_id(recipient_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        if !self.gate_permits(sender, &recipient).await? {
            return Err(Error::forbidden(format!(
                "{} has disabled direct messages",
                recipient.username
            )));
        }

        let message = Message::new(sender.id, sender.username.clone(), recipient_id, content);
        self.messages
            .insert(&message)
            .await
            .map_err(map_repository_error)?;

        self.notifier
            .notify(NotificationDraft {
                recipient_id,
                sender_id: Some(sender.id),
                sender_username: Some(sender.username.clone()),
                kind: NotificationKind::Message,
                message: format!("{} sent you a message", sender.username),
                post_id: None,
            })
            .await;
        Ok(message)
    }

    /// One summary per conversation partner, most recent conversation first.
    pub async fn conversations(&self, viewer: &User) -> Result<Vec<ConversationSummary>, Error> {
        let messages = self
            .messages
            .list_involving(viewer.id)
            .await
            .map_err(map_repository_error)?;

        // Newest first, so the first message seen per peer is the latest.
        let mut folds: Vec<(Uuid, Message, u64)> = Vec::new();
        for message in messages {
            let peer = message.peer_of(viewer.id);
            let increment = u64::from(message.recipient_id == viewer.id && !message.read);
            if let Some((_, _, unread)) = folds.iter_mut().find(|(id, _, _)| *id == peer) {
                *unread += increment;
            } else {
                folds.push((peer, message, increment));
            }
        }

        let mut summaries = Vec::with_capacity(folds.len());
        for (peer, last_message, unread_count) in folds {
            let Some(peer_user) = self
                .users
                .find_by_id(peer)
                .await
                .map_err(map_user_error)?
            else {
                // Partner account removed; its conversation goes with it.
                continue;
            };
            summaries.push(ConversationSummary {
                user: UserSummary::from(&peer_user),
                last_message,
                unread_count,
            });
        }
        Ok(summaries)
    }

    /// The full two-party thread, oldest first. Fetching the thread marks the
    /// messages addressed to the viewer as read; polling clients depend on
    /// this flip.
    pub async fn thread(&self, viewer: &User, peer_id: Uuid) -> Result<Vec<Message>, Error> {
        self.users
            .find_by_id(peer_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let mut thread = self
            .messages
            .thread_between(viewer.id, peer_id)
            .await
            .map_err(map_repository_error)?;

        self.messages
            .mark_read_from(viewer.id, peer_id)
            .await
            .map_err(map_repository_error)?;

        // Reflect the flip in the returned payload.
        for message in &mut thread {
            if message.recipient_id == viewer.id {
                message.read = true;
            }
        }
        Ok(thread)
    }

    /// Unread incoming messages across all conversations.
    pub async fn unread_count(&self, viewer: &User) -> Result<u64, Error> {
        self.messages
            .unread_count(viewer.id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "message_service_tests.rs"]
mod tests;
