//! Admin panel: site stats, user management, and account deletion.
//!
//! Every operation checks the acting user's admin bit first. Account
//! deletion runs a full cascade so nothing in the database still points at
//! the removed user afterwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{
    FriendshipRepository, FriendshipRepositoryError, MessageRepository, MessageRepositoryError,
    NotificationRepository, NotificationRepositoryError, PostRepository, PostRepositoryError,
    TextFileRepository, TextFileRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::post::Post;
use crate::domain::user::User;

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        _ => Error::internal(error.to_string()),
    }
}

fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post store unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post store error: {message}"))
        }
    }
}

fn map_message_error(error: MessageRepositoryError) -> Error {
    match error {
        MessageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("message store unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            Error::internal(format!("message store error: {message}"))
        }
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

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
    }
}

fn map_text_file_error(error: TextFileRepositoryError) -> Error {
    match error {
        TextFileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("file store unavailable: {message}"))
        }
        TextFileRepositoryError::Query { message } => {
            Error::internal(format!("file store error: {message}"))
        }
    }
}

/// Site-wide counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
    pub messages: u64,
}

/// User row as shown in the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub karma: u64,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for AdminUserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            is_banned: user.is_banned,
            karma: user.karma.total(),
            created_at: user.created_at,
        }
    }
}

/// Administrative operations over the whole site.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    messages: Arc<dyn MessageRepository>,
    friendships: Arc<dyn FriendshipRepository>,
    notifications: Arc<dyn NotificationRepository>,
    text_files: Arc<dyn TextFileRepository>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        messages: Arc<dyn MessageRepository>,
        friendships: Arc<dyn FriendshipRepository>,
        notifications: Arc<dyn NotificationRepository>,
        text_files: Arc<dyn TextFileRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            messages,
            friendships,
            notifications,
            text_files,
        }
    }

    fn require_admin(actor: &User) -> Result<(), Error> {
        if actor.is_admin {
            Ok(())
        } else {
            Err(Error::forbidden("Admin access required"))
        }
    }

    async fn target(&self, user_id: Uuid) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    pub async fn stats(&self, actor: &User) -> Result<AdminStats, Error> {
        Self::require_admin(actor)?;
        let users = self.users.count().await.map_err(map_user_error)?;
        let posts = self.posts.count().await.map_err(map_post_error)?;
        let comments = self.posts.count_comments().await.map_err(map_post_error)?;
        let messages = self.messages.count().await.map_err(map_message_error)?;
        Ok(AdminStats {
            users,
            posts,
            comments,
            messages,
        })
    }

    pub async fn list_users(&self, actor: &User) -> Result<Vec<AdminUserView>, Error> {
        Self::require_admin(actor)?;
        let users = self.users.list().await.map_err(map_user_error)?;
        Ok(users.iter().map(AdminUserView::from).collect())
    }

    pub async fn list_posts(&self, actor: &User) -> Result<Vec<Post>, Error> {
        Self::require_admin(actor)?;
        self.posts.list_all().await.map_err(map_post_error)
    }

    /// Flip the ban flag on another account.
    pub async fn toggle_ban(&self, actor: &User, user_id: Uuid) -> Result<AdminUserView, Error> {
        Self::require_admin(actor)?;
        if actor.id == user_id {
            return Err(Error::invalid_request("You cannot ban yourself"));
        }
        let mut target = self.target(user_id).await?;
        target.is_banned = !target.is_banned;
        let matched = self
            .users
            .set_banned(user_id, target.is_banned)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("User not found"));
        }
        info!(user = %user_id, banned = target.is_banned, "ban flag toggled");
        Ok(AdminUserView::from(&target))
    }

    /// Flip the admin flag on another account.
    pub async fn toggle_role(&self, actor: &User, user_id: Uuid) -> Result<AdminUserView, Error> {
        Self::require_admin(actor)?;
        if actor.id == user_id {
            return Err(Error::invalid_request("You cannot change your own role"));
        }
        let mut target = self.target(user_id).await?;
        target.is_admin = !target.is_admin;
        let matched = self
            .users
            .set_admin(user_id, target.is_admin)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("User not found"));
        }
        info!(user = %user_id, admin = target.is_admin, "admin flag toggled");
        Ok(AdminUserView::from(&target))
    }

    /// Delete an account and everything that references it.
    ///
    /// Order matters only in that the user document goes last, so a
    /// half-finished cascade can be retried. The steps: authored posts, then
    /// the user's comments/replies/likes/bookmarks embedded in surviving
    /// posts, then messages, friendships, notifications, and text files
    /// touching the user.
    #[instrument(skip_all, fields(actor = %actor.id, user = %user_id))]
    pub async fn delete_user(&self, actor: &User, user_id: Uuid) -> Result<(), Error> {
        Self::require_admin(actor)?;
        if actor.id == user_id {
            return Err(Error::invalid_request("You cannot delete your own account"));
        }
        let target = self.target(user_id).await?;

        let posts_removed = self
            .posts
            .delete_by_author(user_id)
            .await
            .map_err(map_post_error)?;
        let posts_scrubbed = self
            .posts
            .remove_user_references(user_id)
            .await
            .map_err(map_post_error)?;
        let messages_removed = self
            .messages
            .delete_involving(user_id)
            .await
            .map_err(map_message_error)?;
        let friendships_removed = self
            .friendships
            .delete_involving(user_id)
            .await
            .map_err(map_friendship_error)?;
        let notifications_removed = self
            .notifications
            .delete_involving(user_id)
            .await
            .map_err(map_notification_error)?;
        let files_removed = self
            .text_files
            .delete_by_owner(user_id)
            .await
            .map_err(map_text_file_error)?;

        let matched = self.users.delete(user_id).await.map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("User not found"));
        }
        info!(
            username = %target.username,
            posts_removed,
            posts_scrubbed,
            messages_removed,
            friendships_removed,
            notifications_removed,
            files_removed,
            "account deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
