//! Board operations: posts, comments, replies, likes, bookmarks, pinning.
//!
//! Like and bookmark toggles are not read-modify-write: the service reads
//! once to pick a direction, then issues a set-based mutation whose modified
//! flag decides whether a notification is emitted or retracted. Two racing
//! toggles therefore converge instead of resurrecting each other's state.

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::notification::{NotificationDraft, NotificationKind};
use crate::domain::ports::{
    Notifier, PostRepository, PostRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::post::{Comment, NewPost, Post, Reply};
use crate::domain::user::User;

fn map_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post store unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post store error: {message}"))
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

/// Outcome of a bookmark toggle, reported back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkState {
    pub bookmarked: bool,
}

/// Board service over the post collection.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            posts,
            users,
            notifier,
        }
    }

    /// One board partition: official or community.
    pub async fn list_partition(&self, community: bool) -> Result<Vec<Post>, Error> {
        self.posts
            .list_partition(community)
            .await
            .map_err(map_repository_error)
    }

    pub async fn get(&self, id: Uuid) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Post not found"))
    }

    /// Create a post for `author`. The partition follows the author's admin
    /// bit and cannot be chosen by the client.
    #[instrument(skip_all, fields(author = %author.id))]
    pub async fn create(&self, author: &User, mut input: NewPost) -> Result<Post, Error> {
        input.title = input.title.trim().to_owned();
        input.content = input.content.trim().to_owned();
        if input.title.is_empty() {
            return Err(Error::invalid_request("Title is required"));
        }
        if input.content.is_empty() {
            return Err(Error::invalid_request("Content is required"));
        }

        let post = Post::create(input, author);
        self.posts.insert(&post).await.map_err(map_repository_error)?;
        Ok(post)
    }

    /// Delete a post. Allowed for its author and for admins.
    pub async fn delete(&self, id: Uuid, actor: &User) -> Result<(), Error> {
        let post = self.get(id).await?;
        if post.author_id != actor.id && !actor.is_admin {
            return Err(Error::forbidden("You can only delete your own posts"));
        }
        self.posts.delete(id).await.map_err(map_repository_error)?;
        Ok(())
    }

    /// Toggle the actor's like on a post and return the refreshed post.
    #[instrument(skip_all, fields(post = %post_id, actor = %actor.id))]
    pub async fn toggle_like(&self, post_id: Uuid, actor: &User) -> Result<Post, Error> {
        let post = self.get(post_id).await?;

        if post.liked_by(actor.id) {
            let removed = self
                .posts
                .remove_post_like(post_id, actor.id)
                .await
                .map_err(map_repository_error)?;
            if removed {
                self.notifier
                    .retract(post.author_id, actor.id, NotificationKind::Like, Some(post_id))
                    .await;
            }
        } else {
            let added = self
                .posts
                .add_post_like(post_id, actor.id)
                .await
                .map_err(map_repository_error)?;
            if added {
                self.notifier
                    .notify(NotificationDraft {
                        recipient_id: post.author_id,
                        sender_id: Some(actor.id),
                        sender_username: Some(actor.username.clone()),
                        kind: NotificationKind::Like,
                        message: format!("{} liked your post", actor.username),
                        post_id: Some(post_id),
                    })
                    .await;
            }
        }

        self.get(post_id).await
    }

    /// Append a comment and notify the post author.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        actor: &User,
        content: &str,
    ) -> Result<Comment, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::invalid_request("Content is required"));
        }

        let post = self.get(post_id).await?;
        let comment = Comment::new(actor.id, actor.username.clone(), content);
        let matched = self
            .posts
            .push_comment(post_id, &comment)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(Error::not_found("Post not found"));
        }

        self.notifier
            .notify(NotificationDraft {
                recipient_id: post.author_id,
                sender_id: Some(actor.id),
                sender_username: Some(actor.username.clone()),
                kind: NotificationKind::Comment,
                message: format!("{} commented on your post", actor.username),
                post_id: Some(post_id),
            })
            .await;
        Ok(comment)
    }

    /// Toggle the actor's like on a comment and return the refreshed post.
    pub async fn toggle_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor: &User,
    ) -> Result<Post, Error> {
        let post = self.get(post_id).await?;
        let comment = post
            .comment(comment_id)
            .ok_or_else(|| Error::not_found("Comment not found"))?;

        if comment.likes.contains(&actor.id) {
            let removed = self
                .posts
                .remove_comment_like(post_id, comment_id, actor.id)
                .await
                .map_err(map_repository_error)?;
            if removed {
                self.notifier
                    .retract(
                        comment.author_id,
                        actor.id,
                        NotificationKind::Like,
                        Some(post_id),
                    )
                    .await;
            }
        } else {
            let added = self
                .posts
                .add_comment_like(post_id, comment_id, actor.id)
                .await
                .map_err(map_repository_error)?;
            if added {
                self.notifier
                    .notify(NotificationDraft {
                        recipient_id: comment.author_id,
                        sender_id: Some(actor.id),
                        sender_username: Some(actor.username.clone()),
                        kind: NotificationKind::Like,
                        message: format!("{} liked your comment", actor.username),
                        post_id: Some(post_id),
                    })
                    .await;
            }
        }

        self.get(post_id).await
    }

    /// Append a reply under a comment and notify the comment author.
    pub async fn add_reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor: &User,
        content: &str,
    ) -> Result<Reply, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::invalid_request("Content is required"));
        }

        let post = self.get(post_id).await?;
        let comment = post
            .comment(comment_id)
            .ok_or_else(|| Error::not_found("Comment not found"))?;

        let reply = Reply::new(actor.id, actor.username.clone(), content);
        let matched = self
            .posts
            .push_reply(post_id, comment_id, &reply)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(Error::not_found("Comment not found"));
        }

        self.notifier
            .notify(NotificationDraft {
                recipient_id: comment.author_id,
                sender_id: Some(actor.id),
                sender_username: Some(actor.username.clone()),
                kind: NotificationKind::Reply,
                message: format!("{} replied to your comment", actor.username),
                post_id: Some(post_id),
            })
            .await;
        Ok(reply)
    }

    /// Toggle the actor's like on a reply and return the refreshed post.
    pub async fn toggle_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        actor: &User,
    ) -> Result<Post, Error> {
        let post = self.get(post_id).await?;
        let reply = post
            .comment(comment_id)
            .ok_or_else(|| Error::not_found("Comment not found"))?
            .reply(reply_id)
            .ok_or_else(|| Error::not_found("Reply not found"))?;

        if reply.likes.contains(&actor.id) {
            let removed = self
                .posts
                .remove_reply_like(post_id, comment_id, reply_id, actor.id)
                .await
                .map_err(map_repository_error)?;
            if removed {
                self.notifier
                    .retract(
                        reply.author_id,
                        actor.id,
                        NotificationKind::Like,
                        Some(post_id),
                    )
                    .await;
            }
        } else {
            let added = self
                .posts
                .add_reply_like(post_id, comment_id, reply_id, actor.id)
                .await
                .map_err(map_repository_error)?;
            if added {
                self.notifier
                    .notify(NotificationDraft {
                        recipient_id: reply.author_id,
                        sender_id: Some(actor.id),
                        sender_username: Some(actor.username.clone()),
                        kind: NotificationKind::Like,
                        message: format!("{} liked your reply", actor.username),
                        post_id: Some(post_id),
                    })
                    .await;
            }
        }

        self.get(post_id).await
    }

    /// Toggle `post_id` in the actor's bookmark set. Never notifies.
    pub async fn toggle_bookmark(
        &self,
        post_id: Uuid,
        actor: &User,
    ) -> Result<BookmarkState, Error> {
        // 404 for bookmarks of posts that never existed.
        self.get(post_id).await?;

        if actor.has_bookmarked(post_id) {
            self.users
                .remove_bookmark(actor.id, post_id)
                .await
                .map_err(map_user_error)?;
            Ok(BookmarkState { bookmarked: false })
        } else {
            self.users
                .add_bookmark(actor.id, post_id)
                .await
                .map_err(map_user_error)?;
            Ok(BookmarkState { bookmarked: true })
        }
    }

    /// The actor's bookmarked posts. Ids whose posts were deleted are
    /// silently dropped.
    pub async fn bookmarks(&self, actor: &User) -> Result<Vec<Post>, Error> {
        if actor.bookmarks.is_empty() {
            return Ok(Vec::new());
        }
        self.posts
            .list_by_ids(&actor.bookmarks)
            .await
            .map_err(map_repository_error)
    }

    /// Toggle a post's pin, keeping at most one pinned post per partition.
    pub async fn toggle_pin(&self, post_id: Uuid, actor: &User) -> Result<Post, Error> {
        if !actor.is_admin {
            return Err(Error::forbidden("Admin access required"));
        }
        let post = self.get(post_id).await?;

        if post.pinned {
            self.posts
                .set_pinned(post_id, false)
                .await
                .map_err(map_repository_error)?;
        } else {
            self.posts
                .unpin_partition(post.is_community)
                .await
                .map_err(map_repository_error)?;
            self.posts
                .set_pinned(post_id, true)
                .await
                .map_err(map_repository_error)?;
        }

        self.get(post_id).await
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
