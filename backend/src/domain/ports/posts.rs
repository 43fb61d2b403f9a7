//! Port for post persistence, including embedded comments and replies.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::post::{Comment, Post, Reply};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "post repository query failed: {message}",
    }
}

/// Port for the post collection.
///
/// Like mutations are set operations on the stored document: `add_*_like`
/// returns `false` when the user already liked the target, `remove_*_like`
/// returns `false` when there was nothing to remove. This keeps concurrent
/// toggles convergent without a read-modify-write cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, PostRepositoryError>;

    /// One board partition, pinned posts first, then newest first.
    async fn list_partition(&self, community: bool) -> Result<Vec<Post>, PostRepositoryError>;

    /// Every post, newest first. Admin surface only.
    async fn list_all(&self) -> Result<Vec<Post>, PostRepositoryError>;

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, PostRepositoryError>;

    /// Posts whose ids appear in `ids`. Missing ids are silently skipped.
    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, PostRepositoryError>;

    async fn count(&self) -> Result<u64, PostRepositoryError>;

    /// Total number of comments across all posts (admin stats).
    async fn count_comments(&self) -> Result<u64, PostRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, PostRepositoryError>;

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, PostRepositoryError>;

    async fn add_post_like(&self, post_id: Uuid, user_id: Uuid)
        -> Result<bool, PostRepositoryError>;

    async fn remove_post_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError>;

    /// Append a comment; `false` when the post does not exist.
    async fn push_comment(
        &self,
        post_id: Uuid,
        comment: &Comment,
    ) -> Result<bool, PostRepositoryError>;

    async fn add_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError>;

    async fn remove_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError>;

    /// Append a reply; `false` when post or comment does not exist.
    async fn push_reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply: &Reply,
    ) -> Result<bool, PostRepositoryError>;

    async fn add_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError>;

    async fn remove_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError>;

    async fn set_pinned(&self, post_id: Uuid, pinned: bool) -> Result<bool, PostRepositoryError>;

    /// Unpin every post in a partition; returns how many were unpinned.
    async fn unpin_partition(&self, community: bool) -> Result<u64, PostRepositoryError>;

    /// Strip a deleted user from every post: their likes at all levels, and
    /// the comments and replies they authored. Returns modified post count.
    async fn remove_user_references(&self, user_id: Uuid) -> Result<u64, PostRepositoryError>;
}
