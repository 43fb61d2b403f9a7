//! Port for direct-message persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::message::Message;

use super::define_port_error;

define_port_error! {
    /// Errors raised by message repository adapters.
    pub enum MessageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "message repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "message repository query failed: {message}",
    }
}

/// Port for the message collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError>;

    /// Both directions of the conversation between `a` and `b`, oldest first.
    async fn thread_between(&self, a: Uuid, b: Uuid)
        -> Result<Vec<Message>, MessageRepositoryError>;

    /// Flip unread messages from `sender` to `recipient` to read.
    /// Returns how many were flipped.
    async fn mark_read_from(
        &self,
        recipient: Uuid,
        sender: Uuid,
    ) -> Result<u64, MessageRepositoryError>;

    /// Every message the user sent or received, newest first.
    async fn list_involving(&self, user_id: Uuid) -> Result<Vec<Message>, MessageRepositoryError>;

    async fn unread_count(&self, recipient: Uuid) -> Result<u64, MessageRepositoryError>;

    async fn count(&self) -> Result<u64, MessageRepositoryError>;

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, MessageRepositoryError>;
}
