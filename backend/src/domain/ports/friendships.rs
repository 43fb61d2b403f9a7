//! Port for friendship persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::friendship::{Friendship, FriendshipStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by friendship repository adapters.
    pub enum FriendshipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "friendship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "friendship repository query failed: {message}",
    }
}

/// Port for the friendship collection.
///
/// `find_between` matches the pair in either direction and any status; the
/// service layer relies on this to treat declined rows as tombstones.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    async fn insert(&self, friendship: &Friendship) -> Result<(), FriendshipRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Friendship>, FriendshipRepositoryError>;

    async fn find_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError>;

    /// Every row where the user is requester or recipient.
    async fn list_involving(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Friendship>, FriendshipRepositoryError>;

    async fn set_status(
        &self,
        id: Uuid,
        status: FriendshipStatus,
    ) -> Result<bool, FriendshipRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, FriendshipRepositoryError>;

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, FriendshipRepositoryError>;
}
