//! Port for user account persistence.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::user::{DmSettings, KarmaSnapshot, NotificationSettings, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// Insert collided with an existing username.
        DuplicateUsername { username: String } =>
            "username already taken: {username}",
    }
}

/// Port for storing and retrieving user accounts.
///
/// Mutations that target a single account return whether a document matched,
/// so callers can distinguish "updated" from "no such user". Bookmark
/// mutations must use set semantics: `add_bookmark` reports `false` when the
/// post id was already present, `remove_bookmark` reports `false` when it was
/// already absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError>;

    /// All accounts, newest first. Admin surface only.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    async fn count(&self) -> Result<u64, UserRepositoryError>;

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool, UserRepositoryError>;

    async fn set_admin(&self, id: Uuid, admin: bool) -> Result<bool, UserRepositoryError>;

    async fn set_notification_settings(
        &self,
        id: Uuid,
        settings: &NotificationSettings,
    ) -> Result<bool, UserRepositoryError>;

    async fn set_dm_settings(
        &self,
        id: Uuid,
        settings: &DmSettings,
    ) -> Result<bool, UserRepositoryError>;

    async fn set_icon_positions(
        &self,
        id: Uuid,
        positions: &Value,
    ) -> Result<bool, UserRepositoryError>;

    /// Overwrite the stored karma snapshot. Best-effort cache refresh.
    async fn set_karma(
        &self,
        id: Uuid,
        karma: &KarmaSnapshot,
    ) -> Result<bool, UserRepositoryError>;

    /// Add `post_id` to the bookmark set; `false` when already present.
    async fn add_bookmark(&self, id: Uuid, post_id: Uuid) -> Result<bool, UserRepositoryError>;

    /// Remove `post_id` from the bookmark set; `false` when already absent.
    async fn remove_bookmark(&self, id: Uuid, post_id: Uuid) -> Result<bool, UserRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError>;
}
