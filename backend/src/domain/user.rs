//! User aggregate and account-level settings.
//!
//! A [`User`] owns its credential hash, moderation flags, bookmark set,
//! notification and direct-message preferences, and the karma counter
//! snapshot written back by profile aggregation. Rank is never stored; it is
//! derived from karma at read time (see [`crate::domain::karma`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    UsernameLength { min: usize, max: usize },
    UsernameInvalidCharacters,
    PasswordTooShort { min: usize },
}

impl std::fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameLength { min, max } => {
                write!(f, "Username must be {min}-{max} characters")
            }
            Self::UsernameInvalidCharacters => {
                write!(f, "Username may only contain letters, numbers, and underscores")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 6;

/// Validate a registration username.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(UserValidationError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX,
        });
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(UserValidationError::UsernameInvalidCharacters);
    }
    Ok(())
}

/// Validate a registration password.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    Ok(())
}

/// Per-kind notification delivery toggles. All kinds default to enabled.
///
/// Friend-request and friend-accepted notifications have no toggle and are
/// always delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub likes: bool,
    pub comments: bool,
    pub replies: bool,
    pub messages: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            likes: true,
            comments: true,
            replies: true,
            messages: true,
        }
    }
}

/// Direct-message acceptance policy.
///
/// `allow_dms` permits messages from anyone; when it is off,
/// `allow_dms_from_friends` narrows acceptance to accepted friendships.
/// Both off means nobody can message this user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DmSettings {
    pub allow_dms: bool,
    pub allow_dms_from_friends: bool,
}

impl Default for DmSettings {
    fn default() -> Self {
        Self {
            allow_dms: true,
            allow_dms_from_friends: true,
        }
    }
}

/// Karma counters accumulated from a user's authored posts.
///
/// The snapshot is refreshed as a side effect of profile reads; the stored
/// values are a cache, never an input to further computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KarmaSnapshot {
    pub post_likes: u64,
    pub comment_likes: u64,
    pub reply_likes: u64,
    pub comments_created: u64,
    pub replies_created: u64,
}

impl KarmaSnapshot {
    /// Total karma: likes received across posts, comments, and replies.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.post_likes + self.comment_likes + self.reply_likes
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub karma: KarmaSnapshot,
    /// Post ids the user has bookmarked. Treated as a set.
    pub bookmarks: Vec<Uuid>,
    pub notification_settings: NotificationSettings,
    pub dm_settings: DmSettings,
    /// Opaque desktop-icon layout blob round-tripped for the client.
    pub icon_positions: Value,
    pub created_at: DateTime<Utc>,
}

/// Minimal public view of an account, embedded in friend and conversation
/// listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl User {
    /// Create a fresh account with default settings and no privileges.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            is_banned: false,
            karma: KarmaSnapshot::default(),
            bookmarks: Vec::new(),
            notification_settings: NotificationSettings::default(),
            dm_settings: DmSettings::default(),
            icon_positions: Value::Null,
            created_at: Utc::now(),
        }
    }

    /// Whether `post_id` is in the bookmark set.
    #[must_use]
    pub fn has_bookmarked(&self, post_id: Uuid) -> bool {
        self.bookmarks.contains(&post_id)
    }
}
