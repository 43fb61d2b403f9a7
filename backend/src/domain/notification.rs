//! Notification rows and the preference gate applied before fan-out.
//!
//! Each kind maps to at most one toggle in the recipient's
//! [`NotificationSettings`](crate::domain::NotificationSettings). Friendship
//! kinds have no toggle and are always delivered. Self-notification is
//! suppressed before the preference check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::NotificationSettings;

/// Notification categories carried on stored rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Comment,
    Reply,
    Message,
    FriendRequest,
    FriendAccepted,
}

impl NotificationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::Message => "message",
            Self::FriendRequest => "friend_request",
            Self::FriendAccepted => "friend_accepted",
        }
    }

    /// Parse a stored kind string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "reply" => Some(Self::Reply),
            "message" => Some(Self::Message),
            "friend_request" => Some(Self::FriendRequest),
            "friend_accepted" => Some(Self::FriendAccepted),
            _ => None,
        }
    }

    /// Whether the recipient's settings permit delivery of this kind.
    ///
    /// Friendship kinds return `true` unconditionally.
    #[must_use]
    pub fn permitted_by(&self, settings: &NotificationSettings) -> bool {
        match self {
            Self::Like => settings.likes,
            Self::Comment => settings.comments,
            Self::Reply => settings.replies,
            Self::Message => settings.messages,
            Self::FriendRequest | Self::FriendAccepted => true,
        }
    }
}

/// A stored notification row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    /// The acting user, absent for system-generated rows.
    pub sender_id: Option<Uuid>,
    pub sender_username: Option<String>,
    pub kind: NotificationKind,
    /// Precomposed display text, e.g. `alice liked your post`.
    pub message: String,
    /// Post the notification points at, when applicable.
    pub post_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to emit a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub sender_username: Option<String>,
    pub kind: NotificationKind,
    pub message: String,
    pub post_id: Option<Uuid>,
}

impl NotificationDraft {
    /// Materialise the draft into an unread row.
    #[must_use]
    pub fn into_notification(self) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id: self.recipient_id,
            sender_id: self.sender_id,
            sender_username: self.sender_username,
            kind: self.kind,
            message: self.message,
            post_id: self.post_id,
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn settings(likes: bool, comments: bool, replies: bool, messages: bool) -> NotificationSettings {
        NotificationSettings {
            likes,
            comments,
            replies,
            messages,
        }
    }

    #[rstest]
    #[case(NotificationKind::Like, settings(false, true, true, true))]
    #[case(NotificationKind::Comment, settings(true, false, true, true))]
    #[case(NotificationKind::Reply, settings(true, true, false, true))]
    #[case(NotificationKind::Message, settings(true, true, true, false))]
    fn disabled_toggle_blocks_kind(
        #[case] kind: NotificationKind,
        #[case] settings: NotificationSettings,
    ) {
        assert!(!kind.permitted_by(&settings));
    }

    #[rstest]
    #[case(NotificationKind::FriendRequest)]
    #[case(NotificationKind::FriendAccepted)]
    fn friendship_kinds_ignore_toggles(#[case] kind: NotificationKind) {
        assert!(kind.permitted_by(&settings(false, false, false, false)));
    }

    #[test]
    fn draft_materialises_unread() {
        let draft = NotificationDraft {
            recipient_id: Uuid::new_v4(),
            sender_id: Some(Uuid::new_v4()),
            sender_username: Some("alice".into()),
            kind: NotificationKind::Like,
            message: "alice liked your post".into(),
            post_id: Some(Uuid::new_v4()),
        };
        let row = draft.clone().into_notification();
        assert!(!row.read);
        assert_eq!(row.kind, draft.kind);
        assert_eq!(row.message, draft.message);
    }

    #[rstest]
    #[case("like", Some(NotificationKind::Like))]
    #[case("friend_request", Some(NotificationKind::FriendRequest))]
    #[case("poke", None)]
    fn kind_parses_stored_strings(#[case] raw: &str, #[case] expected: Option<NotificationKind>) {
        assert_eq!(NotificationKind::parse(raw), expected);
    }
}
