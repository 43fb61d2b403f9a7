//! Friendship rows and their three-state lifecycle.
//!
//! `pending` transitions once, to `accepted` or `declined`; both are
//! terminal. Declined rows are tombstones: they persist and block any new
//! request between the same pair. Accepted rows can be hard-deleted by
//! either party ("remove friend"), after which a fresh request is possible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a friendship row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
}

impl FriendshipStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Parse a stored status string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// A directed friendship row from requester to recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// Create a pending request from `requester_id` to `recipient_id`.
    #[must_use]
    pub fn request(requester_id: Uuid, recipient_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester_id,
            recipient_id,
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Whether the row involves `user_id` on either side.
    #[must_use]
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.requester_id == user_id || self.recipient_id == user_id
    }

    /// Whether the row links `a` and `b`, in either direction.
    #[must_use]
    pub fn links(&self, a: Uuid, b: Uuid) -> bool {
        (self.requester_id == a && self.recipient_id == b)
            || (self.requester_id == b && self.recipient_id == a)
    }

    /// The other party from `user_id`'s perspective.
    #[must_use]
    pub fn peer_of(&self, user_id: Uuid) -> Uuid {
        if self.requester_id == user_id {
            self.recipient_id
        } else {
            self.requester_id
        }
    }
}
