//! Direct messages between two users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single direct message. Immutable once sent except for the read flip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_username: String,
    pub recipient_id: Uuid,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    #[must_use]
    pub fn new(
        sender_id: Uuid,
        sender_username: impl Into<String>,
        recipient_id: Uuid,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            sender_username: sender_username.into(),
            recipient_id,
            content: content.into(),
            read: false,
            created_at: Utc::now(),
        }
    }

    /// The other party of the message from `viewer`'s perspective.
    #[must_use]
    pub fn peer_of(&self, viewer: Uuid) -> Uuid {
        if self.sender_id == viewer {
            self.recipient_id
        } else {
            self.sender_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_starts_unread() {
        let sender = Uuid::new_v4();
        let recipient = Uuid::new_v4();
        let message = Message::new(sender, "alice", recipient, "hi");
        assert!(!message.read);
        assert_eq!(message.peer_of(sender), recipient);
        assert_eq!(message.peer_of(recipient), sender);
    }
}
