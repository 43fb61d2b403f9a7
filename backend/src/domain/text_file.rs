//! Notepad-style text documents owned by a single user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A user-owned text document. Size is derived from the content bytes and
/// recomputed on every edit, never accepted from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextFile {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub content: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TextFile {
    #[must_use]
    pub fn new(owner_id: Uuid, name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            size: content.len() as u64,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace name and content, refreshing size and `updated_at`.
    pub fn edit(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.name = name.into();
        self.content = content.into();
        self.size = self.content.len() as u64;
        self.updated_at = Utc::now();
    }
}
