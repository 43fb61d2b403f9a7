//! Post aggregate with embedded comments, replies, and attachments.
//!
//! Comments and replies live inside their post document and share its
//! lifecycle. Like lists are sets of user ids; adapters must toggle them with
//! set semantics so concurrent toggles converge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Closed set of board categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    #[default]
    General,
    Announcements,
    Support,
    Creative,
    Random,
}

impl PostCategory {
    /// Stable string form used in stored documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Announcements => "announcements",
            Self::Support => "support",
            Self::Creative => "creative",
            Self::Random => "random",
        }
    }

    /// Parse a stored category string, falling back to [`Self::General`]
    /// for unknown values.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "announcements" => Self::Announcements,
            "support" => Self::Support,
            "creative" => Self::Creative,
            "random" => Self::Random,
            _ => Self::General,
        }
    }
}

/// Descriptor for an uploaded file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Randomised stored filename, e.g. `9f8e…c2.png`.
    pub filename: String,
    /// Name the file had on the uploader's machine.
    pub original_name: String,
    pub mimetype: String,
    pub size: u64,
    pub is_image: bool,
}

/// Second-level response nested under a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    #[must_use]
    pub fn new(author_id: Uuid, author_username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            author_username: author_username.into(),
            content: content.into(),
            likes: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// First-level response embedded in a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    #[must_use]
    pub fn new(author_id: Uuid, author_username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            author_username: author_username.into(),
            content: content.into(),
            likes: Vec::new(),
            replies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Find a reply by id.
    #[must_use]
    pub fn reply(&self, reply_id: Uuid) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == reply_id)
    }
}

/// A board post.
///
/// `is_community` partitions the board: posts by admins land in the official
/// partition, everyone else's in the community partition. The flag is fixed
/// at creation. At most one post per partition is pinned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub tags: Vec<String>,
    pub category: PostCategory,
    pub attachments: Vec<Attachment>,
    pub is_community: bool,
    pub pinned: bool,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

/// Inputs for creating a post; validation happens in the service.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub category: PostCategory,
    pub attachments: Vec<Attachment>,
}

impl Post {
    /// Create a post for `author`. The partition is derived from the
    /// author's admin bit.
    #[must_use]
    pub fn create(new: NewPost, author: &super::User) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            author_id: author.id,
            author_username: author.username.clone(),
            tags: new.tags,
            category: new.category,
            attachments: new.attachments,
            is_community: !author.is_admin,
            pinned: false,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether `user_id` is in the like set.
    #[must_use]
    pub fn liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    /// Find a comment by id.
    #[must_use]
    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}
