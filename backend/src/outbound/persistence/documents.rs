//! BSON document models for the MongoDB collections.
//!
//! Documents store ids as UUID strings under `_id` and timestamps as BSON
//! datetimes. Conversion back into domain types is fallible: a document with
//! an unparseable id or an unknown enum string is reported as corrupt rather
//! than silently skipped, except for post categories which fall back to
//! `general` like the domain parser.

use bson::Bson;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::friendship::{Friendship, FriendshipStatus};
use crate::domain::message::Message;
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::post::{Attachment, Comment, Post, PostCategory, Reply};
use crate::domain::text_file::TextFile;
use crate::domain::user::{DmSettings, KarmaSnapshot, NotificationSettings, User};

/// A stored document that cannot be mapped back into the domain.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid id in stored document: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("unknown {field} value in stored document: {value}")]
    UnknownVariant { field: &'static str, value: String },
    #[error("unstorable value: {0}")]
    Unstorable(#[from] bson::ser::Error),
}

fn parse_id(value: &str) -> Result<Uuid, DocumentError> {
    Ok(Uuid::parse_str(value)?)
}

fn parse_optional_id(value: Option<&str>) -> Result<Option<Uuid>, DocumentError> {
    value.map(parse_id).transpose()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettingsDocument {
    pub likes: bool,
    pub comments: bool,
    pub replies: bool,
    pub messages: bool,
}

impl From<&NotificationSettings> for NotificationSettingsDocument {
    fn from(settings: &NotificationSettings) -> Self {
        Self {
            likes: settings.likes,
            comments: settings.comments,
            replies: settings.replies,
            messages: settings.messages,
        }
    }
}

impl From<NotificationSettingsDocument> for NotificationSettings {
    fn from(doc: NotificationSettingsDocument) -> Self {
        Self {
            likes: doc.likes,
            comments: doc.comments,
            replies: doc.replies,
            messages: doc.messages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmSettingsDocument {
    pub allow_dms: bool,
    pub allow_dms_from_friends: bool,
}

impl From<&DmSettings> for DmSettingsDocument {
    fn from(settings: &DmSettings) -> Self {
        Self {
            allow_dms: settings.allow_dms,
            allow_dms_from_friends: settings.allow_dms_from_friends,
        }
    }
}

impl From<DmSettingsDocument> for DmSettings {
    fn from(doc: DmSettingsDocument) -> Self {
        Self {
            allow_dms: doc.allow_dms,
            allow_dms_from_friends: doc.allow_dms_from_friends,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KarmaSnapshotDocument {
    pub post_likes: i64,
    pub comment_likes: i64,
    pub reply_likes: i64,
    pub comments_created: i64,
    pub replies_created: i64,
}

impl From<&KarmaSnapshot> for KarmaSnapshotDocument {
    fn from(karma: &KarmaSnapshot) -> Self {
        Self {
            post_likes: karma.post_likes as i64,
            comment_likes: karma.comment_likes as i64,
            reply_likes: karma.reply_likes as i64,
            comments_created: karma.comments_created as i64,
            replies_created: karma.replies_created as i64,
        }
    }
}

impl From<KarmaSnapshotDocument> for KarmaSnapshot {
    fn from(doc: KarmaSnapshotDocument) -> Self {
        Self {
            post_likes: doc.post_likes.max(0) as u64,
            comment_likes: doc.comment_likes.max(0) as u64,
            reply_likes: doc.reply_likes.max(0) as u64,
            comments_created: doc.comments_created.max(0) as u64,
            replies_created: doc.replies_created.max(0) as u64,
        }
    }
}

/// Stored user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub karma: KarmaSnapshotDocument,
    pub bookmarks: Vec<String>,
    pub notification_settings: NotificationSettingsDocument,
    pub dm_settings: DmSettingsDocument,
    pub icon_positions: Bson,
    pub created_at: bson::DateTime,
}

impl UserDocument {
    pub fn from_domain(user: &User) -> Result<Self, DocumentError> {
        Ok(Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            is_admin: user.is_admin,
            is_banned: user.is_banned,
            karma: (&user.karma).into(),
            bookmarks: user.bookmarks.iter().map(Uuid::to_string).collect(),
            notification_settings: (&user.notification_settings).into(),
            dm_settings: (&user.dm_settings).into(),
            icon_positions: bson::to_bson(&user.icon_positions)?,
            created_at: bson::DateTime::from_chrono(user.created_at),
        })
    }

    pub fn into_domain(self) -> Result<User, DocumentError> {
        let bookmarks = self
            .bookmarks
            .iter()
            .map(|id| parse_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(User {
            id: parse_id(&self.id)?,
            username: self.username,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            is_banned: self.is_banned,
            karma: self.karma.into(),
            bookmarks,
            notification_settings: self.notification_settings.into(),
            dm_settings: self.dm_settings.into(),
            icon_positions: serde_json::to_value(&self.icon_positions).unwrap_or(Value::Null),
            created_at: self.created_at.to_chrono(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentDocument {
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: i64,
    pub is_image: bool,
}

impl From<&Attachment> for AttachmentDocument {
    fn from(attachment: &Attachment) -> Self {
        Self {
            filename: attachment.filename.clone(),
            original_name: attachment.original_name.clone(),
            mimetype: attachment.mimetype.clone(),
            size: attachment.size as i64,
            is_image: attachment.is_image,
        }
    }
}

impl From<AttachmentDocument> for Attachment {
    fn from(doc: AttachmentDocument) -> Self {
        Self {
            filename: doc.filename,
            original_name: doc.original_name,
            mimetype: doc.mimetype,
            size: doc.size.max(0) as u64,
            is_image: doc.is_image,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub author_id: String,
    pub author_username: String,
    pub content: String,
    pub likes: Vec<String>,
    pub created_at: bson::DateTime,
}

impl ReplyDocument {
    pub fn from_domain(reply: &Reply) -> Self {
        Self {
            id: reply.id.to_string(),
            author_id: reply.author_id.to_string(),
            author_username: reply.author_username.clone(),
            content: reply.content.clone(),
            likes: reply.likes.iter().map(Uuid::to_string).collect(),
            created_at: bson::DateTime::from_chrono(reply.created_at),
        }
    }

    pub fn into_domain(self) -> Result<Reply, DocumentError> {
        Ok(Reply {
            id: parse_id(&self.id)?,
            author_id: parse_id(&self.author_id)?,
            author_username: self.author_username,
            content: self.content,
            likes: self
                .likes
                .iter()
                .map(|id| parse_id(id))
                .collect::<Result<Vec<_>, _>>()?,
            created_at: self.created_at.to_chrono(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub author_id: String,
    pub author_username: String,
    pub content: String,
    pub likes: Vec<String>,
    pub replies: Vec<ReplyDocument>,
    pub created_at: bson::DateTime,
}

impl CommentDocument {
    pub fn from_domain(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            author_id: comment.author_id.to_string(),
            author_username: comment.author_username.clone(),
            content: comment.content.clone(),
            likes: comment.likes.iter().map(Uuid::to_string).collect(),
            replies: comment.replies.iter().map(ReplyDocument::from_domain).collect(),
            created_at: bson::DateTime::from_chrono(comment.created_at),
        }
    }

    pub fn into_domain(self) -> Result<Comment, DocumentError> {
        Ok(Comment {
            id: parse_id(&self.id)?,
            author_id: parse_id(&self.author_id)?,
            author_username: self.author_username,
            content: self.content,
            likes: self
                .likes
                .iter()
                .map(|id| parse_id(id))
                .collect::<Result<Vec<_>, _>>()?,
            replies: self
                .replies
                .into_iter()
                .map(ReplyDocument::into_domain)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: self.created_at.to_chrono(),
        })
    }
}

/// Stored post with embedded comments, replies, and attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_username: String,
    pub tags: Vec<String>,
    pub category: String,
    pub attachments: Vec<AttachmentDocument>,
    pub is_community: bool,
    pub pinned: bool,
    pub likes: Vec<String>,
    pub comments: Vec<CommentDocument>,
    pub created_at: bson::DateTime,
}

impl PostDocument {
    pub fn from_domain(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id.to_string(),
            author_username: post.author_username.clone(),
            tags: post.tags.clone(),
            category: post.category.as_str().to_owned(),
            attachments: post.attachments.iter().map(Into::into).collect(),
            is_community: post.is_community,
            pinned: post.pinned,
            likes: post.likes.iter().map(Uuid::to_string).collect(),
            comments: post.comments.iter().map(CommentDocument::from_domain).collect(),
            created_at: bson::DateTime::from_chrono(post.created_at),
        }
    }

    pub fn into_domain(self) -> Result<Post, DocumentError> {
        Ok(Post {
            id: parse_id(&self.id)?,
            title: self.title,
            content: self.content,
            author_id: parse_id(&self.author_id)?,
            author_username: self.author_username,
            tags: self.tags,
            category: PostCategory::parse_or_default(&self.category),
            attachments: self.attachments.into_iter().map(Into::into).collect(),
            is_community: self.is_community,
            pinned: self.pinned,
            likes: self
                .likes
                .iter()
                .map(|id| parse_id(id))
                .collect::<Result<Vec<_>, _>>()?,
            comments: self
                .comments
                .into_iter()
                .map(CommentDocument::into_domain)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: self.created_at.to_chrono(),
        })
    }
}

/// Stored direct message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: String,
    pub sender_username: String,
    pub recipient_id: String,
    pub content: String,
    pub read: bool,
    pub created_at: bson::DateTime,
}

impl MessageDocument {
    pub fn from_domain(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            sender_id: message.sender_id.to_string(),
            sender_username: message.sender_username.clone(),
            recipient_id: message.recipient_id.to_string(),
            content: message.content.clone(),
            read: message.read,
            created_at: bson::DateTime::from_chrono(message.created_at),
        }
    }

    pub fn into_domain(self) -> Result<Message, DocumentError> {
        Ok(Message {
            id: parse_id(&self.id)?,
            sender_id: parse_id(&self.sender_id)?,
            sender_username: self.sender_username,
            recipient_id: parse_id(&self.recipient_id)?,
            content: self.content,
            read: self.read,
            created_at: self.created_at.to_chrono(),
        })
    }
}

/// Stored friendship row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendshipDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub requester_id: String,
    pub recipient_id: String,
    pub status: String,
    pub created_at: bson::DateTime,
}

impl FriendshipDocument {
    pub fn from_domain(friendship: &Friendship) -> Self {
        Self {
            id: friendship.id.to_string(),
            requester_id: friendship.requester_id.to_string(),
            recipient_id: friendship.recipient_id.to_string(),
            status: friendship.status.as_str().to_owned(),
            created_at: bson::DateTime::from_chrono(friendship.created_at),
        }
    }

    pub fn into_domain(self) -> Result<Friendship, DocumentError> {
        let status = FriendshipStatus::parse(&self.status).ok_or_else(|| {
            DocumentError::UnknownVariant {
                field: "status",
                value: self.status.clone(),
            }
        })?;
        Ok(Friendship {
            id: parse_id(&self.id)?,
            requester_id: parse_id(&self.requester_id)?,
            recipient_id: parse_id(&self.recipient_id)?,
            status,
            created_at: self.created_at.to_chrono(),
        })
    }
}

/// Stored notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub recipient_id: String,
    pub sender_id: Option<String>,
    pub sender_username: Option<String>,
    pub kind: String,
    pub message: String,
    pub post_id: Option<String>,
    pub read: bool,
    pub created_at: bson::DateTime,
}

impl NotificationDocument {
    pub fn from_domain(notification: &Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            recipient_id: notification.recipient_id.to_string(),
            sender_id: notification.sender_id.map(|id| id.to_string()),
            sender_username: notification.sender_username.clone(),
            kind: notification.kind.as_str().to_owned(),
            message: notification.message.clone(),
            post_id: notification.post_id.map(|id| id.to_string()),
            read: notification.read,
            created_at: bson::DateTime::from_chrono(notification.created_at),
        }
    }

    pub fn into_domain(self) -> Result<Notification, DocumentError> {
        let kind = NotificationKind::parse(&self.kind).ok_or_else(|| {
            DocumentError::UnknownVariant {
                field: "kind",
                value: self.kind.clone(),
            }
        })?;
        Ok(Notification {
            id: parse_id(&self.id)?,
            recipient_id: parse_id(&self.recipient_id)?,
            sender_id: parse_optional_id(self.sender_id.as_deref())?,
            sender_username: self.sender_username,
            kind,
            message: self.message,
            post_id: parse_optional_id(self.post_id.as_deref())?,
            read: self.read,
            created_at: self.created_at.to_chrono(),
        })
    }
}

/// Stored text document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextFileDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub content: String,
    pub size: i64,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl TextFileDocument {
    pub fn from_domain(file: &TextFile) -> Self {
        Self {
            id: file.id.to_string(),
            owner_id: file.owner_id.to_string(),
            name: file.name.clone(),
            content: file.content.clone(),
            size: file.size as i64,
            created_at: bson::DateTime::from_chrono(file.created_at),
            updated_at: bson::DateTime::from_chrono(file.updated_at),
        }
    }

    pub fn into_domain(self) -> Result<TextFile, DocumentError> {
        Ok(TextFile {
            id: parse_id(&self.id)?,
            owner_id: parse_id(&self.owner_id)?,
            name: self.name,
            content: self.content,
            size: self.size.max(0) as u64,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.to_chrono(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationDraft;
    use crate::domain::post::NewPost;

    #[test]
    fn user_document_round_trips() {
        let mut user = User::new("alice", "argon2-hash");
        user.bookmarks.push(Uuid::new_v4());
        user.icon_positions = serde_json::json!({ "notes.txt": { "x": 12, "y": 40 } });

        let restored = UserDocument::from_domain(&user)
            .expect("to document")
            .into_domain()
            .expect("to domain");
        assert_eq!(restored.id, user.id);
        assert_eq!(restored.bookmarks, user.bookmarks);
        assert_eq!(restored.icon_positions, user.icon_positions);
    }

    #[test]
    fn post_document_round_trips_the_comment_tree() {
        let author = User::new("alice", "hash");
        let mut post = Post::create(
            NewPost {
                title: "Hello".into(),
                content: "first".into(),
                tags: vec!["intro".into()],
                category: PostCategory::Creative,
                attachments: Vec::new(),
            },
            &author,
        );
        let mut comment = Comment::new(author.id, "alice", "self-reply");
        comment.replies.push(Reply::new(author.id, "alice", "again"));
        post.comments.push(comment);
        post.likes.push(Uuid::new_v4());

        let restored = PostDocument::from_domain(&post)
            .into_domain()
            .expect("round trip");
        assert_eq!(restored.category, PostCategory::Creative);
        assert_eq!(restored.comments.len(), 1);
        assert_eq!(restored.comments[0].replies.len(), 1);
        assert_eq!(restored.likes, post.likes);
    }

    #[test]
    fn unknown_category_falls_back_to_general() {
        let author = User::new("alice", "hash");
        let post = Post::create(
            NewPost {
                title: "t".into(),
                content: "c".into(),
                tags: Vec::new(),
                category: PostCategory::General,
                attachments: Vec::new(),
            },
            &author,
        );
        let mut doc = PostDocument::from_domain(&post);
        doc.category = "wobble".into();
        let restored = doc.into_domain().expect("category downgrade is soft");
        assert_eq!(restored.category, PostCategory::General);
    }

    #[test]
    fn unknown_friendship_status_is_corrupt() {
        let friendship = Friendship::request(Uuid::new_v4(), Uuid::new_v4());
        let mut doc = FriendshipDocument::from_domain(&friendship);
        doc.status = "frenemies".into();
        assert!(matches!(
            doc.into_domain(),
            Err(DocumentError::UnknownVariant { field: "status", .. })
        ));
    }

    #[test]
    fn notification_document_keeps_optional_fields() {
        let row = NotificationDraft {
            recipient_id: Uuid::new_v4(),
            sender_id: None,
            sender_username: None,
            kind: NotificationKind::FriendRequest,
            message: "welcome".into(),
            post_id: None,
        }
        .into_notification();

        let restored = NotificationDocument::from_domain(&row)
            .into_domain()
            .expect("round trip");
        assert_eq!(restored.sender_id, None);
        assert_eq!(restored.post_id, None);
        assert_eq!(restored.kind, NotificationKind::FriendRequest);
    }

    #[test]
    fn malformed_id_is_reported() {
        let file = TextFile::new(Uuid::new_v4(), "a.txt", "b");
        let mut doc = TextFileDocument::from_domain(&file);
        doc.owner_id = "not-a-uuid".into();
        assert!(matches!(
            doc.into_domain(),
            Err(DocumentError::InvalidId(_))
        ));
    }
}
