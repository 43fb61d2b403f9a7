//! Domain types, ports, and application services.
//!
//! Purpose: Define the forum's entities and the services that implement its
//! rules, independent of HTTP and MongoDB. Persistence and delivery sit
//! behind the traits in [`ports`]; services hold `Arc<dyn Port>` handles so
//! the HTTP layer and the tests can swap adapters freely.
//!
//! Public surface:
//! - Entities: `User`, `Post`, `Comment`, `Reply`, `Message`, `Friendship`,
//!   `Notification`, `TextFile` and their value types.
//! - Services: one per feature area (`AuthService`, `PostService`,
//!   `MessageService`, `FriendshipService`, `NotificationService`,
//!   `ProfileService`, `TextFileService`, `UploadService`, `AdminService`).
//! - `Error` / `ErrorCode` — API error payload and stable identifiers.
//! - `TraceId` — per-request correlation id.

pub mod error;
pub mod friendship;
pub mod karma;
pub mod message;
pub mod notification;
pub mod ports;
pub mod post;
pub mod text_file;
pub mod trace_id;
pub mod upload;
pub mod user;

mod admin_service;
mod auth_service;
mod friendship_service;
mod message_service;
mod notification_service;
mod post_service;
mod profile_service;
mod text_file_service;
mod upload_service;

pub use self::admin_service::{AdminService, AdminStats, AdminUserView};
pub use self::auth_service::{AuthService, TokenSigner};
pub use self::error::{Error, ErrorCode};
pub use self::friendship::{Friendship, FriendshipStatus};
pub use self::friendship_service::{FriendRequestView, FriendView, FriendshipService};
pub use self::karma::Rank;
pub use self::message::Message;
pub use self::message_service::{ConversationSummary, MessageService};
pub use self::notification::{Notification, NotificationDraft, NotificationKind};
pub use self::notification_service::NotificationService;
pub use self::post::{Attachment, Comment, NewPost, Post, PostCategory, Reply};
pub use self::post_service::{BookmarkState, PostService};
pub use self::profile_service::{Profile, ProfileService};
pub use self::text_file::TextFile;
pub use self::text_file_service::TextFileService;
pub use self::trace_id::TraceId;
pub use self::upload_service::{StoredFile, UploadService};
pub use self::user::{DmSettings, KarmaSnapshot, NotificationSettings, User, UserSummary};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
