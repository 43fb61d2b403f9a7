//! In-memory adapters implementing the domain ports.
//!
//! These back the server when no MongoDB URL is configured, and the
//! integration tests. They hold state in `tokio::sync::RwLock`-guarded maps
//! and implement the same ordering and set-operation contracts as the
//! MongoDB adapters, so code exercised against them behaves identically in
//! production.

mod friendship_repository;
mod message_repository;
mod notification_repository;
mod post_repository;
mod text_file_repository;
mod user_repository;

pub use friendship_repository::MemoryFriendshipRepository;
pub use message_repository::MemoryMessageRepository;
pub use notification_repository::MemoryNotificationRepository;
pub use post_repository::MemoryPostRepository;
pub use text_file_repository::MemoryTextFileRepository;
pub use user_repository::MemoryUserRepository;
