//! MongoDB persistence adapters.
//!
//! One repository per collection, each translating between domain types and
//! the BSON document models in [`documents`]. Ids are stored as UUID
//! strings under `_id`; connection-level driver failures map to the ports'
//! `Connection` variants so services can report the store as unavailable.

pub mod documents;
pub mod mongo;
mod mongo_error_mapping;
mod mongo_friendship_repository;
mod mongo_message_repository;
mod mongo_notification_repository;
mod mongo_post_repository;
mod mongo_text_file_repository;
mod mongo_user_repository;

pub use mongo_friendship_repository::MongoFriendshipRepository;
pub use mongo_message_repository::MongoMessageRepository;
pub use mongo_notification_repository::MongoNotificationRepository;
pub use mongo_post_repository::MongoPostRepository;
pub use mongo_text_file_repository::MongoTextFileRepository;
pub use mongo_user_repository::MongoUserRepository;
