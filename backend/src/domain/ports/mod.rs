//! Domain ports for the hexagonal boundary.
//!
//! Repositories are driven ports implemented by the persistence adapters;
//! [`Notifier`] and [`UploadStore`] are the remaining seams content services
//! depend on. All ports gain `mockall` mocks under test.

mod macros;
pub(crate) use macros::define_port_error;

mod friendships;
mod messages;
mod notifications;
mod posts;
mod text_files;
mod uploads;
mod users;

#[cfg(test)]
pub use friendships::MockFriendshipRepository;
pub use friendships::{FriendshipRepository, FriendshipRepositoryError};
#[cfg(test)]
pub use messages::MockMessageRepository;
pub use messages::{MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use notifications::{MockNotificationRepository, MockNotifier};
pub use notifications::{NotificationRepository, NotificationRepositoryError, Notifier};
#[cfg(test)]
pub use posts::MockPostRepository;
pub use posts::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use text_files::MockTextFileRepository;
pub use text_files::{TextFileRepository, TextFileRepositoryError};
#[cfg(test)]
pub use uploads::MockUploadStore;
pub use uploads::{UploadStore, UploadStoreError};
#[cfg(test)]
pub use users::MockUserRepository;
pub use users::{UserRepository, UserRepositoryError};
