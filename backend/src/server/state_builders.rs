//! Adapter selection and service wiring.
//!
//! The repositories come in two flavours: MongoDB when a connection string is
//! configured, in-memory otherwise. Service construction is shared, so the
//! dev fallback and the integration tests exercise exactly the services
//! production runs.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::domain::ports::{
    FriendshipRepository, MessageRepository, NotificationRepository, Notifier, PostRepository,
    TextFileRepository, UploadStore, UserRepository,
};
use crate::domain::{
    AdminService, AuthService, FriendshipService, MessageService, NotificationService,
    PostService, ProfileService, TextFileService, TokenSigner, UploadService,
};
use crate::inbound::http::HttpState;
use crate::outbound::memory::{
    MemoryFriendshipRepository, MemoryMessageRepository, MemoryNotificationRepository,
    MemoryPostRepository, MemoryTextFileRepository, MemoryUserRepository,
};
use crate::outbound::persistence::{
    MongoFriendshipRepository, MongoMessageRepository, MongoNotificationRepository,
    MongoPostRepository, MongoTextFileRepository, MongoUserRepository, mongo,
};
use crate::outbound::storage::DiskUploadStore;

/// The full set of driven ports behind the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub friendships: Arc<dyn FriendshipRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub text_files: Arc<dyn TextFileRepository>,
}

impl Repositories {
    /// In-memory adapters: the no-database dev fallback and the test default.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            posts: Arc::new(MemoryPostRepository::new()),
            messages: Arc::new(MemoryMessageRepository::new()),
            friendships: Arc::new(MemoryFriendshipRepository::new()),
            notifications: Arc::new(MemoryNotificationRepository::new()),
            text_files: Arc::new(MemoryTextFileRepository::new()),
        }
    }
}

/// Pick repositories from the configuration: MongoDB when a URL is set,
/// in-memory otherwise.
pub async fn build_repositories(config: &Config) -> std::io::Result<Repositories> {
    match &config.mongodb_url {
        Some(url) => {
            let db = mongo::connect(url, &config.database)
                .await
                .map_err(|error| {
                    std::io::Error::other(format!("mongodb connection failed: {error}"))
                })?;
            Ok(Repositories {
                users: Arc::new(MongoUserRepository::new(&db)),
                posts: Arc::new(MongoPostRepository::new(&db)),
                messages: Arc::new(MongoMessageRepository::new(&db)),
                friendships: Arc::new(MongoFriendshipRepository::new(&db)),
                notifications: Arc::new(MongoNotificationRepository::new(&db)),
                text_files: Arc::new(MongoTextFileRepository::new(&db)),
            })
        }
        None => {
            info!("MONGODB_URL unset; using in-memory stores");
            Ok(Repositories::in_memory())
        }
    }
}

/// Wire the services over a set of repositories and an upload store.
///
/// The [`NotificationService`] doubles as the [`Notifier`] injected into the
/// content services, so preference gating and self-action suppression apply
/// to every emission path.
#[must_use]
pub fn build_http_state(
    repositories: &Repositories,
    upload_store: Arc<dyn UploadStore>,
    token_secret: &str,
    token_ttl_seconds: i64,
) -> HttpState {
    let Repositories {
        users,
        posts,
        messages,
        friendships,
        notifications,
        text_files,
    } = repositories.clone();

    let notification_service = NotificationService::new(notifications.clone(), users.clone());
    let notifier: Arc<dyn Notifier> = Arc::new(notification_service.clone());

    HttpState {
        auth: AuthService::new(
            users.clone(),
            TokenSigner::new(token_secret, token_ttl_seconds),
        ),
        posts: PostService::new(posts.clone(), users.clone(), notifier.clone()),
        messages: MessageService::new(
            messages.clone(),
            users.clone(),
            friendships.clone(),
            notifier.clone(),
        ),
        friendships: FriendshipService::new(friendships.clone(), users.clone(), notifier),
        notifications: notification_service,
        profiles: ProfileService::new(users.clone(), posts.clone()),
        text_files: TextFileService::new(text_files.clone()),
        uploads: UploadService::new(upload_store),
        admin: AdminService::new(
            users,
            posts,
            messages,
            friendships,
            notifications,
            text_files,
        ),
    }
}

/// Build the disk-backed upload store at the configured directory.
pub async fn build_upload_store(config: &Config) -> std::io::Result<Arc<dyn UploadStore>> {
    let store = DiskUploadStore::new(config.upload_dir.clone())
        .await
        .map_err(|error| std::io::Error::other(format!("upload dir unavailable: {error}")))?;
    Ok(Arc::new(store))
}
