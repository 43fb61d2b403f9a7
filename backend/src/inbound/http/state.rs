//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on the domain services. The notifier is injected into the content
//! services when the bundle is built (see `server::build_http_state`), never
//! reached through shared global state.

use crate::domain::{
    AdminService, AuthService, FriendshipService, MessageService, NotificationService,
    PostService, ProfileService, TextFileService, UploadService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub posts: PostService,
    pub messages: MessageService,
    pub friendships: FriendshipService,
    pub notifications: NotificationService,
    pub profiles: ProfileService,
    pub text_files: TextFileService,
    pub uploads: UploadService,
    pub admin: AdminService,
}
