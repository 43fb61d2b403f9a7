//! OpenAPI document for the REST surface.
//!
//! Registers every HTTP path plus the schemas their bodies reference, and a
//! bearer-token security scheme matching the `Authorization` header the
//! identity extractor reads. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AdminStats, AdminUserView, Attachment, Comment, ConversationSummary, DmSettings, Error,
    ErrorCode, FriendRequestView, FriendView, Friendship, FriendshipStatus, KarmaSnapshot,
    Message, Notification, NotificationKind, NotificationSettings, Post, PostCategory, Profile,
    Rank, Reply, TextFile, UserSummary,
};
use crate::inbound::http::auth::{CredentialsRequest, CurrentUserView, SessionResponse};
use crate::inbound::http::files::TextFileRequest;
use crate::inbound::http::friends::FriendRequestBody;
use crate::inbound::http::messages::{SendMessageRequest, UnreadCountResponse};
use crate::inbound::http::posts::{BookmarkResponse, ContentRequest, CreatePostRequest};

/// Adds the bearer scheme the session endpoints issue tokens for.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Token issued by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document covering the whole API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Deskboard forum API",
        description = "HTTP interface for the desktop-metaphor forum: boards, \
                       messaging, friendships, notifications, uploads, and the \
                       admin panel."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::me,
        crate::inbound::http::posts::list_official,
        crate::inbound::http::posts::list_community,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::toggle_comment_like,
        crate::inbound::http::posts::add_reply,
        crate::inbound::http::posts::toggle_reply_like,
        crate::inbound::http::posts::toggle_bookmark,
        crate::inbound::http::posts::list_bookmarks,
        crate::inbound::http::posts::toggle_pin,
        crate::inbound::http::uploads::upload,
        crate::inbound::http::uploads::download,
        crate::inbound::http::messages::send,
        crate::inbound::http::messages::conversations,
        crate::inbound::http::messages::unread_count,
        crate::inbound::http::messages::thread,
        crate::inbound::http::friends::request,
        crate::inbound::http::friends::accept,
        crate::inbound::http::friends::decline,
        crate::inbound::http::friends::remove,
        crate::inbound::http::friends::list,
        crate::inbound::http::friends::pending,
        crate::inbound::http::notifications::list,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::clear,
        crate::inbound::http::notifications::get_settings,
        crate::inbound::http::notifications::update_settings,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::get_dm_settings,
        crate::inbound::http::users::update_dm_settings,
        crate::inbound::http::users::get_icon_positions,
        crate::inbound::http::users::update_icon_positions,
        crate::inbound::http::files::list,
        crate::inbound::http::files::create,
        crate::inbound::http::files::update,
        crate::inbound::http::files::remove,
        crate::inbound::http::admin::stats,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::list_posts,
        crate::inbound::http::admin::toggle_ban,
        crate::inbound::http::admin::toggle_role,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Rank,
        KarmaSnapshot,
        NotificationSettings,
        DmSettings,
        UserSummary,
        Post,
        Comment,
        Reply,
        Attachment,
        PostCategory,
        Message,
        ConversationSummary,
        Friendship,
        FriendshipStatus,
        FriendView,
        FriendRequestView,
        Notification,
        NotificationKind,
        TextFile,
        Profile,
        AdminStats,
        AdminUserView,
        CredentialsRequest,
        CurrentUserView,
        SessionResponse,
        CreatePostRequest,
        ContentRequest,
        BookmarkResponse,
        SendMessageRequest,
        UnreadCountResponse,
        FriendRequestBody,
        TextFileRequest,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session identity"),
        (name = "posts", description = "Boards, comments, replies, likes, bookmarks, pins"),
        (name = "uploads", description = "Attachment upload gate and downloads"),
        (name = "messages", description = "Direct messaging"),
        (name = "friends", description = "Friendship requests and management"),
        (name = "notifications", description = "Inbox and preference toggles"),
        (name = "users", description = "Profiles and per-user settings"),
        (name = "files", description = "Notepad documents"),
        (name = "admin", description = "Admin panel"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_area_has_paths_registered() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for prefix in [
            "/api/auth/",
            "/api/posts",
            "/api/upload",
            "/api/messages",
            "/api/friends",
            "/api/notifications",
            "/api/users/",
            "/api/files",
            "/api/admin/",
            "/health/",
        ] {
            assert!(
                paths.iter().any(|p| p.starts_with(prefix)),
                "no path registered under {prefix}"
            );
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
