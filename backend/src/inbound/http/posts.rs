//! Board HTTP handlers: posts, comments, replies, likes, bookmarks, pins.
//!
//! The two partition listings are public; everything else requires a bearer
//! token. Toggling endpoints return the refreshed post so the client can
//! redraw without a second fetch.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Attachment, Comment, Error, NewPost, Post, PostCategory, Reply};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Payload for creating a post. The partition is derived from the caller's
/// admin bit server-side and cannot be supplied here.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: PostCategory,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Payload for comments and replies.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub content: Option<String>,
}

/// Bookmark toggle outcome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub bookmarked: bool,
}

fn required(value: Option<String>, message: &str) -> Result<String, Error> {
    value.ok_or_else(|| Error::invalid_request(message))
}

/// Official board, pinned first.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, description = "Official posts", body = [Post])),
    tags = ["posts"],
    operation_id = "listOfficialPosts"
)]
#[get("/api/posts")]
pub async fn list_official(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.posts.list_partition(false).await?))
}

/// Community board, pinned first.
#[utoipa::path(
    get,
    path = "/api/posts/community",
    responses((status = 200, description = "Community posts", body = [Post])),
    tags = ["posts"],
    operation_id = "listCommunityPosts"
)]
#[get("/api/posts/community")]
pub async fn list_community(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.posts.list_partition(true).await?))
}

/// A single post with its full comment tree.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "The post", body = Post),
        (status = 404, description = "No such post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/api/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Post>> {
    Ok(web::Json(state.posts.get(*id).await?))
}

/// Create a post in the caller's partition.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Created post", body = Post),
        (status = 400, description = "Missing title or content", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/api/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<web::Json<Post>> {
    let payload = payload.into_inner();
    let input = NewPost {
        title: required(payload.title, "Title is required")?,
        content: required(payload.content, "Content is required")?,
        tags: payload.tags,
        category: payload.category,
        attachments: payload.attachments,
    };
    Ok(web::Json(state.posts.create(&identity.0, input).await?))
}

/// Delete a post (author or admin).
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/api/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.posts.delete(*id, &identity.0).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Toggle the caller's like on a post.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Refreshed post", body = Post),
        (status = 404, description = "No such post", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "togglePostLike"
)]
#[post("/api/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Post>> {
    Ok(web::Json(state.posts.toggle_like(*id, &identity.0).await?))
}

/// Append a comment.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Created comment", body = Comment),
        (status = 400, description = "Empty content", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/api/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<web::Json<Comment>> {
    let content = required(payload.into_inner().content, "Content is required")?;
    Ok(web::Json(
        state.posts.add_comment(*id, &identity.0, &content).await?,
    ))
}

/// Toggle the caller's like on a comment.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments/{cid}/like",
    params(
        ("id" = Uuid, Path, description = "Post id"),
        ("cid" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Refreshed post", body = Post),
        (status = 404, description = "No such post or comment", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "toggleCommentLike"
)]
#[post("/api/posts/{id}/comments/{cid}/like")]
pub async fn toggle_comment_like(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<web::Json<Post>> {
    let (post_id, comment_id) = path.into_inner();
    Ok(web::Json(
        state
            .posts
            .toggle_comment_like(post_id, comment_id, &identity.0)
            .await?,
    ))
}

/// Append a reply under a comment.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments/{cid}/reply",
    params(
        ("id" = Uuid, Path, description = "Post id"),
        ("cid" = Uuid, Path, description = "Comment id")
    ),
    request_body = ContentRequest,
    responses(
        (status = 200, description = "Created reply", body = Reply),
        (status = 400, description = "Empty content", body = Error),
        (status = 404, description = "No such post or comment", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "addReply"
)]
#[post("/api/posts/{id}/comments/{cid}/reply")]
pub async fn add_reply(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<web::Json<Reply>> {
    let (post_id, comment_id) = path.into_inner();
    let content = required(payload.into_inner().content, "Content is required")?;
    Ok(web::Json(
        state
            .posts
            .add_reply(post_id, comment_id, &identity.0, &content)
            .await?,
    ))
}

/// Toggle the caller's like on a reply.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments/{cid}/replies/{rid}/like",
    params(
        ("id" = Uuid, Path, description = "Post id"),
        ("cid" = Uuid, Path, description = "Comment id"),
        ("rid" = Uuid, Path, description = "Reply id")
    ),
    responses(
        (status = 200, description = "Refreshed post", body = Post),
        (status = 404, description = "No such post, comment, or reply", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "toggleReplyLike"
)]
#[post("/api/posts/{id}/comments/{cid}/replies/{rid}/like")]
pub async fn toggle_reply_like(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<web::Json<Post>> {
    let (post_id, comment_id, reply_id) = path.into_inner();
    Ok(web::Json(
        state
            .posts
            .toggle_reply_like(post_id, comment_id, reply_id, &identity.0)
            .await?,
    ))
}

/// Toggle the post in the caller's bookmark set.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/bookmark",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "New bookmark state", body = BookmarkResponse),
        (status = 404, description = "No such post", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "toggleBookmark"
)]
#[post("/api/posts/{id}/bookmark")]
pub async fn toggle_bookmark(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<BookmarkResponse>> {
    let outcome = state.posts.toggle_bookmark(*id, &identity.0).await?;
    Ok(web::Json(BookmarkResponse {
        bookmarked: outcome.bookmarked,
    }))
}

/// The caller's bookmarked posts; dangling bookmarks are skipped.
#[utoipa::path(
    get,
    path = "/api/bookmarks",
    responses((status = 200, description = "Bookmarked posts", body = [Post])),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "listBookmarks"
)]
#[get("/api/bookmarks")]
pub async fn list_bookmarks(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.posts.bookmarks(&identity.0).await?))
}

/// Toggle the pin on a post, unpinning any other post in its partition.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/pin",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Refreshed post", body = Post),
        (status = 403, description = "Admin access required", body = Error),
        (status = 404, description = "No such post", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["posts"],
    operation_id = "togglePin"
)]
#[post("/api/posts/{id}/pin")]
pub async fn toggle_pin(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Post>> {
    Ok(web::Json(state.posts.toggle_pin(*id, &identity.0).await?))
}
