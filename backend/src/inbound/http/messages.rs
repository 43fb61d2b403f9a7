//! Direct-message HTTP handlers.
//!
//! ```text
//! POST /api/messages
//! GET  /api/messages/conversations
//! GET  /api/messages/unread-count
//! GET  /api/messages/{userId}
//! ```
//!
//! The literal routes must be registered before the `{userId}` thread route
//! or actix would try to parse them as user ids.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ConversationSummary, Error, Message};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Payload for sending a message.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: Option<Uuid>,
    pub content: Option<String>,
}

/// Unread counter for the inbox badge.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Send a direct message, subject to the recipient's DM gate.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Sent message", body = Message),
        (status = 400, description = "Empty content or self-send", body = Error),
        (status = 403, description = "Recipient has disabled direct messages", body = Error),
        (status = 404, description = "Unknown recipient", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/api/messages")]
pub async fn send(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<web::Json<Message>> {
    let payload = payload.into_inner();
    let recipient_id = payload
        .recipient_id
        .ok_or_else(|| Error::invalid_request("Recipient is required"))?;
    let content = payload
        .content
        .ok_or_else(|| Error::invalid_request("Message cannot be empty"))?;
    Ok(web::Json(
        state
            .messages
            .send(&identity.0, recipient_id, &content)
            .await?,
    ))
}

/// One summary per conversation partner, most recent first.
#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    responses(
        (status = 200, description = "Conversation summaries", body = [ConversationSummary])
    ),
    security(("bearer" = [])),
    tags = ["messages"],
    operation_id = "listConversations"
)]
#[get("/api/messages/conversations")]
pub async fn conversations(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<ConversationSummary>>> {
    Ok(web::Json(state.messages.conversations(&identity.0).await?))
}

/// Count of unread incoming messages.
#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    responses((status = 200, description = "Unread count", body = UnreadCountResponse)),
    security(("bearer" = [])),
    tags = ["messages"],
    operation_id = "unreadCount"
)]
#[get("/api/messages/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<UnreadCountResponse>> {
    let count = state.messages.unread_count(&identity.0).await?;
    Ok(web::Json(UnreadCountResponse { count }))
}

/// The full two-party thread, oldest first. Fetching marks the peer's
/// messages to the caller as read; the polling client depends on that flip.
#[utoipa::path(
    get,
    path = "/api/messages/{userId}",
    params(("userId" = Uuid, Path, description = "Conversation partner")),
    responses(
        (status = 200, description = "Thread with the user", body = [Message]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["messages"],
    operation_id = "getThread"
)]
#[get("/api/messages/{userId}")]
pub async fn thread(
    state: web::Data<HttpState>,
    identity: Identity,
    peer_id: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Message>>> {
    Ok(web::Json(state.messages.thread(&identity.0, *peer_id).await?))
}
