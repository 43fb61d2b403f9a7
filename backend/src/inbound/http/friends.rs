//! Friendship HTTP handlers.
//!
//! ```text
//! POST   /api/friends/request
//! POST   /api/friends/accept/{id}
//! POST   /api/friends/decline/{id}
//! DELETE /api/friends/{id}
//! GET    /api/friends
//! GET    /api/friends/requests
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, FriendRequestView, FriendView, Friendship};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Payload for sending a friend request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub user_id: Option<Uuid>,
}

/// Send a friend request.
#[utoipa::path(
    post,
    path = "/api/friends/request",
    request_body = FriendRequestBody,
    responses(
        (status = 200, description = "Pending friendship", body = Friendship),
        (status = 400, description = "Self-request or an existing relation", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["friends"],
    operation_id = "requestFriendship"
)]
#[post("/api/friends/request")]
pub async fn request(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<FriendRequestBody>,
) -> ApiResult<web::Json<Friendship>> {
    let recipient_id = payload
        .into_inner()
        .user_id
        .ok_or_else(|| Error::invalid_request("User is required"))?;
    Ok(web::Json(
        state.friendships.request(&identity.0, recipient_id).await?,
    ))
}

/// Accept an incoming request.
#[utoipa::path(
    post,
    path = "/api/friends/accept/{id}",
    params(("id" = Uuid, Path, description = "Friendship id")),
    responses(
        (status = 200, description = "Accepted friendship", body = Friendship),
        (status = 403, description = "Not the recipient", body = Error),
        (status = 404, description = "Unknown friendship", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["friends"],
    operation_id = "acceptFriendship"
)]
#[post("/api/friends/accept/{id}")]
pub async fn accept(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Friendship>> {
    Ok(web::Json(state.friendships.accept(*id, &identity.0).await?))
}

/// Decline an incoming request. The row stays as a tombstone.
#[utoipa::path(
    post,
    path = "/api/friends/decline/{id}",
    params(("id" = Uuid, Path, description = "Friendship id")),
    responses(
        (status = 200, description = "Declined friendship", body = Friendship),
        (status = 403, description = "Not the recipient", body = Error),
        (status = 404, description = "Unknown friendship", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["friends"],
    operation_id = "declineFriendship"
)]
#[post("/api/friends/decline/{id}")]
pub async fn decline(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<Friendship>> {
    Ok(web::Json(state.friendships.decline(*id, &identity.0).await?))
}

/// Remove an accepted friendship (either party).
#[utoipa::path(
    delete,
    path = "/api/friends/{id}",
    params(("id" = Uuid, Path, description = "Friendship id")),
    responses(
        (status = 200, description = "Removed"),
        (status = 403, description = "Not a party to the friendship", body = Error),
        (status = 404, description = "Unknown friendship", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["friends"],
    operation_id = "removeFriendship"
)]
#[delete("/api/friends/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.friendships.remove(*id, &identity.0).await?;
    Ok(HttpResponse::Ok().finish())
}

/// The caller's accepted friends.
#[utoipa::path(
    get,
    path = "/api/friends",
    responses((status = 200, description = "Accepted friends", body = [FriendView])),
    security(("bearer" = [])),
    tags = ["friends"],
    operation_id = "listFriends"
)]
#[get("/api/friends")]
pub async fn list(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<FriendView>>> {
    Ok(web::Json(state.friendships.friends(&identity.0).await?))
}

/// Incoming pending requests.
#[utoipa::path(
    get,
    path = "/api/friends/requests",
    responses((status = 200, description = "Pending requests", body = [FriendRequestView])),
    security(("bearer" = [])),
    tags = ["friends"],
    operation_id = "listFriendRequests"
)]
#[get("/api/friends/requests")]
pub async fn pending(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<FriendRequestView>>> {
    Ok(web::Json(
        state.friendships.pending_requests(&identity.0).await?,
    ))
}
