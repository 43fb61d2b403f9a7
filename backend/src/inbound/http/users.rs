//! Profile and per-user settings HTTP handlers.
//!
//! ```text
//! GET  /api/users/{username}
//! GET  /api/user/dm-settings
//! PUT  /api/user/dm-settings
//! GET  /api/user/icon-positions
//! POST /api/user/icon-positions
//! ```
//!
//! The profile fetch recomputes karma from the user's authored posts and
//! writes the snapshot back as a side effect; rank is derived, never stored.

use actix_web::{HttpResponse, get, post, put, web};
use serde_json::Value;

use crate::domain::{DmSettings, Error, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Public profile with freshly aggregated karma and derived rank.
#[utoipa::path(
    get,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/api/users/{username}")]
pub async fn profile(
    state: web::Data<HttpState>,
    _identity: Identity,
    username: web::Path<String>,
) -> ApiResult<web::Json<Profile>> {
    Ok(web::Json(state.profiles.profile(&username).await?))
}

/// The caller's DM acceptance settings.
#[utoipa::path(
    get,
    path = "/api/user/dm-settings",
    responses((status = 200, description = "Current settings", body = DmSettings)),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "getDmSettings"
)]
#[get("/api/user/dm-settings")]
pub async fn get_dm_settings(identity: Identity) -> ApiResult<web::Json<DmSettings>> {
    Ok(web::Json(identity.0.dm_settings))
}

/// Replace the caller's DM acceptance settings.
#[utoipa::path(
    put,
    path = "/api/user/dm-settings",
    request_body = DmSettings,
    responses((status = 200, description = "Stored settings", body = DmSettings)),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "updateDmSettings"
)]
#[put("/api/user/dm-settings")]
pub async fn update_dm_settings(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<DmSettings>,
) -> ApiResult<web::Json<DmSettings>> {
    Ok(web::Json(
        state
            .profiles
            .update_dm_settings(identity.0.id, payload.into_inner())
            .await?,
    ))
}

/// The caller's stored desktop icon layout, opaque to the server.
#[utoipa::path(
    get,
    path = "/api/user/icon-positions",
    responses((status = 200, description = "Stored layout blob")),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "getIconPositions"
)]
#[get("/api/user/icon-positions")]
pub async fn get_icon_positions(identity: Identity) -> ApiResult<web::Json<Value>> {
    Ok(web::Json(identity.0.icon_positions))
}

/// Store the caller's desktop icon layout.
#[utoipa::path(
    post,
    path = "/api/user/icon-positions",
    responses((status = 200, description = "Layout stored")),
    security(("bearer" = [])),
    tags = ["users"],
    operation_id = "updateIconPositions"
)]
#[post("/api/user/icon-positions")]
pub async fn update_icon_positions(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    state
        .profiles
        .update_icon_positions(identity.0.id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().finish())
}
