//! Notification inbox HTTP handlers.
//!
//! ```text
//! GET    /api/notifications
//! PUT    /api/notifications/{id}/read
//! DELETE /api/notifications
//! GET    /api/notifications/settings
//! PUT    /api/notifications/settings
//! ```

use actix_web::{HttpResponse, delete, get, put, web};
use uuid::Uuid;

use crate::domain::{Error, Notification, NotificationSettings};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// The caller's newest notifications, capped at the inbox limit.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Newest notifications", body = [Notification])),
    security(("bearer" = [])),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/api/notifications")]
pub async fn list(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<Notification>>> {
    Ok(web::Json(state.notifications.list(identity.0.id).await?))
}

/// Mark one notification read.
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Not the caller's notification", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/api/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.notifications.mark_read(*id, identity.0.id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Clear the caller's inbox.
#[utoipa::path(
    delete,
    path = "/api/notifications",
    responses((status = 200, description = "Inbox cleared")),
    security(("bearer" = [])),
    tags = ["notifications"],
    operation_id = "clearNotifications"
)]
#[delete("/api/notifications")]
pub async fn clear(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    state.notifications.clear(identity.0.id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// The caller's notification toggles.
#[utoipa::path(
    get,
    path = "/api/notifications/settings",
    responses((status = 200, description = "Current settings", body = NotificationSettings)),
    security(("bearer" = [])),
    tags = ["notifications"],
    operation_id = "getNotificationSettings"
)]
#[get("/api/notifications/settings")]
pub async fn get_settings(identity: Identity) -> ApiResult<web::Json<NotificationSettings>> {
    Ok(web::Json(identity.0.notification_settings))
}

/// Replace the caller's notification toggles.
#[utoipa::path(
    put,
    path = "/api/notifications/settings",
    request_body = NotificationSettings,
    responses((status = 200, description = "Stored settings", body = NotificationSettings)),
    security(("bearer" = [])),
    tags = ["notifications"],
    operation_id = "updateNotificationSettings"
)]
#[put("/api/notifications/settings")]
pub async fn update_settings(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<NotificationSettings>,
) -> ApiResult<web::Json<NotificationSettings>> {
    Ok(web::Json(
        state
            .notifications
            .update_settings(identity.0.id, payload.into_inner())
            .await?,
    ))
}
