//! Admin panel HTTP handlers.
//!
//! ```text
//! GET    /api/admin/stats
//! GET    /api/admin/users
//! GET    /api/admin/posts
//! POST   /api/admin/users/{id}/ban
//! POST   /api/admin/users/{id}/role
//! DELETE /api/admin/users/{id}
//! ```
//!
//! Every operation re-checks the caller's admin bit inside
//! [`crate::domain::AdminService`], so a stale token for a demoted account
//! cannot slip through.

use actix_web::{HttpResponse, delete, get, post, web};
use uuid::Uuid;

use crate::domain::{AdminStats, AdminUserView, Error, Post};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Site-wide counters for the dashboard.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Counters", body = AdminStats),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/api/admin/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<AdminStats>> {
    Ok(web::Json(state.admin.stats(&identity.0).await?))
}

/// Every account, admin view.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = [AdminUserView]),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/api/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<AdminUserView>>> {
    Ok(web::Json(state.admin.list_users(&identity.0).await?))
}

/// Every post across both partitions.
#[utoipa::path(
    get,
    path = "/api/admin/posts",
    responses(
        (status = 200, description = "All posts", body = [Post]),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["admin"],
    operation_id = "adminListPosts"
)]
#[get("/api/admin/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<Post>>> {
    Ok(web::Json(state.admin.list_posts(&identity.0).await?))
}

/// Toggle a user's ban flag.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/ban",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Updated user", body = AdminUserView),
        (status = 400, description = "Admins cannot target themselves", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["admin"],
    operation_id = "adminToggleBan"
)]
#[post("/api/admin/users/{id}/ban")]
pub async fn toggle_ban(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<AdminUserView>> {
    Ok(web::Json(state.admin.toggle_ban(&identity.0, *id).await?))
}

/// Toggle a user's admin bit.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Updated user", body = AdminUserView),
        (status = 400, description = "Admins cannot target themselves", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["admin"],
    operation_id = "adminToggleRole"
)]
#[post("/api/admin/users/{id}/role")]
pub async fn toggle_role(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<AdminUserView>> {
    Ok(web::Json(state.admin.toggle_role(&identity.0, *id).await?))
}

/// Delete a user and cascade to everything they own.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 204, description = "User and owned data removed"),
        (status = 400, description = "Admins cannot target themselves", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/api/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.admin.delete_user(&identity.0, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}
