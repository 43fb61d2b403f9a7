//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/auth/register
//! POST /api/auth/login
//! GET  /api/auth/me
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{DmSettings, Error, NotificationSettings, Rank, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Credentials payload shared by register and login.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// The caller's own account as returned by the auth endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserView {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub total_karma: u64,
    pub rank: Rank,
    pub bookmarks: Vec<Uuid>,
    pub notification_settings: NotificationSettings,
    pub dm_settings: DmSettings,
    pub icon_positions: Value,
    pub created_at: DateTime<Utc>,
}

impl From<User> for CurrentUserView {
    fn from(user: User) -> Self {
        let total = user.karma.total();
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            total_karma: total,
            rank: Rank::from_karma(total),
            bookmarks: user.bookmarks,
            notification_settings: user.notification_settings,
            dm_settings: user.dm_settings,
            icon_positions: user.icon_positions,
            created_at: user.created_at,
        }
    }
}

/// Token plus user view returned on register and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: CurrentUserView,
}

fn credentials(payload: CredentialsRequest) -> Result<(String, String), Error> {
    let username = payload
        .username
        .ok_or_else(|| Error::invalid_request("Username is required"))?;
    let password = payload
        .password
        .ok_or_else(|| Error::invalid_request("Password is required"))?;
    Ok((username, password))
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid username or password", body = Error),
        (status = 409, description = "Username already taken", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/api/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let (username, password) = credentials(payload.into_inner())?;
    let (user, token) = state.auth.register(&username, &password).await?;
    Ok(web::Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

/// Exchange credentials for a token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account is banned", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let (username, password) = credentials(payload.into_inner())?;
    let (user, token) = state.auth.login(&username, &password).await?;
    Ok(web::Json(SessionResponse {
        token,
        user: user.into(),
    }))
}

/// The caller's own account, freshly looked up.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserView),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/api/auth/me")]
pub async fn me(identity: Identity) -> ApiResult<web::Json<CurrentUserView>> {
    Ok(web::Json(identity.0.into()))
}
