//! Notepad text-document HTTP handlers.
//!
//! ```text
//! GET    /api/files
//! POST   /api/files
//! PUT    /api/files/{id}
//! DELETE /api/files/{id}
//! ```
//!
//! Documents are strictly owner-scoped: another user's file reads as 404,
//! never 403, so ids cannot be probed.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, TextFile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Payload for creating or updating a document.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextFileRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
}

fn parts(payload: TextFileRequest) -> Result<(String, String), Error> {
    let name = payload
        .name
        .ok_or_else(|| Error::invalid_request("Name is required"))?;
    Ok((name, payload.content))
}

/// The caller's documents, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/files",
    responses((status = 200, description = "Owned documents", body = [TextFile])),
    security(("bearer" = [])),
    tags = ["files"],
    operation_id = "listFiles"
)]
#[get("/api/files")]
pub async fn list(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<Vec<TextFile>>> {
    Ok(web::Json(state.text_files.list(identity.0.id).await?))
}

/// Create a document.
#[utoipa::path(
    post,
    path = "/api/files",
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Created document", body = TextFile),
        (status = 400, description = "Missing name", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["files"],
    operation_id = "createFile"
)]
#[post("/api/files")]
pub async fn create(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<TextFileRequest>,
) -> ApiResult<web::Json<TextFile>> {
    let (name, content) = parts(payload.into_inner())?;
    Ok(web::Json(
        state.text_files.create(identity.0.id, &name, &content).await?,
    ))
}

/// Replace a document's name and content.
#[utoipa::path(
    put,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    request_body = TextFileRequest,
    responses(
        (status = 200, description = "Updated document", body = TextFile),
        (status = 404, description = "Not the caller's document", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["files"],
    operation_id = "updateFile"
)]
#[put("/api/files/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
    payload: web::Json<TextFileRequest>,
) -> ApiResult<web::Json<TextFile>> {
    let (name, content) = parts(payload.into_inner())?;
    Ok(web::Json(
        state
            .text_files
            .update(identity.0.id, *id, &name, &content)
            .await?,
    ))
}

/// Delete a document.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not the caller's document", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["files"],
    operation_id = "deleteFile"
)]
#[delete("/api/files/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.text_files.delete(identity.0.id, *id).await?;
    Ok(HttpResponse::Ok().finish())
}
