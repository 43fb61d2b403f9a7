//! Upload and download HTTP handlers.
//!
//! ```text
//! POST /api/upload            multipart, single field `file`
//! GET  /api/download/{name}   forced attachment download
//! ```
//!
//! The multipart reader streams at most one file and stops accumulating the
//! moment the payload passes the size cap, so an oversized body never sits
//! in memory. Everything the gate needs (name, declared MIME, bytes) is
//! collected here; the scan pipeline itself lives in the domain.

use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use futures_util::TryStreamExt;
use mime::Mime;
use tracing::debug;

use crate::domain::{Attachment, Error, UploadService};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

struct ReceivedFile {
    original_name: String,
    declared_mime: String,
    bytes: Vec<u8>,
}

fn map_multipart_error(error: actix_multipart::MultipartError) -> Error {
    debug!(%error, "multipart payload rejected");
    Error::invalid_request("Invalid upload payload")
}

async fn receive_single_file(mut payload: Multipart) -> Result<ReceivedFile, Error> {
    let mut received: Option<ReceivedFile> = None;

    while let Some(mut field) = payload.try_next().await.map_err(map_multipart_error)? {
        if field.name() != "file" {
            continue;
        }
        if received.is_some() {
            return Err(Error::invalid_request(
                "Only one file can be uploaded at a time",
            ));
        }

        let original_name = field
            .content_disposition()
            .get_filename()
            .map(str::to_owned)
            .ok_or_else(|| Error::invalid_request("No file uploaded"))?;
        let declared_mime = field
            .content_type()
            .map_or_else(|| "application/octet-stream".to_owned(), Mime::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(map_multipart_error)? {
            if bytes.len() + chunk.len() > UploadService::max_bytes() {
                return Err(Error::invalid_request("File too large (max 2MB)"));
            }
            bytes.extend_from_slice(&chunk);
        }

        received = Some(ReceivedFile {
            original_name,
            declared_mime,
            bytes,
        });
    }

    received.ok_or_else(|| Error::invalid_request("No file uploaded"))
}

/// Accept a single image upload through the security gate.
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Stored attachment metadata", body = Attachment),
        (status = 400, description = "Rejected by the upload gate", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    security(("bearer" = [])),
    tags = ["uploads"],
    operation_id = "uploadFile"
)]
#[post("/api/upload")]
pub async fn upload(
    state: web::Data<HttpState>,
    _identity: Identity,
    payload: Multipart,
) -> ApiResult<web::Json<Attachment>> {
    let file = receive_single_file(payload).await?;
    let attachment = state
        .uploads
        .store_image(&file.original_name, &file.declared_mime, &file.bytes)
        .await?;
    Ok(web::Json(attachment))
}

/// Stream a stored artifact as a forced download.
#[utoipa::path(
    get,
    path = "/api/download/{filename}",
    params(("filename" = String, Path, description = "Stored token filename")),
    responses(
        (status = 200, description = "File bytes"),
        (status = 404, description = "Unknown file", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "downloadFile"
)]
#[get("/api/download/{filename}")]
pub async fn download(
    state: web::Data<HttpState>,
    filename: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let stored = state.uploads.open(&filename).await?;
    Ok(HttpResponse::Ok()
        .content_type(stored.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(stored.filename)],
        })
        .body(stored.bytes))
}
