//! Upload gatekeeper: validation pipeline in front of the blob store.
//!
//! Checks run cheapest-first and the first failure wins: extension and
//! declared MIME type, then size, then magic-byte signatures, then a
//! plain-text scan of the leading bytes. Only an upload that clears every
//! stage is written to the store, under a random hex name that discards
//! whatever the client called the file.

use std::sync::Arc;

use rand::RngCore;
use tracing::{info, instrument};

use crate::domain::Error;
use crate::domain::ports::{UploadStore, UploadStoreError};
use crate::domain::post::Attachment;
use crate::domain::upload::{
    self, UploadRejection, check_extension, check_size, is_safe_stored_name, scan_content,
    scan_signature, storage_name,
};

fn map_rejection(rejection: UploadRejection) -> Error {
    Error::invalid_request(rejection.to_string())
}

fn map_store_error(error: UploadStoreError) -> Error {
    match error {
        UploadStoreError::NotFound { .. } => Error::not_found("File not found"),
        UploadStoreError::Io { message } => {
            Error::internal(format!("upload store error: {message}"))
        }
    }
}

/// A stored file ready to stream back to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validates and stores uploads, and serves stored files back.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn UploadStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn UploadStore>) -> Self {
        Self { store }
    }

    /// Run the full gatekeeper pipeline and persist the upload.
    ///
    /// Returns the attachment metadata for embedding in a post. The stored
    /// name is a fresh random token plus the original (lowercased)
    /// extension.
    #[instrument(skip_all, fields(original = %original_name, size = bytes.len()))]
    pub async fn store_image(
        &self,
        original_name: &str,
        declared_mime: &str,
        bytes: &[u8],
    ) -> Result<Attachment, Error> {
        check_extension(original_name, declared_mime).map_err(map_rejection)?;
        check_size(bytes.len()).map_err(map_rejection)?;
        scan_signature(bytes).map_err(map_rejection)?;
        scan_content(bytes).map_err(map_rejection)?;

        let mut token = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut token);
        let filename = storage_name(original_name, &token);

        self.store
            .save(&filename, bytes)
            .await
            .map_err(map_store_error)?;
        info!(stored = %filename, "upload accepted");

        Ok(Attachment {
            filename,
            original_name: original_name.to_owned(),
            mimetype: declared_mime.to_owned(),
            size: bytes.len() as u64,
            is_image: declared_mime.starts_with("image/"),
        })
    }

    /// Load a stored file for download.
    ///
    /// Names that escape the upload directory read as missing rather than
    /// invalid, matching the repository behaviour for unknown names.
    pub async fn open(&self, filename: &str) -> Result<StoredFile, Error> {
        if !is_safe_stored_name(filename) {
            return Err(Error::not_found("File not found"));
        }
        let bytes = self
            .store
            .load(filename)
            .await
            .map_err(map_store_error)?;
        let content_type = mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string();
        Ok(StoredFile {
            filename: filename.to_owned(),
            content_type,
            bytes,
        })
    }

    /// Best-effort removal of stored attachments, used by deletion cascades.
    pub async fn remove(&self, filename: &str) -> Result<(), Error> {
        if !is_safe_stored_name(filename) {
            return Ok(());
        }
        self.store
            .remove(filename)
            .await
            .map_err(map_store_error)
    }

    /// Highest accepted payload size, exposed for inbound streaming caps.
    pub const fn max_bytes() -> usize {
        upload::MAX_UPLOAD_BYTES
    }
}

#[cfg(test)]
#[path = "upload_service_tests.rs"]
mod tests;
