//! Owner-scoped plain-text documents.
//!
//! Files are private to their owner: any access to another user's file is
//! reported as "File not found" rather than a permission error, so the
//! surface leaks no information about which ids exist.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{TextFileRepository, TextFileRepositoryError};
use crate::domain::text_file::TextFile;

fn map_repository_error(error: TextFileRepositoryError) -> Error {
    match error {
        TextFileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("file store unavailable: {message}"))
        }
        TextFileRepositoryError::Query { message } => {
            Error::internal(format!("file store error: {message}"))
        }
    }
}

/// CRUD over a user's text documents.
#[derive(Clone)]
pub struct TextFileService {
    files: Arc<dyn TextFileRepository>,
}

impl TextFileService {
    pub fn new(files: Arc<dyn TextFileRepository>) -> Self {
        Self { files }
    }

    async fn owned(&self, owner_id: Uuid, file_id: Uuid) -> Result<TextFile, Error> {
        let file = self
            .files
            .find_by_id(file_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("File not found"))?;
        if file.owner_id != owner_id {
            return Err(Error::not_found("File not found"));
        }
        Ok(file)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<TextFile>, Error> {
        self.files
            .list_by_owner(owner_id)
            .await
            .map_err(map_repository_error)
    }

    pub async fn get(&self, owner_id: Uuid, file_id: Uuid) -> Result<TextFile, Error> {
        self.owned(owner_id, file_id).await
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        content: &str,
    ) -> Result<TextFile, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("Name is required"));
        }
        let file = TextFile::new(owner_id, name.to_owned(), content.to_owned());
        self.files
            .insert(&file)
            .await
            .map_err(map_repository_error)?;
        Ok(file)
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        file_id: Uuid,
        name: &str,
        content: &str,
    ) -> Result<TextFile, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("Name is required"));
        }
        let mut file = self.owned(owner_id, file_id).await?;
        file.edit(name.to_owned(), content.to_owned());
        let matched = self
            .files
            .update(&file)
            .await
            .map_err(map_repository_error)?;
        if !matched {
            return Err(Error::not_found("File not found"));
        }
        Ok(file)
    }

    pub async fn delete(&self, owner_id: Uuid, file_id: Uuid) -> Result<(), Error> {
        let file = self.owned(owner_id, file_id).await?;
        self.files
            .delete(file.id)
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }
}
