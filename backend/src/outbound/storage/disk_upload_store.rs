//! Local-disk `UploadStore` adapter.
//!
//! Artifacts live flat in one directory under their token names. Writes go
//! through a `.part` staging file renamed into place, so a failed write
//! never leaves a readable partial artifact behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use crate::domain::ports::{UploadStore, UploadStoreError};

/// Upload store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct DiskUploadStore {
    root: PathBuf,
}

fn is_plain_name(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}

impl DiskUploadStore {
    /// Create the store, ensuring the root directory exists.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, UploadStoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|error| UploadStoreError::io(error.to_string()))?;
        Ok(Self { root })
    }

    /// Directory the artifacts live in, for static file serving.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, UploadStoreError> {
        if !is_plain_name(filename) {
            return Err(UploadStoreError::not_found(filename));
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl UploadStore for DiskUploadStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), UploadStoreError> {
        let target = self.path_for(filename)?;
        let staging = self.root.join(format!("{filename}.part"));

        if let Err(error) = fs::write(&staging, bytes).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(%cleanup, path = %staging.display(), "staging cleanup failed");
                }
            }
            return Err(UploadStoreError::io(error.to_string()));
        }

        if let Err(error) = fs::rename(&staging, &target).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(%cleanup, path = %staging.display(), "staging cleanup failed");
                }
            }
            return Err(UploadStoreError::io(error.to_string()));
        }
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Vec<u8>, UploadStoreError> {
        let path = self.path_for(filename)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                Err(UploadStoreError::not_found(filename))
            }
            Err(error) => Err(UploadStoreError::io(error.to_string())),
        }
    }

    async fn remove(&self, filename: &str) -> Result<(), UploadStoreError> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(UploadStoreError::io(error.to_string())),
        }
    }
}
