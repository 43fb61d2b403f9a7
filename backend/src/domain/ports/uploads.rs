//! Port for upload artifact storage.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by upload store adapters.
    pub enum UploadStoreError {
        /// The named artifact does not exist.
        NotFound { filename: String } =>
            "upload not found: {filename}",
        /// Reading or writing the artifact failed.
        Io { message: String } =>
            "upload store I/O failed: {message}",
    }
}

/// Port for storing gate-approved upload bytes under their token name.
///
/// `save` must not leave a partial artifact behind when it fails; callers
/// rely on failed uploads being invisible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), UploadStoreError>;

    async fn load(&self, filename: &str) -> Result<Vec<u8>, UploadStoreError>;

    /// Remove an artifact; absent artifacts are not an error.
    async fn remove(&self, filename: &str) -> Result<(), UploadStoreError>;
}
