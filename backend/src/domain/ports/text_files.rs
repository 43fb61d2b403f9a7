//! Port for text-document persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::text_file::TextFile;

use super::define_port_error;

define_port_error! {
    /// Errors raised by text file repository adapters.
    pub enum TextFileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "text file repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "text file repository query failed: {message}",
    }
}

/// Port for the text file collection. Ownership checks happen in the
/// service; the repository exposes plain CRUD.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextFileRepository: Send + Sync {
    async fn insert(&self, file: &TextFile) -> Result<(), TextFileRepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextFile>, TextFileRepositoryError>;

    /// The owner's documents, most recently updated first.
    async fn list_by_owner(&self, owner_id: Uuid)
        -> Result<Vec<TextFile>, TextFileRepositoryError>;

    /// Replace the stored document with `file`; `false` when absent.
    async fn update(&self, file: &TextFile) -> Result<bool, TextFileRepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, TextFileRepositoryError>;

    async fn delete_by_owner(&self, owner_id: Uuid) -> Result<u64, TextFileRepositoryError>;
}
