//! In-memory `TextFileRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{TextFileRepository, TextFileRepositoryError};
use crate::domain::text_file::TextFile;

/// Map-backed text file store.
#[derive(Default)]
pub struct MemoryTextFileRepository {
    files: RwLock<HashMap<Uuid, TextFile>>,
}

impl MemoryTextFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TextFileRepository for MemoryTextFileRepository {
    async fn insert(&self, file: &TextFile) -> Result<(), TextFileRepositoryError> {
        self.files.write().await.insert(file.id, file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextFile>, TextFileRepositoryError> {
        Ok(self.files.read().await.get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<TextFile>, TextFileRepositoryError> {
        let files = self.files.read().await;
        let mut owned: Vec<TextFile> = files
            .values()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn update(&self, file: &TextFile) -> Result<bool, TextFileRepositoryError> {
        let mut files = self.files.write().await;
        match files.get_mut(&file.id) {
            Some(stored) => {
                *stored = file.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, TextFileRepositoryError> {
        Ok(self.files.write().await.remove(&id).is_some())
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> Result<u64, TextFileRepositoryError> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|_, f| f.owner_id != owner_id);
        Ok((before - files.len()) as u64)
    }
}
