//! MongoDB-backed `TextFileRepository` implementation.

use async_trait::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::domain::ports::{TextFileRepository, TextFileRepositoryError};
use crate::domain::text_file::TextFile;

use super::documents::{DocumentError, TextFileDocument};
use super::mongo;
use super::mongo_error_mapping::map_mongo_error;

fn map_error(error: mongodb::error::Error) -> TextFileRepositoryError {
    map_mongo_error(
        error,
        TextFileRepositoryError::query,
        TextFileRepositoryError::connection,
    )
}

fn map_corrupt(error: DocumentError) -> TextFileRepositoryError {
    TextFileRepositoryError::query(error.to_string())
}

/// MongoDB adapter for the `text_files` collection.
#[derive(Clone)]
pub struct MongoTextFileRepository {
    collection: Collection<TextFileDocument>,
}

impl MongoTextFileRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(mongo::TEXT_FILES),
        }
    }
}

#[async_trait]
impl TextFileRepository for MongoTextFileRepository {
    async fn insert(&self, file: &TextFile) -> Result<(), TextFileRepositoryError> {
        self.collection
            .insert_one(TextFileDocument::from_domain(file))
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextFile>, TextFileRepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?
            .map(TextFileDocument::into_domain)
            .transpose()
            .map_err(map_corrupt)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<TextFile>, TextFileRepositoryError> {
        let documents: Vec<TextFileDocument> = self
            .collection
            .find(doc! { "owner_id": owner_id.to_string() })
            .sort(doc! { "updated_at": -1 })
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        documents
            .into_iter()
            .map(TextFileDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_corrupt)
    }

    async fn update(&self, file: &TextFile) -> Result<bool, TextFileRepositoryError> {
        let result = self
            .collection
            .replace_one(
                doc! { "_id": file.id.to_string() },
                TextFileDocument::from_domain(file),
            )
            .await
            .map_err(map_error)?;
        Ok(result.matched_count == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, TextFileRepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count == 1)
    }

    async fn delete_by_owner(&self, owner_id: Uuid) -> Result<u64, TextFileRepositoryError> {
        let result = self
            .collection
            .delete_many(doc! { "owner_id": owner_id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }
}
