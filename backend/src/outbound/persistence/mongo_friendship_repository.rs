//! MongoDB-backed `FriendshipRepository` implementation.
//!
//! `find_between` deliberately ignores status: declined rows are tombstones
//! and must block re-requests, so the pair lookup matches any state.

use async_trait::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::domain::friendship::{Friendship, FriendshipStatus};
use crate::domain::ports::{FriendshipRepository, FriendshipRepositoryError};

use super::documents::{DocumentError, FriendshipDocument};
use super::mongo;
use super::mongo_error_mapping::map_mongo_error;

fn map_error(error: mongodb::error::Error) -> FriendshipRepositoryError {
    map_mongo_error(
        error,
        FriendshipRepositoryError::query,
        FriendshipRepositoryError::connection,
    )
}

fn map_corrupt(error: DocumentError) -> FriendshipRepositoryError {
    FriendshipRepositoryError::query(error.to_string())
}

fn involving(user_id: Uuid) -> bson::Document {
    let id = user_id.to_string();
    doc! { "$or": [ { "requester_id": &id }, { "recipient_id": &id } ] }
}

/// MongoDB adapter for the `friendships` collection.
#[derive(Clone)]
pub struct MongoFriendshipRepository {
    collection: Collection<FriendshipDocument>,
}

impl MongoFriendshipRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(mongo::FRIENDSHIPS),
        }
    }
}

#[async_trait]
impl FriendshipRepository for MongoFriendshipRepository {
    async fn insert(&self, friendship: &Friendship) -> Result<(), FriendshipRepositoryError> {
        self.collection
            .insert_one(FriendshipDocument::from_domain(friendship))
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?
            .map(FriendshipDocument::into_domain)
            .transpose()
            .map_err(map_corrupt)
    }

    async fn find_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        let (a, b) = (a.to_string(), b.to_string());
        self.collection
            .find_one(doc! { "$or": [
                { "requester_id": &a, "recipient_id": &b },
                { "requester_id": &b, "recipient_id": &a },
            ] })
            .await
            .map_err(map_error)?
            .map(FriendshipDocument::into_domain)
            .transpose()
            .map_err(map_corrupt)
    }

    async fn list_involving(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Friendship>, FriendshipRepositoryError> {
        let documents: Vec<FriendshipDocument> = self
            .collection
            .find(involving(user_id))
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        documents
            .into_iter()
            .map(FriendshipDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_corrupt)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: FriendshipStatus,
    ) -> Result<bool, FriendshipRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.matched_count == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, FriendshipRepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count == 1)
    }

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, FriendshipRepositoryError> {
        let result = self
            .collection
            .delete_many(involving(user_id))
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }
}
