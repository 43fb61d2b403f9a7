//! MongoDB-backed `MessageRepository` implementation.

use async_trait::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::domain::message::Message;
use crate::domain::ports::{MessageRepository, MessageRepositoryError};

use super::documents::{DocumentError, MessageDocument};
use super::mongo;
use super::mongo_error_mapping::map_mongo_error;

fn map_error(error: mongodb::error::Error) -> MessageRepositoryError {
    map_mongo_error(
        error,
        MessageRepositoryError::query,
        MessageRepositoryError::connection,
    )
}

fn map_corrupt(error: DocumentError) -> MessageRepositoryError {
    MessageRepositoryError::query(error.to_string())
}

fn involving(user_id: Uuid) -> bson::Document {
    let id = user_id.to_string();
    doc! { "$or": [ { "sender_id": &id }, { "recipient_id": &id } ] }
}

/// MongoDB adapter for the `messages` collection.
#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MessageDocument>,
}

impl MongoMessageRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(mongo::MESSAGES),
        }
    }

    async fn collect(
        &self,
        filter: bson::Document,
        sort: bson::Document,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let documents: Vec<MessageDocument> = self
            .collection
            .find(filter)
            .sort(sort)
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        documents
            .into_iter()
            .map(MessageDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_corrupt)
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        self.collection
            .insert_one(MessageDocument::from_domain(message))
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn thread_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let (a, b) = (a.to_string(), b.to_string());
        self.collect(
            doc! { "$or": [
                { "sender_id": &a, "recipient_id": &b },
                { "sender_id": &b, "recipient_id": &a },
            ] },
            doc! { "created_at": 1 },
        )
        .await
    }

    async fn mark_read_from(
        &self,
        recipient: Uuid,
        sender: Uuid,
    ) -> Result<u64, MessageRepositoryError> {
        let result = self
            .collection
            .update_many(
                doc! {
                    "recipient_id": recipient.to_string(),
                    "sender_id": sender.to_string(),
                    "read": false,
                },
                doc! { "$set": { "read": true } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.modified_count)
    }

    async fn list_involving(&self, user_id: Uuid) -> Result<Vec<Message>, MessageRepositoryError> {
        self.collect(involving(user_id), doc! { "created_at": -1 })
            .await
    }

    async fn unread_count(&self, recipient: Uuid) -> Result<u64, MessageRepositoryError> {
        self.collection
            .count_documents(doc! { "recipient_id": recipient.to_string(), "read": false })
            .await
            .map_err(map_error)
    }

    async fn count(&self) -> Result<u64, MessageRepositoryError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(map_error)
    }

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, MessageRepositoryError> {
        let result = self
            .collection
            .delete_many(involving(user_id))
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }
}
