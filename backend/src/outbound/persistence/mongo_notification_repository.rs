//! MongoDB-backed `NotificationRepository` implementation.

use async_trait::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};

use super::documents::{DocumentError, NotificationDocument};
use super::mongo;
use super::mongo_error_mapping::map_mongo_error;

fn map_error(error: mongodb::error::Error) -> NotificationRepositoryError {
    map_mongo_error(
        error,
        NotificationRepositoryError::query,
        NotificationRepositoryError::connection,
    )
}

fn map_corrupt(error: DocumentError) -> NotificationRepositoryError {
    NotificationRepositoryError::query(error.to_string())
}

/// MongoDB adapter for the `notifications` collection.
#[derive(Clone)]
pub struct MongoNotificationRepository {
    collection: Collection<NotificationDocument>,
}

impl MongoNotificationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(mongo::NOTIFICATIONS),
        }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn insert(
        &self,
        notification: &Notification,
    ) -> Result<(), NotificationRepositoryError> {
        self.collection
            .insert_one(NotificationDocument::from_domain(notification))
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn list_recent(
        &self,
        recipient_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let documents: Vec<NotificationDocument> = self
            .collection
            .find(doc! { "recipient_id": recipient_id.to_string() })
            .sort(doc! { "created_at": -1 })
            .limit(limit as i64)
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        documents
            .into_iter()
            .map(NotificationDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_corrupt)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<bool, NotificationRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! {
                    "_id": id.to_string(),
                    "recipient_id": recipient_id.to_string(),
                },
                doc! { "$set": { "read": true } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.matched_count == 1)
    }

    async fn clear(&self, recipient_id: Uuid) -> Result<u64, NotificationRepositoryError> {
        let result = self
            .collection
            .delete_many(doc! { "recipient_id": recipient_id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }

    async fn delete_matching(
        &self,
        recipient_id: Uuid,
        sender_id: Uuid,
        kind: NotificationKind,
        post_id: Option<Uuid>,
    ) -> Result<bool, NotificationRepositoryError> {
        let post_id = match post_id {
            Some(id) => bson::Bson::String(id.to_string()),
            None => bson::Bson::Null,
        };
        let result = self
            .collection
            .delete_one(doc! {
                "recipient_id": recipient_id.to_string(),
                "sender_id": sender_id.to_string(),
                "kind": kind.as_str(),
                "post_id": post_id,
            })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count == 1)
    }

    async fn delete_involving(
        &self,
        user_id: Uuid,
    ) -> Result<u64, NotificationRepositoryError> {
        let id = user_id.to_string();
        let result = self
            .collection
            .delete_many(doc! { "$or": [ { "recipient_id": &id }, { "sender_id": &id } ] })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }
}
