//! MongoDB-backed `UserRepository` implementation.
//!
//! Duplicate usernames surface as driver-level unique-index violations and
//! are translated into the dedicated port error so the service can report a
//! conflict. Bookmark mutations use `$addToSet`/`$pull` with the modified
//! count deciding the returned flag.

use async_trait::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{DmSettings, KarmaSnapshot, NotificationSettings, User};

use super::documents::{
    DmSettingsDocument, DocumentError, KarmaSnapshotDocument, NotificationSettingsDocument,
    UserDocument,
};
use super::mongo;
use super::mongo_error_mapping::{is_duplicate_key, map_mongo_error};

fn map_error(error: mongodb::error::Error) -> UserRepositoryError {
    map_mongo_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

fn map_corrupt(error: DocumentError) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

/// MongoDB adapter for the `users` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(mongo::USERS),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        update: bson::Document,
    ) -> Result<mongodb::results::UpdateResult, UserRepositoryError> {
        self.collection
            .update_one(doc! { "_id": id.to_string() }, update)
            .await
            .map_err(map_error)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let document = UserDocument::from_domain(user).map_err(map_corrupt)?;
        match self.collection.insert_one(&document).await {
            Ok(_) => Ok(()),
            Err(error) if is_duplicate_key(&error) => Err(
                UserRepositoryError::duplicate_username(user.username.clone()),
            ),
            Err(error) => Err(map_error(error)),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?
            .map(UserDocument::into_domain)
            .transpose()
            .map_err(map_corrupt)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        self.collection
            .find_one(doc! { "username": username })
            .await
            .map_err(map_error)?
            .map(UserDocument::into_domain)
            .transpose()
            .map_err(map_corrupt)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let documents: Vec<UserDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(map_error)?
            .try_collect()
            .await
            .map_err(map_error)?;
        documents
            .into_iter()
            .map(UserDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_corrupt)
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(map_error)
    }

    async fn set_banned(&self, id: Uuid, banned: bool) -> Result<bool, UserRepositoryError> {
        let result = self
            .update(id, doc! { "$set": { "is_banned": banned } })
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn set_admin(&self, id: Uuid, admin: bool) -> Result<bool, UserRepositoryError> {
        let result = self
            .update(id, doc! { "$set": { "is_admin": admin } })
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn set_notification_settings(
        &self,
        id: Uuid,
        settings: &NotificationSettings,
    ) -> Result<bool, UserRepositoryError> {
        let settings = bson::to_bson(&NotificationSettingsDocument::from(settings))
            .map_err(|error| UserRepositoryError::query(error.to_string()))?;
        let result = self
            .update(id, doc! { "$set": { "notification_settings": settings } })
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn set_dm_settings(
        &self,
        id: Uuid,
        settings: &DmSettings,
    ) -> Result<bool, UserRepositoryError> {
        let settings = bson::to_bson(&DmSettingsDocument::from(settings))
            .map_err(|error| UserRepositoryError::query(error.to_string()))?;
        let result = self
            .update(id, doc! { "$set": { "dm_settings": settings } })
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn set_icon_positions(
        &self,
        id: Uuid,
        positions: &Value,
    ) -> Result<bool, UserRepositoryError> {
        let positions = bson::to_bson(positions)
            .map_err(|error| UserRepositoryError::query(error.to_string()))?;
        let result = self
            .update(id, doc! { "$set": { "icon_positions": positions } })
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn set_karma(
        &self,
        id: Uuid,
        karma: &KarmaSnapshot,
    ) -> Result<bool, UserRepositoryError> {
        let karma = bson::to_bson(&KarmaSnapshotDocument::from(karma))
            .map_err(|error| UserRepositoryError::query(error.to_string()))?;
        let result = self.update(id, doc! { "$set": { "karma": karma } }).await?;
        Ok(result.matched_count == 1)
    }

    async fn add_bookmark(&self, id: Uuid, post_id: Uuid) -> Result<bool, UserRepositoryError> {
        let result = self
            .update(
                id,
                doc! { "$addToSet": { "bookmarks": post_id.to_string() } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn remove_bookmark(&self, id: Uuid, post_id: Uuid) -> Result<bool, UserRepositoryError> {
        let result = self
            .update(id, doc! { "$pull": { "bookmarks": post_id.to_string() } })
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count == 1)
    }
}
