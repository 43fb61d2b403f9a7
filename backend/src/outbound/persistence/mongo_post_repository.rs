//! MongoDB-backed `PostRepository` implementation.
//!
//! Likes are stored as arrays of user-id strings and mutated exclusively
//! with `$addToSet`/`$pull`, so racing toggles converge on the server.
//! Comment- and reply-level mutations address the embedded tree with
//! positional array filters instead of rewriting the whole document.

use async_trait::async_trait;
use bson::doc;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::post::{Comment, Post, Reply};

use super::documents::{CommentDocument, DocumentError, PostDocument, ReplyDocument};
use super::mongo;
use super::mongo_error_mapping::map_mongo_error;

fn map_error(error: mongodb::error::Error) -> PostRepositoryError {
    map_mongo_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn map_corrupt(error: DocumentError) -> PostRepositoryError {
    PostRepositoryError::query(error.to_string())
}

fn to_bson<T: serde::Serialize>(value: &T) -> Result<bson::Bson, PostRepositoryError> {
    bson::to_bson(value).map_err(|error| PostRepositoryError::query(error.to_string()))
}

/// MongoDB adapter for the `posts` collection.
#[derive(Clone)]
pub struct MongoPostRepository {
    collection: Collection<PostDocument>,
}

impl MongoPostRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(mongo::POSTS),
        }
    }

    async fn collect(
        &self,
        filter: bson::Document,
        sort: bson::Document,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let documents: Vec<PostDocument> = self
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
            .map(PostDocument::into_domain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_corrupt)
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        self.collection
            .insert_one(PostDocument::from_domain(post))
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, PostRepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?
            .map(PostDocument::into_domain)
            .transpose()
            .map_err(map_corrupt)
    }

    async fn list_partition(&self, community: bool) -> Result<Vec<Post>, PostRepositoryError> {
        self.collect(
            doc! { "is_community": community },
            doc! { "pinned": -1, "created_at": -1 },
        )
        .await
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostRepositoryError> {
        self.collect(doc! {}, doc! { "created_at": -1 }).await
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, PostRepositoryError> {
        self.collect(
            doc! { "author_id": author_id.to_string() },
            doc! { "created_at": -1 },
        )
        .await
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, PostRepositoryError> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        self.collect(doc! { "_id": { "$in": ids } }, doc! { "created_at": -1 })
            .await
    }

    async fn count(&self) -> Result<u64, PostRepositoryError> {
        self.collection
            .count_documents(doc! {})
            .await
            .map_err(map_error)
    }

    async fn count_comments(&self) -> Result<u64, PostRepositoryError> {
        let pipeline = vec![
            doc! { "$project": { "count": { "$size": "$comments" } } },
            doc! { "$group": { "_id": null, "total": { "$sum": "$count" } } },
        ];
        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(map_error)?;
        let total = match cursor.try_next().await.map_err(map_error)? {
            Some(document) => document
                .get_i64("total")
                .or_else(|_| document.get_i32("total").map(i64::from))
                .unwrap_or(0),
            None => 0,
        };
        Ok(total.max(0) as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count == 1)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, PostRepositoryError> {
        let result = self
            .collection
            .delete_many(doc! { "author_id": author_id.to_string() })
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }

    async fn add_post_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$addToSet": { "likes": user_id.to_string() } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn remove_post_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$pull": { "likes": user_id.to_string() } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn push_comment(
        &self,
        post_id: Uuid,
        comment: &Comment,
    ) -> Result<bool, PostRepositoryError> {
        let comment = to_bson(&CommentDocument::from_domain(comment))?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$push": { "comments": comment } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.matched_count == 1)
    }

    async fn add_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$addToSet": { "comments.$[c].likes": user_id.to_string() } },
            )
            .array_filters(vec![doc! { "c._id": comment_id.to_string() }])
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn remove_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$pull": { "comments.$[c].likes": user_id.to_string() } },
            )
            .array_filters(vec![doc! { "c._id": comment_id.to_string() }])
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn push_reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply: &Reply,
    ) -> Result<bool, PostRepositoryError> {
        let reply = to_bson(&ReplyDocument::from_domain(reply))?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$push": { "comments.$[c].replies": reply } },
            )
            .array_filters(vec![doc! { "c._id": comment_id.to_string() }])
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn add_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$addToSet": { "comments.$[c].replies.$[r].likes": user_id.to_string() } },
            )
            .array_filters(vec![
                doc! { "c._id": comment_id.to_string() },
                doc! { "r._id": reply_id.to_string() },
            ])
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn remove_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$pull": { "comments.$[c].replies.$[r].likes": user_id.to_string() } },
            )
            .array_filters(vec![
                doc! { "c._id": comment_id.to_string() },
                doc! { "r._id": reply_id.to_string() },
            ])
            .await
            .map_err(map_error)?;
        Ok(result.modified_count == 1)
    }

    async fn set_pinned(&self, post_id: Uuid, pinned: bool) -> Result<bool, PostRepositoryError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": post_id.to_string() },
                doc! { "$set": { "pinned": pinned } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.matched_count == 1)
    }

    async fn unpin_partition(&self, community: bool) -> Result<u64, PostRepositoryError> {
        let result = self
            .collection
            .update_many(
                doc! { "is_community": community, "pinned": true },
                doc! { "$set": { "pinned": false } },
            )
            .await
            .map_err(map_error)?;
        Ok(result.modified_count)
    }

    async fn remove_user_references(&self, user_id: Uuid) -> Result<u64, PostRepositoryError> {
        let id = user_id.to_string();
        let referencing = doc! { "$or": [
            { "likes": &id },
            { "comments.author_id": &id },
            { "comments.likes": &id },
            { "comments.replies.author_id": &id },
            { "comments.replies.likes": &id },
        ] };
        let touched = self
            .collection
            .count_documents(referencing)
            .await
            .map_err(map_error)?;

        // Nested paths conflict within a single $pull, so scrub outside-in.
        self.collection
            .update_many(
                doc! {},
                doc! { "$pull": { "likes": &id, "comments": { "author_id": &id } } },
            )
            .await
            .map_err(map_error)?;
        self.collection
            .update_many(
                doc! {},
                doc! { "$pull": {
                    "comments.$[].likes": &id,
                    "comments.$[].replies": { "author_id": &id },
                } },
            )
            .await
            .map_err(map_error)?;
        self.collection
            .update_many(
                doc! {},
                doc! { "$pull": { "comments.$[].replies.$[].likes": &id } },
            )
            .await
            .map_err(map_error)?;
        Ok(touched)
    }
}
