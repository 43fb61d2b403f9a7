//! Public profiles, karma aggregation, and per-account settings.
//!
//! Every profile read recomputes the karma counters from the user's authored
//! posts and writes the snapshot back to the user document. The write-back
//! is best-effort: a failure is logged and the profile is still served, so
//! two consecutive reads with no intervening activity always agree.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::karma::{self, Rank};
use crate::domain::ports::{
    PostRepository, PostRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::user::{DmSettings, KarmaSnapshot};

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        _ => Error::internal(error.to_string()),
    }
}

fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post store unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post store error: {message}"))
        }
    }
}

/// Public profile payload with freshly aggregated karma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub karma: KarmaSnapshot,
    pub total_karma: u64,
    pub rank: Rank,
    pub post_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Profile and settings service.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Fetch a profile by username, recomputing karma from authored posts.
    pub async fn profile(&self, username: &str) -> Result<Profile, Error> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let authored = self
            .posts
            .list_by_author(user.id)
            .await
            .map_err(map_post_error)?;
        let karma = karma::aggregate(user.id, &authored);

        // Cache refresh only; the response uses the freshly computed values.
        if let Err(error) = self.users.set_karma(user.id, &karma).await {
            warn!(%error, user = %user.id, "karma snapshot write-back failed");
        }

        let total = karma.total();
        Ok(Profile {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            karma,
            total_karma: total,
            rank: Rank::from_karma(total),
            post_count: authored.len() as u64,
            created_at: user.created_at,
        })
    }

    /// Replace the user's DM acceptance settings.
    pub async fn update_dm_settings(
        &self,
        user_id: Uuid,
        settings: DmSettings,
    ) -> Result<DmSettings, Error> {
        let matched = self
            .users
            .set_dm_settings(user_id, &settings)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("User not found"));
        }
        Ok(settings)
    }

    /// Store the opaque desktop icon layout for the user.
    pub async fn update_icon_positions(&self, user_id: Uuid, positions: Value) -> Result<(), Error> {
        let matched = self
            .users
            .set_icon_positions(user_id, &positions)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("User not found"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockPostRepository, MockUserRepository};
    use crate::domain::post::{NewPost, Post, PostCategory};
    use crate::domain::user::User;
    use mockall::predicate::eq;

    fn authored_post(author: &User, likes: usize) -> Post {
        let mut post = Post::create(
            NewPost {
                title: "t".into(),
                content: "c".into(),
                tags: Vec::new(),
                category: PostCategory::General,
                attachments: Vec::new(),
            },
            author,
        );
        post.likes = (0..likes).map(|_| Uuid::new_v4()).collect();
        post
    }

    #[tokio::test]
    async fn profile_aggregates_and_writes_back() {
        let user = User::new("alice", "hash");
        let user_id = user.id;
        let posts_list = vec![authored_post(&user, 60)];

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("alice"))
            .return_once(move |_| Ok(Some(user)));
        users
            .expect_set_karma()
            .withf(move |id, karma| *id == user_id && karma.post_likes == 60)
            .times(1)
            .return_once(|_, _| Ok(true));

        let mut posts = MockPostRepository::new();
        posts
            .expect_list_by_author()
            .return_once(move |_| Ok(posts_list));

        let profile = ProfileService::new(Arc::new(users), Arc::new(posts))
            .profile("alice")
            .await
            .expect("profile");
        assert_eq!(profile.total_karma, 60);
        assert_eq!(profile.rank, Rank::Member);
        assert_eq!(profile.post_count, 1);
    }

    #[tokio::test]
    async fn profile_survives_write_back_failure() {
        let user = User::new("alice", "hash");
        let posts_list = vec![authored_post(&user, 3)];

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(user)));
        users
            .expect_set_karma()
            .return_once(|_, _| Err(UserRepositoryError::query("write refused")));

        let mut posts = MockPostRepository::new();
        posts
            .expect_list_by_author()
            .return_once(move |_| Ok(posts_list));

        let profile = ProfileService::new(Arc::new(users), Arc::new(posts))
            .profile("alice")
            .await
            .expect("profile despite failed write-back");
        assert_eq!(profile.total_karma, 3);
    }

    #[tokio::test]
    async fn consecutive_fetches_report_identical_karma() {
        let user = User::new("alice", "hash");
        let stored = vec![authored_post(&user, 7)];

        let mut users = MockUserRepository::new();
        let fetched = user.clone();
        users
            .expect_find_by_username()
            .times(2)
            .returning(move |_| Ok(Some(fetched.clone())));
        users.expect_set_karma().times(2).returning(|_, _| Ok(true));

        let mut posts = MockPostRepository::new();
        posts
            .expect_list_by_author()
            .times(2)
            .returning(move |_| Ok(stored.clone()));

        let service = ProfileService::new(Arc::new(users), Arc::new(posts));
        let first = service.profile("alice").await.expect("first");
        let second = service.profile("alice").await.expect("second");
        assert_eq!(first.total_karma, second.total_karma);
        assert_eq!(first.karma, second.karma);
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().return_once(|_| Ok(None));

        let err = ProfileService::new(Arc::new(users), Arc::new(MockPostRepository::new()))
            .profile("ghost")
            .await
            .expect_err("missing");
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
