//! Friendship lifecycle: request, accept, decline, remove.
//!
//! A declined row is never deleted; `request` refuses whenever any row links
//! the pair, so a decline permanently blocks new requests between those two
//! accounts. Removal of an accepted friendship is a hard delete and does
//! allow a later re-request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::friendship::{Friendship, FriendshipStatus};
use crate::domain::notification::{NotificationDraft, NotificationKind};
use crate::domain::ports::{
    FriendshipRepository, FriendshipRepositoryError, Notifier, UserRepository,
    UserRepositoryError,
};
use crate::domain::user::{User, UserSummary};

fn map_repository_error(error: FriendshipRepositoryError) -> Error {
    match error {
        FriendshipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("friendship store unavailable: {message}"))
        }
        FriendshipRepositoryError::Query { message } => {
            Error::internal(format!("friendship store error: {message}"))
        }
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        _ => Error::internal(error.to_string()),
    }
}

/// An accepted friendship as shown in the friends list. Carries the row id
/// so the client can issue a removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendView {
    pub friendship_id: Uuid,
    pub user: UserSummary,
}

/// An incoming pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestView {
    pub id: Uuid,
    pub from: UserSummary,
}

/// Friendship service over the friendship collection.
#[derive(Clone)]
pub struct FriendshipService {
    friendships: Arc<dyn FriendshipRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl FriendshipService {
    pub fn new(
        friendships: Arc<dyn FriendshipRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            friendships,
            users,
            notifier,
        }
    }

    /// Send a friend request to `recipient_id`.
    pub async fn request(&self, actor: &User, recipient_id: Uuid) -> Result<Friendship, Error> {
        if actor.id == recipient_id {
            return Err(Error::invalid_request("You cannot friend yourself"));
        }
        self.users
            .find_by_id(recipient_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        // Any existing row blocks, declined tombstones included.
        if self
            .friendships
            .find_between(actor.id, recipient_id)
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(Error::invalid_request("Friend request already exists"));
        }

        let friendship = Friendship::request(actor.id, recipient_id);
        self.friendships
            .insert(&friendship)
            .await
            .map_err(map_repository_error)?;

        self.notifier
            .notify(NotificationDraft {
                recipient_id,
                sender_id: Some(actor.id),
                sender_username: Some(actor.username.clone()),
                kind: NotificationKind::FriendRequest,
                message: format!("{} sent you a friend request", actor.username),
                post_id: None,
            })
            .await;
        Ok(friendship)
    }

    async fn pending_for_recipient(&self, id: Uuid, actor: &User) -> Result<Friendship, Error> {
        let friendship = self
            .friendships
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Friend request not found"))?;
        if friendship.recipient_id != actor.id {
            return Err(Error::forbidden("This friend request is not for you"));
        }
        if friendship.status != FriendshipStatus::Pending {
            return Err(Error::invalid_request("Friend request already handled"));
        }
        Ok(friendship)
    }

    /// Accept a pending request addressed to `actor`.
    pub async fn accept(&self, id: Uuid, actor: &User) -> Result<Friendship, Error> {
        let mut friendship = self.pending_for_recipient(id, actor).await?;
        self.friendships
            .set_status(id, FriendshipStatus::Accepted)
            .await
            .map_err(map_repository_error)?;
        friendship.status = FriendshipStatus::Accepted;

        self.notifier
            .notify(NotificationDraft {
                recipient_id: friendship.requester_id,
                sender_id: Some(actor.id),
                sender_username: Some(actor.username.clone()),
                kind: NotificationKind::FriendAccepted,
                message: format!("{} accepted your friend request", actor.username),
                post_id: None,
            })
            .await;
        Ok(friendship)
    }

    /// Decline a pending request addressed to `actor`. The row stays as a
    /// tombstone and no notification fires.
    pub async fn decline(&self, id: Uuid, actor: &User) -> Result<Friendship, Error> {
        let mut friendship = self.pending_for_recipient(id, actor).await?;
        self.friendships
            .set_status(id, FriendshipStatus::Declined)
            .await
            .map_err(map_repository_error)?;
        friendship.status = FriendshipStatus::Declined;
        Ok(friendship)
    }

    /// Remove an accepted friendship. Either party may do it.
    pub async fn remove(&self, id: Uuid, actor: &User) -> Result<(), Error> {
        let friendship = self
            .friendships
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Friendship not found"))?;
        if !friendship.involves(actor.id) {
            return Err(Error::forbidden("This friendship is not yours"));
        }
        if friendship.status != FriendshipStatus::Accepted {
            return Err(Error::invalid_request("You are not friends with this user"));
        }
        self.friendships
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }

    /// The actor's accepted friendships with resolved partner names.
    pub async fn friends(&self, actor: &User) -> Result<Vec<FriendView>, Error> {
        let rows = self
            .friendships
            .list_involving(actor.id)
            .await
            .map_err(map_repository_error)?;

        let mut friends = Vec::new();
        for row in rows
            .into_iter()
            .filter(|f| f.status == FriendshipStatus::Accepted)
        {
            let peer_id = row.peer_of(actor.id);
            let Some(peer) = self
                .users
                .find_by_id(peer_id)
                .await
                .map_err(map_user_error)?
            else {
                continue;
            };
            friends.push(FriendView {
                friendship_id: row.id,
                user: UserSummary::from(&peer),
            });
        }
        Ok(friends)
    }

    /// Incoming pending requests with resolved requester names.
    pub async fn pending_requests(&self, actor: &User) -> Result<Vec<FriendRequestView>, Error> {
        let rows = self
            .friendships
            .list_involving(actor.id)
            .await
            .map_err(map_repository_error)?;

        let mut requests = Vec::new();
        for row in rows.into_iter().filter(|f| {
            f.status == FriendshipStatus::Pending && f.recipient_id == actor.id
        }) {
            let Some(requester) = self
                .users
                .find_by_id(row.requester_id)
                .await
                .map_err(map_user_error)?
            else {
                continue;
            };
            requests.push(FriendRequestView {
                id: row.id,
                from: UserSummary::from(&requester),
            });
        }
        Ok(requests)
    }
}

#[cfg(test)]
#[path = "friendship_service_tests.rs"]
mod tests;
