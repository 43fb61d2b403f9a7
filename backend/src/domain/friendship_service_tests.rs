//! Friendship state machine coverage, tombstone blocking included.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;
use uuid::Uuid;

use super::FriendshipService;
use crate::domain::ErrorCode;
use crate::domain::friendship::{Friendship, FriendshipStatus};
use crate::domain::notification::NotificationKind;
use crate::domain::ports::{MockFriendshipRepository, MockNotifier, MockUserRepository};
use crate::domain::user::User;

fn service(
    friendships: MockFriendshipRepository,
    users: MockUserRepository,
    notifier: MockNotifier,
) -> FriendshipService {
    FriendshipService::new(Arc::new(friendships), Arc::new(users), Arc::new(notifier))
}

fn quiet_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().never();
    notifier.expect_retract().never();
    notifier
}

#[tokio::test]
async fn request_creates_pending_row_and_notifies() {
    let actor = User::new("alice", "hash");
    let recipient = User::new("bob", "hash");
    let recipient_id = recipient.id;
    let actor_id = actor.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(recipient_id))
        .return_once(move |_| Ok(Some(recipient)));

    let mut friendships = MockFriendshipRepository::new();
    friendships.expect_find_between().return_once(|_, _| Ok(None));
    friendships
        .expect_insert()
        .withf(move |f| {
            f.requester_id == actor_id
                && f.recipient_id == recipient_id
                && f.status == FriendshipStatus::Pending
        })
        .return_once(|_| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(move |draft| {
            draft.recipient_id == recipient_id
                && draft.kind == NotificationKind::FriendRequest
                && draft.message == "alice sent you a friend request"
        })
        .times(1)
        .returning(|_| ());

    let friendship = service(friendships, users, notifier)
        .request(&actor, recipient_id)
        .await
        .expect("request");
    assert_eq!(friendship.status, FriendshipStatus::Pending);
}

#[rstest]
#[case(FriendshipStatus::Pending)]
#[case(FriendshipStatus::Accepted)]
#[case(FriendshipStatus::Declined)]
#[tokio::test]
async fn request_blocked_by_any_existing_row(#[case] status: FriendshipStatus) {
    let actor = User::new("alice", "hash");
    let recipient = User::new("bob", "hash");
    let recipient_id = recipient.id;

    // Direction reversed on purpose: the pair check is unordered.
    let mut existing = Friendship::request(recipient_id, actor.id);
    existing.status = status;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(recipient)));

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_between()
        .return_once(move |_, _| Ok(Some(existing)));
    friendships.expect_insert().never();

    let err = service(friendships, users, quiet_notifier())
        .request(&actor, recipient_id)
        .await
        .expect_err("blocked");
    assert_eq!(err.code, ErrorCode::InvalidRequest);
    assert_eq!(err.message, "Friend request already exists");
}

#[tokio::test]
async fn request_rejects_self() {
    let actor = User::new("alice", "hash");
    let err = service(
        MockFriendshipRepository::new(),
        MockUserRepository::new(),
        quiet_notifier(),
    )
    .request(&actor, actor.id)
    .await
    .expect_err("self request");
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn accept_flips_status_and_notifies_requester() {
    let requester_id = Uuid::new_v4();
    let actor = User::new("bob", "hash");
    let row = Friendship::request(requester_id, actor.id);
    let row_id = row.id;

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_by_id()
        .with(eq(row_id))
        .return_once(move |_| Ok(Some(row)));
    friendships
        .expect_set_status()
        .with(eq(row_id), eq(FriendshipStatus::Accepted))
        .return_once(|_, _| Ok(true));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(move |draft| {
            draft.recipient_id == requester_id
                && draft.kind == NotificationKind::FriendAccepted
                && draft.message == "bob accepted your friend request"
        })
        .times(1)
        .returning(|_| ());

    let updated = service(friendships, MockUserRepository::new(), notifier)
        .accept(row_id, &actor)
        .await
        .expect("accept");
    assert_eq!(updated.status, FriendshipStatus::Accepted);
}

#[tokio::test]
async fn accept_rejects_requester_acting_on_own_request() {
    let actor = User::new("alice", "hash");
    let row = Friendship::request(actor.id, Uuid::new_v4());
    let row_id = row.id;

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(row)));
    friendships.expect_set_status().never();

    let err = service(friendships, MockUserRepository::new(), quiet_notifier())
        .accept(row_id, &actor)
        .await
        .expect_err("wrong side");
    assert_eq!(err.code, ErrorCode::Forbidden);
}

#[tokio::test]
async fn decline_is_silent_and_keeps_tombstone() {
    let actor = User::new("bob", "hash");
    let row = Friendship::request(Uuid::new_v4(), actor.id);
    let row_id = row.id;

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(row)));
    friendships
        .expect_set_status()
        .with(eq(row_id), eq(FriendshipStatus::Declined))
        .return_once(|_, _| Ok(true));
    friendships.expect_delete().never();

    let updated = service(friendships, MockUserRepository::new(), quiet_notifier())
        .decline(row_id, &actor)
        .await
        .expect("decline");
    assert_eq!(updated.status, FriendshipStatus::Declined);
}

#[tokio::test]
async fn accept_rejects_already_handled_request() {
    let actor = User::new("bob", "hash");
    let mut row = Friendship::request(Uuid::new_v4(), actor.id);
    row.status = FriendshipStatus::Declined;
    let row_id = row.id;

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(row)));

    let err = service(friendships, MockUserRepository::new(), quiet_notifier())
        .accept(row_id, &actor)
        .await
        .expect_err("terminal state");
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn remove_deletes_accepted_row_for_either_party() {
    let requester = User::new("alice", "hash");
    let mut row = Friendship::request(requester.id, Uuid::new_v4());
    row.status = FriendshipStatus::Accepted;
    let row_id = row.id;

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(row)));
    friendships
        .expect_delete()
        .with(eq(row_id))
        .return_once(|_| Ok(true));

    service(friendships, MockUserRepository::new(), quiet_notifier())
        .remove(row_id, &requester)
        .await
        .expect("remove");
}

#[tokio::test]
async fn remove_rejects_non_accepted_row() {
    let actor = User::new("bob", "hash");
    let row = Friendship::request(Uuid::new_v4(), actor.id);
    let row_id = row.id;

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(row)));
    friendships.expect_delete().never();

    let err = service(friendships, MockUserRepository::new(), quiet_notifier())
        .remove(row_id, &actor)
        .await
        .expect_err("pending cannot be removed");
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn friends_lists_accepted_with_peer_names() {
    let actor = User::new("alice", "hash");
    let friend = User::new("bob", "hash");
    let friend_id = friend.id;

    let mut accepted = Friendship::request(friend_id, actor.id);
    accepted.status = FriendshipStatus::Accepted;
    let accepted_id = accepted.id;
    let pending = Friendship::request(Uuid::new_v4(), actor.id);

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_list_involving()
        .return_once(move |_| Ok(vec![accepted, pending]));

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(friend_id))
        .return_once(move |_| Ok(Some(friend)));

    let friends = service(friendships, users, quiet_notifier())
        .friends(&actor)
        .await
        .expect("friends");
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].friendship_id, accepted_id);
    assert_eq!(friends[0].user.username, "bob");
}

#[tokio::test]
async fn pending_requests_only_include_incoming() {
    let actor = User::new("alice", "hash");
    let requester = User::new("bob", "hash");
    let requester_id = requester.id;

    let incoming = Friendship::request(requester_id, actor.id);
    let outgoing = Friendship::request(actor.id, Uuid::new_v4());

    let mut friendships = MockFriendshipRepository::new();
    friendships
        .expect_list_involving()
        .return_once(move |_| Ok(vec![incoming, outgoing]));

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(requester_id))
        .return_once(move |_| Ok(Some(requester)));

    let requests = service(friendships, users, quiet_notifier())
        .pending_requests(&actor)
        .await
        .expect("requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].from.username, "bob");
}
