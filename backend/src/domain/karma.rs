//! Karma aggregation and rank derivation.
//!
//! Karma is recomputed from a user's authored posts on every profile read:
//! likes on the posts themselves plus likes on the user's own comments and
//! replies within those posts. Rank is a pure function of total karma and is
//! never persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::post::Post;
use super::user::KarmaSnapshot;

/// Display rank derived from total karma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Rank {
    Newbie,
    Member,
    Expert,
    Elite,
    Legend,
}

impl Rank {
    /// Derive the rank for a karma total.
    #[must_use]
    pub fn from_karma(total: u64) -> Self {
        match total {
            0..=49 => Self::Newbie,
            50..=199 => Self::Member,
            200..=499 => Self::Expert,
            500..=999 => Self::Elite,
            _ => Self::Legend,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newbie => "Newbie",
            Self::Member => "Member",
            Self::Expert => "Expert",
            Self::Elite => "Elite",
            Self::Legend => "Legend",
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulate karma counters for `user_id` over their authored posts.
///
/// Posts not authored by `user_id` are skipped, so callers may pass a
/// broader slice than strictly necessary. Comments and replies only count
/// when the user wrote them.
#[must_use]
pub fn aggregate(user_id: Uuid, posts: &[Post]) -> KarmaSnapshot {
    let mut karma = KarmaSnapshot::default();
    for post in posts.iter().filter(|p| p.author_id == user_id) {
        karma.post_likes += post.likes.len() as u64;
        for comment in &post.comments {
            if comment.author_id == user_id {
                karma.comments_created += 1;
                karma.comment_likes += comment.likes.len() as u64;
            }
            for reply in &comment.replies {
                if reply.author_id == user_id {
                    karma.replies_created += 1;
                    karma.reply_likes += reply.likes.len() as u64;
                }
            }
        }
    }
    karma
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::{Comment, NewPost, PostCategory, Reply};
    use crate::domain::User;
    use rstest::rstest;

    #[rstest]
    #[case(0, Rank::Newbie)]
    #[case(49, Rank::Newbie)]
    #[case(50, Rank::Member)]
    #[case(199, Rank::Member)]
    #[case(200, Rank::Expert)]
    #[case(499, Rank::Expert)]
    #[case(500, Rank::Elite)]
    #[case(999, Rank::Elite)]
    #[case(1000, Rank::Legend)]
    fn rank_thresholds(#[case] total: u64, #[case] expected: Rank) {
        assert_eq!(Rank::from_karma(total), expected);
    }

    fn post_by(author: &User) -> Post {
        Post::create(
            NewPost {
                title: "t".into(),
                content: "c".into(),
                tags: Vec::new(),
                category: PostCategory::General,
                attachments: Vec::new(),
            },
            author,
        )
    }

    #[test]
    fn aggregates_likes_on_own_posts_comments_and_replies() {
        let author = User::new("alice", "hash");
        let other = User::new("bob", "hash");

        let mut post = post_by(&author);
        post.likes = vec![other.id, Uuid::new_v4()];

        let mut own_comment = Comment::new(author.id, "alice", "mine");
        own_comment.likes = vec![other.id];
        let mut own_reply = Reply::new(author.id, "alice", "me again");
        own_reply.likes = vec![other.id, other.id];
        own_comment.replies.push(own_reply);

        let mut others_comment = Comment::new(other.id, "bob", "not yours");
        others_comment.likes = vec![author.id];

        post.comments.push(own_comment);
        post.comments.push(others_comment);

        let karma = aggregate(author.id, &[post]);
        assert_eq!(karma.post_likes, 2);
        assert_eq!(karma.comment_likes, 1);
        assert_eq!(karma.reply_likes, 2);
        assert_eq!(karma.comments_created, 1);
        assert_eq!(karma.replies_created, 1);
        assert_eq!(karma.total(), 5);
    }

    #[test]
    fn skips_posts_by_other_authors() {
        let author = User::new("alice", "hash");
        let other = User::new("bob", "hash");
        let mut post = post_by(&other);
        post.likes = vec![author.id];

        let karma = aggregate(author.id, &[post]);
        assert_eq!(karma, crate::domain::user::KarmaSnapshot::default());
    }

    #[test]
    fn aggregation_is_deterministic() {
        let author = User::new("alice", "hash");
        let mut post = post_by(&author);
        post.likes = vec![Uuid::new_v4(); 7];
        let posts = vec![post];

        assert_eq!(aggregate(author.id, &posts), aggregate(author.id, &posts));
    }
}
