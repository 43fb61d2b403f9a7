//! In-memory `PostRepository` adapter.
//!
//! Likes at every level are set operations returning whether the document
//! changed, matching the `$addToSet`/`$pull` semantics of the MongoDB
//! adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::post::{Comment, Post, Reply};

fn add_to_set(set: &mut Vec<Uuid>, value: Uuid) -> bool {
    if set.contains(&value) {
        false
    } else {
        set.push(value);
        true
    }
}

fn pull_from_set(set: &mut Vec<Uuid>, value: Uuid) -> bool {
    let before = set.len();
    set.retain(|v| *v != value);
    set.len() != before
}

/// Map-backed post store with embedded comments and replies.
#[derive(Default)]
pub struct MemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutate<F>(&self, post_id: Uuid, apply: F) -> Result<bool, PostRepositoryError>
    where
        F: FnOnce(&mut Post) -> bool,
    {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post_id) {
            Some(post) => Ok(apply(post)),
            None => Ok(false),
        }
    }

    async fn mutate_comment<F>(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        apply: F,
    ) -> Result<bool, PostRepositoryError>
    where
        F: FnOnce(&mut Comment) -> bool,
    {
        self.mutate(post_id, move |post| {
            post.comments
                .iter_mut()
                .find(|c| c.id == comment_id)
                .is_some_and(apply)
        })
        .await
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn list_partition(&self, community: bool) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = self.posts.read().await;
        let mut partition: Vec<Post> = posts
            .values()
            .filter(|p| p.is_community == community)
            .cloned()
            .collect();
        partition.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(partition)
    }

    async fn list_all(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = self.posts.read().await;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = self.posts.read().await;
        let mut authored: Vec<Post> = posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        authored.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(authored)
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = ids.iter().filter_map(|id| posts.get(id).cloned()).collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn count(&self) -> Result<u64, PostRepositoryError> {
        Ok(self.posts.read().await.len() as u64)
    }

    async fn count_comments(&self) -> Result<u64, PostRepositoryError> {
        let posts = self.posts.read().await;
        Ok(posts.values().map(|p| p.comments.len() as u64).sum())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PostRepositoryError> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, PostRepositoryError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|_, p| p.author_id != author_id);
        Ok((before - posts.len()) as u64)
    }

    async fn add_post_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        self.mutate(post_id, move |post| add_to_set(&mut post.likes, user_id))
            .await
    }

    async fn remove_post_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        self.mutate(post_id, move |post| pull_from_set(&mut post.likes, user_id))
            .await
    }

    async fn push_comment(
        &self,
        post_id: Uuid,
        comment: &Comment,
    ) -> Result<bool, PostRepositoryError> {
        let comment = comment.clone();
        self.mutate(post_id, move |post| {
            post.comments.push(comment);
            true
        })
        .await
    }

    async fn add_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        self.mutate_comment(post_id, comment_id, move |comment| {
            add_to_set(&mut comment.likes, user_id)
        })
        .await
    }

    async fn remove_comment_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        self.mutate_comment(post_id, comment_id, move |comment| {
            pull_from_set(&mut comment.likes, user_id)
        })
        .await
    }

    async fn push_reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply: &Reply,
    ) -> Result<bool, PostRepositoryError> {
        let reply = reply.clone();
        self.mutate_comment(post_id, comment_id, move |comment| {
            comment.replies.push(reply);
            true
        })
        .await
    }

    async fn add_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        self.mutate_comment(post_id, comment_id, move |comment| {
            comment
                .replies
                .iter_mut()
                .find(|r| r.id == reply_id)
                .is_some_and(|reply| add_to_set(&mut reply.likes, user_id))
        })
        .await
    }

    async fn remove_reply_like(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, PostRepositoryError> {
        self.mutate_comment(post_id, comment_id, move |comment| {
            comment
                .replies
                .iter_mut()
                .find(|r| r.id == reply_id)
                .is_some_and(|reply| pull_from_set(&mut reply.likes, user_id))
        })
        .await
    }

    async fn set_pinned(&self, post_id: Uuid, pinned: bool) -> Result<bool, PostRepositoryError> {
        self.mutate(post_id, move |post| {
            post.pinned = pinned;
            true
        })
        .await
    }

    async fn unpin_partition(&self, community: bool) -> Result<u64, PostRepositoryError> {
        let mut posts = self.posts.write().await;
        let mut unpinned = 0;
        for post in posts.values_mut() {
            if post.is_community == community && post.pinned {
                post.pinned = false;
                unpinned += 1;
            }
        }
        Ok(unpinned)
    }

    async fn remove_user_references(&self, user_id: Uuid) -> Result<u64, PostRepositoryError> {
        let mut posts = self.posts.write().await;
        let mut modified = 0;
        for post in posts.values_mut() {
            let mut touched = pull_from_set(&mut post.likes, user_id);

            let comments_before = post.comments.len();
            post.comments.retain(|c| c.author_id != user_id);
            touched |= post.comments.len() != comments_before;

            for comment in &mut post.comments {
                touched |= pull_from_set(&mut comment.likes, user_id);
                let replies_before = comment.replies.len();
                comment.replies.retain(|r| r.author_id != user_id);
                touched |= comment.replies.len() != replies_before;
                for reply in &mut comment.replies {
                    touched |= pull_from_set(&mut reply.likes, user_id);
                }
            }

            if touched {
                modified += 1;
            }
        }
        Ok(modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::{NewPost, PostCategory};
    use crate::domain::user::User;

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

    #[tokio::test]
    async fn partition_lists_pinned_posts_first() {
        let author = User::new("alice", "h");
        let repo = MemoryPostRepository::new();

        let old = post_by(&author);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let mut pinned = post_by(&author);
        pinned.pinned = true;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let newest = post_by(&author);

        for post in [&old, &pinned, &newest] {
            repo.insert(post).await.expect("insert");
        }

        let listed = repo.list_partition(true).await.expect("list");
        let ids: Vec<Uuid> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![pinned.id, newest.id, old.id]);
    }

    #[tokio::test]
    async fn post_likes_are_set_operations() {
        let author = User::new("alice", "h");
        let post = post_by(&author);
        let user_id = Uuid::new_v4();
        let repo = MemoryPostRepository::new();
        repo.insert(&post).await.expect("insert");

        assert!(repo.add_post_like(post.id, user_id).await.expect("add"));
        assert!(!repo.add_post_like(post.id, user_id).await.expect("re-add"));
        assert!(repo.remove_post_like(post.id, user_id).await.expect("rm"));
        assert!(!repo.remove_post_like(post.id, user_id).await.expect("re-rm"));
    }

    #[tokio::test]
    async fn reply_likes_traverse_the_comment_tree() {
        let author = User::new("alice", "h");
        let mut post = post_by(&author);
        let mut comment = Comment::new(author.id, "alice", "comment");
        let reply = Reply::new(author.id, "alice", "reply");
        let reply_id = reply.id;
        comment.replies.push(reply);
        let comment_id = comment.id;
        post.comments.push(comment);

        let repo = MemoryPostRepository::new();
        repo.insert(&post).await.expect("insert");

        let liker = Uuid::new_v4();
        assert!(
            repo.add_reply_like(post.id, comment_id, reply_id, liker)
                .await
                .expect("like")
        );
        assert!(
            !repo
                .add_reply_like(post.id, comment_id, Uuid::new_v4(), liker)
                .await
                .expect("unknown reply")
        );
    }

    #[tokio::test]
    async fn unpin_partition_only_touches_that_partition() {
        let admin = {
            let mut user = User::new("root", "h");
            user.is_admin = true;
            user
        };
        let member = User::new("alice", "h");

        let mut official = post_by(&admin);
        official.pinned = true;
        let mut community = post_by(&member);
        community.pinned = true;

        let repo = MemoryPostRepository::new();
        repo.insert(&official).await.expect("insert");
        repo.insert(&community).await.expect("insert");

        assert_eq!(repo.unpin_partition(false).await.expect("unpin"), 1);
        let kept = repo
            .find_by_id(community.id)
            .await
            .expect("find")
            .expect("present");
        assert!(kept.pinned);
    }

    #[tokio::test]
    async fn remove_user_references_scrubs_every_level() {
        let author = User::new("alice", "h");
        let leaver = User::new("bob", "h");

        let mut post = post_by(&author);
        post.likes.push(leaver.id);
        let mut keep = Comment::new(author.id, "alice", "keep");
        keep.likes.push(leaver.id);
        keep.replies.push(Reply::new(leaver.id, "bob", "gone"));
        post.comments.push(keep);
        post.comments.push(Comment::new(leaver.id, "bob", "gone"));

        let repo = MemoryPostRepository::new();
        repo.insert(&post).await.expect("insert");

        assert_eq!(
            repo.remove_user_references(leaver.id).await.expect("scrub"),
            1
        );
        let scrubbed = repo
            .find_by_id(post.id)
            .await
            .expect("find")
            .expect("present");
        assert!(scrubbed.likes.is_empty());
        assert_eq!(scrubbed.comments.len(), 1);
        assert!(scrubbed.comments[0].likes.is_empty());
        assert!(scrubbed.comments[0].replies.is_empty());
    }
}
