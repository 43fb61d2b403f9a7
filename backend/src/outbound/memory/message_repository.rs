//! In-memory `MessageRepository` adapter.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::message::Message;
use crate::domain::ports::{MessageRepository, MessageRepositoryError};

/// Vec-backed message store.
#[derive(Default)]
pub struct MemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn involves(message: &Message, user_id: Uuid) -> bool {
    message.sender_id == user_id || message.recipient_id == user_id
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), MessageRepositoryError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn thread_between(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let messages = self.messages.read().await;
        let mut thread: Vec<Message> = messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.recipient_id == b)
                    || (m.sender_id == b && m.recipient_id == a)
            })
            .cloned()
            .collect();
        thread.sort_by(|x, y| x.created_at.cmp(&y.created_at));
        Ok(thread)
    }

    async fn mark_read_from(
        &self,
        recipient: Uuid,
        sender: Uuid,
    ) -> Result<u64, MessageRepositoryError> {
        let mut messages = self.messages.write().await;
        let mut flipped = 0;
        for message in messages.iter_mut() {
            if message.recipient_id == recipient && message.sender_id == sender && !message.read {
                message.read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn list_involving(&self, user_id: Uuid) -> Result<Vec<Message>, MessageRepositoryError> {
        let messages = self.messages.read().await;
        let mut involved: Vec<Message> = messages
            .iter()
            .filter(|m| involves(m, user_id))
            .cloned()
            .collect();
        involved.sort_by(|x, y| y.created_at.cmp(&x.created_at));
        Ok(involved)
    }

    async fn unread_count(&self, recipient: Uuid) -> Result<u64, MessageRepositoryError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.recipient_id == recipient && !m.read)
            .count() as u64)
    }

    async fn count(&self) -> Result<u64, MessageRepositoryError> {
        Ok(self.messages.read().await.len() as u64)
    }

    async fn delete_involving(&self, user_id: Uuid) -> Result<u64, MessageRepositoryError> {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| !involves(m, user_id));
        Ok((before - messages.len()) as u64)
    }
}
