use async_trait::async_trait;
use futures::stream::{BoxStream, Stream, StreamExt};

use crate::domain::{Conversation, ConversationKey};

#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, key: &ConversationKey) -> Result<Option<Conversation>, StoreError>;

    /// Replaces the stored document. The `messages` field is written as a
    /// whole, so concurrent readers never observe a partially-updated log.
    async fn set(&self, conversation: &Conversation) -> Result<(), StoreError>;

    async fn delete(&self, key: &ConversationKey) -> Result<(), StoreError>;

    async fn subscribe(&self, key: &ConversationKey) -> Result<ConversationUpdates, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("encoded document is {size} bytes, over the {limit} byte platform ceiling")]
    LimitExceeded { size: usize, limit: usize },
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("document serialization failed: {0}")]
    Serialization(String),
}

/// Live view over one conversation document. The handle is owned by the
/// caller and threaded through arguments; dropping it (or calling `close`)
/// ends delivery. There is no process-wide subscription registry.
pub struct ConversationUpdates {
    stream: BoxStream<'static, Conversation>,
}

impl ConversationUpdates {
    pub fn new(stream: impl Stream<Item = Conversation> + Send + 'static) -> Self {
        Self {
            stream: stream.boxed(),
        }
    }

    /// Waits for the next stored snapshot. `None` means the document was
    /// deleted or the store shut down.
    pub async fn next_change(&mut self) -> Option<Conversation> {
        self.stream.next().await
    }

    pub fn close(self) {}
}
