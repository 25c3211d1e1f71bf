use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, instrument};

use crate::application::ports::{ConversationStore, ConversationUpdates, StoreError};
use crate::domain::{Conversation, ConversationKey};

/// Document ceiling of the backing platform.
const DEFAULT_DOCUMENT_LIMIT: usize = 1024 * 1024;

const FEED_CAPACITY: usize = 16;

/// Conversation document store backed by process memory. Writes replace the
/// whole document and are rejected once the encoded size crosses the
/// configured ceiling, mirroring the platform the production adapter talks
/// to. Each document carries an optional change feed for live subscribers.
pub struct InMemoryConversationStore {
    document_limit: usize,
    documents: RwLock<HashMap<ConversationKey, Conversation>>,
    feeds: RwLock<HashMap<ConversationKey, broadcast::Sender<Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::with_document_limit(DEFAULT_DOCUMENT_LIMIT)
    }

    pub fn with_document_limit(document_limit: usize) -> Self {
        Self {
            document_limit,
            documents: RwLock::new(HashMap::new()),
            feeds: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, key: &ConversationKey) -> Result<Option<Conversation>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    #[instrument(skip(self, conversation), fields(key = %conversation.key))]
    async fn set(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec(conversation)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        if encoded.len() > self.document_limit {
            return Err(StoreError::LimitExceeded {
                size: encoded.len(),
                limit: self.document_limit,
            });
        }

        self.documents
            .write()
            .await
            .insert(conversation.key.clone(), conversation.clone());
        debug!(size = encoded.len(), "document written");

        if let Some(feed) = self.feeds.read().await.get(&conversation.key) {
            // no receivers is fine; the feed is only live while a chat view
            // is open
            let _ = feed.send(conversation.clone());
        }

        Ok(())
    }

    async fn delete(&self, key: &ConversationKey) -> Result<(), StoreError> {
        self.documents.write().await.remove(key);
        // dropping the sender ends every live subscription for the document
        self.feeds.write().await.remove(key);
        Ok(())
    }

    async fn subscribe(&self, key: &ConversationKey) -> Result<ConversationUpdates, StoreError> {
        let mut feeds = self.feeds.write().await;
        let sender = feeds
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0);
        let receiver = sender.subscribe();

        let stream = futures::stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(conversation) => return Some((conversation, receiver)),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(ConversationUpdates::new(stream))
    }
}
