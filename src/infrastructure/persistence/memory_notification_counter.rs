use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{NotificationCounter, NotificationError};
use crate::domain::ConversationKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadCounts {
    /// Agent replies the user has not opened yet.
    pub user_unread: u32,
    /// User messages pending on the agent side.
    pub agent_unread: u32,
}

#[derive(Default)]
pub struct InMemoryNotificationCounter {
    counts: RwLock<HashMap<ConversationKey, UnreadCounts>>,
}

impl InMemoryNotificationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn unread(&self, key: &ConversationKey) -> Option<UnreadCounts> {
        self.counts.read().await.get(key).copied()
    }
}

#[async_trait]
impl NotificationCounter for InMemoryNotificationCounter {
    async fn increment_unread(&self, key: &ConversationKey) -> Result<(), NotificationError> {
        let mut counts = self.counts.write().await;
        counts.entry(key.clone()).or_default().user_unread += 1;
        Ok(())
    }

    async fn reset_unread(&self, key: &ConversationKey) -> Result<(), NotificationError> {
        let mut counts = self.counts.write().await;
        counts.entry(key.clone()).or_default().agent_unread = 0;
        Ok(())
    }

    async fn clear(&self, key: &ConversationKey) -> Result<(), NotificationError> {
        self.counts.write().await.remove(key);
        Ok(())
    }
}
