use async_trait::async_trait;

use crate::domain::ConversationKey;

/// Unread-badge bookkeeping kept next to each conversation. Counter
/// failures never fail a send; callers log and move on.
#[async_trait]
pub trait NotificationCounter: Send + Sync {
    /// Bumps the user's unread count after an agent reply.
    async fn increment_unread(&self, key: &ConversationKey) -> Result<(), NotificationError>;

    /// Clears the agent's unread count once the user's turn is handled.
    async fn reset_unread(&self, key: &ConversationKey) -> Result<(), NotificationError>;

    /// Removes the companion record entirely (conversation reset).
    async fn clear(&self, key: &ConversationKey) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("counter update failed: {0}")]
    UpdateFailed(String),
}
