use std::fmt;

use serde::{Deserialize, Serialize};

/// A conversation is owned by exactly one user/agent pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub user_id: String,
    pub agent_id: String,
}

impl ConversationKey {
    pub fn new(user_id: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            agent_id: agent_id.into(),
        }
    }

    /// Storage key of the backing conversation document.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.user_id, self.agent_id)
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.user_id, self.agent_id)
    }
}
