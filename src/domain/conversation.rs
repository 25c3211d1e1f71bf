use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConversationKey, Message};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub key: ConversationKey,
    pub messages: Vec<Message>,
    pub last_message_time: DateTime<Utc>,
    pub is_active: bool,
    pub trimmed_count: usize,
    pub last_trim_size_before: Option<usize>,
    pub last_trim_size_after: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// A fresh conversation starts with a single welcome message.
    pub fn new(key: ConversationKey, welcome_text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            key,
            messages: vec![Message::welcome(welcome_text)],
            last_message_time: now,
            is_active: true,
            trimmed_count: 0,
            last_trim_size_before: None,
            last_trim_size_after: None,
            created_at: now,
        }
    }

    /// Appends a message, refusing duplicates by id.
    pub fn push(&mut self, message: Message) {
        if self.messages.iter().any(|m| m.id == message.id) {
            return;
        }
        self.last_message_time = message.created_at;
        self.messages.push(message);
    }

    /// Trailing window of at most `n` messages, in log order.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}
