use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ItemRef, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

/// Each kind carries exactly the fields it needs. `Recommendation` always
/// holds the cards extracted for that turn; `SystemNotice` is synthetic and
/// only ever inserted by the conversation manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    Welcome,
    User,
    Response,
    Recommendation { recommended_items: Vec<ItemRef> },
    SystemNotice { dropped_count: usize },
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    #[serde(flatten)]
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(sender: Sender, content: String, kind: MessageKind) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            content,
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn welcome(content: impl Into<String>) -> Self {
        Self::new(Sender::Agent, content.into(), MessageKind::Welcome)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content.into(), MessageKind::User)
    }

    pub fn response(content: impl Into<String>) -> Self {
        Self::new(Sender::Agent, content.into(), MessageKind::Response)
    }

    /// Falls back to a plain response when the card list is empty, so a
    /// recommendation message can never carry zero cards.
    pub fn recommendation(content: impl Into<String>, recommended_items: Vec<ItemRef>) -> Self {
        if recommended_items.is_empty() {
            return Self::response(content);
        }
        Self::new(
            Sender::Agent,
            content.into(),
            MessageKind::Recommendation { recommended_items },
        )
    }

    pub fn trim_notice(content: impl Into<String>, dropped_count: usize) -> Self {
        Self::new(
            Sender::Agent,
            content.into(),
            MessageKind::SystemNotice { dropped_count },
        )
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Sender::Agent, content.into(), MessageKind::Error)
    }

    pub fn recommended_items(&self) -> &[ItemRef] {
        match &self.kind {
            MessageKind::Recommendation { recommended_items } => recommended_items,
            _ => &[],
        }
    }

    pub fn is_system_notice(&self) -> bool {
        matches!(self.kind, MessageKind::SystemNotice { .. })
    }
}
