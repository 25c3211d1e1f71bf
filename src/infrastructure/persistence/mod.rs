mod memory_conversation_store;
mod memory_notification_counter;

pub use memory_conversation_store::InMemoryConversationStore;
pub use memory_notification_counter::{InMemoryNotificationCounter, UnreadCounts};
