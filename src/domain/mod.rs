mod catalog_item;
mod category;
mod conversation;
mod conversation_key;
mod message;
mod message_id;

pub use catalog_item::{CatalogItem, ItemId, ItemRef};
pub use category::CategoryKeywordTable;
pub use conversation::Conversation;
pub use conversation_key::ConversationKey;
pub use message::{Message, MessageKind, Sender};
pub use message_id::MessageId;
