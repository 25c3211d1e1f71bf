mod catalog_query;
mod conversation_store;
mod generation_client;
mod notification_counter;

pub use catalog_query::{CatalogQuery, CatalogQueryError};
pub use conversation_store::{ConversationStore, ConversationUpdates, StoreError};
pub use generation_client::{GenerationClient, GenerationError};
pub use notification_counter::{NotificationCounter, NotificationError};
