use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only catalog snapshot used for ranking. Sourced fresh per query and
/// never owned by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub category: String,
    pub subcategory: String,
    pub tags: Vec<String>,
    pub basic_price: f64,
    pub basic_delivery_days: u32,
    pub rating: f32,
    pub review_count: u32,
    pub total_orders: u32,
    pub is_active: bool,
}

/// Card payload carried by recommendation messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: ItemId,
    pub title: String,
    pub basic_price: f64,
}

impl From<&CatalogItem> for ItemRef {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            basic_price: item.basic_price,
        }
    }
}
