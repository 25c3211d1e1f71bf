use async_trait::async_trait;

use crate::application::ports::{CatalogQuery, CatalogQueryError};
use crate::domain::CatalogItem;

/// Catalog query over a fixed snapshot. Result order follows insertion
/// order, which is what keeps tied ranking scores stable downstream.
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogQuery for StaticCatalog {
    async fn query(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, CatalogQueryError> {
        let matches = self
            .items
            .iter()
            .filter(|item| item.is_active)
            .filter(|item| {
                category.is_none_or(|category| item.category.eq_ignore_ascii_case(category))
            })
            .take(limit)
            .cloned()
            .collect();
        Ok(matches)
    }
}
