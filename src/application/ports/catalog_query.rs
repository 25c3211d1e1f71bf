use async_trait::async_trait;

use crate::domain::CatalogItem;

#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Returns at most `limit` active items. `None` queries across all
    /// categories.
    async fn query(
        &self,
        category: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, CatalogQueryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogQueryError {
    #[error("catalog query failed: {0}")]
    QueryFailed(String),
}
