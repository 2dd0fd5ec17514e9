use std::fmt::Debug;

use async_trait::async_trait;

use crate::entity::AdPlacement;
use crate::entity::Creative;
use crate::types::Result;

/// Durable, uniquely keyed storage of placements and creatives.
///
/// [`DbStore`](crate::store::DbStore) is the production implementation. The cache only ever talks to the store through
/// this trait.
#[async_trait]
pub trait CatalogStore: Debug + Send + Sync + 'static {
    /// Make sure both tables exist. Safe to call any number of times.
    async fn create_schema(&self) -> Result<()>;

    /// Fails with [`DuplicateKey`](crate::types::CatalogError::DuplicateKey) if the ID is taken.
    async fn insert_placement(&self, placement: &AdPlacement) -> Result<()>;
    /// Fails with [`DuplicateKey`](crate::types::CatalogError::DuplicateKey) if the ID is taken.
    async fn insert_creative(&self, creative: &Creative) -> Result<()>;

    // Full scans. An empty table is an empty vector, not an error.
    async fn load_all_placements(&self) -> Result<Vec<AdPlacement>>;
    async fn load_all_creatives(&self) -> Result<Vec<Creative>>;
}

/// Drives the periodic catalog refresh. Each completed `tick()` triggers one refresh.
#[async_trait]
pub trait RefreshTicker: Send + 'static {
    /// Wait for the next refresh. Returning `false` ends the refresh task.
    async fn tick(&mut self) -> bool;
}

#[async_trait]
impl RefreshTicker for tokio::time::Interval {
    async fn tick(&mut self) -> bool {
        tokio::time::Interval::tick(self).await;
        true
    }
}
