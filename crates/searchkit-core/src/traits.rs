use async_trait::async_trait;

use crate::error::Result;
use crate::query::Query;
use crate::results::SearchResults;
use crate::types::Item;

/// The surface every engine adapter offers to callers.
///
/// Writes take items by value: routing keys are consumed on the way out.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn search(&self, query: Query) -> Result<SearchResults>;

    async fn add(&self, items: Vec<Item>) -> Result<()>;

    /// Writing an existing id overwrites the stored document.
    async fn update(&self, items: Vec<Item>) -> Result<()> {
        self.add(items).await
    }

    async fn remove(&self, item: &Item) -> Result<()>;

    /// `false` covers both "no such document" and "could not ask".
    async fn remove_by_id(&self, item: &Item) -> bool;

    /// `false` covers both "no such document" and "could not ask".
    async fn present(&self, item: &Item) -> bool;
}
