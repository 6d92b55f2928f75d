use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, warn};

use searchkit_core::config::EngineConfig;
use searchkit_core::{Error, Item, Query, Result, SearchEngine, SearchResults};

use crate::client::{BulkDocument, EngineClient};
use crate::http::HttpClient;
use crate::request::build_request;
use crate::response::into_results;

/// Adapter from the generic search model onto an Elasticsearch-style engine.
///
/// Holds nothing but its client, so one instance can serve concurrent
/// callers; each call makes exactly one round trip.
pub struct ElasticSearch<C = HttpClient> {
    client: C,
}

impl ElasticSearch<HttpClient> {
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::new(config)?))
    }
}

impl<C: EngineClient> ElasticSearch<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Direct access to the client for operations the adapter does not cover.
    pub fn engine(&self) -> &C {
        &self.client
    }

    /// Like `present`, but keeps failures apart from "not found".
    pub async fn try_present(&self, item: &Item) -> Result<bool> {
        let routing = item.routing()?;
        let doc = self.client.get(&routing.index, routing.doc_type.as_deref(), &item.id).await?;
        Ok(doc.is_some())
    }

    /// Like `remove_by_id`, but keeps failures apart from "not found".
    pub async fn try_remove_by_id(&self, item: &Item) -> Result<bool> {
        let routing = item.routing()?;
        self.client.delete(&routing.index, routing.doc_type.as_deref(), &item.id).await
    }
}

fn into_bulk_document(mut item: Item) -> Result<BulkDocument> {
    let routing = item.take_routing()?;
    Ok(BulkDocument { index: routing.index, doc_type: routing.doc_type, id: item.id, body: item.values })
}

#[async_trait]
impl<C: EngineClient> SearchEngine for ElasticSearch<C> {
    async fn search(&self, query: Query) -> Result<SearchResults> {
        let request = build_request(&query)?;
        debug!(index = %request.index, page = query.page(), count = query.count(), "search");

        let start = Instant::now();
        let raw = self.client.search(&request).await?;
        let elapsed = start.elapsed();

        let results = into_results(query, raw, elapsed)?;
        debug!(
            total = results.total(),
            hits = results.len(),
            elapsed_ms = elapsed.as_millis(),
            "search complete"
        );
        Ok(results)
    }

    async fn add(&self, items: Vec<Item>) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let documents = items.into_iter().map(into_bulk_document).collect::<Result<Vec<_>>>()?;
        let total = documents.len();

        let summary = self.client.bulk_index(&documents).await?;
        if summary.failures.is_empty() {
            debug!(indexed = summary.indexed, "bulk index complete");
            return Ok(());
        }
        for failure in &summary.failures {
            warn!(id = %failure.id, status = failure.status, reason = %failure.reason, "document rejected");
        }
        Err(Error::PartialBatch { failed: summary.failures.len(), total })
    }

    async fn remove(&self, _item: &Item) -> Result<()> {
        Err(Error::NotImplemented("remove"))
    }

    async fn remove_by_id(&self, item: &Item) -> bool {
        match self.try_remove_by_id(item).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!(id = %item.id, error = %e, "remove_by_id failed, reporting not found");
                false
            }
        }
    }

    async fn present(&self, item: &Item) -> bool {
        match self.try_present(item).await {
            Ok(found) => found,
            Err(e) => {
                warn!(id = %item.id, error = %e, "presence check failed, reporting absent");
                false
            }
        }
    }
}
