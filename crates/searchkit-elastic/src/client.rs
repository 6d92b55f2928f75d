//! Outbound seam: the handful of remote calls the adapter needs.
//!
//! `HttpClient` talks to a live cluster; tests plug in an in-memory engine.

use async_trait::async_trait;
use serde_json::Value;

use searchkit_core::{Result, Values};

/// Target collection plus the translated request body.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub index: String,
    pub body: Value,
}

/// One entry of a bulk index call.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDocument {
    pub index: String,
    pub doc_type: Option<String>,
    pub id: String,
    pub body: Values,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: String,
    pub status: u16,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub indexed: usize,
    pub failures: Vec<BulkFailure>,
}

#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Returns the engine's response body untouched.
    async fn search(&self, request: &SearchRequest) -> Result<Value>;

    /// One batched call. A transport failure fails the whole batch;
    /// per-document rejections come back in the summary.
    async fn bulk_index(&self, documents: &[BulkDocument]) -> Result<BulkSummary>;

    /// `Ok(None)` when the engine reports the document missing.
    async fn get(&self, index: &str, doc_type: Option<&str>, id: &str) -> Result<Option<Value>>;

    /// `Ok(false)` when the engine reports the document missing.
    async fn delete(&self, index: &str, doc_type: Option<&str>, id: &str) -> Result<bool>;
}
