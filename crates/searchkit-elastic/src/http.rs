//! reqwest-backed `EngineClient`.
//!
//! Servers are used round-robin, one per request. A transport failure is
//! reported once; there is no failover or retry.

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use searchkit_core::config::EngineConfig;
use searchkit_core::{Error, Result};

use crate::client::{BulkDocument, BulkFailure, BulkSummary, EngineClient, SearchRequest};

/// Used in document URLs when an item carries no type.
pub const DEFAULT_DOC_TYPE: &str = "_doc";

pub struct HttpClient {
    client: Client,
    servers: Vec<Url>,
    next: AtomicUsize,
    trace: bool,
}

impl HttpClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let servers = config
            .base_urls()
            .iter()
            .map(|s| Url::parse(s).map_err(|e| Error::invalid_config(format!("bad server address '{s}': {e}"))))
            .collect::<Result<Vec<_>>>()?;
        if servers.is_empty() {
            return Err(Error::invalid_config("no search servers configured"));
        }

        let mut builder = Client::builder().user_agent(concat!("searchkit/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::invalid_config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, servers, next: AtomicUsize::new(0), trace: config.trace })
    }

    pub fn servers(&self) -> &[Url] {
        &self.servers
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.servers.len();
        let mut url = self.servers[i].clone();
        url.path_segments_mut()
            .map_err(|()| Error::invalid_config(format!("server address '{}' cannot carry a path", self.servers[i])))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<RequestBody>) -> Result<Response> {
        if self.trace {
            debug!(%method, %url, body = ?body, "engine request");
        }
        let mut request = self.client.request(method, url);
        request = match body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::NdJson(text)) => request.header("Content-Type", "application/x-ndjson").body(text),
            None => request,
        };
        request.send().await.map_err(unavailable)
    }

    async fn read_json(&self, response: Response) -> Result<Value> {
        let text = response.text().await.map_err(unavailable)?;
        if self.trace {
            debug!(body = %text, "engine response");
        }
        serde_json::from_str(&text).map_err(|e| Error::malformed(format!("response is not JSON: {e}")))
    }

    fn document_segments<'a>(index: &'a str, doc_type: Option<&'a str>, id: &'a str) -> [&'a str; 3] {
        [index, doc_type.unwrap_or(DEFAULT_DOC_TYPE), id]
    }
}

#[derive(Debug)]
enum RequestBody {
    Json(Value),
    NdJson(String),
}

fn unavailable(e: reqwest::Error) -> Error {
    Error::EngineUnavailable(e.to_string())
}

async fn rejected(response: Response) -> Error {
    let status = response.status().as_u16();
    let reason = response.text().await.unwrap_or_default();
    Error::Rejected { status, reason }
}

fn bulk_body(documents: &[BulkDocument]) -> Result<String> {
    let mut out = String::new();
    for doc in documents {
        let mut action = Map::new();
        action.insert("_index".to_string(), Value::String(doc.index.clone()));
        if let Some(doc_type) = &doc.doc_type {
            action.insert("_type".to_string(), Value::String(doc_type.clone()));
        }
        action.insert("_id".to_string(), Value::String(doc.id.clone()));
        out.push_str(&json!({ "index": action }).to_string());
        out.push('\n');
        let body = serde_json::to_string(&doc.body)
            .map_err(|e| Error::invalid_config(format!("document '{}' cannot be encoded: {e}", doc.id)))?;
        out.push_str(&body);
        out.push('\n');
    }
    Ok(out)
}

/// Splits a bulk response into successes and per-document rejections.
pub fn summarize_bulk(response: &Value, total: usize) -> BulkSummary {
    let mut failures = Vec::new();
    let items = response.get("items").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    for entry in items {
        let Some(op) = entry.as_object().and_then(|o| o.values().next()) else { continue };
        let status = op.get("status").and_then(Value::as_u64).unwrap_or(200);
        let error = op.get("error").filter(|e| !e.is_null());
        if status < 300 && error.is_none() {
            continue;
        }
        let reason = match error {
            Some(Value::Object(e)) => e
                .get("reason")
                .and_then(Value::as_str)
                .map_or_else(|| Value::Object(e.clone()).to_string(), str::to_string),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => format!("status {status}"),
        };
        failures.push(BulkFailure {
            id: op.get("_id").and_then(Value::as_str).unwrap_or_default().to_string(),
            status: u16::try_from(status).unwrap_or(u16::MAX),
            reason,
        });
    }
    BulkSummary { indexed: total.saturating_sub(failures.len()), failures }
}

#[async_trait]
impl EngineClient for HttpClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        let url = self.url(&[request.index.as_str(), "_search"])?;
        let response = self.send(Method::POST, url, Some(RequestBody::Json(request.body.clone()))).await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        self.read_json(response).await
    }

    async fn bulk_index(&self, documents: &[BulkDocument]) -> Result<BulkSummary> {
        if documents.is_empty() {
            return Ok(BulkSummary::default());
        }
        let url = self.url(&["_bulk"])?;
        let body = bulk_body(documents)?;
        let response = self.send(Method::POST, url, Some(RequestBody::NdJson(body))).await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        let value = self.read_json(response).await?;
        Ok(summarize_bulk(&value, documents.len()))
    }

    async fn get(&self, index: &str, doc_type: Option<&str>, id: &str) -> Result<Option<Value>> {
        let url = self.url(&Self::document_segments(index, doc_type, id))?;
        let response = self.send(Method::GET, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        let value = self.read_json(response).await?;
        if value.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(None);
        }
        Ok(Some(value))
    }

    async fn delete(&self, index: &str, doc_type: Option<&str>, id: &str) -> Result<bool> {
        let url = self.url(&Self::document_segments(index, doc_type, id))?;
        let response = self.send(Method::DELETE, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        let value = self.read_json(response).await?;
        let missing = value.get("found").and_then(Value::as_bool) == Some(false)
            || value.get("result").and_then(Value::as_str) == Some("not_found");
        Ok(!missing)
    }
}
