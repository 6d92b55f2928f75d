//! In-memory `EngineClient` for integration tests.
//!
//! Searches are match-all over one index in insertion order, honoring
//! `from`/`size`. A canned response, forced outage and per-id bulk
//! rejections can be switched on to exercise the adapter's error paths.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use searchkit_core::{Error, Result, Values};
use searchkit_elastic::{BulkDocument, BulkFailure, BulkSummary, EngineClient, SearchRequest};

#[derive(Debug, Clone)]
struct Stored {
    index: String,
    doc_type: Option<String>,
    id: String,
    version: u64,
    body: Values,
}

#[derive(Default)]
pub struct MemoryClient {
    docs: Mutex<Vec<Stored>>,
    searches: Mutex<Vec<SearchRequest>>,
    bulks: Mutex<Vec<Vec<BulkDocument>>>,
    canned: Mutex<Option<Value>>,
    reject_ids: Mutex<Vec<String>>,
    down: AtomicBool,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: Value) -> Self {
        let client = Self::default();
        *client.canned.lock().unwrap() = Some(response);
        client
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn reject(&self, id: &str) {
        self.reject_ids.lock().unwrap().push(id.to_string());
    }

    pub fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }

    pub fn bulks(&self) -> Vec<Vec<BulkDocument>> {
        self.bulks.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    fn check_up(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::EngineUnavailable("connection refused".into()));
        }
        Ok(())
    }
}

fn same_slot(doc: &Stored, index: &str, doc_type: Option<&str>, id: &str) -> bool {
    doc.index == index && doc.id == id && (doc_type.is_none() || doc.doc_type.as_deref() == doc_type)
}

#[async_trait]
impl EngineClient for MemoryClient {
    async fn search(&self, request: &SearchRequest) -> Result<Value> {
        self.check_up()?;
        self.searches.lock().unwrap().push(request.clone());
        if let Some(canned) = self.canned.lock().unwrap().clone() {
            return Ok(canned);
        }

        let from = request.body.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;
        let size = request.body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;
        let docs = self.docs.lock().unwrap();
        let matching: Vec<&Stored> = docs.iter().filter(|d| d.index == request.index).collect();
        let hits: Vec<Value> = matching
            .iter()
            .skip(from)
            .take(size)
            .map(|d| {
                json!({
                    "_index": d.index,
                    "_type": d.doc_type,
                    "_id": d.id,
                    "_version": d.version,
                    "_score": 1.0,
                    "_source": d.body,
                })
            })
            .collect();
        Ok(json!({
            "took": 1,
            "timed_out": false,
            "hits": { "total": matching.len(), "max_score": 1.0, "hits": hits },
        }))
    }

    async fn bulk_index(&self, documents: &[BulkDocument]) -> Result<BulkSummary> {
        self.check_up()?;
        self.bulks.lock().unwrap().push(documents.to_vec());
        let rejected = self.reject_ids.lock().unwrap().clone();
        let mut docs = self.docs.lock().unwrap();
        let mut failures = Vec::new();
        for doc in documents {
            if rejected.contains(&doc.id) {
                failures.push(BulkFailure { id: doc.id.clone(), status: 400, reason: "mapper_parsing_exception".into() });
                continue;
            }
            match docs.iter_mut().find(|d| same_slot(d, &doc.index, doc.doc_type.as_deref(), &doc.id)) {
                Some(existing) => {
                    existing.body = doc.body.clone();
                    existing.version += 1;
                }
                None => docs.push(Stored {
                    index: doc.index.clone(),
                    doc_type: doc.doc_type.clone(),
                    id: doc.id.clone(),
                    version: 1,
                    body: doc.body.clone(),
                }),
            }
        }
        Ok(BulkSummary { indexed: documents.len() - failures.len(), failures })
    }

    async fn get(&self, index: &str, doc_type: Option<&str>, id: &str) -> Result<Option<Value>> {
        self.check_up()?;
        let docs = self.docs.lock().unwrap();
        Ok(docs.iter().find(|d| same_slot(d, index, doc_type, id)).map(|d| {
            json!({ "_index": d.index, "_id": d.id, "_version": d.version, "found": true, "_source": d.body })
        }))
    }

    async fn delete(&self, index: &str, doc_type: Option<&str>, id: &str) -> Result<bool> {
        self.check_up()?;
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| !same_slot(d, index, doc_type, id));
        Ok(docs.len() < before)
    }
}
