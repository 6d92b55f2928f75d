//! Wire response -> `SearchResults`.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use searchkit_core::types::{ENGINE_INDEX_KEY, ENGINE_VERSION_KEY};
use searchkit_core::{Error, FacetValue, Item, Paginator, Query, Result, SearchResults};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Option<HitsEnvelope>,
    #[serde(default)]
    pub facets: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct HitsEnvelope {
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Older engines report a bare number, newer ones `{ "value": n, ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_index")]
    pub index: Option<String>,
    #[serde(rename = "_version")]
    pub version: Option<u64>,
    #[serde(rename = "_source")]
    pub source: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct TermsFacet {
    terms: Vec<TermBucket>,
}

#[derive(Debug, Deserialize)]
struct TermBucket {
    term: Value,
    count: u64,
}

impl SearchResponse {
    pub fn parse(raw: &Value) -> Result<Self> {
        Self::deserialize(raw).map_err(|e| Error::malformed(format!("unexpected search response: {e}")))
    }

    pub fn total(&self) -> Result<u64> {
        match self.hits.as_ref().and_then(|h| h.total.as_ref()) {
            Some(TotalHits::Count(n) | TotalHits::Object { value: n }) => Ok(*n),
            None => Err(Error::malformed("response carries no hits.total")),
        }
    }

    /// Term buckets of one facet in engine order. `None` for facets that are
    /// missing or not term-shaped.
    pub fn facet_values(&self, name: &str) -> Option<Vec<FacetValue>> {
        let facet = self.facets.get(name)?;
        let terms = TermsFacet::deserialize(facet).ok()?;
        Some(
            terms
                .terms
                .into_iter()
                .map(|b| FacetValue { value: b.term, count: b.count })
                .collect(),
        )
    }
}

impl Hit {
    pub fn into_item(self) -> Result<Item> {
        let id = self.id.ok_or_else(|| Error::malformed("hit without _id"))?;
        let mut values = self.source.unwrap_or_default();
        if let Some(index) = self.index {
            values.insert(ENGINE_INDEX_KEY.to_string(), Value::String(index));
        }
        if let Some(version) = self.version {
            values.insert(ENGINE_VERSION_KEY.to_string(), Value::from(version));
        }
        Ok(Item::with_values(id, values))
    }
}

/// Builds the result for `query` from the engine's raw answer.
pub fn into_results(query: Query, raw: Value, elapsed: Duration) -> Result<SearchResults> {
    let response = SearchResponse::parse(&raw)?;
    let total = response.total()?;

    let pager = Paginator::new(query.page() as u64, query.count() as u64, total);
    let facet_names: Vec<String> = query.facets().keys().cloned().collect();
    let keep_raw = query.debug();

    let mut results = SearchResults::new(query, pager, elapsed);
    for name in facet_names {
        if let Some(values) = response.facet_values(&name) {
            results.set_facet(name, values);
        }
    }
    for hit in response.hits.into_iter().flat_map(|h| h.hits) {
        results.add_item(hit.into_item()?);
    }
    if keep_raw {
        results.raw = Some(raw);
    }
    Ok(results)
}
