//! Query -> wire request translation.
//!
//! Shape produced for a fully populated query:
//!
//! ```text
//! {
//!   "query":   { <query_type>: <payload> },
//!   "filter":  { "and": [ <filter>, ... ] },
//!   "facets":  { <name>: { ..., "facet_filter": { "and": [ ... ] } } },
//!   "sort":    <order>,
//!   "from":    (page - 1) * count,
//!   "size":    count,
//!   "explain": true
//! }
//! ```
//!
//! Absent parts are omitted; the engine then defaults to match-all.

use serde_json::{json, Map, Value};

use searchkit_core::{Error, Query, Result};

use crate::client::SearchRequest;

pub const FACET_FILTER_KEY: &str = "facet_filter";

/// All filter clauses as one AND group, `None` when there are no filters.
pub fn combine_filters(filters: &Map<String, Value>) -> Option<Value> {
    if filters.is_empty() {
        return None;
    }
    Some(json!({ "and": filters.values().cloned().collect::<Vec<_>>() }))
}

/// Scopes every facet to the main query's filters so counts come from the
/// same filtered result set. Without filters the facets pass through as-is.
pub fn inject_facet_filters(facets: &Map<String, Value>, combined: Option<&Value>) -> Map<String, Value> {
    facets
        .iter()
        .map(|(name, request)| {
            let mut request = request.clone();
            if let (Some(filter), Value::Object(fields)) = (combined, &mut request) {
                fields.insert(FACET_FILTER_KEY.to_string(), filter.clone());
            }
            (name.clone(), request)
        })
        .collect()
}

pub fn build_request(query: &Query) -> Result<SearchRequest> {
    query.validate()?;

    let mut body = Map::new();

    if let Some(payload) = query.query_payload() {
        let query_type = query
            .query_type()
            .ok_or_else(|| Error::invalid_config("queries with a payload must declare a type"))?;
        let mut clause = Map::new();
        clause.insert(query_type.to_string(), payload.clone());
        body.insert("query".to_string(), Value::Object(clause));
    }

    if query.debug() {
        body.insert("explain".to_string(), Value::Bool(true));
    }

    let combined = combine_filters(query.filters());
    if let Some(filter) = &combined {
        body.insert("filter".to_string(), filter.clone());
    }

    if !query.facets().is_empty() {
        let facets = inject_facet_filters(query.facets(), combined.as_ref());
        body.insert("facets".to_string(), Value::Object(facets));
    }

    if let Some(order) = query.order() {
        body.insert("sort".to_string(), order.clone());
    }

    body.insert("from".to_string(), json!(query.offset()));
    body.insert("size".to_string(), json!(query.count()));

    Ok(SearchRequest { index: query.index().to_string(), body: Value::Object(body) })
}
