use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::paginator::Paginator;
use crate::query::Query;
use crate::types::Item;

/// One bucket of a facet breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetValue {
    pub value: Value,
    pub count: u64,
}

/// Term buckets of one requested facet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    pub name: String,
    pub values: Vec<FacetValue>,
}

/// The answer to one `search` call. Items keep the engine's hit order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: Query,
    pub pager: Paginator,
    pub elapsed: Duration,
    pub items: Vec<Item>,
    /// In the order the query requested them.
    pub facets: Vec<Facet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl SearchResults {
    pub fn new(query: Query, pager: Paginator, elapsed: Duration) -> Self {
        Self { query, pager, elapsed, items: Vec::new(), facets: Vec::new(), raw: None }
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Replaces the buckets of an existing facet in place, otherwise appends.
    pub fn set_facet(&mut self, name: impl Into<String>, values: Vec<FacetValue>) {
        let name = name.into();
        match self.facets.iter_mut().find(|f| f.name == name) {
            Some(facet) => facet.values = values,
            None => self.facets.push(Facet { name, values }),
        }
    }

    pub fn facet(&self, name: &str) -> Option<&[FacetValue]> {
        self.facets.iter().find(|f| f.name == name).map(|f| f.values.as_slice())
    }

    pub fn facet_names(&self) -> impl Iterator<Item = &str> {
        self.facets.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, i: usize) -> Option<&Item> {
        self.items.get(i)
    }

    /// Total hit count reported by the engine, not the length of this page.
    pub fn total(&self) -> u64 {
        self.pager.total_entries()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
