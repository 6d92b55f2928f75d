//! Backend-agnostic search request.
//!
//! A `Query` is assembled once through `QueryBuilder` and is read-only
//! afterwards. Engine adapters translate it into their own wire format.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    index: String,
    query_payload: Option<Value>,
    query_type: Option<String>,
    filters: Map<String, Value>,
    facets: Map<String, Value>,
    order: Option<Value>,
    page: usize,
    count: usize,
    debug: bool,
}

impl Query {
    pub fn builder(index: impl Into<String>) -> QueryBuilder {
        QueryBuilder::new(index)
    }

    pub fn index(&self) -> &str { &self.index }
    pub fn query_payload(&self) -> Option<&Value> { self.query_payload.as_ref() }
    pub fn query_type(&self) -> Option<&str> { self.query_type.as_deref() }
    pub fn filters(&self) -> &Map<String, Value> { &self.filters }
    pub fn facets(&self) -> &Map<String, Value> { &self.facets }
    pub fn order(&self) -> Option<&Value> { self.order.as_ref() }
    pub fn page(&self) -> usize { self.page }
    pub fn count(&self) -> usize { self.count }
    pub fn debug(&self) -> bool { self.debug }

    /// Zero-based position of the first hit of the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.count)
    }

    /// Checks the invariants that no engine can recover from.
    pub fn validate(&self) -> Result<()> {
        if self.query_payload.is_some() && self.query_type.is_none() {
            return Err(Error::invalid_config("queries with a payload must declare a type"));
        }
        if self.page == 0 {
            return Err(Error::invalid_config("page numbers start at 1"));
        }
        if self.count == 0 {
            return Err(Error::invalid_config("page size must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    inner: Query,
}

impl QueryBuilder {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            inner: Query {
                index: index.into(),
                query_payload: None,
                query_type: None,
                filters: Map::new(),
                facets: Map::new(),
                order: None,
                page: 1,
                count: DEFAULT_PAGE_SIZE,
                debug: false,
            },
        }
    }

    /// Sets payload and type together, e.g. `("match", json!({"title": "rust"}))`.
    #[must_use]
    pub fn query(mut self, query_type: impl Into<String>, payload: Value) -> Self {
        self.inner.query_type = Some(query_type.into());
        self.inner.query_payload = Some(payload);
        self
    }

    #[must_use]
    pub fn query_payload(mut self, payload: Value) -> Self {
        self.inner.query_payload = Some(payload);
        self
    }

    #[must_use]
    pub fn query_type(mut self, query_type: impl Into<String>) -> Self {
        self.inner.query_type = Some(query_type.into());
        self
    }

    /// Adds a named filter clause. Re-using a name replaces the clause in place.
    #[must_use]
    pub fn filter(mut self, name: impl Into<String>, clause: Value) -> Self {
        self.inner.filters.insert(name.into(), clause);
        self
    }

    #[must_use]
    pub fn facet(mut self, name: impl Into<String>, request: Value) -> Self {
        self.inner.facets.insert(name.into(), request);
        self
    }

    #[must_use]
    pub fn order(mut self, order: Value) -> Self {
        self.inner.order = Some(order);
        self
    }

    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.inner.page = page;
        self
    }

    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.inner.count = count;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.inner.debug = debug;
        self
    }

    pub fn build(self) -> Query {
        self.inner
    }
}
