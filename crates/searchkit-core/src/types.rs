//! Domain types shared by every engine adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub type ItemId = String;
pub type Values = Map<String, Value>;

/// Routing keys callers put into `Item::values` for write operations.
pub const INDEX_KEY: &str = "index";
pub const TYPE_KEY: &str = "type";

/// Engine metadata merged back into the values of search hits.
pub const ENGINE_INDEX_KEY: &str = "_index";
pub const ENGINE_VERSION_KEY: &str = "_version";

/// A document: identifier plus an open-ended payload.
///
/// - as write input, `values` carries `index` (required) and `type`
///   (optional) which are routing metadata, not document body
/// - as search output, `values` is the stored body with `_index` (and
///   `_version` when known) merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub values: Values,
}

/// Where a document lives in the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub index: String,
    pub doc_type: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into(), values: Values::new() }
    }

    pub fn with_values(id: impl Into<ItemId>, values: Values) -> Self {
        Self { id: id.into(), values }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Reads the routing keys without touching the payload.
    pub fn routing(&self) -> Result<Routing> {
        let index = match self.values.get(INDEX_KEY) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(Error::invalid_config(format!(
                    "item '{}' has an empty '{}'",
                    self.id, INDEX_KEY
                )))
            }
            Some(other) => {
                return Err(Error::invalid_config(format!(
                    "item '{}' has a non-string '{}': {}",
                    self.id, INDEX_KEY, other
                )))
            }
            None => {
                return Err(Error::invalid_config(format!(
                    "item '{}' is missing '{}'",
                    self.id, INDEX_KEY
                )))
            }
        };
        let doc_type = match self.values.get(TYPE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(Error::invalid_config(format!(
                    "item '{}' has a non-string '{}': {}",
                    self.id, TYPE_KEY, other
                )))
            }
        };
        Ok(Routing { index, doc_type })
    }

    /// Removes the routing keys so that `values` is exactly the document body.
    pub fn take_routing(&mut self) -> Result<Routing> {
        let routing = self.routing()?;
        self.values.shift_remove(INDEX_KEY);
        self.values.shift_remove(TYPE_KEY);
        Ok(routing)
    }
}
