//! searchkit-elastic
//!
//! Maps `searchkit_core` queries and items onto an Elasticsearch-style HTTP
//! query API. `request` and `response` hold the pure translation steps,
//! `engine` wires them to an `EngineClient`.

pub mod client;
pub mod engine;
pub mod http;
pub mod request;
pub mod response;

pub use client::{BulkDocument, BulkFailure, BulkSummary, EngineClient, SearchRequest};
pub use engine::ElasticSearch;
pub use http::HttpClient;
