#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod paginator;
pub mod query;
pub mod results;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use paginator::Paginator;
pub use query::{Query, QueryBuilder};
pub use results::{Facet, FacetValue, SearchResults};
pub use traits::SearchEngine;
pub use types::{Item, Routing, Values};
