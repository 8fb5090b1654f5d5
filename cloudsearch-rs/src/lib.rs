//! CloudSearch - a typed client for hosted document-search services.
//!
//! # Overview
//!
//! The crate turns structured queries into the service's URL grammar and
//! decodes its JSON responses back into typed documents:
//! - Boolean conditions (text, integer, ranges, lists, nested groups, negation)
//!   compiled into the `bq=` expression
//! - Facets with top-N limits and value or range constraints
//! - Paging, field selection and ranking
//! - Add, update and delete batches, split by serialized size
//! - Per-client persistent conditions applied to every search
//!
//! # Example
//!
//! ```no_run
//! use cloudsearch::query::{IntCondition, IntegerRange, SearchQuery, StringCondition};
//! use cloudsearch::{search_document, CloudSearch, CloudSearchSettings};
//!
//! search_document! {
//!     #[derive(Debug, Default, Clone)]
//!     pub struct Movie {
//!         pub title: String,
//!         pub year: i64,
//!         pub genre: Vec<String>,
//!     }
//! }
//!
//! let client = CloudSearch::<Movie>::new(CloudSearchSettings::new(
//!     "movies-abc.us-east-1.cloudsearch.amazonaws.com",
//!     "2011-02-01",
//! ))
//! .unwrap();
//!
//! let query = SearchQuery::<Movie>::new()
//!     .with_keyword("star")
//!     .with_condition(StringCondition::new("genre", "Sci-Fi"))
//!     .with_condition(IntCondition::range("year", IntegerRange::between(1977, 1983)));
//!
//! let result = client.search(&query);
//! for hit in &result.hits {
//!     println!("{} {}", hit.id, hit.data.title);
//! }
//! ```

pub mod builder;
pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod result;
pub mod serialization;
pub mod transport;

// Re-export main types at crate root
pub use client::CloudSearch;
pub use config::CloudSearchSettings;
pub use document::SearchDocument;
pub use error::{CloudSearchError, Result};
pub use result::{AddResult, DeleteResult, DocumentResult, Hit, SearchResult, UpdateResult};
pub use transport::{HttpTransport, Transport};
