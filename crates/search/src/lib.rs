//! Indexing and query planning for ftindex
//!
//! This crate provides:
//! - `BoostWeights`: calibration of field boosts onto weight letters
//! - `keyword_split`: quote-aware splitting of query strings
//! - `extract`: weighted text fragments from a live record
//! - `Index`: entry maintenance for one model, with two write strategies
//! - `QueryPlanner`: search requests to executable plans
//! - `SearchResults`: lazy, sliceable, hydratable results
//! - `IndexRebuilder`: stale-entry sweeps, optionally in one transaction
//! - `SearchBackend`: the facade tying them together
//! - `BackendConfig`: `ftindex.toml`
//!
//! # Usage
//!
//! ```ignore
//! use ftindex_search::{BackendConfig, SearchBackend, SearchQuery};
//!
//! let backend = SearchBackend::new(store, schema, engine, BackendConfig::default())?;
//! backend.add_bulk(&"blog.Post".into(), &posts)?;
//! let results = backend.search(&SearchQuery::new(ObjectQuery::all("blog.Post"), Some("rust")))?;
//! let first_page = results.slice(0, Some(20)).records()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod extract;
pub mod index;
pub mod keywords;
pub mod query;
pub mod rebuild;
pub mod results;
pub mod weights;

pub use backend::SearchBackend;
pub use config::{BackendConfig, WriteMode, CONFIG_FILE_NAME, DEFAULT_SEARCH_CONFIG};
pub use extract::{extract, plain_body, Fragment};
pub use index::{Index, WriteStrategy};
pub use keywords::keyword_split;
pub use query::{combine, Operator, QueryPlanner, SearchPlan, SearchQuery};
pub use rebuild::{IndexRebuilder, RebuildHandle};
pub use results::SearchResults;
pub use weights::BoostWeights;
