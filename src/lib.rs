//! ftindex - full-text search indexing and query planning
//!
//! ftindex keeps a denormalized index table of weighted search vectors for
//! polymorphic content objects and answers ranked, filtered, paginated
//! searches against it.
//!
//! # Quick Start
//!
//! ```ignore
//! use ftindex::{
//!     BackendConfig, FieldDescriptor, MemoryStore, ModelDef, ObjectQuery, Record, Schema,
//!     SearchBackend, SearchQuery, StandardEngine,
//! };
//! use std::sync::Arc;
//!
//! let schema = Arc::new(Schema::from_models([ModelDef::new("blog.Post")
//!     .with_field(FieldDescriptor::boosted("title", 10.0))
//!     .with_field(FieldDescriptor::search("body"))])?);
//! let engine = Arc::new(StandardEngine::new());
//! let store = Arc::new(MemoryStore::new(schema.clone(), engine.clone()));
//! let backend = SearchBackend::new(store, schema, engine, BackendConfig::default())?;
//!
//! backend.add(&"blog.Post".into(), &post)?;
//! let results = backend.search(&SearchQuery::new(ObjectQuery::all("blog.Post"), Some("rust")))?;
//! ```
//!
//! # Architecture
//!
//! - `ftindex-core`: errors, identifiers, records, schema, structural filters
//! - `ftindex-engine`: weighted search vectors, text queries, ranking
//! - `ftindex-storage`: the store boundary and an in-memory store
//! - `ftindex-search`: calibration, extraction, index maintenance, planning

pub use ftindex_core::{
    ContentType, Error, FieldDescriptor, FieldValue, Filter, Lookup, ModelDef, ObjectQuery,
    OrderBy, PkKind, PrimaryKey, Record, Relation, Result, Schema,
};
pub use ftindex_engine::{
    transliterate, SearchVector, StandardEngine, TextConfig, TextEngine, TextQuery, Weight,
    WeightValues, BUCKET_COUNT,
};
pub use ftindex_search::{
    combine, extract, keyword_split, plain_body, BackendConfig, BoostWeights, Fragment, Index,
    IndexRebuilder, Operator, QueryPlanner, RebuildHandle, SearchBackend, SearchPlan,
    SearchQuery, SearchResults, WriteMode, WriteStrategy, CONFIG_FILE_NAME,
    DEFAULT_SEARCH_CONFIG,
};
pub use ftindex_storage::{
    EntryKey, EntryScope, IndexEntry, MemoryStore, Page, Storage, Store, StoreCapabilities,
    StoreTransaction,
};
