//! Store boundary traits
//!
//! This module defines the `Storage`, `Store` and `StoreTransaction` traits
//! that the search layer talks to, and the plain data types that cross
//! the boundary (index entries, entry scopes, ranked search plans).
//!
//! The search layer never touches rows directly: every read and write of
//! the index-entry table and of the live object tables goes through these
//! traits, so a relational backend can replace `MemoryStore` without
//! changing upper layers.

use ftindex_core::{ContentType, ObjectQuery, PrimaryKey, Record, Result};
use ftindex_engine::{SearchVector, TextQuery, Weight, WeightValues};
use std::collections::BTreeSet;

// ============================================================================
// Capabilities
// ============================================================================

/// What a store can do natively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// Atomic insert-or-update on the `(config, content_type, object_id)` key
    pub upsert: bool,
    /// `begin()` returns a real transaction
    pub transactions: bool,
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        StoreCapabilities {
            upsert: true,
            transactions: true,
        }
    }
}

// ============================================================================
// Index entries
// ============================================================================

/// Unique key of an index entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    /// Linguistic configuration
    pub config: String,
    /// Content type the entry is materialized for
    pub content_type: ContentType,
    /// Object primary key as text
    pub object_id: String,
}

impl EntryKey {
    /// Build a key
    pub fn new(
        config: impl Into<String>,
        content_type: impl Into<ContentType>,
        object_id: impl Into<String>,
    ) -> Self {
        EntryKey {
            config: config.into(),
            content_type: content_type.into(),
            object_id: object_id.into(),
        }
    }
}

/// One persisted row of the index-entry table
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Linguistic configuration used to build `body_search`
    pub config: String,
    /// Content type the entry is materialized for
    pub content_type: ContentType,
    /// Object primary key as text
    pub object_id: String,
    /// Display label, not ranked
    pub title: String,
    /// Unweighted plain-text extraction, not ranked
    pub body: String,
    /// Weighted search vector, the only searched column
    pub body_search: SearchVector,
}

impl IndexEntry {
    /// Unique key of this entry
    pub fn key(&self) -> EntryKey {
        EntryKey {
            config: self.config.clone(),
            content_type: self.content_type.clone(),
            object_id: self.object_id.clone(),
        }
    }
}

/// Row of an upsert batch; the store computes `body_search` itself
#[derive(Debug, Clone, PartialEq)]
pub struct EntryUpsert {
    /// Content type the entry is materialized for
    pub content_type: ContentType,
    /// Object primary key as text
    pub object_id: String,
    /// Display label
    pub title: String,
    /// Unweighted plain-text extraction
    pub body: String,
    /// Weighted fragments the search vector is built from
    pub fragments: Vec<(String, Weight)>,
}

/// Subset of the index-entry table
///
/// Scopes ignore the linguistic configuration: deleting an object removes
/// its entries under every configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryScope {
    /// Every entry
    All,
    /// Entries of the given content types
    ContentTypes(Vec<ContentType>),
    /// Entries of one object under one content type
    Object {
        /// Content type
        content_type: ContentType,
        /// Object primary key as text
        object_id: String,
    },
    /// Entries of several objects
    Objects(Vec<(ContentType, String)>),
    /// Entries of the objects selected by a live-table query
    Query(ObjectQuery),
}

impl EntryScope {
    /// Entries of any of `models`
    pub fn for_models(models: impl IntoIterator<Item = ContentType>) -> Self {
        EntryScope::ContentTypes(models.into_iter().collect())
    }

    /// Entries of one model
    pub fn for_model(model: impl Into<ContentType>) -> Self {
        EntryScope::ContentTypes(vec![model.into()])
    }

    /// Entries of one object
    pub fn for_object(model: impl Into<ContentType>, pk: &PrimaryKey) -> Self {
        EntryScope::Object {
            content_type: model.into(),
            object_id: pk.object_id(),
        }
    }

    /// Entries of several objects
    pub fn for_objects<'a>(objects: impl IntoIterator<Item = (ContentType, &'a PrimaryKey)>) -> Self {
        EntryScope::Objects(
            objects
                .into_iter()
                .map(|(ct, pk)| (ct, pk.object_id()))
                .collect(),
        )
    }

    /// Entries of the objects `query` selects
    pub fn for_queryset(query: ObjectQuery) -> Self {
        EntryScope::Query(query)
    }
}

// ============================================================================
// Ranked search plans
// ============================================================================

/// Where the searched text comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// The `body_search` column of the index-entry table
    Index,
    /// An ad hoc vector over live fields, each at its bucket
    Fields(Vec<(String, Weight)>),
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrder {
    /// Descending rank; ties keep scope order
    #[default]
    Relevance,
    /// The scope's own ordering
    Scope,
}

/// Offset/limit pushed down into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    /// Rows to skip
    pub offset: usize,
    /// Rows to return, `None` for all remaining
    pub limit: Option<usize>,
}

impl Page {
    /// Every row
    pub fn all() -> Self {
        Page::default()
    }

    /// Rows `[start, stop)`; `stop = None` is unbounded
    pub fn range(start: usize, stop: Option<usize>) -> Self {
        Page {
            offset: start,
            limit: stop.map(|stop| stop.saturating_sub(start)),
        }
    }

    /// Apply to an in-memory sequence
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

/// A fully planned text search
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSearch {
    /// Base candidate set
    pub scope: ObjectQuery,
    /// Linguistic configuration
    pub config: String,
    /// Combined text query
    pub query: TextQuery,
    /// Searched text
    pub source: TextSource,
    /// Bucket multipliers for ranking
    pub weights: WeightValues,
    /// Result ordering
    pub order: ResultOrder,
}

/// One ranked match
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Typed primary key of the live object
    pub pk: PrimaryKey,
    /// Rank against the query
    pub rank: f32,
}

// ============================================================================
// Traits
// ============================================================================

/// Relational store boundary
///
/// Thread safety: all methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Storage: Send + Sync {
    /// Native capabilities
    fn capabilities(&self) -> StoreCapabilities;

    /// Primary keys selected by `scope`, in scope order, paginated
    fn query_objects(&self, scope: &ObjectQuery, page: Page) -> Result<Vec<PrimaryKey>>;

    /// Number of objects selected by `scope`
    fn count_objects(&self, scope: &ObjectQuery) -> Result<usize>;

    /// Live objects of `model` with the given keys, in `pks` order
    ///
    /// Keys without a live object are skipped.
    fn get_objects(&self, model: &ContentType, pks: &[PrimaryKey]) -> Result<Vec<Record>>;

    /// Insert-or-update every row in one statement
    ///
    /// The search vector is computed by the store from each row's
    /// fragments. Either every row is written or none is.
    ///
    /// # Errors
    ///
    /// Store error if the store lacks upsert.
    fn upsert_entries(&self, config: &str, rows: &[EntryUpsert]) -> Result<usize>;

    /// Which of `keys` already have an entry
    fn existing_entries(&self, keys: &[EntryKey]) -> Result<BTreeSet<EntryKey>>;

    /// Overwrite title, body and search vector of existing entries
    ///
    /// Entries without a stored row are ignored. Returns rows updated.
    fn update_entries(&self, entries: &[IndexEntry]) -> Result<usize>;

    /// Insert new entries
    ///
    /// # Errors
    ///
    /// `UniqueViolation` if any key already exists; nothing is inserted.
    fn insert_entries(&self, entries: Vec<IndexEntry>) -> Result<usize>;

    /// Entries in `scope`, in key order
    fn entries(&self, scope: &EntryScope) -> Result<Vec<IndexEntry>>;

    /// Number of entries in `scope`
    fn count_entries(&self, scope: &EntryScope) -> Result<usize>;

    /// Delete every entry in `scope`; returns rows deleted
    fn delete_entries(&self, scope: &EntryScope) -> Result<usize>;

    /// Delete entries of `content_type` whose object is gone from the live
    /// table, as one set subtraction; returns rows deleted
    fn delete_stale_entries(&self, content_type: &ContentType) -> Result<usize>;

    /// Execute a ranked search, paginated
    fn search(&self, plan: &RankedSearch, page: Page) -> Result<Vec<SearchHit>>;

    /// Number of matches of a ranked search
    fn count_matches(&self, plan: &RankedSearch) -> Result<usize>;
}

/// A store that can open transactions
pub trait Store: Storage {
    /// Begin a transaction
    ///
    /// Entry writes made through the transaction are invisible to other
    /// readers until `commit()`.
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>>;
}

/// An open transaction
///
/// Dropping a transaction without calling `commit()` rolls it back.
pub trait StoreTransaction: Storage {
    /// Make every write visible
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every write
    fn rollback(self: Box<Self>) -> Result<()>;
}
