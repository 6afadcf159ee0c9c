//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

pub use ftindex::{
    BackendConfig, ContentType, EntryScope, Error, FieldDescriptor, Filter, ModelDef,
    ObjectQuery, Operator, OrderBy, PrimaryKey, Record, Relation, Schema, SearchBackend,
    SearchQuery, StandardEngine, Storage, WriteMode, WriteStrategy,
};
use ftindex::MemoryStore;

/// Route library logs to the test harness output; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ============================================================================
// Schema
// ============================================================================

pub const PAGE: &str = "core.Page";
pub const POST: &str = "blog.Post";
pub const AUTHOR: &str = "blog.Author";

/// Pages with a blog-post subtype and a separate author model
pub fn blog_schema() -> Arc<Schema> {
    Arc::new(
        Schema::from_models([
            ModelDef::new(PAGE)
                .with_field(FieldDescriptor::boosted("title", 10.0))
                .with_field(FieldDescriptor::filter("live")),
            ModelDef::new(POST)
                .with_parent(PAGE)
                .with_field(FieldDescriptor::boosted("title", 10.0))
                .with_field(FieldDescriptor::boosted("body", 1.0))
                .with_field(FieldDescriptor::related(
                    "authors",
                    vec![FieldDescriptor::boosted("name", 5.0)],
                ))
                .with_field(FieldDescriptor::filter("live"))
                .with_field(FieldDescriptor::filter("rating")),
            ModelDef::new(AUTHOR).with_field(FieldDescriptor::boosted("name", 5.0)),
        ])
        .expect("valid schema"),
    )
}

pub fn ct(label: &str) -> ContentType {
    ContentType::new(label)
}

pub fn post(pk: i64, title: &str, body: &str) -> Record {
    Record::new(pk)
        .with_title(title)
        .with_value("title", title)
        .with_value("body", body)
        .with_value("live", true)
        .with_value("rating", pk)
}

pub fn author(pk: i64, name: &str) -> Record {
    Record::new(pk).with_value("name", name)
}

pub fn pk_ints(pks: &[PrimaryKey]) -> Vec<i64> {
    pks.iter()
        .map(|pk| match pk {
            PrimaryKey::Int(i) => *i,
            other => panic!("unexpected primary key {}", other),
        })
        .collect()
}

// ============================================================================
// TestBackend
// ============================================================================

/// Backend over a fresh in-memory store
pub struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub backend: SearchBackend,
}

impl TestBackend {
    /// Store with native upsert
    pub fn new() -> Self {
        Self::with_store(
            MemoryStore::new(blog_schema(), Arc::new(StandardEngine::new())),
            BackendConfig::default(),
        )
    }

    /// Store without upsert: the update-then-create strategy
    pub fn without_upsert() -> Self {
        Self::with_store(
            MemoryStore::without_upsert(blog_schema(), Arc::new(StandardEngine::new())),
            BackendConfig::default(),
        )
    }

    /// One backend per write strategy
    pub fn each_strategy() -> Vec<TestBackend> {
        vec![Self::new(), Self::without_upsert()]
    }

    pub fn with_config(config: BackendConfig) -> Self {
        Self::with_store(
            MemoryStore::new(blog_schema(), Arc::new(StandardEngine::new())),
            config,
        )
    }

    fn with_store(store: MemoryStore, config: BackendConfig) -> Self {
        init_tracing();
        let store = Arc::new(store);
        let backend = SearchBackend::new(
            store.clone(),
            blog_schema(),
            Arc::new(StandardEngine::new()),
            config,
        )
        .expect("backend");
        TestBackend { store, backend }
    }

    /// Insert live posts and index them
    pub fn publish(&self, posts: &[Record]) {
        for p in posts {
            self.store
                .insert_object(&ct(POST), p.clone())
                .expect("insert post");
        }
        self.backend.add_bulk(&ct(POST), posts).expect("index posts");
    }

    /// Primary keys of every result of a search
    pub fn search_pks(&self, query: SearchQuery) -> Vec<i64> {
        let results = self.backend.search(&query).expect("search");
        pk_ints(results.pks().expect("pks"))
    }

    /// `(content_type, object_id)` of every entry, in key order
    pub fn entry_keys(&self) -> Vec<(String, String)> {
        self.store
            .entries(&EntryScope::All)
            .expect("entries")
            .into_iter()
            .map(|e| (e.content_type.label().to_string(), e.object_id))
            .collect()
    }
}

pub fn posts() -> ObjectQuery {
    ObjectQuery::all(POST)
}
