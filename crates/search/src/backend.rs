//! Search backend facade
//!
//! `SearchBackend` is built once at startup. Building it calibrates boost
//! weights from the schema, checks the linguistic configuration and picks
//! the write strategy. Configuration problems surface here, not on the
//! first write.

use crate::config::BackendConfig;
use crate::index::{Index, WriteStrategy};
use crate::query::{QueryPlanner, SearchQuery};
use crate::rebuild::IndexRebuilder;
use crate::results::SearchResults;
use crate::weights::BoostWeights;
use ftindex_core::{ContentType, PrimaryKey, Record, Result, Schema};
use ftindex_engine::TextEngine;
use ftindex_storage::{EntryScope, Store};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Full-text search backend over a relational store
pub struct SearchBackend {
    store: Arc<dyn Store>,
    schema: Arc<Schema>,
    engine: Arc<dyn TextEngine>,
    weights: Arc<BoostWeights>,
    config: BackendConfig,
    strategy: WriteStrategy,
    planner: QueryPlanner,
}

impl SearchBackend {
    /// Build the backend
    ///
    /// # Errors
    ///
    /// Configuration error if the schema declares no search field, the
    /// engine does not know `config.search_config`, or the requested
    /// write strategy is unavailable on `store`.
    pub fn new(
        store: Arc<dyn Store>,
        schema: Arc<Schema>,
        engine: Arc<dyn TextEngine>,
        config: BackendConfig,
    ) -> Result<Self> {
        config.validate(engine.as_ref())?;
        let weights = Arc::new(BoostWeights::from_schema(&schema)?);
        let strategy = WriteStrategy::select(store.capabilities(), config.write_strategy)?;
        let planner = QueryPlanner::new(
            Arc::clone(&schema),
            Arc::clone(&engine),
            Arc::clone(&weights),
            config.search_config.clone(),
        );
        info!(
            target: "ftindex::backend",
            models = schema.len(),
            search_config = %config.search_config,
            strategy = ?strategy,
            atomic_rebuild = config.atomic_rebuild,
            "Search backend ready"
        );
        Ok(SearchBackend {
            store,
            schema,
            engine,
            weights,
            config,
            strategy,
            planner,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Calibrated boost weights
    pub fn weights(&self) -> &BoostWeights {
        &self.weights
    }

    /// Selected write strategy
    pub fn strategy(&self) -> WriteStrategy {
        self.strategy
    }

    /// Registered models
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Index of one model
    pub fn index_for_model(&self, model: &ContentType) -> Result<Index> {
        Index::new(
            Arc::clone(&self.store),
            Arc::clone(&self.schema),
            Arc::clone(&self.engine),
            Arc::clone(&self.weights),
            model.clone(),
            self.config.search_config.clone(),
            self.strategy,
        )
    }

    /// Index or reindex one object
    pub fn add(&self, model: &ContentType, record: &Record) -> Result<usize> {
        self.index_for_model(model)?.add_item(record)
    }

    /// Index or reindex a batch of objects of one model
    pub fn add_bulk(&self, model: &ContentType, records: &[Record]) -> Result<usize> {
        self.index_for_model(model)?.add_items(records)
    }

    /// Remove every entry of one object
    pub fn delete(&self, model: &ContentType, pk: &PrimaryKey) -> Result<usize> {
        self.index_for_model(model)?.delete_item(pk)
    }

    /// Remove every entry of every model
    pub fn reset_index(&self) -> Result<usize> {
        let n = self.store.delete_entries(&EntryScope::All)?;
        info!(target: "ftindex::backend", rows = n, "Index reset");
        Ok(n)
    }

    /// Entries of every model share one table; nothing to create
    pub fn add_type(&self, model: &ContentType) -> Result<()> {
        self.schema.get(model)?;
        debug!(target: "ftindex::backend", model = %model, "add_type is a no-op");
        Ok(())
    }

    /// Writes are visible on return; nothing to refresh
    pub fn refresh_index(&self) -> Result<()> {
        Ok(())
    }

    /// Plan a search; nothing runs until the results are read
    ///
    /// # Errors
    ///
    /// Planning errors (unknown model, undeclared filter or search field).
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        let plan = self.planner.plan(query)?;
        Ok(SearchResults::new(Arc::clone(&self.store), plan))
    }

    /// Rebuilder for one model, atomic when `atomic_rebuild` is set
    pub fn rebuilder(&self, model: &ContentType) -> Result<IndexRebuilder> {
        Ok(IndexRebuilder::new(
            self.index_for_model(model)?,
            self.config.atomic_rebuild,
        ))
    }
}

impl fmt::Debug for SearchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchBackend")
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .field("weights", &self.weights)
            .finish()
    }
}
