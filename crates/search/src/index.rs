//! Index maintenance for one model
//!
//! An `Index` writes the entries of one model's objects, one row per
//! content type in the model's ancestry, and reconciles the entry table
//! against the model's live table.
//!
//! # Write strategies
//!
//! - `Upsert`: one statement; the store computes every search vector and
//!   resolves conflicts on `(config, content_type, object_id)`.
//! - `UpdateThenCreate`: vectors are computed here, existing keys are
//!   looked up, existing rows updated and the rest inserted. The two
//!   phases are not atomic together; wrap the call in a transaction when
//!   that matters.
//!
//! The strategy is selected once, when the backend is built.

use crate::config::WriteMode;
use crate::extract::{extract_object, plain_body, Fragment};
use crate::weights::BoostWeights;
use ftindex_core::{ContentType, Error, PrimaryKey, Record, Result, Schema};
use ftindex_engine::TextEngine;
use ftindex_storage::{
    EntryKey, EntryScope, EntryUpsert, IndexEntry, Storage, Store, StoreCapabilities,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// How entries reach the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Atomic insert-or-update in one statement
    Upsert,
    /// Update existing rows, then insert missing ones
    UpdateThenCreate,
}

impl WriteStrategy {
    /// Pick the strategy for a store
    ///
    /// # Errors
    ///
    /// Configuration error if `mode` forces upsert on a store without it.
    pub fn select(capabilities: StoreCapabilities, mode: WriteMode) -> Result<Self> {
        match (mode, capabilities.upsert) {
            (WriteMode::Auto, true) | (WriteMode::Upsert, true) => Ok(WriteStrategy::Upsert),
            (WriteMode::Upsert, false) => Err(Error::configuration(
                "write_strategy = \"upsert\" but the store has no atomic upsert",
            )),
            (WriteMode::Auto, false) | (WriteMode::UpdateThenCreate, _) => {
                Ok(WriteStrategy::UpdateThenCreate)
            }
        }
    }
}

/// Extracted state of one object, ready to be written
struct Prepared {
    object_id: String,
    title: String,
    body: String,
    fragments: Vec<Fragment>,
}

/// Index of one model
#[derive(Clone)]
pub struct Index {
    pub(crate) store: Arc<dyn Store>,
    schema: Arc<Schema>,
    engine: Arc<dyn TextEngine>,
    weights: Arc<BoostWeights>,
    model: ContentType,
    config: String,
    strategy: WriteStrategy,
}

impl Index {
    pub(crate) fn new(
        store: Arc<dyn Store>,
        schema: Arc<Schema>,
        engine: Arc<dyn TextEngine>,
        weights: Arc<BoostWeights>,
        model: ContentType,
        config: String,
        strategy: WriteStrategy,
    ) -> Result<Self> {
        schema.get(&model)?;
        Ok(Index {
            store,
            schema,
            engine,
            weights,
            model,
            config,
            strategy,
        })
    }

    /// Model label
    pub fn name(&self) -> &str {
        self.model.label()
    }

    /// Indexed model
    pub fn model(&self) -> &ContentType {
        &self.model
    }

    /// Linguistic configuration entries are written under
    pub fn config(&self) -> &str {
        &self.config
    }

    /// Selected write strategy
    pub fn strategy(&self) -> WriteStrategy {
        self.strategy
    }

    /// Index one object
    pub fn add_item(&self, record: &Record) -> Result<usize> {
        self.add_items(std::slice::from_ref(record))
    }

    /// Index a batch of objects
    ///
    /// Every object is extracted before anything is written: one failing
    /// object aborts the whole batch. Returns rows written.
    pub fn add_items(&self, records: &[Record]) -> Result<usize> {
        self.add_items_in(self.store.as_ref(), records)
    }

    /// Delete entries of this model whose object is gone
    pub fn delete_stale_entries(&self) -> Result<usize> {
        self.delete_stale_entries_in(self.store.as_ref())
    }

    /// Delete every entry of one object, under each content type of its
    /// ancestry and of every model derived from this one
    pub fn delete_item(&self, pk: &PrimaryKey) -> Result<usize> {
        let mut content_types = self.schema.ancestors(&self.model)?;
        content_types.extend(self.schema.descendants(&self.model));
        let scope = EntryScope::for_objects(content_types.into_iter().map(|ct| (ct, pk)));
        let n = self.store.delete_entries(&scope)?;
        debug!(target: "ftindex::index", model = %self.model, pk = %pk, rows = n, "Deleted object entries");
        Ok(n)
    }

    /// Number of entries stored for this model
    pub fn entry_count(&self) -> Result<usize> {
        self.store.count_entries(&EntryScope::for_model(self.model.clone()))
    }

    pub(crate) fn add_items_in<S: Storage + ?Sized>(
        &self,
        store: &S,
        records: &[Record],
    ) -> Result<usize> {
        let model = self.schema.get(&self.model)?;
        let content_types = self.schema.ancestors(&self.model)?;

        // one row per object id; the last occurrence wins
        let mut prepared: Vec<Prepared> = Vec::with_capacity(records.len());
        let mut positions: HashMap<String, usize> = HashMap::new();
        for record in records {
            let object_id = record.pk().object_id();
            let fragments = extract_object(record, model, &self.weights)?;
            let item = Prepared {
                title: record
                    .title()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}:{}", self.model, object_id)),
                body: plain_body(&fragments),
                fragments,
                object_id: object_id.clone(),
            };
            match positions.get(&object_id) {
                Some(&i) => prepared[i] = item,
                None => {
                    positions.insert(object_id, prepared.len());
                    prepared.push(item);
                }
            }
        }
        if prepared.is_empty() {
            return Ok(0);
        }

        let written = match self.strategy {
            WriteStrategy::Upsert => self.upsert(store, &content_types, &prepared)?,
            WriteStrategy::UpdateThenCreate => {
                self.update_then_create(store, &content_types, &prepared)?
            }
        };
        debug!(
            target: "ftindex::index",
            model = %self.model,
            objects = prepared.len(),
            content_types = content_types.len(),
            rows = written,
            strategy = ?self.strategy,
            "Indexed objects"
        );
        Ok(written)
    }

    fn upsert<S: Storage + ?Sized>(
        &self,
        store: &S,
        content_types: &[ContentType],
        prepared: &[Prepared],
    ) -> Result<usize> {
        let rows: Vec<EntryUpsert> = content_types
            .iter()
            .flat_map(|ct| {
                prepared.iter().map(move |item| EntryUpsert {
                    content_type: ct.clone(),
                    object_id: item.object_id.clone(),
                    title: item.title.clone(),
                    body: item.body.clone(),
                    fragments: item.fragments.clone(),
                })
            })
            .collect();
        store.upsert_entries(&self.config, &rows)
    }

    fn update_then_create<S: Storage + ?Sized>(
        &self,
        store: &S,
        content_types: &[ContentType],
        prepared: &[Prepared],
    ) -> Result<usize> {
        let mut entries = Vec::with_capacity(content_types.len() * prepared.len());
        for item in prepared {
            let body_search = self.engine.document(&self.config, &item.fragments)?;
            for ct in content_types {
                entries.push(IndexEntry {
                    config: self.config.clone(),
                    content_type: ct.clone(),
                    object_id: item.object_id.clone(),
                    title: item.title.clone(),
                    body: item.body.clone(),
                    body_search: body_search.clone(),
                });
            }
        }

        let keys: Vec<EntryKey> = entries.iter().map(IndexEntry::key).collect();
        let existing = store.existing_entries(&keys)?;
        let (update, create): (Vec<IndexEntry>, Vec<IndexEntry>) = entries
            .into_iter()
            .partition(|entry| existing.contains(&entry.key()));

        let updated = if update.is_empty() {
            0
        } else {
            store.update_entries(&update)?
        };
        let created = if create.is_empty() {
            0
        } else {
            store.insert_entries(create)?
        };
        Ok(updated + created)
    }

    pub(crate) fn delete_stale_entries_in<S: Storage + ?Sized>(&self, store: &S) -> Result<usize> {
        let n = store.delete_stale_entries(&self.model)?;
        if n > 0 {
            info!(target: "ftindex::index", model = %self.model, rows = n, "Deleted stale entries");
        }
        Ok(n)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("model", &self.model)
            .field("config", &self.config)
            .field("strategy", &self.strategy)
            .finish()
    }
}
