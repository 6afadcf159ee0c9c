//! In-process reference store
//!
//! # Design
//!
//! - Live tables: `DashMap<ContentType, BTreeMap<PrimaryKey, Record>>`, one
//!   table per model. Inserting an object materializes it in the table of
//!   every ancestor, like multi-table inheritance.
//! - Index entries: one `EntryTable` behind a `RwLock`; readers always see
//!   committed state.
//! - Writers of the entry table serialize on a single writer mutex. A
//!   transaction holds it for its whole lifetime and stages its writes on a
//!   private copy of the table, swapped in on commit.
//!
//! Live-table writes (`insert_object`, `remove_object`) stand in for the
//! application's ORM and never touch the index.

use crate::entries::EntryTable;
use crate::traits::{
    EntryKey, EntryScope, EntryUpsert, IndexEntry, Page, RankedSearch, ResultOrder, SearchHit,
    Storage, Store, StoreCapabilities, StoreTransaction, TextSource,
};
use crate::transaction::MemoryTransaction;
use dashmap::DashMap;
use ftindex_core::{ContentType, Error, ObjectQuery, PrimaryKey, Record, Result, Schema};
use ftindex_engine::{transliterate, SearchVector, TextEngine};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default time a writer waits for the entry-table writer lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// In-memory store with live object tables and an index-entry table
pub struct MemoryStore {
    schema: Arc<Schema>,
    engine: Arc<dyn TextEngine>,
    capabilities: StoreCapabilities,
    lock_timeout: Duration,
    tables: DashMap<ContentType, BTreeMap<PrimaryKey, Record>>,
    pub(crate) entries: RwLock<EntryTable>,
    writer: Mutex<()>,
}

impl MemoryStore {
    /// Store with native upsert and transactions
    pub fn new(schema: Arc<Schema>, engine: Arc<dyn TextEngine>) -> Self {
        Self::with_capabilities(schema, engine, StoreCapabilities::default())
    }

    /// Store lacking atomic upsert, for the update-then-create strategy
    pub fn without_upsert(schema: Arc<Schema>, engine: Arc<dyn TextEngine>) -> Self {
        Self::with_capabilities(
            schema,
            engine,
            StoreCapabilities {
                upsert: false,
                transactions: true,
            },
        )
    }

    /// Store with explicit capabilities
    pub fn with_capabilities(
        schema: Arc<Schema>,
        engine: Arc<dyn TextEngine>,
        capabilities: StoreCapabilities,
    ) -> Self {
        MemoryStore {
            schema,
            engine,
            capabilities,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            tables: DashMap::new(),
            entries: RwLock::new(EntryTable::new()),
            writer: Mutex::new(()),
        }
    }

    /// Builder: how long writers wait for the writer lock
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Schema this store was built with
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    // ========================================================================
    // Live tables
    // ========================================================================

    /// Insert or replace a live object
    ///
    /// The object is written to the table of `model` and of each ancestor.
    pub fn insert_object(&self, model: &ContentType, record: Record) -> Result<()> {
        for ct in self.schema.ancestors(model)? {
            self.tables
                .entry(ct)
                .or_default()
                .insert(record.pk().clone(), record.clone());
        }
        Ok(())
    }

    /// Remove a live object without touching the index
    ///
    /// The row goes from `model`, its ancestors and its descendants.
    /// Returns whether the object existed in `model`.
    pub fn remove_object(&self, model: &ContentType, pk: &PrimaryKey) -> Result<bool> {
        let mut affected = self.schema.ancestors(model)?;
        affected.extend(self.schema.descendants(model));
        let existed = self
            .tables
            .get(model)
            .map(|t| t.contains_key(pk))
            .unwrap_or(false);
        for ct in affected {
            if let Some(mut table) = self.tables.get_mut(&ct) {
                table.remove(pk);
            }
        }
        Ok(existed)
    }

    /// Number of live objects of `model`
    pub fn object_count(&self, model: &ContentType) -> usize {
        self.tables.get(model).map(|t| t.len()).unwrap_or(0)
    }

    // ========================================================================
    // Internals shared with transactions
    // ========================================================================

    pub(crate) fn engine(&self) -> &dyn TextEngine {
        self.engine.as_ref()
    }

    pub(crate) fn lock_writer(&self) -> Result<MutexGuard<'_, ()>> {
        self.writer.try_lock_for(self.lock_timeout).ok_or_else(|| {
            Error::transaction(format!(
                "timed out after {:?} waiting for the index writer lock",
                self.lock_timeout
            ))
        })
    }

    /// Run `f` on the committed entry table as a single-statement write
    fn write_entries<T>(&self, f: impl FnOnce(&mut EntryTable) -> Result<T>) -> Result<T> {
        let _writer = self.lock_writer()?;
        let mut entries = self.entries.write();
        f(&mut entries)
    }

    /// Records selected by `scope`, in scope order
    pub(crate) fn candidates(&self, scope: &ObjectQuery) -> Result<Vec<Record>> {
        self.schema.get(&scope.model)?;
        let rows: Vec<Record> = match self.tables.get(&scope.model) {
            Some(table) => table.values().cloned().collect(),
            None => Vec::new(),
        };
        let mut selected = Vec::with_capacity(rows.len());
        for record in rows {
            if scope.matches(&record)? {
                selected.push(record);
            }
        }
        scope.sort(&mut selected);
        Ok(selected)
    }

    /// Key predicate for an entry scope
    pub(crate) fn scope_predicate(
        &self,
        scope: &EntryScope,
    ) -> Result<Box<dyn Fn(&EntryKey) -> bool + '_>> {
        let pred: Box<dyn Fn(&EntryKey) -> bool> = match scope {
            EntryScope::All => Box::new(|_: &EntryKey| true),
            EntryScope::ContentTypes(cts) => {
                let cts: HashSet<ContentType> = cts.iter().cloned().collect();
                Box::new(move |k: &EntryKey| cts.contains(&k.content_type))
            }
            EntryScope::Object {
                content_type,
                object_id,
            } => {
                let (ct, id) = (content_type.clone(), object_id.clone());
                Box::new(move |k: &EntryKey| k.content_type == ct && k.object_id == id)
            }
            EntryScope::Objects(objects) => {
                let set: HashSet<(ContentType, String)> = objects.iter().cloned().collect();
                Box::new(move |k: &EntryKey| {
                    set.contains(&(k.content_type.clone(), k.object_id.clone()))
                })
            }
            EntryScope::Query(query) => {
                let ids: HashSet<String> = self
                    .candidates(query)?
                    .iter()
                    .map(|r| r.pk().object_id())
                    .collect();
                let ct = query.model.clone();
                Box::new(move |k: &EntryKey| k.content_type == ct && ids.contains(&k.object_id))
            }
        };
        Ok(pred)
    }

    pub(crate) fn stale_predicate(
        &self,
        content_type: &ContentType,
    ) -> Box<dyn Fn(&EntryKey) -> bool + '_> {
        // (indexed ids) EXCEPT (live ids)
        let live: HashSet<String> = self
            .tables
            .get(content_type)
            .map(|t| t.keys().map(PrimaryKey::object_id).collect())
            .unwrap_or_default();
        let ct = content_type.clone();
        Box::new(move |k: &EntryKey| k.content_type == ct && !live.contains(&k.object_id))
    }

    /// Ranked matches of `plan` over `entries`, unpaginated
    pub(crate) fn ranked(&self, entries: &EntryTable, plan: &RankedSearch) -> Result<Vec<SearchHit>> {
        let model = self.schema.get(&plan.scope.model)?;
        let candidates = self.candidates(&plan.scope)?;

        let mut hits = match &plan.source {
            TextSource::Index => {
                // join entries of the scope's model with the candidate rows
                let order: HashMap<PrimaryKey, usize> = candidates
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (r.pk().clone(), i))
                    .collect();
                let mut hits = Vec::new();
                for entry in entries.iter() {
                    if entry.config != plan.config || entry.content_type != plan.scope.model {
                        continue;
                    }
                    if !plan.query.matches(&entry.body_search) {
                        continue;
                    }
                    let pk = PrimaryKey::parse(model.pk_kind, &entry.object_id)?;
                    if let Some(&position) = order.get(&pk) {
                        let rank = self.engine.rank(&entry.body_search, &plan.query, &plan.weights);
                        hits.push((position, SearchHit { pk, rank }));
                    }
                }
                hits.sort_by_key(|(position, _)| *position);
                hits.into_iter().map(|(_, hit)| hit).collect::<Vec<_>>()
            }
            TextSource::Fields(fields) => {
                let mut hits = Vec::new();
                for record in &candidates {
                    let mut vector = SearchVector::new();
                    for (field, weight) in fields {
                        let text = transliterate(&record.value(field)?.to_text());
                        vector = vector.concat(&self.engine.weighted_vector(
                            &plan.config,
                            &text,
                            *weight,
                        )?);
                    }
                    if plan.query.matches(&vector) {
                        let rank = self.engine.rank(&vector, &plan.query, &plan.weights);
                        hits.push(SearchHit {
                            pk: record.pk().clone(),
                            rank,
                        });
                    }
                }
                hits
            }
        };

        if plan.order == ResultOrder::Relevance {
            // stable: ties keep scope order
            hits.sort_by(|a, b| b.rank.total_cmp(&a.rank));
        }
        Ok(hits)
    }
}

// ============================================================================
// Storage over a given entry table
// ============================================================================

/// Read paths shared by the store and its transactions
pub(crate) fn entries_in(
    store: &MemoryStore,
    table: &EntryTable,
    scope: &EntryScope,
) -> Result<Vec<IndexEntry>> {
    let pred = store.scope_predicate(scope)?;
    Ok(table.select(|k| pred(k)))
}

pub(crate) fn count_entries_in(
    store: &MemoryStore,
    table: &EntryTable,
    scope: &EntryScope,
) -> Result<usize> {
    let pred = store.scope_predicate(scope)?;
    Ok(table.count(|k| pred(k)))
}

impl Storage for MemoryStore {
    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }

    fn query_objects(&self, scope: &ObjectQuery, page: Page) -> Result<Vec<PrimaryKey>> {
        let pks = self
            .candidates(scope)?
            .into_iter()
            .map(|r| r.pk().clone())
            .collect();
        Ok(page.apply(pks))
    }

    fn count_objects(&self, scope: &ObjectQuery) -> Result<usize> {
        Ok(self.candidates(scope)?.len())
    }

    fn get_objects(&self, model: &ContentType, pks: &[PrimaryKey]) -> Result<Vec<Record>> {
        self.schema.get(model)?;
        let table = match self.tables.get(model) {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };
        Ok(pks.iter().filter_map(|pk| table.get(pk).cloned()).collect())
    }

    fn upsert_entries(&self, config: &str, rows: &[EntryUpsert]) -> Result<usize> {
        if !self.capabilities.upsert {
            return Err(Error::store("store does not support ON CONFLICT upserts"));
        }
        let engine = self.engine.clone();
        let n = self.write_entries(|table| table.upsert(engine.as_ref(), config, rows))?;
        debug!(target: "ftindex::store", rows = n, config, "Upserted index entries");
        Ok(n)
    }

    fn existing_entries(&self, keys: &[EntryKey]) -> Result<BTreeSet<EntryKey>> {
        Ok(self.entries.read().existing(keys))
    }

    fn update_entries(&self, entries: &[IndexEntry]) -> Result<usize> {
        let n = self.write_entries(|table| Ok(table.update(entries)))?;
        debug!(target: "ftindex::store", rows = n, "Updated index entries");
        Ok(n)
    }

    fn insert_entries(&self, entries: Vec<IndexEntry>) -> Result<usize> {
        let n = self.write_entries(|table| table.insert(entries))?;
        debug!(target: "ftindex::store", rows = n, "Inserted index entries");
        Ok(n)
    }

    fn entries(&self, scope: &EntryScope) -> Result<Vec<IndexEntry>> {
        entries_in(self, &self.entries.read(), scope)
    }

    fn count_entries(&self, scope: &EntryScope) -> Result<usize> {
        count_entries_in(self, &self.entries.read(), scope)
    }

    fn delete_entries(&self, scope: &EntryScope) -> Result<usize> {
        // query scopes read live rows, so resolve them under the writer lock
        let n = self.write_entries(|table| {
            let pred = self.scope_predicate(scope)?;
            Ok(table.delete(|k| pred(k)))
        })?;
        debug!(target: "ftindex::store", rows = n, "Deleted index entries");
        Ok(n)
    }

    fn delete_stale_entries(&self, content_type: &ContentType) -> Result<usize> {
        let n = self.write_entries(|table| {
            let pred = self.stale_predicate(content_type);
            Ok(table.delete(|k| pred(k)))
        })?;
        debug!(target: "ftindex::store", rows = n, content_type = %content_type, "Deleted stale index entries");
        Ok(n)
    }

    fn search(&self, plan: &RankedSearch, page: Page) -> Result<Vec<SearchHit>> {
        let hits = self.ranked(&self.entries.read(), plan)?;
        Ok(page.apply(hits))
    }

    fn count_matches(&self, plan: &RankedSearch) -> Result<usize> {
        Ok(self.ranked(&self.entries.read(), plan)?.len())
    }
}

impl Store for MemoryStore {
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>> {
        if !self.capabilities.transactions {
            return Err(Error::transaction("store does not support transactions"));
        }
        Ok(Box::new(MemoryTransaction::begin(self)?))
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("capabilities", &self.capabilities)
            .field("lock_timeout", &self.lock_timeout)
            .field("tables", &self.tables.len())
            .field("entries", &self.entries.read().len())
            .finish()
    }
}
