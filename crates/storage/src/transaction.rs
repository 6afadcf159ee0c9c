//! Snapshot transactions over `MemoryStore`
//!
//! A transaction takes the store's writer lock, copies the committed entry
//! table and applies every write to the copy. `commit()` swaps the copy in;
//! `rollback()` or dropping the transaction discards it. Concurrent readers
//! keep seeing the committed table throughout.
//!
//! Live-table reads go straight to the store.

use crate::entries::EntryTable;
use crate::memory::{count_entries_in, entries_in, MemoryStore};
use crate::traits::{
    EntryKey, EntryScope, EntryUpsert, IndexEntry, Page, RankedSearch, SearchHit, Storage,
    StoreCapabilities, StoreTransaction,
};
use ftindex_core::{ContentType, ObjectQuery, PrimaryKey, Record, Result};
use parking_lot::{MutexGuard, RwLock};
use std::collections::BTreeSet;
use tracing::debug;

/// An open transaction on a `MemoryStore`
pub struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    staged: RwLock<EntryTable>,
    _writer: MutexGuard<'a, ()>,
}

impl<'a> MemoryTransaction<'a> {
    /// Take the writer lock and snapshot the committed entries
    pub(crate) fn begin(store: &'a MemoryStore) -> Result<Self> {
        let writer = store.lock_writer()?;
        let staged = store.entries.read().clone();
        debug!(target: "ftindex::store", entries = staged.len(), "Transaction started");
        Ok(MemoryTransaction {
            store,
            staged: RwLock::new(staged),
            _writer: writer,
        })
    }
}

impl Storage for MemoryTransaction<'_> {
    fn capabilities(&self) -> StoreCapabilities {
        self.store.capabilities()
    }

    fn query_objects(&self, scope: &ObjectQuery, page: Page) -> Result<Vec<PrimaryKey>> {
        self.store.query_objects(scope, page)
    }

    fn count_objects(&self, scope: &ObjectQuery) -> Result<usize> {
        self.store.count_objects(scope)
    }

    fn get_objects(&self, model: &ContentType, pks: &[PrimaryKey]) -> Result<Vec<Record>> {
        self.store.get_objects(model, pks)
    }

    fn upsert_entries(&self, config: &str, rows: &[EntryUpsert]) -> Result<usize> {
        if !self.store.capabilities().upsert {
            return Err(ftindex_core::Error::store(
                "store does not support ON CONFLICT upserts",
            ));
        }
        self.staged
            .write()
            .upsert(self.store.engine(), config, rows)
    }

    fn existing_entries(&self, keys: &[EntryKey]) -> Result<BTreeSet<EntryKey>> {
        Ok(self.staged.read().existing(keys))
    }

    fn update_entries(&self, entries: &[IndexEntry]) -> Result<usize> {
        Ok(self.staged.write().update(entries))
    }

    fn insert_entries(&self, entries: Vec<IndexEntry>) -> Result<usize> {
        self.staged.write().insert(entries)
    }

    fn entries(&self, scope: &EntryScope) -> Result<Vec<IndexEntry>> {
        entries_in(self.store, &self.staged.read(), scope)
    }

    fn count_entries(&self, scope: &EntryScope) -> Result<usize> {
        count_entries_in(self.store, &self.staged.read(), scope)
    }

    fn delete_entries(&self, scope: &EntryScope) -> Result<usize> {
        let pred = self.store.scope_predicate(scope)?;
        Ok(self.staged.write().delete(|k| pred(k)))
    }

    fn delete_stale_entries(&self, content_type: &ContentType) -> Result<usize> {
        let pred = self.store.stale_predicate(content_type);
        let n = self.staged.write().delete(|k| pred(k));
        debug!(target: "ftindex::store", rows = n, content_type = %content_type, "Staged stale entry deletion");
        Ok(n)
    }

    fn search(&self, plan: &RankedSearch, page: Page) -> Result<Vec<SearchHit>> {
        let hits = self.store.ranked(&self.staged.read(), plan)?;
        Ok(page.apply(hits))
    }

    fn count_matches(&self, plan: &RankedSearch) -> Result<usize> {
        Ok(self.store.ranked(&self.staged.read(), plan)?.len())
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction {
            store,
            staged,
            _writer: writer,
        } = *self;
        let staged = staged.into_inner();
        let rows = staged.len();
        *store.entries.write() = staged;
        drop(writer);
        debug!(target: "ftindex::store", entries = rows, "Transaction committed");
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        debug!(target: "ftindex::store", "Transaction rolled back");
        Ok(())
    }
}
