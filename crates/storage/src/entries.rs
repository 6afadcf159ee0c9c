//! The index-entry table
//!
//! A `BTreeMap` keyed by `(config, content_type, object_id)`, so the unique
//! constraint is structural. Every batch operation validates the whole
//! batch before touching the map: a failing statement leaves the table as
//! it was.

use crate::traits::{EntryKey, EntryUpsert, IndexEntry};
use ftindex_core::{Error, Result};
use ftindex_engine::TextEngine;
use std::collections::{BTreeMap, BTreeSet};

/// In-memory index-entry table
#[derive(Debug, Clone, Default)]
pub struct EntryTable {
    rows: BTreeMap<EntryKey, IndexEntry>,
}

impl EntryTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table holds no row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by key
    pub fn get(&self, key: &EntryKey) -> Option<&IndexEntry> {
        self.rows.get(key)
    }

    /// Rows matching `pred`, in key order
    pub fn select<F>(&self, pred: F) -> Vec<IndexEntry>
    where
        F: Fn(&EntryKey) -> bool,
    {
        self.rows
            .iter()
            .filter(|(k, _)| pred(*k))
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Count rows matching `pred`
    pub fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&EntryKey) -> bool,
    {
        self.rows.keys().filter(|k| pred(*k)).count()
    }

    /// Iterate every row
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.rows.values()
    }

    /// Keys among `keys` that have a row
    pub fn existing(&self, keys: &[EntryKey]) -> BTreeSet<EntryKey> {
        keys.iter()
            .filter(|k| self.rows.contains_key(*k))
            .cloned()
            .collect()
    }

    /// Insert-or-update every row, computing vectors with `engine`
    ///
    /// Vectors are computed before the first write, so an engine failure
    /// leaves the table unchanged.
    pub fn upsert(
        &mut self,
        engine: &dyn TextEngine,
        config: &str,
        rows: &[EntryUpsert],
    ) -> Result<usize> {
        let mut computed = Vec::with_capacity(rows.len());
        for row in rows {
            computed.push(IndexEntry {
                config: config.to_string(),
                content_type: row.content_type.clone(),
                object_id: row.object_id.clone(),
                title: row.title.clone(),
                body: row.body.clone(),
                body_search: engine.document(config, &row.fragments)?,
            });
        }
        let n = computed.len();
        for entry in computed {
            match self.rows.get_mut(&entry.key()) {
                // ON CONFLICT DO UPDATE
                Some(existing) => {
                    existing.title = entry.title;
                    existing.body = entry.body;
                    existing.body_search = entry.body_search;
                }
                None => {
                    self.rows.insert(entry.key(), entry);
                }
            }
        }
        Ok(n)
    }

    /// Overwrite title, body and vector of rows that exist
    pub fn update(&mut self, entries: &[IndexEntry]) -> usize {
        let mut updated = 0;
        for entry in entries {
            if let Some(existing) = self.rows.get_mut(&entry.key()) {
                existing.title = entry.title.clone();
                existing.body = entry.body.clone();
                existing.body_search = entry.body_search.clone();
                updated += 1;
            }
        }
        updated
    }

    /// Insert new rows; any duplicate key fails the whole batch
    pub fn insert(&mut self, entries: Vec<IndexEntry>) -> Result<usize> {
        let mut batch = BTreeSet::new();
        for entry in &entries {
            let key = entry.key();
            if self.rows.contains_key(&key) || !batch.insert(key.clone()) {
                return Err(Error::UniqueViolation {
                    config: key.config,
                    content_type: key.content_type,
                    object_id: key.object_id,
                });
            }
        }
        let n = entries.len();
        for entry in entries {
            self.rows.insert(entry.key(), entry);
        }
        Ok(n)
    }

    /// Delete rows matching `pred`
    pub fn delete<F>(&mut self, pred: F) -> usize
    where
        F: Fn(&EntryKey) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|k, _| !pred(k));
        before - self.rows.len()
    }
}
