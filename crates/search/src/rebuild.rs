//! Index rebuilds
//!
//! A rebuild sweeps stale entries, lets the caller reindex every live
//! object, then finishes. The atomic variant runs all of it inside one
//! store transaction:
//!
//! ```text
//! start()  ── begin, sweep ──▶ RebuildHandle ── add_items()* ──▶ finish()  ── commit
//!                                   │
//!                                   └── abort() or drop ──▶ rollback
//! ```
//!
//! `IndexRebuilder::run` wraps the whole sequence in a closure, committing
//! on `Ok` and rolling back on `Err`.

use crate::index::Index;
use ftindex_core::{Error, Record, Result};
use ftindex_storage::StoreTransaction;
use tracing::{info, warn};

/// Rebuilds the index of one model
#[derive(Debug, Clone)]
pub struct IndexRebuilder {
    index: Index,
    atomic: bool,
}

impl IndexRebuilder {
    /// Rebuilder for `index`
    pub fn new(index: Index, atomic: bool) -> Self {
        IndexRebuilder { index, atomic }
    }

    /// Index being rebuilt
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Whether the rebuild runs in one transaction
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Begin the rebuild and delete stale entries
    ///
    /// # Errors
    ///
    /// Configuration error if the rebuild is atomic and the store has no
    /// transactions; store errors from `begin` or the sweep. A failed
    /// sweep is rolled back before returning.
    pub fn start(&self) -> Result<RebuildHandle<'_>> {
        let txn = if self.atomic {
            if !self.index.store.capabilities().transactions {
                return Err(Error::configuration(
                    "atomic_rebuild = true but the store has no transactions",
                ));
            }
            Some(self.index.store.begin()?)
        } else {
            None
        };
        let handle = RebuildHandle {
            index: &self.index,
            txn,
        };
        info!(target: "ftindex::rebuild", model = %self.index.model(), atomic = self.atomic, "Rebuild started");

        if let Err(e) = handle.sweep() {
            if let Err(rollback) = handle.abort() {
                warn!(target: "ftindex::rebuild", error = %rollback, "Rollback after failed sweep failed");
            }
            return Err(e);
        }
        Ok(handle)
    }

    /// Run a whole rebuild
    ///
    /// `f` receives the open handle. The rebuild is finished when `f`
    /// returns `Ok` and aborted when it returns `Err`.
    pub fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RebuildHandle<'_>) -> Result<T>,
    {
        let handle = self.start()?;
        match f(&handle) {
            Ok(value) => {
                handle.finish()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = handle.abort() {
                    warn!(target: "ftindex::rebuild", error = %rollback, "Rollback after failed rebuild failed");
                }
                Err(e)
            }
        }
    }
}

/// An open rebuild
///
/// Dropping a handle without `finish()` rolls an atomic rebuild back.
pub struct RebuildHandle<'a> {
    index: &'a Index,
    txn: Option<Box<dyn StoreTransaction + 'a>>,
}

impl<'a> RebuildHandle<'a> {
    fn sweep(&self) -> Result<usize> {
        match &self.txn {
            Some(txn) => self.index.delete_stale_entries_in(txn.as_ref()),
            None => self.index.delete_stale_entries_in(self.index.store.as_ref()),
        }
    }

    /// Index being rebuilt
    pub fn index(&self) -> &Index {
        self.index
    }

    /// Index a batch of objects as part of the rebuild
    pub fn add_items(&self, records: &[Record]) -> Result<usize> {
        match &self.txn {
            Some(txn) => self.index.add_items_in(txn.as_ref(), records),
            None => self.index.add_items(records),
        }
    }

    /// Commit the rebuild
    pub fn finish(mut self) -> Result<()> {
        if let Some(txn) = self.txn.take() {
            txn.commit()?;
        }
        info!(target: "ftindex::rebuild", model = %self.index.model(), "Rebuild finished");
        Ok(())
    }

    /// Roll the rebuild back
    ///
    /// A non-atomic rebuild has already written everything; nothing is undone.
    pub fn abort(mut self) -> Result<()> {
        match self.txn.take() {
            Some(txn) => {
                warn!(target: "ftindex::rebuild", model = %self.index.model(), "Rebuild rolled back");
                txn.rollback()
            }
            None => {
                warn!(target: "ftindex::rebuild", model = %self.index.model(), "Rebuild aborted, writes already applied");
                Ok(())
            }
        }
    }
}

impl Drop for RebuildHandle<'_> {
    fn drop(&mut self) {
        if let Some(txn) = self.txn.take() {
            warn!(target: "ftindex::rebuild", model = %self.index.model(), "Rebuild handle dropped without finish, rolling back");
            if let Err(e) = txn.rollback() {
                warn!(target: "ftindex::rebuild", error = %e, "Rollback failed");
            }
        }
    }
}
