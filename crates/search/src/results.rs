//! Lazy, sliceable search results
//!
//! Nothing runs until `count()`, `pks()` or `records()` is called. Slicing
//! narrows the `[start, stop)` window without running anything; the window
//! is pushed down to the store as offset/limit.

use crate::query::SearchPlan;
use ftindex_core::{PrimaryKey, Record, Result};
use ftindex_storage::{Page, Store};
use once_cell::unsync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Results of one search
pub struct SearchResults {
    store: Arc<dyn Store>,
    plan: Arc<SearchPlan>,
    start: usize,
    stop: Option<usize>,
    count: OnceCell<usize>,
    pks: OnceCell<Vec<PrimaryKey>>,
}

impl SearchResults {
    pub(crate) fn new(store: Arc<dyn Store>, plan: SearchPlan) -> Self {
        SearchResults {
            store,
            plan: Arc::new(plan),
            start: 0,
            stop: None,
            count: OnceCell::new(),
            pks: OnceCell::new(),
        }
    }

    /// The executed plan
    pub fn plan(&self) -> &SearchPlan {
        &self.plan
    }

    /// Sub-range `[start, stop)` of these results, relative to the current
    /// window; `stop = None` keeps the current end
    pub fn slice(&self, start: usize, stop: Option<usize>) -> SearchResults {
        let from = self.start.saturating_add(start);
        let new_start = self.stop.map_or(from, |end| from.min(end));
        let new_stop = match (self.stop, stop) {
            (Some(end), Some(stop)) => Some(self.start.saturating_add(stop).min(end)),
            (None, Some(stop)) => Some(self.start.saturating_add(stop)),
            (end, None) => end,
        };
        SearchResults {
            store: Arc::clone(&self.store),
            plan: Arc::clone(&self.plan),
            start: new_start,
            stop: new_stop.map(|stop| stop.max(new_start)),
            count: OnceCell::new(),
            pks: OnceCell::new(),
        }
    }

    /// Number of results inside the window
    pub fn count(&self) -> Result<usize> {
        self.count
            .get_or_try_init(|| {
                let total = self.plan.count(self.store.as_ref())?;
                let end = self.stop.map_or(total, |stop| stop.min(total));
                Ok(end.saturating_sub(self.start))
            })
            .copied()
    }

    /// True if the window holds no result
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    /// Primary keys inside the window, in result order
    pub fn pks(&self) -> Result<&[PrimaryKey]> {
        self.pks
            .get_or_try_init(|| {
                self.plan
                    .execute(self.store.as_ref(), Page::range(self.start, self.stop))
            })
            .map(Vec::as_slice)
    }

    /// Live objects inside the window, in result order
    ///
    /// Keys whose object vanished since the search ran are dropped.
    pub fn records(&self) -> Result<Vec<Record>> {
        let pks = self.pks()?;
        let records = self.store.get_objects(self.plan.model(), pks)?;
        if records.len() < pks.len() {
            debug!(
                target: "ftindex::query",
                model = %self.plan.model(),
                dropped = pks.len() - records.len(),
                "Dropped results without a live object"
            );
        }
        Ok(records)
    }
}

impl fmt::Debug for SearchResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchResults")
            .field("plan", &self.plan)
            .field("start", &self.start)
            .field("stop", &self.stop)
            .finish()
    }
}
