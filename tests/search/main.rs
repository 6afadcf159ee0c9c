//! End-to-end search tests
//!
//! Cross-crate tests through `SearchBackend` over `MemoryStore`:
//! - Indexing: extraction, ancestors, idempotence, both write strategies
//! - Querying: unranked pagination, operators, fields, filters, ranking
//! - Reconciliation: stale sweeps and dropped references
//! - Properties: result windows against the full result list

#[path = "../common/mod.rs"]
mod common;

mod indexing;
mod properties;
mod querying;
mod reconciliation;
