//! Store boundary and in-memory store for ftindex
//!
//! This crate provides:
//! - Storage / Store / StoreTransaction: the relational store boundary
//! - IndexEntry / EntryScope: the index-entry table and its scoping helpers
//! - RankedSearch / Page: search plans pushed down into the store
//! - MemoryStore: reference store with live object tables, an index-entry
//!   table, upsert and snapshot transactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entries;
pub mod memory;
pub mod traits;
pub mod transaction;

pub use entries::EntryTable;
pub use memory::{MemoryStore, DEFAULT_LOCK_TIMEOUT};
pub use traits::{
    EntryKey, EntryScope, EntryUpsert, IndexEntry, Page, RankedSearch, ResultOrder, SearchHit,
    Storage, Store, StoreCapabilities, StoreTransaction, TextSource,
};
pub use transaction::MemoryTransaction;
