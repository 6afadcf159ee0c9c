//! Core types and traits for ftindex
//!
//! This crate defines the foundational types shared by the text engine,
//! the store and the search layer:
//! - ContentType / PrimaryKey: identity of indexed objects
//! - FieldValue / Record / Relation: live objects as the index sees them
//! - FieldDescriptor / ModelDef / Schema: declared searchable-field schema
//! - Filter / ObjectQuery: structural filters over the live object tables
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod schema;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use filter::{Filter, Lookup, ObjectQuery, OrderBy};
pub use schema::{FieldDescriptor, ModelDef, Schema};
pub use types::{ContentType, PkKind, PrimaryKey};
pub use value::{Accessor, FieldValue, Record, Relation};
