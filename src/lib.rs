//! # multiselect - Multi-Dimensional Record Cache over a Query Cursor
//!
//! multiselect runs a relational query once and lets the caller navigate the
//! result as a tree indexed by its id columns, instead of as a flat stream:
//! "how many rows exist for run 1", "which lumi sections does run 1 have",
//! "give me the row for (run 1, lumi 2) and forget it".
//!
//! ## Quick Start
//!
//! ```ignore
//! use multiselect::{DataType, MemoryQuery, MultiRecordSelect};
//!
//! let mut op = MultiRecordSelect::new(MemoryQuery::new(&table));
//! op.add_order_id("run_id")?;
//! op.add_order_id("lumi_id")?;
//! op.add_id("run_id")?;
//! op.add_id("lumi_id")?;
//! op.add_data("value", DataType::Int4)?;
//! op.execute()?;
//!
//! assert_eq!(op.selection_size(&[1], 1)?, 2);
//! op.select_row(&[1, 2])?;
//! let value = op.data()?.get_int("value")?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   MultiRecordSelect (select)         │
//! ├──────────────────┬──────────────────┤
//! │  RecordCache     │  SelectQuery     │
//! │  (cache)         │  (query)         │
//! ├──────────────────┴──────────────────┤
//! │  RecordSpec / Record / Row (records) │
//! ├─────────────────────────────────────┤
//! │  DataType / Value (types)            │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`types`]: Closed set of column kinds and the owned `Value`
//! - [`records`]: Record specifications, records and named rows
//! - [`cache`]: Composite-key trie with at-most-once consumption
//! - [`query`]: Backend contract plus in-memory and SQLite backends
//! - [`select`]: The selection orchestrator
//! - [`config`]: Limits and defaults
//! - [`error`]: `SelectError`, carried inside `eyre::Report`

pub mod cache;
pub mod config;
pub mod error;
pub mod query;
pub mod records;
pub mod select;
pub mod types;

pub use cache::{CompositeKey, DuplicateKeyPolicy, RecordCache};
pub use error::SelectError;
#[cfg(feature = "sqlite")]
pub use query::SqliteQuery;
pub use query::{MemoryQuery, MemoryTable, SelectQuery};
pub use records::{Record, RecordSpec, Row};
pub use select::{MultiRecordSelect, SelectOptions, SelectState};
pub use types::{DataType, Value};
