//! # Records and Record Specifications
//!
//! This module provides the schema and tuple types the selection layer is
//! built on.
//!
//! ## Types
//!
//! | Type | Role |
//! |------|------|
//! | `RecordSpec` | Ordered, uniquely named `(name, DataType)` fields |
//! | `Record` | Positional tuple of owned values, stored in the cache |
//! | `Row` | `RecordSpec` + values, addressable by name |
//!
//! ## Layout
//!
//! A spec is assembled once, as columns are declared, and is then shared by
//! every record and row built against it:
//!
//! ```text
//! RecordSpec ──┬── Record { values: [v0, v1, .., vN] }   (cache leaves)
//!              └── Row { spec, values }                   (cursor / staged row)
//! ```
//!
//! Converting between the two is a move of the value vector; no value is
//! copied when a cached record is handed back as a row.

pub mod record;
pub mod row;
pub mod schema;


pub use record::Record;
pub use row::Row;
pub use schema::{ColumnDef, RecordSpec};
