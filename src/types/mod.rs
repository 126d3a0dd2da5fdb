//! # Type System
//!
//! This module provides the value kinds shared by schemas, cursor rows and
//! cached records.
//!
//! ## Module Structure
//!
//! - `data_type`: Closed `DataType` enum used in column declarations
//! - `value`: Heap-owned runtime `Value`
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `DataType` | Declared kind of a column |
//! | `Value` | Owned value held by rows and records |
//!
//! ## Usage
//!
//! ```ignore
//! use multiselect::types::{DataType, Value};
//!
//! let kind: DataType = "int".parse()?;
//! let val = Value::Int4(42);
//! assert_eq!(val.data_type(), Some(kind));
//! ```

mod data_type;
mod value;

pub use data_type::DataType;
pub use value::Value;
