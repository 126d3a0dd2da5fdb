//! # Selection Errors
//!
//! Every fallible operation in this crate returns `eyre::Result`. Conditions a
//! caller may want to react to are raised as a `SelectError` inside the
//! report, so they can be recovered with `downcast_ref`:
//!
//! ```ignore
//! match op.data() {
//!     Ok(row) => consume(row),
//!     Err(e) if matches!(e.downcast_ref(), Some(SelectError::NoStagedRecord)) => skip(),
//!     Err(e) => return Err(e),
//! }
//! ```
//!
//! Backend failures surfaced by `execute()` carry `SelectError::QueryExecution`
//! as context on top of the backend's own report.

use std::fmt;

use crate::types::DataType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// `data()` was called with no successfully selected row.
    NoStagedRecord,
    /// A key or prefix does not match the depth of the record cache.
    KeyArityMismatch { expected: usize, actual: usize },
    /// The backend query failed while executing or iterating.
    QueryExecution,
    /// A full key was pushed twice under `DuplicateKeyPolicy::Reject`.
    DuplicateKey { key: Vec<i32> },
    /// Positional access outside a record or row.
    IndexOutOfRange { index: usize, len: usize },
    /// `select_row` found no cached row for the key.
    RowNotFound { key: Vec<i32> },
    DuplicateColumn { name: String },
    UnknownColumn { name: String },
    /// An order-id column held something other than a 32-bit integer.
    KeyColumnType {
        column: String,
        found: Option<DataType>,
    },
    NoKeyColumns,
    TooManyKeyColumns { max: usize },
    /// Column declarations were attempted while executed data is cached.
    SchemaLocked,
    RowShapeMismatch { expected: usize, actual: usize },
    UnsupportedType { name: String },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::NoStagedRecord => write!(f, "no record available"),
            SelectError::KeyArityMismatch { expected, actual } => write!(
                f,
                "key arity mismatch: cache depth is {} but {} components were given",
                expected, actual
            ),
            SelectError::QueryExecution => write!(f, "query execution failed"),
            SelectError::DuplicateKey { key } => {
                write!(f, "duplicate key {:?} inserted into record cache", key)
            }
            SelectError::IndexOutOfRange { index, len } => {
                write!(f, "field index {} out of range for {} fields", index, len)
            }
            SelectError::RowNotFound { key } => write!(f, "no cached row for key {:?}", key),
            SelectError::DuplicateColumn { name } => {
                write!(f, "column '{}' is already declared", name)
            }
            SelectError::UnknownColumn { name } => write!(f, "unknown column '{}'", name),
            SelectError::KeyColumnType { column, found } => match found {
                Some(dt) => write!(
                    f,
                    "key column '{}' must hold a 32-bit integer, found {}",
                    column, dt
                ),
                None => write!(f, "key column '{}' must hold a 32-bit integer, found NULL", column),
            },
            SelectError::NoKeyColumns => write!(f, "no order-id columns declared"),
            SelectError::TooManyKeyColumns { max } => {
                write!(f, "at most {} order-id columns are supported", max)
            }
            SelectError::SchemaLocked => {
                write!(f, "columns cannot be declared while executed rows are cached")
            }
            SelectError::RowShapeMismatch { expected, actual } => write!(
                f,
                "row has {} values but the record spec declares {} fields",
                actual, expected
            ),
            SelectError::UnsupportedType { name } => write!(f, "unsupported data type '{}'", name),
        }
    }
}

impl std::error::Error for SelectError {}
