//! # Record - Positional Field Storage
//!
//! A `Record` is a fixed-width tuple of owned values laid out by a
//! `RecordSpec`. It is the unit stored in the record cache. The cache only
//! ever exposes records immutably and hands them to callers by move, so a
//! record never has two owners.
//!
//! ## Usage
//!
//! ```ignore
//! let mut record = Record::new(&spec);
//! record.set(0, Value::Int4(7))?;
//! assert_eq!(record.get(0)?, &Value::Int4(7));
//! assert!(record.get(spec.field_count()).is_err());
//! ```
//!
//! Values are not checked against the declared `DataType` of their field.

use eyre::Result;

use crate::error::SelectError;
use crate::records::{RecordSpec, Row};
use crate::types::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Box<[Value]>,
}

impl Record {
    /// Allocates one NULL slot per field of `spec`.
    pub fn new(spec: &RecordSpec) -> Self {
        Self {
            values: vec![Value::Null; spec.field_count()].into_boxed_slice(),
        }
    }

    pub fn from_values(spec: &RecordSpec, values: Vec<Value>) -> Result<Self> {
        if values.len() != spec.field_count() {
            return Err(SelectError::RowShapeMismatch {
                expected: spec.field_count(),
                actual: values.len(),
            }
            .into());
        }
        Ok(Self {
            values: values.into_boxed_slice(),
        })
    }

    /// Copies a cursor row into a record laid out by `spec`.
    pub fn from_row(spec: &RecordSpec, row: &Row) -> Result<Self> {
        Self::from_values(spec, row.values().to_vec())
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(SelectError::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| {
            SelectError::IndexOutOfRange {
                index,
                len: self.values.len(),
            }
            .into()
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values.into_vec()
    }
}
