//! # Row - Named Attribute List
//!
//! A `Row` pairs a shared `RecordSpec` with one value per field. It is the
//! shape exchanged with query backends (cursor rows, where-clause parameters)
//! and the shape handed to callers by `MultiRecordSelect::data`.
//!
//! Values are reachable by position or by column name. Typed getters report
//! a mismatch as an error rather than coercing.

use std::sync::Arc;

use eyre::{bail, Result};

use crate::error::SelectError;
use crate::records::{Record, RecordSpec};
use crate::types::{DataType, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    spec: Arc<RecordSpec>,
    values: Vec<Value>,
}

impl Default for Row {
    fn default() -> Self {
        Self::new(Arc::new(RecordSpec::new()))
    }
}

impl Row {
    /// Creates a row of NULLs laid out by `spec`.
    pub fn new(spec: Arc<RecordSpec>) -> Self {
        let values = vec![Value::Null; spec.field_count()];
        Self { spec, values }
    }

    pub fn from_values(spec: Arc<RecordSpec>, values: Vec<Value>) -> Result<Self> {
        if values.len() != spec.field_count() {
            return Err(SelectError::RowShapeMismatch {
                expected: spec.field_count(),
                actual: values.len(),
            }
            .into());
        }
        Ok(Self { spec, values })
    }

    /// Rebuilds a row from a cached record, moving its values.
    pub fn from_record(spec: Arc<RecordSpec>, record: Record) -> Result<Self> {
        Self::from_values(spec, record.into_values())
    }

    pub fn spec(&self) -> &RecordSpec {
        &self.spec
    }

    pub fn shared_spec(&self) -> &Arc<RecordSpec> {
        &self.spec
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.spec.index_of(name).and_then(|idx| self.values.get(idx))
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let len = self.values.len();
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SelectError::IndexOutOfRange { index, len }.into()),
        }
    }

    pub fn set_named(&mut self, name: &str, value: Value) -> Result<()> {
        let idx = self.position(name)?;
        self.values[idx] = value;
        Ok(())
    }

    /// Appends a NULL-valued attribute.
    pub fn extend(&mut self, name: impl Into<String>, data_type: DataType) -> Result<()> {
        Arc::make_mut(&mut self.spec).add(name, data_type)?;
        self.values.push(Value::Null);
        Ok(())
    }

    /// Resets every value to NULL, keeping the layout.
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = Value::Null);
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        let value = self.named(name)?;
        match value.as_i64() {
            Some(i) => Ok(i),
            None => bail!("expected INT for '{}', got {:?}", name, value),
        }
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        match self.named(name)? {
            Value::Float4(f) => Ok(f64::from(*f)),
            Value::Float8(f) => Ok(*f),
            other => bail!("expected FLOAT for '{}', got {:?}", name, other),
        }
    }

    pub fn get_text(&self, name: &str) -> Result<&str> {
        match self.named(name)? {
            Value::Text(s) => Ok(s),
            other => bail!("expected TEXT for '{}', got {:?}", name, other),
        }
    }

    pub fn get_blob(&self, name: &str) -> Result<&[u8]> {
        match self.named(name)? {
            Value::Blob(b) => Ok(b),
            other => bail!("expected BLOB for '{}', got {:?}", name, other),
        }
    }

    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.get_named(name), Some(Value::Null))
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Iterates `(column name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.spec.names().zip(self.values.iter())
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.spec.index_of(name).ok_or_else(|| {
            SelectError::UnknownColumn {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn named(&self, name: &str) -> Result<&Value> {
        let idx = self.position(name)?;
        Ok(&self.values[idx])
    }
}
