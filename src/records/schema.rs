//! # Record Specification
//!
//! This module provides `RecordSpec`, the ordered field layout shared by
//! records and rows. Field order is the order of `add` calls and never
//! changes afterwards; names are unique within a spec.
//!
//! ## Spec Internals
//!
//! - `columns`: Column definitions in declaration order
//! - `index`: Name to position map for O(1) lookup by name

use eyre::Result;
use hashbrown::HashMap;

use crate::error::SelectError;
use crate::types::DataType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordSpec {
    columns: Vec<ColumnDef>,
    index: HashMap<String, usize>,
}

impl RecordSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field and returns its position.
    pub fn add(&mut self, name: impl Into<String>, data_type: DataType) -> Result<usize> {
        let name = name.into();
        if self.index.contains_key(name.as_str()) {
            return Err(SelectError::DuplicateColumn { name }.into());
        }
        let position = self.columns.len();
        self.index.insert(name.clone(), position);
        self.columns.push(ColumnDef::new(name, data_type));
        Ok(position)
    }

    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, idx: usize) -> Option<&ColumnDef> {
        self.columns.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

impl PartialEq for RecordSpec {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for RecordSpec {}
