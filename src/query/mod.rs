//! # Query Backends
//!
//! This module defines the contract between the selection layer and the
//! relational backend that actually runs a query, plus two backends that
//! implement it.
//!
//! ## The `SelectQuery` Contract
//!
//! A backend is configured, bound, then run:
//!
//! ```text
//! configure:  add_order_id / add_id / add_data / add_blob_data / add_where_id
//! bind:       where_clause() / where_data()
//! run:        execute() -> next_cursor_row()* -> data() ... -> clear()
//! ```
//!
//! Declaration and binding state is identical for every backend and lives in
//! `QueryColumns`; the trait provides those methods on top of
//! `columns()`/`columns_mut()`. Backends only implement the run half.
//!
//! ## Backends
//!
//! | Backend | Source | Where clause support |
//! |---------|--------|----------------------|
//! | `MemoryQuery` | `MemoryTable` | conjunction of `column = :param` |
//! | `SqliteQuery` | rusqlite `Connection` (feature `sqlite`) | any SQLite expression |

mod cursor;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::sync::Arc;

use eyre::Result;

use crate::records::{RecordSpec, Row};
use crate::types::DataType;

pub use cursor::BufferedCursor;
pub use memory::{MemoryQuery, MemoryTable};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteQuery;

/// Declared columns, predicate text and bound predicate values of a query.
#[derive(Debug, Clone, Default)]
pub struct QueryColumns {
    order_ids: Vec<String>,
    select: Arc<RecordSpec>,
    where_clause: String,
    where_data: Row,
}

impl QueryColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_order_id(&mut self, column: &str) {
        self.order_ids.push(column.to_string());
    }

    pub fn add_id(&mut self, column: &str) -> Result<()> {
        self.add_data(column, DataType::Int4)
    }

    pub fn add_data(&mut self, column: &str, data_type: DataType) -> Result<()> {
        Arc::make_mut(&mut self.select).add(column, data_type)?;
        Ok(())
    }

    pub fn add_blob_data(&mut self, column: &str) -> Result<()> {
        self.add_data(column, DataType::Blob)
    }

    /// Adds an integer predicate column bound as `column = :column`.
    pub fn add_where_id(&mut self, column: &str) -> Result<()> {
        self.where_data.extend(column, DataType::Int4)?;
        if !self.where_clause.trim().is_empty() {
            self.where_clause.push_str(" AND ");
        }
        self.where_clause.push_str(column);
        self.where_clause.push_str(" = :");
        self.where_clause.push_str(column);
        Ok(())
    }

    pub fn order_ids(&self) -> &[String] {
        &self.order_ids
    }

    pub fn attribute_spec(&self) -> &Arc<RecordSpec> {
        &self.select
    }

    pub fn where_clause(&self) -> &str {
        &self.where_clause
    }

    pub fn where_clause_mut(&mut self) -> &mut String {
        &mut self.where_clause
    }

    pub fn where_data(&self) -> &Row {
        &self.where_data
    }

    pub fn where_data_mut(&mut self) -> &mut Row {
        &mut self.where_data
    }
}

/// Relational backend consumed by `MultiRecordSelect`.
pub trait SelectQuery {
    fn columns(&self) -> &QueryColumns;

    fn columns_mut(&mut self) -> &mut QueryColumns;

    /// Runs the query and positions the cursor before the first row.
    fn execute(&mut self) -> Result<()>;

    /// Advances the cursor; returns false once the result is exhausted.
    fn next_cursor_row(&mut self) -> Result<bool>;

    /// The row the cursor is positioned on.
    fn data(&self) -> Result<&Row>;

    /// Discards the result and cursor. Declarations and bound values stay.
    fn clear(&mut self);

    fn add_order_id(&mut self, column: &str) {
        self.columns_mut().add_order_id(column);
    }

    fn add_id(&mut self, column: &str) -> Result<()> {
        self.columns_mut().add_id(column)
    }

    fn add_data(&mut self, column: &str, data_type: DataType) -> Result<()> {
        self.columns_mut().add_data(column, data_type)
    }

    fn add_blob_data(&mut self, column: &str) -> Result<()> {
        self.columns_mut().add_blob_data(column)
    }

    fn add_where_id(&mut self, column: &str) -> Result<()> {
        self.columns_mut().add_where_id(column)
    }

    fn attribute_spec(&self) -> &Arc<RecordSpec> {
        self.columns().attribute_spec()
    }

    fn where_clause(&mut self) -> &mut String {
        self.columns_mut().where_clause_mut()
    }

    fn where_data(&mut self) -> &mut Row {
        self.columns_mut().where_data_mut()
    }
}
