use std::sync::Arc;

use eyre::{Result, WrapErr};
use tracing::{debug, instrument, trace};

use super::SelectOptions;
use crate::cache::{CompositeKey, RecordCache};
use crate::error::SelectError;
use crate::query::SelectQuery;
use crate::records::{Record, RecordSpec, Row};
use crate::types::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectState {
    /// Nothing executed yet; declarations accepted.
    Declaring,
    /// The cache holds the result of the last `execute()`.
    Executed,
    /// Data dropped; declarations persist and may be extended.
    Cleared,
}

/// Runs one query and serves its rows by composite key.
///
/// Order-id columns form the key, in declaration order. Id, data and blob
/// columns form the cached record. Every selected row is consumed at most
/// once.
pub struct MultiRecordSelect<Q: SelectQuery> {
    query: Q,
    order_ids: Vec<String>,
    spec: RecordSpec,
    cache: RecordCache,
    row: Option<Row>,
    state: SelectState,
    options: SelectOptions,
}

impl<Q: SelectQuery> MultiRecordSelect<Q> {
    pub fn new(query: Q) -> Self {
        Self::with_options(query, SelectOptions::default())
    }

    pub fn with_options(query: Q, options: SelectOptions) -> Self {
        Self {
            query,
            order_ids: Vec::new(),
            spec: RecordSpec::new(),
            cache: RecordCache::new().with_policy(options.key_policy()),
            row: None,
            state: SelectState::Declaring,
            options,
        }
    }

    /// Declares a sort column that is also the next key component.
    ///
    /// The column must additionally be selected with `add_id` or `add_data`
    /// for its value to be available when the key is built.
    pub fn add_order_id(&mut self, column: &str) -> Result<()> {
        self.ensure_declarable()?;
        if self.order_ids.iter().any(|c| c == column) {
            return Err(SelectError::DuplicateColumn {
                name: column.to_string(),
            }
            .into());
        }
        let max = self.options.key_depth_limit();
        if self.order_ids.len() >= max {
            return Err(SelectError::TooManyKeyColumns { max }.into());
        }
        self.query.add_order_id(column);
        self.order_ids.push(column.to_string());
        Ok(())
    }

    /// Selects an integer column into the record.
    pub fn add_id(&mut self, column: &str) -> Result<()> {
        self.declare(column, DataType::Int4, |q| q.add_id(column))
    }

    pub fn add_data(&mut self, column: &str, data_type: DataType) -> Result<()> {
        self.declare(column, data_type, |q| q.add_data(column, data_type))
    }

    pub fn add_blob_data(&mut self, column: &str) -> Result<()> {
        self.declare(column, DataType::Blob, |q| q.add_blob_data(column))
    }

    /// Adds an integer equality predicate, bound through `where_data()`.
    pub fn add_where_id(&mut self, column: &str) -> Result<()> {
        self.ensure_declarable()?;
        self.query.add_where_id(column)
    }

    pub fn where_clause(&mut self) -> &mut String {
        self.query.where_clause()
    }

    pub fn where_data(&mut self) -> &mut Row {
        self.query.where_data()
    }

    /// Runs the query and caches every returned row under its key.
    ///
    /// Returns the number of cached rows. On failure the cache is left empty
    /// and the query is reset.
    #[instrument(skip_all)]
    pub fn execute(&mut self) -> Result<usize> {
        if self.order_ids.is_empty() {
            return Err(SelectError::NoKeyColumns.into());
        }
        self.row = None;
        self.cache =
            RecordCache::with_depth(self.order_ids.len()).with_policy(self.options.key_policy());

        let populated = self.populate();
        self.query.clear();

        match populated {
            Ok(rows) => {
                self.state = SelectState::Executed;
                debug!(rows, depth = self.order_ids.len(), "record cache populated");
                Ok(rows)
            }
            Err(e) => {
                self.cache.clear();
                self.state = SelectState::Cleared;
                debug!(error = %e, "record cache population failed");
                Err(e)
            }
        }
    }

    /// Consumes the cached row for `key` and stages it for `data()`.
    ///
    /// A missing key clears the staged row and fails with `RowNotFound`.
    pub fn select_row(&mut self, key: &[i32]) -> Result<()> {
        self.row = None;
        match self.cache.lookup_and_clear(key)? {
            Some(record) => {
                let spec = Arc::clone(self.query.attribute_spec());
                self.row = Some(Row::from_record(spec, record)?);
                trace!(?key, "staged row");
                Ok(())
            }
            None => Err(SelectError::RowNotFound { key: key.to_vec() }.into()),
        }
    }

    /// Number of unconsumed rows whose key starts with `prefix`, walking at
    /// most `number_of_indexes` components.
    pub fn selection_size(&self, prefix: &[i32], number_of_indexes: usize) -> Result<usize> {
        if self.cache.is_empty() {
            return Ok(0);
        }
        self.cache.branch_size(prefix, number_of_indexes)
    }

    /// Distinct next key components below `prefix`, ascending.
    pub fn selection_keys(&self, prefix: &[i32]) -> Result<Vec<i32>> {
        self.cache.branch_keys(prefix)
    }

    pub fn data(&self) -> Result<&Row> {
        self.row
            .as_ref()
            .ok_or_else(|| SelectError::NoStagedRecord.into())
    }

    /// Moves the staged row out; a following `data()` fails.
    pub fn take_data(&mut self) -> Result<Row> {
        self.row
            .take()
            .ok_or_else(|| SelectError::NoStagedRecord.into())
    }

    /// Drops the staged row and all cached rows and resets the query.
    pub fn clear(&mut self) {
        self.row = None;
        self.cache.clear();
        self.query.clear();
        self.state = SelectState::Cleared;
        trace!("selection cleared");
    }

    pub fn state(&self) -> SelectState {
        self.state
    }

    pub fn cached_rows(&self) -> usize {
        self.cache.len()
    }

    pub fn spec(&self) -> &RecordSpec {
        &self.spec
    }

    pub fn order_ids(&self) -> &[String] {
        &self.order_ids
    }

    pub fn options(&self) -> &SelectOptions {
        &self.options
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn into_query(self) -> Q {
        self.query
    }

    fn ensure_declarable(&self) -> Result<()> {
        if self.state == SelectState::Executed {
            return Err(SelectError::SchemaLocked.into());
        }
        Ok(())
    }

    fn declare(
        &mut self,
        column: &str,
        data_type: DataType,
        configure: impl FnOnce(&mut Q) -> Result<()>,
    ) -> Result<()> {
        self.ensure_declarable()?;
        if self.spec.contains(column) {
            return Err(SelectError::DuplicateColumn {
                name: column.to_string(),
            }
            .into());
        }
        configure(&mut self.query)?;
        self.spec.add(column, data_type)?;
        Ok(())
    }

    fn populate(&mut self) -> Result<usize> {
        self.query
            .execute()
            .wrap_err(SelectError::QueryExecution)?;

        let mut rows = 0;
        while self
            .query
            .next_cursor_row()
            .wrap_err(SelectError::QueryExecution)?
        {
            let row = self.query.data().wrap_err(SelectError::QueryExecution)?;
            let key = extract_key(&self.order_ids, row)?;
            let record = Record::from_row(&self.spec, row)?;
            self.cache.push(&key, record)?;
            rows += 1;
        }
        Ok(rows)
    }
}

fn extract_key(order_ids: &[String], row: &Row) -> Result<CompositeKey> {
    order_ids
        .iter()
        .map(|column| -> Result<i32> {
            let value = row
                .get_named(column)
                .ok_or_else(|| SelectError::UnknownColumn {
                    name: column.clone(),
                })?;
            value.as_i32().ok_or_else(|| {
                SelectError::KeyColumnType {
                    column: column.clone(),
                    found: value.data_type(),
                }
                .into()
            })
        })
        .collect()
}
