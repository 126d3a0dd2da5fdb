//! # In-Memory Query Backend
//!
//! `MemoryQuery` runs a `SelectQuery` against a `MemoryTable` held in process.
//! It evaluates the same three clauses a relational backend would:
//!
//! 1. **WHERE**: a conjunction of `column = :param` terms, each parameter read
//!    from the bound where data. A NULL parameter matches no row.
//! 2. **ORDER BY**: ascending on the order-id columns, NULLs first. Rows that
//!    tie keep their insertion order.
//! 3. **SELECT**: projection onto the declared id/data columns.
//!
//! Any other predicate text, or a reference to a column the table lacks, is
//! reported as an execution error.

use std::cmp::Ordering;
use std::sync::Arc;

use eyre::{bail, ensure, Result};
use tracing::debug;

use super::{BufferedCursor, QueryColumns, SelectQuery};
use crate::error::SelectError;
use crate::records::{RecordSpec, Row};
use crate::types::{DataType, Value};

#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: String,
    spec: Arc<RecordSpec>,
    rows: Vec<Vec<Value>>,
}

impl MemoryTable {
    pub fn new(name: impl Into<String>, spec: RecordSpec) -> Self {
        Self {
            name: name.into(),
            spec: Arc::new(spec),
            rows: Vec::new(),
        }
    }

    pub fn with_columns(name: impl Into<String>, columns: &[(&str, DataType)]) -> Result<Self> {
        let mut spec = RecordSpec::new();
        for (column, data_type) in columns {
            spec.add(*column, *data_type)?;
        }
        Ok(Self::new(name, spec))
    }

    pub fn insert(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.spec.field_count() {
            return Err(SelectError::RowShapeMismatch {
                expected: self.spec.field_count(),
                actual: values.len(),
            }
            .into());
        }
        self.rows.push(values);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &RecordSpec {
        &self.spec
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        match self.spec.index_of(column) {
            Some(idx) => Ok(idx),
            None => bail!("table '{}' has no column '{}'", self.name, column),
        }
    }
}

pub struct MemoryQuery<'t> {
    table: &'t MemoryTable,
    columns: QueryColumns,
    cursor: BufferedCursor,
}

impl<'t> MemoryQuery<'t> {
    pub fn new(table: &'t MemoryTable) -> Self {
        Self {
            table,
            columns: QueryColumns::new(),
            cursor: BufferedCursor::new(),
        }
    }

    pub fn table(&self) -> &MemoryTable {
        self.table
    }

    fn predicate(&self) -> Result<Vec<(usize, Value)>> {
        let mut bound = Vec::new();
        for (column, param) in parse_conjunction(self.columns.where_clause())? {
            let idx = self.table.column_index(&column)?;
            let Some(value) = self.columns.where_data().get_named(&param) else {
                bail!("where parameter ':{}' is not bound", param);
            };
            bound.push((idx, value.clone()));
        }
        Ok(bound)
    }
}

impl SelectQuery for MemoryQuery<'_> {
    fn columns(&self) -> &QueryColumns {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut QueryColumns {
        &mut self.columns
    }

    fn execute(&mut self) -> Result<()> {
        let spec = Arc::clone(self.columns.attribute_spec());
        ensure!(
            !spec.is_empty(),
            "no columns selected from '{}'",
            self.table.name()
        );

        let projection = spec
            .names()
            .map(|column| self.table.column_index(column))
            .collect::<Result<Vec<_>>>()?;
        let ordering = self
            .columns
            .order_ids()
            .iter()
            .map(|column| self.table.column_index(column))
            .collect::<Result<Vec<_>>>()?;
        let predicate = self.predicate()?;

        let mut matched: Vec<&Vec<Value>> = self
            .table
            .rows
            .iter()
            .filter(|row| {
                predicate
                    .iter()
                    .all(|(idx, expected)| values_equal(&row[*idx], expected))
            })
            .collect();
        matched.sort_by(|a, b| {
            ordering
                .iter()
                .map(|idx| compare_values(&a[*idx], &b[*idx]))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let rows = matched
            .into_iter()
            .map(|row| {
                let values = projection.iter().map(|idx| row[*idx].clone()).collect();
                Row::from_values(Arc::clone(&spec), values)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            table = self.table.name(),
            rows = rows.len(),
            "memory query executed"
        );
        self.cursor.load(rows);
        Ok(())
    }

    fn next_cursor_row(&mut self) -> Result<bool> {
        Ok(self.cursor.advance())
    }

    fn data(&self) -> Result<&Row> {
        self.cursor.current()
    }

    fn clear(&mut self) {
        self.cursor.reset();
    }
}

/// Splits `a = :a AND b = :b` into `(column, parameter)` pairs.
fn parse_conjunction(clause: &str) -> Result<Vec<(String, String)>> {
    let mut terms = Vec::new();
    let mut current = String::new();
    for token in clause.split_whitespace() {
        if token.eq_ignore_ascii_case("and") {
            terms.push(std::mem::take(&mut current));
        } else {
            current.push_str(token);
        }
    }
    if !terms.is_empty() || !current.is_empty() {
        terms.push(current);
    }

    terms
        .into_iter()
        .map(|term| {
            let parsed = term.split_once('=').and_then(|(column, rhs)| {
                let param = rhs.strip_prefix(':')?;
                let valid = |s: &str| {
                    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                };
                (valid(column) && valid(param)).then(|| (column.to_string(), param.to_string()))
            });
            match parsed {
                Some(pair) => Ok(pair),
                None => bail!("unsupported where term '{}'", term),
            }
        })
        .collect()
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    if actual.is_null() || expected.is_null() {
        return false;
    }
    match (actual.as_i64(), expected.as_i64()) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::Blob(x), Value::Blob(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        },
    }
}
