//! # SQLite Query Backend
//!
//! `SqliteQuery` runs a `SelectQuery` through a rusqlite `Connection`. The
//! statement is assembled from the declarations:
//!
//! ```text
//! SELECT <ids and data, declaration order> FROM <table>
//!     [WHERE <where clause>]
//!     [ORDER BY <order ids, declaration order>]
//! ```
//!
//! Every attribute of the where data is bound as the named parameter
//! `:<attribute>` when the statement references it. Columns are decoded by
//! their declared `DataType`; SQL NULL becomes `Value::Null`.
//!
//! The result is read to exhaustion inside `execute()` and then served
//! through the cursor, so the statement never outlives the call.

use std::sync::Arc;

use eyre::{ensure, Result, WrapErr};
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Connection, ToSql};
use tracing::debug;

use super::{BufferedCursor, QueryColumns, SelectQuery};
use crate::records::Row;
use crate::types::{DataType, Value};

pub struct SqliteQuery<'c> {
    conn: &'c Connection,
    table: String,
    columns: QueryColumns,
    cursor: BufferedCursor,
}

impl<'c> SqliteQuery<'c> {
    pub fn new(conn: &'c Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            columns: QueryColumns::new(),
            cursor: BufferedCursor::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Renders the statement `execute()` will prepare.
    pub fn sql(&self) -> String {
        let select: Vec<&str> = self.columns.attribute_spec().names().collect();
        let mut sql = format!("SELECT {} FROM {}", select.join(", "), self.table);

        let clause = self.columns.where_clause().trim();
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }

        let order_ids = self.columns.order_ids();
        if !order_ids.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_ids.join(", "));
        }
        sql
    }
}

impl SelectQuery for SqliteQuery<'_> {
    fn columns(&self) -> &QueryColumns {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut QueryColumns {
        &mut self.columns
    }

    fn execute(&mut self) -> Result<()> {
        let spec = Arc::clone(self.columns.attribute_spec());
        ensure!(!spec.is_empty(), "no columns selected from '{}'", self.table);

        let conn = self.conn;
        let sql = self.sql();
        let mut stmt = conn
            .prepare(&sql)
            .wrap_err_with(|| format!("failed to prepare '{}'", sql))?;

        let where_data = self.columns.where_data();
        let names: Vec<String> = where_data
            .spec()
            .names()
            .map(|name| format!(":{}", name))
            .collect();
        let mut params: Vec<(&str, &dyn ToSql)> = Vec::with_capacity(names.len());
        for (name, value) in names.iter().zip(where_data.values()) {
            if stmt.parameter_index(name)?.is_some() {
                params.push((name.as_str(), value as &dyn ToSql));
            }
        }

        let mut rows = stmt
            .query(params.as_slice())
            .wrap_err_with(|| format!("failed to run '{}'", sql))?;
        let mut buffered = Vec::new();
        while let Some(row) = rows.next()? {
            let values = spec
                .columns()
                .iter()
                .enumerate()
                .map(|(idx, column)| read_column(row, idx, column.data_type))
                .collect::<rusqlite::Result<Vec<_>>>()
                .wrap_err_with(|| format!("failed to decode row {} of '{}'", buffered.len(), sql))?;
            buffered.push(Row::from_values(Arc::clone(&spec), values)?);
        }
        drop(rows);

        debug!(table = %self.table, rows = buffered.len(), "sqlite query executed");
        self.cursor.load(buffered);
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

fn read_column(row: &rusqlite::Row<'_>, idx: usize, data_type: DataType) -> rusqlite::Result<Value> {
    let value = match data_type {
        DataType::Bool => row.get::<_, Option<bool>>(idx)?.map(Value::Bool),
        DataType::Int2 => row.get::<_, Option<i16>>(idx)?.map(Value::Int2),
        DataType::Int4 => row.get::<_, Option<i32>>(idx)?.map(Value::Int4),
        DataType::Int8 => row.get::<_, Option<i64>>(idx)?.map(Value::Int8),
        DataType::Float4 => row
            .get::<_, Option<f64>>(idx)?
            .map(|f| Value::Float4(f as f32)),
        DataType::Float8 => row.get::<_, Option<f64>>(idx)?.map(Value::Float8),
        DataType::Text => row.get::<_, Option<String>>(idx)?.map(Value::Text),
        DataType::Blob => row.get::<_, Option<Vec<u8>>>(idx)?.map(Value::Blob),
    };
    Ok(value.unwrap_or(Value::Null))
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Int2(i) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*i))),
            Value::Int4(i) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*i))),
            Value::Int8(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Float4(f) => ToSqlOutput::Owned(SqlValue::Real(f64::from(*f))),
            Value::Float8(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}
