//! Tests for the selection orchestrator

use eyre::{bail, Result};

use super::*;
use crate::cache::DuplicateKeyPolicy;
use crate::error::SelectError;
use crate::query::{BufferedCursor, MemoryQuery, MemoryTable, QueryColumns, SelectQuery};
use crate::records::Row;
use crate::types::{DataType, Value};

fn lumi_table(rows: &[(i32, i32, i32)]) -> MemoryTable {
    let mut table = MemoryTable::with_columns(
        "lumi",
        &[
            ("run_id", DataType::Int4),
            ("lumi_id", DataType::Int4),
            ("value", DataType::Int4),
        ],
    )
    .unwrap();
    for (run, lumi, value) in rows {
        table
            .insert(vec![Value::Int4(*run), Value::Int4(*lumi), Value::Int4(*value)])
            .unwrap();
    }
    table
}

fn declared(table: &MemoryTable) -> MultiRecordSelect<MemoryQuery<'_>> {
    let mut op = MultiRecordSelect::new(MemoryQuery::new(table));
    op.add_order_id("run_id").unwrap();
    op.add_order_id("lumi_id").unwrap();
    op.add_id("run_id").unwrap();
    op.add_id("lumi_id").unwrap();
    op.add_data("value", DataType::Int4).unwrap();
    op
}

fn select_error(err: &eyre::Report) -> Option<&SelectError> {
    err.downcast_ref::<SelectError>()
}

#[test]
fn execute_populates_one_leaf_per_row() {
    let table = lumi_table(&[(1, 1, 10), (1, 2, 20), (2, 1, 30)]);
    let mut op = declared(&table);

    let rows = op.execute().unwrap();

    assert_eq!(rows, 3);
    assert_eq!(op.cached_rows(), 3);
    assert_eq!(op.state(), SelectState::Executed);
    assert_eq!(op.selection_size(&[], 0).unwrap(), 3);
}

#[test]
fn selected_row_is_consumed_exactly_once() {
    let table = lumi_table(&[(1, 1, 10), (1, 2, 20), (2, 1, 30)]);
    let mut op = declared(&table);
    op.execute().unwrap();

    assert_eq!(op.selection_size(&[1], 1).unwrap(), 2);
    op.select_row(&[1, 2]).unwrap();
    assert_eq!(op.data().unwrap().get_named("value"), Some(&Value::Int4(20)));
    assert_eq!(op.selection_size(&[1], 1).unwrap(), 1);

    let err = op.select_row(&[1, 2]).unwrap_err();
    assert_eq!(
        select_error(&err),
        Some(&SelectError::RowNotFound { key: vec![1, 2] })
    );
    let err = op.data().unwrap_err();
    assert_eq!(select_error(&err), Some(&SelectError::NoStagedRecord));
}

#[test]
fn staged_row_carries_every_declared_column() {
    let table = lumi_table(&[(4, 7, 70)]);
    let mut op = declared(&table);
    op.execute().unwrap();

    op.select_row(&[4, 7]).unwrap();
    let row = op.data().unwrap();

    let names: Vec<_> = row.spec().names().collect();
    assert_eq!(names, vec!["run_id", "lumi_id", "value"]);
    assert_eq!(row.get_int("run_id").unwrap(), 4);
    assert_eq!(row.get_int("lumi_id").unwrap(), 7);
}

#[test]
fn data_fails_before_any_selection() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = declared(&table);

    assert_eq!(
        select_error(&op.data().unwrap_err()),
        Some(&SelectError::NoStagedRecord)
    );
    op.execute().unwrap();
    assert_eq!(
        select_error(&op.data().unwrap_err()),
        Some(&SelectError::NoStagedRecord)
    );
}

#[test]
fn clear_drops_staged_row_and_cache() {
    let table = lumi_table(&[(1, 1, 10), (1, 2, 20)]);
    let mut op = declared(&table);
    op.execute().unwrap();
    op.select_row(&[1, 1]).unwrap();

    op.clear();

    assert_eq!(op.state(), SelectState::Cleared);
    assert_eq!(op.cached_rows(), 0);
    assert_eq!(op.selection_size(&[1], 1).unwrap(), 0);
    assert_eq!(
        select_error(&op.data().unwrap_err()),
        Some(&SelectError::NoStagedRecord)
    );
    assert!(op.select_row(&[1, 2]).is_err());
}

#[test]
fn execute_after_clear_repopulates() {
    let table = lumi_table(&[(1, 1, 10), (1, 2, 20)]);
    let mut op = declared(&table);
    op.execute().unwrap();
    op.select_row(&[1, 1]).unwrap();
    op.clear();

    assert_eq!(op.execute().unwrap(), 2);
    op.select_row(&[1, 1]).unwrap();
    assert_eq!(op.data().unwrap().get_int("value").unwrap(), 10);
}

#[test]
fn execute_again_from_executed_discards_staged_row() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = declared(&table);
    op.execute().unwrap();
    op.select_row(&[1, 1]).unwrap();

    op.execute().unwrap();

    assert!(op.data().is_err());
    assert_eq!(op.cached_rows(), 1);
}

#[test]
fn where_ids_filter_rows_and_can_be_rebound() {
    let table = lumi_table(&[(1, 1, 10), (1, 2, 20), (2, 1, 30)]);
    let mut op = declared(&table);
    op.add_where_id("run_id").unwrap();
    op.where_data()
        .set_named("run_id", Value::Int4(2))
        .unwrap();

    assert_eq!(op.execute().unwrap(), 1);
    assert_eq!(op.selection_keys(&[]).unwrap(), vec![2]);

    op.clear();
    op.where_data()
        .set_named("run_id", Value::Int4(1))
        .unwrap();
    assert_eq!(op.execute().unwrap(), 2);
    assert_eq!(op.selection_keys(&[1]).unwrap(), vec![1, 2]);
}

#[test]
fn where_clause_is_editable() {
    let table = lumi_table(&[(1, 1, 10), (1, 2, 20)]);
    let mut op = declared(&table);
    op.add_where_id("run_id").unwrap();
    op.where_data()
        .extend("lumi", DataType::Int4)
        .unwrap();
    op.where_data()
        .set_named("run_id", Value::Int4(1))
        .unwrap();
    op.where_data()
        .set_named("lumi", Value::Int4(2))
        .unwrap();
    op.where_clause().push_str(" AND lumi_id = :lumi");

    assert_eq!(op.execute().unwrap(), 1);
    op.select_row(&[1, 2]).unwrap();
}

#[test]
fn declarations_are_locked_while_rows_are_cached() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = declared(&table);
    op.execute().unwrap();

    let err = op.add_data("extra", DataType::Int8).unwrap_err();
    assert_eq!(select_error(&err), Some(&SelectError::SchemaLocked));

    op.clear();
    assert!(op.add_where_id("lumi_id").is_ok());
}

#[test]
fn duplicate_declarations_are_rejected() {
    let table = lumi_table(&[]);
    let mut op = declared(&table);

    let err = op.add_id("run_id").unwrap_err();
    assert_eq!(
        select_error(&err),
        Some(&SelectError::DuplicateColumn {
            name: "run_id".to_string()
        })
    );
    assert!(op.add_order_id("lumi_id").is_err());
    assert_eq!(op.spec().field_count(), 3);
    assert_eq!(op.query().attribute_spec().field_count(), 3);
}

#[test]
fn execute_without_order_ids_fails() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = MultiRecordSelect::new(MemoryQuery::new(&table));
    op.add_id("run_id").unwrap();

    let err = op.execute().unwrap_err();

    assert_eq!(select_error(&err), Some(&SelectError::NoKeyColumns));
}

#[test]
fn order_id_limit_comes_from_options() {
    let table = lumi_table(&[]);
    let options = SelectOptions::new().max_key_depth(1);
    let mut op = MultiRecordSelect::with_options(MemoryQuery::new(&table), options);
    op.add_order_id("run_id").unwrap();

    let err = op.add_order_id("lumi_id").unwrap_err();

    assert_eq!(
        select_error(&err),
        Some(&SelectError::TooManyKeyColumns { max: 1 })
    );
}

#[test]
fn order_id_that_is_not_selected_fails_execute() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = MultiRecordSelect::new(MemoryQuery::new(&table));
    op.add_order_id("run_id").unwrap();
    op.add_data("value", DataType::Int4).unwrap();

    let err = op.execute().unwrap_err();

    assert_eq!(
        select_error(&err),
        Some(&SelectError::UnknownColumn {
            name: "run_id".to_string()
        })
    );
    assert_eq!(op.cached_rows(), 0);
}

#[test]
fn non_integer_key_column_fails_execute() {
    let mut table =
        MemoryTable::with_columns("tags", &[("tag", DataType::Text), ("n", DataType::Int4)])
            .unwrap();
    table
        .insert(vec![Value::Text("a".into()), Value::Int4(1)])
        .unwrap();
    let mut op = MultiRecordSelect::new(MemoryQuery::new(&table));
    op.add_order_id("tag").unwrap();
    op.add_data("tag", DataType::Text).unwrap();

    let err = op.execute().unwrap_err();

    assert_eq!(
        select_error(&err),
        Some(&SelectError::KeyColumnType {
            column: "tag".to_string(),
            found: Some(DataType::Text)
        })
    );
}

#[test]
fn duplicate_keys_fail_execute_by_default() {
    let table = lumi_table(&[(1, 1, 10), (1, 1, 11)]);
    let mut op = declared(&table);

    let err = op.execute().unwrap_err();

    assert_eq!(
        select_error(&err),
        Some(&SelectError::DuplicateKey { key: vec![1, 1] })
    );
    assert_eq!(op.cached_rows(), 0);
    assert_eq!(op.state(), SelectState::Cleared);
}

#[test]
fn duplicate_keys_keep_last_row_under_overwrite() {
    let table = lumi_table(&[(1, 1, 10), (1, 1, 11)]);
    let options = SelectOptions::new().duplicate_key_policy(DuplicateKeyPolicy::Overwrite);
    let mut op = MultiRecordSelect::with_options(MemoryQuery::new(&table), options);
    op.add_order_id("run_id").unwrap();
    op.add_order_id("lumi_id").unwrap();
    op.add_id("run_id").unwrap();
    op.add_id("lumi_id").unwrap();
    op.add_data("value", DataType::Int4).unwrap();

    assert_eq!(op.execute().unwrap(), 2);
    assert_eq!(op.cached_rows(), 1);
    op.select_row(&[1, 1]).unwrap();
    assert_eq!(op.data().unwrap().get_int("value").unwrap(), 11);
}

#[test]
fn select_row_with_wrong_arity_is_an_error() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = declared(&table);
    op.execute().unwrap();

    let err = op.select_row(&[1]).unwrap_err();

    assert_eq!(
        select_error(&err),
        Some(&SelectError::KeyArityMismatch {
            expected: 2,
            actual: 1
        })
    );
    assert_eq!(op.cached_rows(), 1);
}

#[test]
fn take_data_moves_staged_row_out() {
    let table = lumi_table(&[(1, 1, 10)]);
    let mut op = declared(&table);
    op.execute().unwrap();
    op.select_row(&[1, 1]).unwrap();

    let row = op.take_data().unwrap();

    assert_eq!(row.get_int("value").unwrap(), 10);
    assert!(op.data().is_err());
}

#[test]
fn blob_columns_are_cached_by_value() {
    let mut table = MemoryTable::with_columns(
        "payloads",
        &[("id", DataType::Int4), ("body", DataType::Blob)],
    )
    .unwrap();
    table
        .insert(vec![Value::Int4(9), Value::Blob(vec![0xde, 0xad])])
        .unwrap();
    let mut op = MultiRecordSelect::new(MemoryQuery::new(&table));
    op.add_order_id("id").unwrap();
    op.add_id("id").unwrap();
    op.add_blob_data("body").unwrap();
    op.execute().unwrap();

    op.select_row(&[9]).unwrap();

    assert_eq!(op.data().unwrap().get_blob("body").unwrap(), &[0xde, 0xad]);
}

/// Serves a fixed number of rows and then fails mid-cursor.
struct FailingQuery {
    columns: QueryColumns,
    cursor: BufferedCursor,
    fail_after: usize,
    served: usize,
}

impl FailingQuery {
    fn new(fail_after: usize) -> Self {
        Self {
            columns: QueryColumns::new(),
            cursor: BufferedCursor::new(),
            fail_after,
            served: 0,
        }
    }
}

impl SelectQuery for FailingQuery {
    fn columns(&self) -> &QueryColumns {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut QueryColumns {
        &mut self.columns
    }

    fn execute(&mut self) -> Result<()> {
        let spec = self.columns.attribute_spec().clone();
        let rows = (0..self.fail_after + 1)
            .map(|i| Row::from_values(spec.clone(), vec![Value::Int4(i as i32)]))
            .collect::<Result<Vec<_>>>()?;
        self.cursor.load(rows);
        self.served = 0;
        Ok(())
    }

    fn next_cursor_row(&mut self) -> Result<bool> {
        if self.served == self.fail_after {
            bail!("connection reset");
        }
        self.served += 1;
        Ok(self.cursor.advance())
    }

    fn data(&self) -> Result<&Row> {
        self.cursor.current()
    }

    fn clear(&mut self) {
        self.cursor.reset();
    }
}

#[test]
fn backend_failure_is_reported_as_query_execution_and_leaves_cache_empty() {
    let mut op = MultiRecordSelect::new(FailingQuery::new(2));
    op.add_order_id("id").unwrap();
    op.add_id("id").unwrap();

    let err = op.execute().unwrap_err();

    assert_eq!(select_error(&err), Some(&SelectError::QueryExecution));
    assert!(format!("{:?}", err).contains("connection reset"));
    assert_eq!(op.cached_rows(), 0);
    assert_eq!(op.selection_size(&[0], 1).unwrap(), 0);
    assert!(op.select_row(&[0]).is_err());
}
