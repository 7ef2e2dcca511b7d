//! Results of executed statements

use crate::collection::Collection;
use crate::value::{Row, Value};

/// Everything a statement produced, fetched eagerly
///
/// Rows are materialised while the connection lock is held, so a result can
/// outlive the statement and be read after the next query runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Row>,
    affected: usize,
    last_insert_id: i64,
}

impl QueryResult {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Row>, affected: usize, last_insert_id: i64) -> Self {
        Self {
            columns,
            rows,
            affected,
            last_insert_id,
        }
    }

    /// Column names of the result set (empty for data-changing statements)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// First row, or `None` when the result set is empty
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Values of the column at `index` across every row
    pub fn column(&self, index: usize) -> Vec<Value> {
        self.rows
            .iter()
            .filter_map(|row| row.get_index(index).cloned())
            .collect()
    }

    /// Value of the first column of the first row
    pub fn scalar(&self) -> Option<Value> {
        self.first().and_then(|row| row.get_index(0).cloned())
    }

    /// Rows changed by an `INSERT`, `UPDATE`, `DELETE` or `REPLACE`
    pub fn row_count(&self) -> usize {
        self.affected
    }

    /// Rowid of the most recent successful insert on the connection
    pub fn last_insert_id(&self) -> i64 {
        self.last_insert_id
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Rows as a [`Collection`] indexed by position
    pub fn into_collection(self) -> Collection<Row> {
        Collection::new(self.rows)
    }
}
