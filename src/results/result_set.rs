use std::sync::Arc;

use crate::query::Command;
use crate::types::RowValues;

use super::row::Row;

/// The canonical result of executing a query
///
/// `rows` is `None` exactly when the command is a data-modification command
/// that produces no result set. Row-returning commands always carry a list,
/// empty when nothing matched, in the order the engine yielded the rows.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The kind of operation that produced this result
    pub command: Command,
    /// Column names in statement order
    pub columns: Arc<Vec<String>>,
    /// Materialized rows, or `None` for data-modification commands
    pub rows: Option<Vec<Row>>,
    /// Rows returned, or rows changed for data-modification commands
    pub num_rows: usize,
}

impl QueryResult {
    #[must_use]
    pub fn with_rows(command: Command, columns: Arc<Vec<String>>, rows: Vec<Row>) -> Self {
        let num_rows = rows.len();
        Self {
            command,
            columns,
            rows: Some(rows),
            num_rows,
        }
    }

    #[must_use]
    pub fn without_rows(command: Command, columns: Arc<Vec<String>>, changed: usize) -> Self {
        Self {
            command,
            columns,
            rows: None,
            num_rows: changed,
        }
    }

    /// Borrow the column names
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// The rows as plain value vectors, or `None` for data-modification commands.
    #[must_use]
    pub fn value_rows(&self) -> Option<Vec<Vec<RowValues>>> {
        self.rows
            .as_ref()
            .map(|rows| rows.iter().map(|row| row.values.clone()).collect())
    }
}
