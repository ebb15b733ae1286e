use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, Statement, params_from_iter};

use crate::error::SqliteMiddlewareError;
use crate::query::Command;
use crate::results::{QueryResult, Row};
use crate::results::row::index_columns;
use crate::types::RowValues;

use super::params::sqlite_value_to_row_value;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `SqliteMiddlewareError` if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqliteMiddlewareError> {
    let value: Value = row.get(idx)?;
    Ok(sqlite_value_to_row_value(value))
}

/// Bind `params`, step `stmt` to exhaustion and normalize what the engine yields.
///
/// Rows are appended one at a time in the order the engine steps them. When
/// `command` does not return rows the statement is still stepped to
/// completion and the result carries the engine's changed-row count instead.
///
/// # Errors
/// Returns `SqliteMiddlewareError::SqliteError` if the parameter count does not match the
/// statement's placeholders, or if binding or stepping fails.
pub fn build_query_result(
    conn: &Connection,
    stmt: &mut Statement<'_>,
    command: Command,
    params: &[Value],
) -> Result<QueryResult, SqliteMiddlewareError> {
    let expected = stmt.parameter_count();
    if params.len() != expected {
        return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected).into());
    }

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();
    let column_index = Arc::new(index_columns(&column_names));
    let columns = Arc::new(column_names);

    let mut rows = Vec::new();
    let mut rows_iter = stmt.query(params_from_iter(params.iter()))?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        rows.push(Row::with_index(
            Arc::clone(&columns),
            Arc::clone(&column_index),
            row_values,
        ));
    }
    drop(rows_iter);

    if command.returns_rows() {
        return Ok(QueryResult::with_rows(command, columns, rows));
    }

    let changed = match command {
        Command::Ddl => 0,
        _ => usize::try_from(conn.changes()).unwrap_or(usize::MAX),
    };
    Ok(QueryResult::without_rows(command, columns, changed))
}
