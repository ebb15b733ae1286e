use std::time::Duration;

use tracing::trace;

use crate::error::SqliteMiddlewareError;
use crate::query::Query;
use crate::results::QueryResult;
use crate::sqlite::params::Params;
use crate::sqlite::query::build_query_result;
use crate::types::RowValues;

use super::SqliteConnection;

/// Per-call execute options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Advisory budget for the surrounding pool protocol. A statement that has
    /// started always runs to completion or failure.
    pub timeout: Option<Duration>,
}

impl ExecuteOptions {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl SqliteConnection {
    /// Run `query` with positional `params` and materialize the full result.
    ///
    /// Prepared queries run their cached statement; unprepared ones compile the
    /// statement text for this call only.
    ///
    /// The pool checks a connection out before executing on it, but `execute`
    /// itself does not require the busy state: it runs on idle connections too
    /// and never changes the busy flag. Use [`SqliteConnection::run`] to wrap a
    /// call in checkout and check-in.
    ///
    /// # Errors
    /// Returns the engine's error if binding or execution fails (the connection stays usable),
    /// `SqliteMiddlewareError::StatementError` if the query's prepared reference is closed or
    /// belongs to another connection, and `SqliteMiddlewareError::NotConnected` if the connection
    /// has no engine handle.
    pub fn execute(
        &mut self,
        query: &Query,
        params: &[RowValues],
    ) -> Result<QueryResult, SqliteMiddlewareError> {
        self.execute_with_options(query, params, &ExecuteOptions::default())
    }

    /// [`SqliteConnection::execute`] with per-call options.
    ///
    /// # Errors
    /// Same as [`SqliteConnection::execute`].
    pub fn execute_with_options(
        &mut self,
        query: &Query,
        params: &[RowValues],
        opts: &ExecuteOptions,
    ) -> Result<QueryResult, SqliteMiddlewareError> {
        let handle = self.handle()?;
        let converted = Params::convert(params)?;
        let command = query.command();

        let result = match query.statement_ref() {
            Some(token) => {
                let sql = self.prepared.resolve(self.id, token)?;
                let mut stmt = handle.prepare_cached(sql)?;
                build_query_result(handle, &mut stmt, command, converted.as_values())?
            }
            None => {
                let mut stmt = handle.prepare(query.statement())?;
                build_query_result(handle, &mut stmt, command, converted.as_values())?
            }
        };

        trace!(
            connection = self.id,
            command = ?command,
            num_rows = result.num_rows,
            timeout = ?opts.timeout.or(self.timeout),
            "sqlite query executed"
        );
        Ok(result)
    }
}
