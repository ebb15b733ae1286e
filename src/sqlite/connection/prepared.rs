use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::SqliteMiddlewareError;
use crate::query::{Query, StatementRef};

use super::SqliteConnection;

/// Statements prepared on one connection, keyed by the id inside their [`StatementRef`].
///
/// The compiled statements live in the engine's per-connection statement
/// cache; the registry decides which references are still valid.
#[derive(Debug, Default)]
pub(crate) struct PreparedRegistry {
    next_id: u64,
    statements: HashMap<u64, Arc<str>>,
}

impl PreparedRegistry {
    pub(crate) fn insert(&mut self, connection: u64, sql: Arc<str>) -> StatementRef {
        self.next_id += 1;
        self.statements.insert(self.next_id, sql);
        StatementRef {
            connection,
            statement: self.next_id,
        }
    }

    pub(crate) fn resolve(
        &self,
        connection: u64,
        token: StatementRef,
    ) -> Result<&Arc<str>, SqliteMiddlewareError> {
        if token.connection != connection {
            return Err(SqliteMiddlewareError::StatementError(
                "prepared statement belongs to a different connection".into(),
            ));
        }
        self.statements.get(&token.statement).ok_or_else(|| {
            SqliteMiddlewareError::StatementError("prepared statement is closed".into())
        })
    }

    /// Remove `token` if this connection issued it and it is still open.
    pub(crate) fn release(&mut self, connection: u64, token: StatementRef) -> Option<Arc<str>> {
        if token.connection != connection {
            return None;
        }
        self.statements.remove(&token.statement)
    }

    pub(crate) fn contains_sql(&self, sql: &str) -> bool {
        self.statements.values().any(|open| open.as_ref() == sql)
    }

    pub(crate) fn len(&self) -> usize {
        self.statements.len()
    }

    pub(crate) fn clear(&mut self) {
        self.statements.clear();
    }
}

impl SqliteConnection {
    /// Compile `query` without running it and return a copy bound to this connection.
    ///
    /// The returned query can be executed any number of times with different
    /// parameters until it is passed to [`SqliteConnection::close`]. A query
    /// that already holds an open reference on this connection comes back
    /// unchanged, so re-preparing never orphans a registry entry.
    ///
    /// # Errors
    /// Returns the engine's diagnostic (for example `no such table: users`) if the statement
    /// does not compile. The connection stays usable and `query` is left unprepared.
    pub fn prepare(&mut self, query: &Query) -> Result<Query, SqliteMiddlewareError> {
        if let Some(token) = query.statement_ref() {
            if self.handle.is_some() && self.prepared.resolve(self.id, token).is_ok() {
                return Ok(query.clone());
            }
        }
        {
            let handle = self.handle()?;
            let _warm = handle.prepare_cached(query.statement())?;
        }
        let token = self
            .prepared
            .insert(self.id, Arc::from(query.statement()));
        debug!(
            connection = self.id,
            statement = token.statement,
            "sqlite statement prepared"
        );
        Ok(query.clone().prepared_as(token))
    }

    /// Release `query`'s prepared statement and clear its reference.
    ///
    /// Closing a query that was never prepared, or was already closed, is a
    /// no-op. Copies of the old reference fail on execute afterwards.
    ///
    /// # Errors
    /// Never fails; the `Result` keeps the protocol surface uniform.
    pub fn close(&mut self, query: &mut Query) -> Result<(), SqliteMiddlewareError> {
        let Some(token) = query.take_ref() else {
            return Ok(());
        };
        let Some(sql) = self.prepared.release(self.id, token) else {
            return Ok(());
        };
        if !self.prepared.contains_sql(&sql) {
            if let Some(handle) = self.handle.as_ref() {
                // Finalizes every cached statement; open ones recompile on next execute.
                handle.flush_prepared_statement_cache();
            }
        }
        debug!(
            connection = self.id,
            statement = token.statement,
            "sqlite statement closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_scoped_to_their_connection() {
        let mut registry = PreparedRegistry::default();
        let token = registry.insert(1, Arc::from("select 1"));
        assert!(registry.resolve(1, token).is_ok());
        assert!(registry.resolve(2, token).is_err());
        assert_eq!(registry.release(2, token), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut registry = PreparedRegistry::default();
        let token = registry.insert(1, Arc::from("select 1"));
        assert!(registry.release(1, token).is_some());
        assert!(registry.release(1, token).is_none());
        assert!(registry.resolve(1, token).is_err());
    }

    #[test]
    fn shared_sql_stays_registered_until_last_release() {
        let mut registry = PreparedRegistry::default();
        let first = registry.insert(1, Arc::from("select 1"));
        let second = registry.insert(1, Arc::from("select 1"));
        assert_ne!(first, second);
        registry.release(1, first);
        assert!(registry.contains_sql("select 1"));
        registry.release(1, second);
        assert!(!registry.contains_sql("select 1"));
    }
}
