//! bb8 integration: lets a generic pool manager drive [`SqliteConnection`]s.
//!
//! Engine calls are blocking, so connect and every pooled operation run on
//! tokio's blocking thread pool. The adapter's own checkout/check-in protocol
//! runs inside each pooled operation, which keeps a connection that was
//! abandoned mid-operation marked busy; bb8 then discards it as broken.

use std::future::Future;

use bb8::{ManageConnection, Pool};
use tracing::debug;

use crate::config::{ConnectOptions, MISSING_DATABASE_MESSAGE};
use crate::error::SqliteMiddlewareError;
use crate::sqlite::SqliteConnection;

/// bb8 manager for adapter connections.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    options: ConnectOptions,
}

impl SqliteManager {
    #[must_use]
    pub fn new(options: ConnectOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Build a pool from this manager.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError::ConfigError` without opening anything when no database is
    /// configured, or the engine's error if the initial connections cannot be opened.
    pub async fn build_pool(
        self,
        max_size: u32,
    ) -> Result<Pool<SqliteManager>, SqliteMiddlewareError> {
        if self.options.database.is_none() {
            return Err(SqliteMiddlewareError::ConfigError(
                MISSING_DATABASE_MESSAGE.into(),
            ));
        }
        Pool::builder().max_size(max_size).build(self).await
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SqliteConnection;
    type Error = SqliteMiddlewareError;

    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let options = self.options.clone();
        async move {
            let conn = run_blocking(move || SqliteConnection::connect(&options)).await?;
            debug!(connection = conn.id(), "pool opened sqlite connection");
            Ok(conn)
        }
    }

    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let outcome = conn.ping();
        async move { outcome }
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        !conn.is_connected() || conn.is_busy()
    }
}

/// Run blocking engine work off the async runtime.
///
/// # Errors
/// Returns `SqliteMiddlewareError::ConnectionError` if the blocking task panics or is cancelled,
/// otherwise whatever `func` returns.
pub async fn run_blocking<F, R>(func: F) -> Result<R, SqliteMiddlewareError>
where
    F: FnOnce() -> Result<R, SqliteMiddlewareError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(func).await.map_err(|e| {
        SqliteMiddlewareError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
    })?
}

/// Check a connection out of `pool`, run `func` on it under the adapter's
/// checkout protocol, and hand it back to the pool.
///
/// # Errors
/// Returns the pool's checkout error, the adapter's checkout error, or whatever `func` returns.
pub async fn with_pooled_connection<F, R>(
    pool: &Pool<SqliteManager>,
    func: F,
) -> Result<R, SqliteMiddlewareError>
where
    F: FnOnce(&mut SqliteConnection) -> Result<R, SqliteMiddlewareError> + Send + 'static,
    R: Send + 'static,
{
    let mut pooled = pool.get_owned().await?;
    let (pooled, out) = tokio::task::spawn_blocking(move || {
        let out = pooled.run(func);
        (pooled, out)
    })
    .await
    .map_err(|e| {
        SqliteMiddlewareError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
    })?;
    drop(pooled);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_or_closed_connections_are_broken() -> Result<(), SqliteMiddlewareError> {
        let manager = SqliteManager::new(ConnectOptions::memory());
        let mut conn = SqliteConnection::connect(manager.options())?;
        assert!(!manager.has_broken(&mut conn));

        conn.checkout()?;
        assert!(manager.has_broken(&mut conn));

        conn.checkin();
        conn.disconnect();
        assert!(manager.has_broken(&mut conn));
        Ok(())
    }
}
