use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ConnectOptions;
use crate::config::MISSING_DATABASE_MESSAGE;
use crate::error::SqliteMiddlewareError;

use super::PreparedRegistry;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Checkout state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Busy,
}

/// One engine handle plus the state the pool protocol tracks for it.
///
/// The handle is present only while connected. A default-constructed value
/// models a connection that was never opened; every teardown path accepts it.
#[derive(Debug, Default)]
pub struct SqliteConnection {
    pub(crate) handle: Option<rusqlite::Connection>,
    pub(crate) path: String,
    pub(crate) status: ConnectionStatus,
    pub(crate) id: u64,
    pub(crate) prepared: PreparedRegistry,
    pub(crate) timeout: Option<Duration>,
}

impl SqliteConnection {
    /// Open exactly one engine handle and return an idle connection.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError::ConfigError` when no database is configured (the engine is
    /// not touched), or the engine's error if the database cannot be opened.
    pub fn connect(opts: &ConnectOptions) -> Result<Self, SqliteMiddlewareError> {
        let database = opts
            .database
            .as_ref()
            .ok_or_else(|| SqliteMiddlewareError::ConfigError(MISSING_DATABASE_MESSAGE.into()))?;
        let path = database.normalized().to_owned();

        let handle = rusqlite::Connection::open(&path)?;
        handle.set_prepared_statement_cache_capacity(opts.statement_cache_capacity);

        if opts.journal_wal && !database.is_memory() {
            let applied = handle.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            });
            if let Err(err) = applied {
                close_handle(handle, &path);
                return Err(err.into());
            }
        }

        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(connection = id, path = %path, "sqlite connection opened");

        Ok(Self {
            handle: Some(handle),
            path,
            status: ConnectionStatus::Idle,
            id,
            prepared: PreparedRegistry::default(),
            timeout: opts.timeout,
        })
    }

    /// Release the engine handle, if any.
    ///
    /// Always succeeds: disconnecting a connection that was never opened, or was
    /// already disconnected, is a no-op. Prepared references issued by this
    /// connection become unusable.
    pub fn disconnect(&mut self) {
        self.prepared.clear();
        self.status = ConnectionStatus::Idle;
        if let Some(handle) = self.handle.take() {
            close_handle(handle, &self.path);
            debug!(connection = self.id, path = %self.path, "sqlite connection closed");
        }
    }

    /// Claim the connection for one caller.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError::Busy` if the connection is already checked out, or
    /// `SqliteMiddlewareError::NotConnected` if it has no engine handle. Both are
    /// disconnect-class: the pool manager should drop the connection instead of retrying.
    pub fn checkout(&mut self) -> Result<(), SqliteMiddlewareError> {
        if self.handle.is_none() {
            return Err(SqliteMiddlewareError::NotConnected);
        }
        match self.status {
            ConnectionStatus::Idle => {
                self.status = ConnectionStatus::Busy;
                Ok(())
            }
            ConnectionStatus::Busy => Err(SqliteMiddlewareError::Busy),
        }
    }

    /// Return the connection to the idle state.
    pub fn checkin(&mut self) {
        self.status = ConnectionStatus::Idle;
    }

    /// Check out, run `func`, and check back in whether `func` succeeded or not.
    ///
    /// # Errors
    /// Returns the checkout error, or whatever `func` returns.
    pub fn run<F, R>(&mut self, func: F) -> Result<R, SqliteMiddlewareError>
    where
        F: FnOnce(&mut Self) -> Result<R, SqliteMiddlewareError>,
    {
        self.checkout()?;
        let out = func(self);
        self.checkin();
        out
    }

    /// Liveness probe. Leaves the connection untouched.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError::NotConnected` if the connection has no engine handle.
    pub fn ping(&self) -> Result<(), SqliteMiddlewareError> {
        if self.handle.is_some() {
            Ok(())
        } else {
            Err(SqliteMiddlewareError::NotConnected)
        }
    }

    /// Run a parameterless script directly on the engine.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError` if the connection is closed or the engine rejects the script.
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), SqliteMiddlewareError> {
        self.handle()?.execute_batch(sql)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.status == ConnectionStatus::Busy
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Advisory timeout supplied at connect time.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Number of prepared statements currently open on this connection.
    #[must_use]
    pub fn prepared_count(&self) -> usize {
        self.prepared.len()
    }

    pub(crate) fn handle(&self) -> Result<&rusqlite::Connection, SqliteMiddlewareError> {
        self.handle
            .as_ref()
            .ok_or(SqliteMiddlewareError::NotConnected)
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Close `handle`, logging (not returning) an engine failure; the handle is
/// released either way.
fn close_handle(handle: rusqlite::Connection, path: &str) {
    if let Err((handle, err)) = handle.close() {
        warn!(path = %path, error = %err, "sqlite close failed; dropping handle");
        drop(handle);
    }
}
