use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::SqliteMiddlewareError;
use crate::sqlite::SqliteConnection;

/// Canonical in-memory token handed to the engine.
pub const MEMORY_PATH: &str = ":memory:";

/// Symbolic in-memory sentinel accepted from textual configuration.
pub const MEMORY_SENTINEL: &str = ":memory";

/// Returned by `connect` when no database was configured.
pub const MISSING_DATABASE_MESSAGE: &str = "You must provide a :database to connect to. \
     Accepted forms: a filesystem path such as \"./db.sqlite3\", \
     or :memory for an in-memory database";

const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 64;

/// Which database a connection opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    /// Private in-memory database, normalized to [`MEMORY_PATH`].
    Memory,
    /// Filesystem path, or a literal engine token such as `":memory:"`.
    Path(String),
}

impl Database {
    /// The identifier recorded in connection state and passed to the engine.
    #[must_use]
    pub fn normalized(&self) -> &str {
        match self {
            Database::Memory => MEMORY_PATH,
            Database::Path(path) => path,
        }
    }

    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.normalized() == MEMORY_PATH
    }
}

impl From<&str> for Database {
    fn from(value: &str) -> Self {
        if value == MEMORY_SENTINEL {
            Database::Memory
        } else {
            Database::Path(value.to_owned())
        }
    }
}

impl From<String> for Database {
    fn from(value: String) -> Self {
        if value == MEMORY_SENTINEL {
            Database::Memory
        } else {
            Database::Path(value)
        }
    }
}

impl<'de> Deserialize<'de> for Database {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Database::from)
    }
}

fn deserialize_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

/// Options accepted at connect time.
///
/// Only `database` affects which engine handle is opened. `timeout` is advisory
/// metadata for the surrounding pool protocol; a running statement is never
/// interrupted because of it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub database: Option<Database>,
    #[serde(rename = "timeout_ms", deserialize_with = "deserialize_millis")]
    pub timeout: Option<Duration>,
    pub statement_cache_capacity: usize,
    pub journal_wal: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            database: None,
            timeout: None,
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE_CAPACITY,
            journal_wal: false,
        }
    }
}

impl ConnectOptions {
    #[must_use]
    pub fn new(database: impl Into<Database>) -> Self {
        Self {
            database: Some(database.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn memory() -> Self {
        Self::new(Database::Memory)
    }

    #[must_use]
    pub fn builder() -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::default()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parse options from a JSON object such as `{"database": ":memory", "timeout_ms": 50}`.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError::ConfigError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, SqliteMiddlewareError> {
        serde_json::from_str(json)
            .map_err(|e| SqliteMiddlewareError::ConfigError(format!("invalid connect options: {e}")))
    }
}

/// Fluent builder for connect options.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn database(mut self, database: impl Into<Database>) -> Self {
        self.opts.database = Some(database.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.opts.statement_cache_capacity = capacity;
        self
    }

    /// Switch file-backed databases to WAL journaling right after open.
    #[must_use]
    pub fn journal_wal(mut self, enabled: bool) -> Self {
        self.opts.journal_wal = enabled;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }

    /// Open a connection with these options.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError` if the options are incomplete or the engine cannot open
    /// the database.
    pub fn connect(self) -> Result<SqliteConnection, SqliteMiddlewareError> {
        SqliteConnection::connect(&self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sentinel_normalizes_to_engine_token() {
        assert_eq!(Database::Memory.normalized(), MEMORY_PATH);
        assert_eq!(Database::from(":memory"), Database::Memory);
        assert_eq!(
            Database::from(":memory:"),
            Database::Path(MEMORY_PATH.to_owned())
        );
        assert!(Database::from(":memory:").is_memory());
        assert!(!Database::from("/tmp/app.db").is_memory());
    }

    #[test]
    fn json_options_map_sentinel_and_timeout() {
        let opts = ConnectOptions::from_json(r#"{"database": ":memory", "timeout_ms": 1}"#)
            .expect("valid options");
        assert_eq!(opts.database, Some(Database::Memory));
        assert_eq!(opts.timeout, Some(Duration::from_millis(1)));
        assert_eq!(opts.statement_cache_capacity, DEFAULT_STATEMENT_CACHE_CAPACITY);

        let opts = ConnectOptions::from_json("{}").expect("empty options parse");
        assert!(opts.database.is_none());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ConnectOptions::from_json("{\"database\": 5}").unwrap_err();
        assert!(matches!(err, SqliteMiddlewareError::ConfigError(_)));
    }
}
