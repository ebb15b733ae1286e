use thiserror::Error;

/// How the pool manager should treat a connection after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The connection stays usable and may be checked in again.
    Recoverable,
    /// The connection must be torn down and replaced.
    Disconnect,
}

#[derive(Debug, Error)]
pub enum SqliteMiddlewareError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database is busy")]
    Busy,

    #[error("Database connection is closed")]
    NotConnected,

    #[error("Prepared statement error: {0}")]
    StatementError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl SqliteMiddlewareError {
    /// Classify the error for the pool manager.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Busy | Self::NotConnected | Self::ConnectionError(_) => ErrorClass::Disconnect,
            Self::SqliteError(err) => {
                if matches!(
                    err.sqlite_error_code(),
                    Some(
                        rusqlite::ErrorCode::DatabaseCorrupt
                            | rusqlite::ErrorCode::NotADatabase
                            | rusqlite::ErrorCode::SystemIoFailure
                    )
                ) {
                    ErrorClass::Disconnect
                } else {
                    ErrorClass::Recoverable
                }
            }
            Self::ConfigError(_) | Self::StatementError(_) | Self::ParameterError(_) => {
                ErrorClass::Recoverable
            }
        }
    }

    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        self.class() == ErrorClass::Disconnect
    }

    /// Human-readable message. Engine diagnostics are returned verbatim,
    /// without the statement text or offset the engine may attach.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::SqliteError(rusqlite::Error::SqliteFailure(_, Some(msg)))
            | Self::SqliteError(rusqlite::Error::SqlInputError { msg, .. }) => msg.clone(),
            Self::SqliteError(err) => err.to_string(),
            Self::ConfigError(msg)
            | Self::StatementError(msg)
            | Self::ParameterError(msg)
            | Self::ConnectionError(msg) => msg.clone(),
            Self::Busy | Self::NotConnected => self.to_string(),
        }
    }

    /// The engine's structured error code, when the error came from the engine.
    #[must_use]
    pub fn engine_code(&self) -> Option<rusqlite::ErrorCode> {
        match self {
            Self::SqliteError(err) => err.sqlite_error_code(),
            _ => None,
        }
    }
}

impl From<bb8::RunError<SqliteMiddlewareError>> for SqliteMiddlewareError {
    fn from(err: bb8::RunError<SqliteMiddlewareError>) -> Self {
        match err {
            bb8::RunError::User(inner) => inner,
            bb8::RunError::TimedOut => {
                SqliteMiddlewareError::ConnectionError("SQLite pool checkout timed out".into())
            }
        }
    }
}
