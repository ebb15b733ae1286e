//! Pool-managed connection adapter for embedded `SQLite`.
//!
//! A [`SqliteConnection`] owns exactly one engine handle and implements the
//! lifecycle a pool manager drives: connect, checkout/check-in, ping,
//! prepare, execute, close and disconnect. Results are normalized into a
//! single [`QueryResult`] shape regardless of whether a query ran from text
//! or from a prepared statement.
//!
//! ```rust
//! use sqlite_middleware::prelude::*;
//!
//! # fn main() -> Result<(), SqliteMiddlewareError> {
//! let mut conn = SqliteConnection::connect(&ConnectOptions::memory())?;
//! conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);")?;
//!
//! let rows = conn.run(|conn| {
//!     let insert = Query::new("INSERT INTO users (id, name) VALUES (?1, ?2)")
//!         .with_command(Command::Insert);
//!     conn.execute(&insert, &[RowValues::Int(1), RowValues::Text("Jim".into())])?;
//!     conn.execute(&Query::new("SELECT name FROM users"), &[])
//! })?;
//! assert_eq!(rows.num_rows, 1);
//! conn.disconnect();
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod pool;
pub mod prelude;
pub mod query;
pub mod results;
pub mod sqlite;
pub mod types;

pub use config::{ConnectOptions, ConnectOptionsBuilder, Database};
pub use error::{ErrorClass, SqliteMiddlewareError};
pub use pool::{SqliteManager, with_pooled_connection};
pub use query::{Command, Query, StatementRef};
pub use results::{QueryResult, Row};
pub use sqlite::{ConnectionStatus, ExecuteOptions, SqliteConnection};
pub use types::RowValues;
