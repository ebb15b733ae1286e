//! Convenient imports for common functionality.

pub use crate::config::{ConnectOptions, Database, MEMORY_PATH};
pub use crate::error::{ErrorClass, SqliteMiddlewareError};
pub use crate::pool::{SqliteManager, with_pooled_connection};
pub use crate::query::{Command, Query};
pub use crate::results::{QueryResult, Row};
pub use crate::sqlite::{ConnectionStatus, ExecuteOptions, SqliteConnection};
pub use crate::types::RowValues;
