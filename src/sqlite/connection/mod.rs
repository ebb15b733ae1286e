mod core;
mod execute;
mod prepared;

pub use self::core::{ConnectionStatus, SqliteConnection};
pub use execute::ExecuteOptions;
pub(crate) use prepared::PreparedRegistry;
