// SQLite module - binds the connection protocol to the embedded engine
//
// - params: parameter conversion between middleware and SQLite values
// - query: row streaming and result normalization
// - connection: connection state, checkout protocol, execute/prepare/close

pub mod connection;
pub mod params;
pub mod query;

pub use connection::{ConnectionStatus, ExecuteOptions, SqliteConnection};
pub use params::Params;
pub use query::build_query_result;
