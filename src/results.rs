//! Canonical query results.
//!
//! Every execute path (direct statement text or prepared reference) produces a
//! [`QueryResult`], so callers never branch on how a query was issued.

mod result_set;
pub(crate) mod row;

pub use result_set::QueryResult;
pub use row::Row;
