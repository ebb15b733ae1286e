use rusqlite::types::Value;

use crate::error::SqliteMiddlewareError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
///
/// # Errors
/// Returns `SqliteMiddlewareError::ParameterError` if a JSON value cannot be serialized.
pub fn row_value_to_sqlite_value(value: &RowValues) -> Result<Value, SqliteMiddlewareError> {
    let converted = match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(serde_json::to_string(jval).map_err(|e| {
            SqliteMiddlewareError::ParameterError(format!("cannot serialize JSON parameter: {e}"))
        })?),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    };
    Ok(converted)
}

/// Convert an engine value back into a `RowValues`.
#[must_use]
pub fn sqlite_value_to_row_value(value: Value) -> RowValues {
    match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    }
}

/// Positional `SQLite` parameters, in statement order.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Convert middleware row values into `SQLite` values.
    ///
    /// # Errors
    /// Returns `SqliteMiddlewareError::ParameterError` if parameter conversion fails.
    pub fn convert(params: &[RowValues]) -> Result<Self, SqliteMiddlewareError> {
        let mut vec_values = Vec::with_capacity(params.len());
        for p in params {
            vec_values.push(row_value_to_sqlite_value(p)?);
        }
        Ok(Params(vec_values))
    }

    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn booleans_bind_as_integers() {
        let params = Params::convert(&[RowValues::Bool(true), RowValues::Bool(false)]).unwrap();
        assert_eq!(params.as_values(), &[Value::Integer(1), Value::Integer(0)]);
    }

    #[test]
    fn timestamps_and_json_bind_as_text() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let params = Params::convert(&[
            RowValues::Timestamp(ts),
            RowValues::JSON(serde_json::json!({"a": 1})),
        ])
        .unwrap();
        assert_eq!(
            params.as_values(),
            &[
                Value::Text("2024-01-02 03:04:05".into()),
                Value::Text("{\"a\":1}".into()),
            ]
        );
    }

    #[test]
    fn engine_values_map_back() {
        assert_eq!(sqlite_value_to_row_value(Value::Null), RowValues::Null);
        assert_eq!(sqlite_value_to_row_value(Value::Integer(4)), RowValues::Int(4));
        assert_eq!(
            sqlite_value_to_row_value(Value::Text("Bob".into())),
            RowValues::Text("Bob".into())
        );
    }
}
