//! Row mapping traits and utilities

use crate::error::{ModelError, ModelResult};
use chrono::NaiveDateTime;
use mbmi_filter::Value;

/// Datetime layout the mail database returns for `DATETIME` columns.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A result row as handed back by a [`RowSource`](crate::RowSource).
///
/// Values are positional; column names come from the select list aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let (columns, values) = pairs
            .into_iter()
            .map(|(c, v)| (c.to_string(), v))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Raw value by position.
    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Decode a column by name.
    ///
    /// Returns [`ModelError::Decode`] when the column is missing or the value
    /// does not convert.
    pub fn try_get<T: FromValue>(&self, column: &str) -> ModelResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| ModelError::decode(column, "column not found"))?;
        T::from_value(value).map_err(|msg| ModelError::decode(column, msg))
    }
}

/// Conversion from a raw column [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

/// Trait for types that can be constructed from a result row.
pub trait FromRow: Sized {
    /// Construct an instance from a row.
    fn from_row(row: &Row) -> ModelResult<Self>;
}

fn mismatch(expected: &str, value: &Value) -> String {
    format!("expected {expected}, got {value}")
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => s.parse().map_err(|_| mismatch("integer", value)),
            _ => value.as_i64().ok_or_else(|| mismatch("integer", value)),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => s.parse().map_err(|_| mismatch("unsigned integer", value)),
            // SUM() over unsigned columns comes back as a decimal
            Value::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Ok(*f as u64),
            _ => value.as_u64().ok_or_else(|| mismatch("unsigned integer", value)),
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let v = u64::from_value(value)?;
        u32::try_from(v).map_err(|_| mismatch("u32", value))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            Value::UInt(v) => Ok(*v as f64),
            Value::Text(s) => s.parse().map_err(|_| mismatch("float", value)),
            _ => Err(mismatch("float", value)),
        }
    }
}

/// `TINYINT(1)` flags: any positive number is true.
impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Null => Ok(false),
            _ => i64::from_value(value).map(|v| v > 0),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Bool(_) => {
                Ok(value.to_string())
            }
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map_err(|e| format!("invalid datetime '{s}': {e}")),
            _ => Err(mismatch("datetime", value)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            _ => T::from_value(value).map(Some),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

/// Single-column rows decode to their first value.
impl FromRow for String {
    fn from_row(row: &Row) -> ModelResult<Self> {
        let column = row.columns().first().map_or("0", String::as_str);
        let value = row
            .value_at(0)
            .ok_or_else(|| ModelError::decode(column, "empty row"))?;
        String::from_value(value).map_err(|msg| ModelError::decode(column, msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn get_by_name() {
        let row = Row::from_pairs([("id", Value::Int(3)), ("login", Value::from("bob"))]);
        assert_eq!(row.try_get::<i64>("id").unwrap(), 3);
        assert_eq!(row.try_get::<String>("login").unwrap(), "bob");
    }

    #[test]
    fn missing_column_is_decode_error() {
        let row = Row::from_pairs([("id", Value::Int(3))]);
        match row.try_get::<i64>("uid").unwrap_err() {
            ModelError::Decode { column, .. } => assert_eq!(column, "uid"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn flags_from_integers() {
        assert!(bool::from_value(&Value::Int(1)).unwrap());
        assert!(!bool::from_value(&Value::Int(0)).unwrap());
        assert!(!bool::from_value(&Value::Null).unwrap());
        assert!(bool::from_value(&Value::from("2")).unwrap());
    }

    #[test]
    fn numeric_text_and_decimal_sums() {
        assert_eq!(u64::from_value(&Value::from("12")).unwrap(), 12);
        assert_eq!(u64::from_value(&Value::Float(7.0)).unwrap(), 7);
        assert!(u64::from_value(&Value::Int(-1)).is_err());
        assert!(u32::from_value(&Value::UInt(u64::MAX)).is_err());
    }

    #[test]
    fn datetime_columns() {
        let dt = NaiveDateTime::from_value(&Value::from("2019-03-04 05:06:07")).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2019, 3, 4));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (5, 6, 7));
        assert_eq!(
            Option::<NaiveDateTime>::from_value(&Value::Null).unwrap(),
            None
        );
    }

    #[test]
    fn single_column_rows() {
        let row = Row::from_pairs([("mail", Value::from("a@b.c"))]);
        assert_eq!(String::from_row(&row).unwrap(), "a@b.c");
        assert!(String::from_row(&Row::default()).is_err());
    }
}
