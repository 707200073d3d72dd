use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::{CatalogError, Result};

/// A scalar column value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        v.map(Value::Text).unwrap_or(Value::Null)
    }
}

impl From<&Option<String>> for Value {
    fn from(v: &Option<String>) -> Self {
        v.clone().into()
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map(Value::Real).unwrap_or(Value::Null)
    }
}

impl From<Option<i32>> for Value {
    fn from(v: Option<i32>) -> Self {
        v.map(|n| Value::Integer(i64::from(n))).unwrap_or(Value::Null)
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        v.map(Value::Integer).unwrap_or(Value::Null)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Column values of one entity, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text column; absent and NULL both read as `None`
    pub fn text(&self, column: &str) -> Result<Option<String>> {
        match self.0.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mismatch(column, "TEXT", other)),
        }
    }

    /// Real column; integers widen
    pub fn real(&self, column: &str) -> Result<Option<f64>> {
        match self.0.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Real(f)) => Ok(Some(*f)),
            Some(Value::Integer(n)) => Ok(Some(*n as f64)),
            Some(other) => Err(mismatch(column, "REAL", other)),
        }
    }

    pub fn integer(&self, column: &str) -> Result<Option<i64>> {
        match self.0.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n)),
            Some(other) => Err(mismatch(column, "INTEGER", other)),
        }
    }

    /// Integer column narrowed to `i32`
    pub fn int32(&self, column: &str) -> Result<Option<i32>> {
        match self.integer(column)? {
            None => Ok(None),
            Some(n) => i32::try_from(n).map(Some).map_err(|_| CatalogError::TypeMismatch {
                column: column.to_string(),
                expected: "32-bit INTEGER".to_string(),
                actual: n.to_string(),
            }),
        }
    }
}

fn mismatch(column: &str, expected: &str, actual: &Value) -> CatalogError {
    CatalogError::TypeMismatch {
        column: column.to_string(),
        expected: expected.to_string(),
        actual: actual.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_read_as_none() {
        let record = Record::new().with("name", Value::Null);
        assert_eq!(record.text("name").unwrap(), None);
        assert_eq!(record.text("absent").unwrap(), None);
    }

    #[test]
    fn test_real_accepts_integer_storage() {
        let record = Record::new().with("weight", Some(3_i64));
        assert_eq!(record.real("weight").unwrap(), Some(3.0));
    }

    #[test]
    fn test_text_rejects_real() {
        let record = Record::new().with("name", Some(1.5_f64));
        assert!(matches!(
            record.text("name"),
            Err(CatalogError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_int32_overflow_is_type_mismatch() {
        let record = Record::new().with("capacity", Some(i64::MAX));
        assert!(record.int32("capacity").is_err());
    }
}
