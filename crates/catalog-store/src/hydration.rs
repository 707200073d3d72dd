//! Conversion between mapped values and SQLite, and rebuilding entities
//! from polymorphic rows

use catalog_core::mapping::Metamodel;
use catalog_core::{CatalogError, CatalogItem, ExError, Record, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Row;

use crate::errors::{from_rusqlite, Result};
use crate::persister::SelectPlan;

/// One row of a polymorphic read, before hydration
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRow {
    /// Concrete entity named by the row's `clazz_` column
    pub entity: String,
    pub id: i64,
    pub record: Record,
}

pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(*n),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

pub fn from_value_ref(column: &str, value: ValueRef<'_>) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(n) => Ok(Value::Integer(n)),
        ValueRef::Real(f) => Ok(Value::Real(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|e| {
                ExError::from(CatalogError::TypeMismatch {
                    column: column.to_string(),
                    expected: "UTF-8 TEXT".to_string(),
                    actual: e.to_string(),
                })
            }),
        ValueRef::Blob(_) => Err(ExError::from(CatalogError::TypeMismatch {
            column: column.to_string(),
            expected: "INTEGER, REAL or TEXT".to_string(),
            actual: "BLOB".to_string(),
        })),
    }
}

/// Read one result row laid out as `plan` describes
pub fn read_row(row: &Row<'_>, plan: &SelectPlan) -> Result<LoadedRow> {
    let id: i64 = row.get(0).map_err(from_rusqlite)?;

    let mut record = Record::new();
    for (i, column) in plan.columns.iter().enumerate() {
        let value = row.get_ref(i + 1).map_err(from_rusqlite)?;
        record.put(column.name.clone(), from_value_ref(&column.name, value)?);
    }

    let entity: String = row
        .get(plan.columns.len() + 1)
        .map_err(from_rusqlite)?;

    Ok(LoadedRow { entity, id, record })
}

/// Rebuild the concrete entity a row holds
///
/// Only columns the concrete entity maps are handed to it; the rest of a
/// polymorphic row belongs to sibling subtypes.
pub fn hydrate(model: &Metamodel, row: LoadedRow) -> Result<CatalogItem> {
    let meta = model.get(&row.entity)?;
    if meta.is_abstract {
        return Err(ExError::from(CatalogError::AbstractEntity {
            entity: row.entity.clone(),
        }));
    }

    let mut record = Record::new();
    for column in model.inherited_columns(&row.entity)? {
        if let Some(value) = row.record.get(&column.name) {
            record.put(column.name.clone(), value.clone());
        }
    }

    Ok(CatalogItem::from_record(&row.entity, row.id, &record)?)
}
