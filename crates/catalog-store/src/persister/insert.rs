use catalog_core::mapping::{ColumnDef, InheritanceStrategy, Metamodel, SqlType, ID_COLUMN};
use catalog_core::{CatalogError, Record, Result, Value};

use crate::sql;

/// One `INSERT` of an entity's rows
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl InsertStatement {
    fn new(table: &str, id: i64) -> Self {
        Self {
            table: table.to_string(),
            columns: vec![ID_COLUMN.to_string()],
            values: vec![Value::Integer(id)],
        }
    }

    fn push(&mut self, column: &str, value: Value) {
        self.columns.push(column.to_string());
        self.values.push(value);
    }

    fn push_mapped(&mut self, columns: &[&ColumnDef], record: &Record) {
        for column in columns {
            let value = record.get(&column.name).cloned().unwrap_or(Value::Null);
            self.push(&column.name, value);
        }
    }

    pub fn sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| sql::ident(c)).collect();
        let params: Vec<String> = (1..=self.values.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            sql::ident(&self.table),
            columns.join(", "),
            params.join(", ")
        )
    }
}

fn accepts(sql_type: SqlType, value: &Value) -> bool {
    matches!(
        (sql_type, value),
        (_, Value::Null)
            | (SqlType::Integer, Value::Integer(_))
            | (SqlType::Real, Value::Real(_) | Value::Integer(_))
            | (SqlType::Text, Value::Text(_))
    )
}

fn check_record(entity: &str, columns: &[&ColumnDef], record: &Record) -> Result<()> {
    for (name, value) in record.iter() {
        let column = columns
            .iter()
            .find(|c| c.name == *name)
            .ok_or_else(|| CatalogError::UnmappedColumn {
                entity: entity.to_string(),
                column: name.clone(),
            })?;
        if !accepts(column.sql_type, value) {
            return Err(CatalogError::TypeMismatch {
                column: name.clone(),
                expected: column.sql_type.to_string(),
                actual: format!("{:?}", value),
            });
        }
    }
    Ok(())
}

/// Rows to insert for one concrete entity
///
/// - single table: one row in the root table carrying the discriminator
/// - joined: one row per ancestry table, root first
/// - table per concrete class: one row in the entity's own table
pub fn insert_plan(
    model: &Metamodel,
    entity: &str,
    record: &Record,
    id: i64,
) -> Result<Vec<InsertStatement>> {
    let meta = model.get(entity)?;
    if meta.is_abstract {
        return Err(CatalogError::AbstractEntity {
            entity: entity.to_string(),
        });
    }

    let inherited = model.inherited_columns(entity)?;
    check_record(entity, &inherited, record)?;

    let missing_table = || CatalogError::InvalidMapping {
        entity: entity.to_string(),
        reason: "concrete entity has no table".to_string(),
    };

    match meta.strategy {
        InheritanceStrategy::SingleTable => {
            let root = model.root_of(entity)?;
            let table = model.table_of(entity)?.ok_or_else(missing_table)?;
            let mut insert = InsertStatement::new(table, id);
            if let (Some(column), Some(value)) =
                (&root.discriminator_column, &meta.discriminator_value)
            {
                insert.push(column, Value::Text(value.clone()));
            }
            insert.push_mapped(&inherited, record);
            Ok(vec![insert])
        }
        InheritanceStrategy::Joined => model
            .ancestry(entity)?
            .into_iter()
            .map(|level| {
                let table = level.table.as_deref().ok_or_else(missing_table)?;
                let mut insert = InsertStatement::new(table, id);
                let own: Vec<&ColumnDef> = level.columns.iter().collect();
                insert.push_mapped(&own, record);
                Ok(insert)
            })
            .collect(),
        InheritanceStrategy::TablePerConcreteClass => {
            let table = model.table_of(entity)?.ok_or_else(missing_table)?;
            let mut insert = InsertStatement::new(table, id);
            insert.push_mapped(&inherited, record);
            Ok(vec![insert])
        }
    }
}
