use serde::{Deserialize, Serialize};
use std::fmt;

/// How a hierarchy of entities is laid out in tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceStrategy {
    /// One table for the whole hierarchy; a discriminator column tells rows apart
    SingleTable,
    /// One table per entity; subtype tables share the root's id
    Joined,
    /// One independent table per concrete entity; reads union them
    TablePerConcreteClass,
}

impl fmt::Display for InheritanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InheritanceStrategy::SingleTable => "single_table",
            InheritanceStrategy::Joined => "joined",
            InheritanceStrategy::TablePerConcreteClass => "table_per_concrete_class",
        };
        f.write_str(label)
    }
}

/// Storage class of a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    /// Column type used in generated DDL
    pub fn ddl(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ddl())
    }
}

/// A mapped scalar column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub sql_type: SqlType,
    pub nullable: bool,
}

impl ColumnDef {
    /// Nullable column
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
        }
    }

    /// Mark the column NOT NULL (ignored for single-table subtypes)
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serde_labels() {
        let json = serde_json::to_string(&InheritanceStrategy::TablePerConcreteClass).unwrap();
        assert_eq!(json, "\"table_per_concrete_class\"");
        assert_eq!(
            InheritanceStrategy::Joined.to_string(),
            "joined".to_string()
        );
    }

    #[test]
    fn test_column_defaults_to_nullable() {
        let col = ColumnDef::new("weight", SqlType::Real);
        assert!(col.nullable);
        assert!(!col.not_null().nullable);
    }
}
