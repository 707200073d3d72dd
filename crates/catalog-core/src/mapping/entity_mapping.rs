use super::strategy::{ColumnDef, InheritanceStrategy, SqlType};

/// Declarative mapping of one entity
///
/// Roots name the hierarchy's strategy; subclasses inherit it from their
/// root. Table and discriminator names fall back to the entity name when
/// left unset.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMapping {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) strategy: Option<InheritanceStrategy>,
    pub(crate) is_abstract: bool,
    pub(crate) table: Option<String>,
    pub(crate) discriminator_column: Option<String>,
    pub(crate) discriminator_value: Option<String>,
    pub(crate) columns: Vec<ColumnDef>,
}

impl EntityMapping {
    /// Start a hierarchy rooted at `name`
    pub fn root(name: impl Into<String>, strategy: InheritanceStrategy) -> Self {
        Self {
            name: name.into(),
            parent: None,
            strategy: Some(strategy),
            is_abstract: false,
            table: None,
            discriminator_column: None,
            discriminator_value: None,
            columns: Vec::new(),
        }
    }

    /// Declare `name` as a direct subclass of `parent`
    pub fn subclass(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
            strategy: None,
            is_abstract: false,
            table: None,
            discriminator_column: None,
            discriminator_value: None,
            columns: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn discriminator_column(mut self, column: impl Into<String>) -> Self {
        self.discriminator_column = Some(column.into());
        self
    }

    pub fn discriminator_value(mut self, value: impl Into<String>) -> Self {
        self.discriminator_value = Some(value.into());
        self
    }

    pub fn abstract_entity(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a nullable column
    pub fn column(self, name: impl Into<String>, sql_type: SqlType) -> Self {
        self.column_def(ColumnDef::new(name, sql_type))
    }

    pub fn column_def(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }
}
