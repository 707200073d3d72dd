use catalog_core::mapping::{ColumnDef, EntityMeta, InheritanceStrategy, Metamodel, ID_COLUMN};
use catalog_core::Result;

/// Table backing the per-hierarchy identifier sequences
pub const ID_SEQUENCES_TABLE: &str = "id_sequences";

/// One column of a physical table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: String,
    pub ddl_type: &'static str,
    pub nullable: bool,
    pub primary_key: bool,
    /// Parent table whose `id` this column references
    pub references: Option<String>,
}

impl ColumnLayout {
    fn id(references: Option<String>) -> Self {
        Self {
            name: ID_COLUMN.to_string(),
            ddl_type: "INTEGER",
            nullable: false,
            primary_key: true,
            references,
        }
    }

    fn mapped(column: &ColumnDef, force_nullable: bool) -> Self {
        Self {
            name: column.name.clone(),
            ddl_type: column.sql_type.ddl(),
            nullable: force_nullable || column.nullable,
            primary_key: false,
            references: None,
        }
    }
}

/// A physical table the mapping needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub name: String,
    /// Entity whose mapping produced the table
    pub entity: String,
    pub columns: Vec<ColumnLayout>,
}

fn single_table(model: &Metamodel, root: &EntityMeta) -> Result<Option<TableLayout>> {
    let Some(table) = &root.table else {
        return Ok(None);
    };
    let mut columns = vec![ColumnLayout::id(None)];
    if let Some(discriminator) = &root.discriminator_column {
        columns.push(ColumnLayout {
            name: discriminator.clone(),
            ddl_type: "TEXT",
            nullable: false,
            primary_key: false,
            references: None,
        });
    }
    // A row may hold any subtype, so only the root's own columns keep NOT NULL
    columns.extend(root.columns.iter().map(|c| ColumnLayout::mapped(c, false)));
    let root_len = root.columns.len();
    columns.extend(
        model
            .hierarchy_columns(&root.name)?
            .into_iter()
            .skip(root_len)
            .map(|c| ColumnLayout::mapped(c, true)),
    );
    Ok(Some(TableLayout {
        name: table.clone(),
        entity: root.name.clone(),
        columns,
    }))
}

fn joined_table(model: &Metamodel, entity: &EntityMeta) -> Result<Option<TableLayout>> {
    let Some(table) = &entity.table else {
        return Ok(None);
    };
    let references = match &entity.parent {
        Some(parent) => model.get(parent)?.table.clone(),
        None => None,
    };
    let mut columns = vec![ColumnLayout::id(references)];
    columns.extend(entity.columns.iter().map(|c| ColumnLayout::mapped(c, false)));
    Ok(Some(TableLayout {
        name: table.clone(),
        entity: entity.name.clone(),
        columns,
    }))
}

fn concrete_table(model: &Metamodel, entity: &EntityMeta) -> Result<Option<TableLayout>> {
    let Some(table) = &entity.table else {
        return Ok(None);
    };
    let mut columns = vec![ColumnLayout::id(None)];
    columns.extend(
        model
            .inherited_columns(&entity.name)?
            .into_iter()
            .map(|c| ColumnLayout::mapped(c, false)),
    );
    Ok(Some(TableLayout {
        name: table.clone(),
        entity: entity.name.clone(),
        columns,
    }))
}

/// Mapped tables in creation order (parents before children)
pub fn table_layouts(model: &Metamodel) -> Result<Vec<TableLayout>> {
    let mut layouts = Vec::new();
    for root in model.hierarchies() {
        match root.strategy {
            InheritanceStrategy::SingleTable => {
                layouts.extend(single_table(model, root)?);
            }
            InheritanceStrategy::Joined => {
                for entity in model.subtree(&root.name)? {
                    layouts.extend(joined_table(model, entity)?);
                }
            }
            InheritanceStrategy::TablePerConcreteClass => {
                for entity in model.concrete_subtree(&root.name)? {
                    layouts.extend(concrete_table(model, entity)?);
                }
            }
        }
    }
    Ok(layouts)
}

/// Names of the mapped tables in creation order
pub fn mapped_tables(model: &Metamodel) -> Result<Vec<String>> {
    Ok(table_layouts(model)?.into_iter().map(|t| t.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_tables() {
        let model = Metamodel::catalog().unwrap();
        assert_eq!(
            mapped_tables(&model).unwrap(),
            vec!["Product", "ElectricalProduct", "Phone", "CampingProduct", "Chair"]
        );
    }

    #[test]
    fn test_single_table_subtype_columns_are_nullable() {
        let model = Metamodel::catalog().unwrap();
        let layouts = table_layouts(&model).unwrap();
        let camping = layouts.iter().find(|t| t.name == "CampingProduct").unwrap();
        let names: Vec<_> = camping.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "type", "name", "description", "fuelType", "weight", "capacity"]
        );
        assert!(!camping.columns[1].nullable, "discriminator is NOT NULL");
        assert!(camping.columns[2..].iter().all(|c| c.nullable));
    }

    #[test]
    fn test_joined_subtype_references_parent() {
        let model = Metamodel::catalog().unwrap();
        let layouts = table_layouts(&model).unwrap();
        let phone = layouts.iter().find(|t| t.name == "Phone").unwrap();
        assert_eq!(phone.columns[0].references.as_deref(), Some("ElectricalProduct"));
        let names: Vec<_> = phone.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "screenSize", "storage"]);
    }

    #[test]
    fn test_concrete_table_repeats_inherited_columns() {
        let model = Metamodel::catalog().unwrap();
        let layouts = table_layouts(&model).unwrap();
        let chair = layouts.iter().find(|t| t.name == "Chair").unwrap();
        let names: Vec<_> = chair.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "description", "material"]);
    }
}
