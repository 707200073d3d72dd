use catalog_core::mapping::Metamodel;
use catalog_core::Result;

use super::layout::{table_layouts, ColumnLayout, TableLayout, ID_SEQUENCES_TABLE};
use crate::sql;

fn column_sql(column: &ColumnLayout) -> String {
    let mut out = format!("{} {}", sql::ident(&column.name), column.ddl_type);
    if !column.nullable {
        out.push_str(" NOT NULL");
    }
    if column.primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if let Some(parent) = &column.references {
        out.push_str(&format!(
            " REFERENCES {}({})",
            sql::ident(parent),
            sql::ident(&column.name)
        ));
    }
    out
}

fn create_table_sql(table: &TableLayout) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("    {}", column_sql(c)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        sql::ident(&table.name),
        columns.join(",\n")
    )
}

fn id_sequences_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    \"hierarchy\" TEXT NOT NULL PRIMARY KEY,\n    \"next_val\" INTEGER NOT NULL\n)",
        sql::ident(ID_SEQUENCES_TABLE)
    )
}

/// `CREATE TABLE` statements for the whole mapping, id sequences first
pub fn generate_ddl(model: &Metamodel) -> Result<Vec<String>> {
    let mut statements = vec![id_sequences_sql()];
    statements.extend(table_layouts(model)?.iter().map(create_table_sql));
    Ok(statements)
}

/// `DROP TABLE` statements, children before parents
pub fn drop_statements(model: &Metamodel) -> Result<Vec<String>> {
    let mut statements: Vec<String> = table_layouts(model)?
        .iter()
        .rev()
        .map(|t| format!("DROP TABLE IF EXISTS {}", sql::ident(&t.name)))
        .collect();
    statements.push(format!(
        "DROP TABLE IF EXISTS {}",
        sql::ident(ID_SEQUENCES_TABLE)
    ));
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::mapping::{ColumnDef, EntityMapping, InheritanceStrategy, SqlType};

    #[test]
    fn test_single_table_ddl() {
        let model = Metamodel::catalog().unwrap();
        let ddl = generate_ddl(&model).unwrap();
        let product = ddl
            .iter()
            .find(|s| s.contains("\"Product\" ("))
            .unwrap();
        assert!(product.contains("\"id\" INTEGER NOT NULL PRIMARY KEY"));
        assert!(product.contains("\"DTYPE\" TEXT NOT NULL"));
        assert!(product.contains("\"stoneType\" TEXT,"));
    }

    #[test]
    fn test_single_table_keeps_not_null_on_root_columns_only() {
        let model = Metamodel::build(vec![
            EntityMapping::root("Gem", InheritanceStrategy::SingleTable)
                .column_def(ColumnDef::new("name", SqlType::Text).not_null()),
            EntityMapping::subclass("Sapphire", "Gem")
                .column_def(ColumnDef::new("carat", SqlType::Real).not_null()),
        ])
        .unwrap();
        let ddl = generate_ddl(&model).unwrap();
        let gem = ddl.iter().find(|s| s.contains("\"Gem\" (")).unwrap();
        assert!(gem.contains("\"name\" TEXT NOT NULL"));
        assert!(gem.contains("\"carat\" REAL"));
        assert!(!gem.contains("\"carat\" REAL NOT NULL"));

        let conn = rusqlite::Connection::open_in_memory().unwrap();
        for statement in &ddl {
            conn.execute_batch(statement).unwrap();
        }
        conn.execute("INSERT INTO \"Gem\" (id, DTYPE, name) VALUES (1, 'Gem', 'Opal')", [])
            .unwrap();
    }

    #[test]
    fn test_joined_ddl_has_foreign_key() {
        let model = Metamodel::catalog().unwrap();
        let ddl = generate_ddl(&model).unwrap();
        let phone = ddl.iter().find(|s| s.contains("\"Phone\" (")).unwrap();
        assert!(phone.contains("REFERENCES \"ElectricalProduct\"(\"id\")"));
    }

    #[test]
    fn test_ddl_executes() {
        let model = Metamodel::catalog().unwrap();
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        for statement in generate_ddl(&model).unwrap() {
            conn.execute_batch(&statement).unwrap();
        }
        for statement in drop_statements(&model).unwrap() {
            conn.execute_batch(&statement).unwrap();
        }
    }

    #[test]
    fn test_no_table_for_abstract_concrete_class_root() {
        let model = Metamodel::catalog().unwrap();
        let ddl = generate_ddl(&model).unwrap();
        assert!(!ddl.iter().any(|s| s.contains("\"FurnitureProduct\"")));
    }
}
