use catalog_core::mapping::Metamodel;
use rusqlite::Connection;

use super::layout::{table_layouts, ID_SEQUENCES_TABLE};
use crate::errors::{from_rusqlite, schema_mismatch, Result};

fn existing_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(from_rusqlite)?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(columns)
}

fn require_columns(conn: &Connection, table: &str, expected: &[&str]) -> Result<()> {
    let existing = existing_columns(conn, table)?;
    if existing.is_empty() {
        return Err(schema_mismatch(table, "table is missing"));
    }
    for column in expected {
        if !existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(schema_mismatch(
                table,
                &format!("column {} is missing", column),
            ));
        }
    }
    Ok(())
}

/// Check that every mapped table and column exists
///
/// Extra tables and columns are tolerated.
pub fn validate_schema(conn: &Connection, model: &Metamodel) -> Result<()> {
    require_columns(conn, ID_SEQUENCES_TABLE, &["hierarchy", "next_val"])?;
    for table in table_layouts(model)? {
        let expected: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        require_columns(conn, &table.name, &expected)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::generate_ddl;
    use catalog_core::ExErrorKind;

    #[test]
    fn test_validate_empty_database_fails() {
        let conn = Connection::open_in_memory().unwrap();
        let model = Metamodel::catalog().unwrap();
        let err = validate_schema(&conn, &model).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_validate_generated_schema_passes() {
        let conn = Connection::open_in_memory().unwrap();
        let model = Metamodel::catalog().unwrap();
        conn.execute_batch(&generate_ddl(&model).unwrap().join(";\n"))
            .unwrap();
        validate_schema(&conn, &model).unwrap();
    }

    #[test]
    fn test_validate_reports_missing_column() {
        let conn = Connection::open_in_memory().unwrap();
        let model = Metamodel::catalog().unwrap();
        conn.execute_batch(&generate_ddl(&model).unwrap().join(";\n"))
            .unwrap();
        conn.execute_batch("DROP TABLE \"Chair\"; CREATE TABLE \"Chair\" (id INTEGER PRIMARY KEY, name TEXT);")
            .unwrap();

        let err = validate_schema(&conn, &model).unwrap_err();
        assert!(err.message().contains("Chair"));
        assert!(err.message().contains("description"));
    }
}
