//! SQL text helpers

/// Quote an identifier for SQLite
pub(crate) fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for SQLite
pub(crate) fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `alias."column"`
pub(crate) fn qualified(alias: &str, column: &str) -> String {
    format!("{}.{}", alias, ident(column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting_escapes_embedded_quotes() {
        assert_eq!(ident("type"), "\"type\"");
        assert_eq!(ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(literal("O'Brien"), "'O''Brien'");
        assert_eq!(qualified("t0", "id"), "t0.\"id\"");
    }
}
