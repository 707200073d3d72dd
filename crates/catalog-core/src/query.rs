//! Minimal entity query language
//!
//! ```text
//! from <Entity> [where id = <n>]
//! select count(*) from <Entity>
//! ```
//!
//! Keywords are case-insensitive; entity names are not. A trailing `;` is
//! accepted.

use crate::errors::{CatalogError, Result};

/// What a query asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Hydrated entities
    Entities,
    /// Number of matching rows
    Count,
}

/// A parsed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub entity: String,
    pub projection: Projection,
    pub id: Option<i64>,
}

fn fail(query: &str, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidQuery {
        query: query.to_string(),
        reason: reason.into(),
    }
}

fn keyword(token: Option<&str>, expected: &str) -> bool {
    token.is_some_and(|t| t.eq_ignore_ascii_case(expected))
}

/// Parse query text
pub fn parse_query(text: &str) -> Result<QuerySpec> {
    let trimmed = text.trim();
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    // "where id=3" and "where id = 3" read the same
    let spaced = body.replace('=', " = ");
    let mut tokens = spaced.split_whitespace().peekable();

    let projection = if keyword(tokens.peek().copied(), "select") {
        tokens.next();
        let target = tokens.next().map(|t| t.to_ascii_lowercase());
        if target.as_deref() != Some("count(*)") {
            return Err(fail(text, "only count(*) can be selected"));
        }
        Projection::Count
    } else {
        Projection::Entities
    };

    if !keyword(tokens.next(), "from") {
        return Err(fail(text, "expected 'from'"));
    }

    let entity = tokens
        .next()
        .ok_or_else(|| fail(text, "expected an entity name after 'from'"))?
        .to_string();
    if !entity
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(fail(text, format!("'{}' is not an entity name", entity)));
    }

    let id = match tokens.next() {
        None => None,
        Some(t) if t.eq_ignore_ascii_case("where") => {
            if !keyword(tokens.next(), "id") || tokens.next() != Some("=") {
                return Err(fail(text, "only 'where id = <n>' is supported"));
            }
            let raw = tokens
                .next()
                .ok_or_else(|| fail(text, "expected an identifier value"))?;
            Some(
                raw.parse::<i64>()
                    .map_err(|_| fail(text, format!("'{}' is not an integer id", raw)))?,
            )
        }
        Some(t) => return Err(fail(text, format!("unexpected '{}'", t))),
    };

    if let Some(extra) = tokens.next() {
        return Err(fail(text, format!("unexpected '{}'", extra)));
    }

    Ok(QuerySpec {
        entity,
        projection,
        id,
    })
}
