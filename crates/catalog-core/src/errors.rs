use catalog_core_types::SessionId;
use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Query
    InvalidQuery,
    NotUnique,

    // Mapping
    UnknownEntity,
    AbstractEntity,
    InvalidMapping,
    UnmappedColumn,
    TypeMismatch,
    HierarchyMismatch,

    // Lifecycle
    AlreadyPersisted,

    // Schema
    SchemaMismatch,
    ConstraintViolation,

    // Integration
    Persistence,
    Configuration,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidQuery => "ERR_INVALID_QUERY",
            ExErrorKind::NotUnique => "ERR_NOT_UNIQUE",
            ExErrorKind::UnknownEntity => "ERR_UNKNOWN_ENTITY",
            ExErrorKind::AbstractEntity => "ERR_ABSTRACT_ENTITY",
            ExErrorKind::InvalidMapping => "ERR_INVALID_MAPPING",
            ExErrorKind::UnmappedColumn => "ERR_UNMAPPED_COLUMN",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::HierarchyMismatch => "ERR_HIERARCHY_MISMATCH",
            ExErrorKind::AlreadyPersisted => "ERR_ALREADY_PERSISTED",
            ExErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, entity, identifier, session) needed when reading logs.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    entity_id: Option<i64>,
    session_id: Option<SessionId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            session_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add mapped entity name context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add generated identifier context
    pub fn with_entity_id(mut self, id: i64) -> Self {
        self.entity_id = Some(id);
        self
    }

    /// Add session correlation context
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity name context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the identifier context, if any
    pub fn entity_id(&self) -> Option<i64> {
        self.entity_id
    }

    /// Get the session context, if any
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(id) = self.entity_id {
            write!(f, " (id: {})", id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by mapping metadata, the entity model and query parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// No mapping is registered under this entity name
    #[error("Entity is not mapped: {entity}")]
    UnknownEntity { entity: String },

    /// Abstract entities have no instances
    #[error("Cannot instantiate abstract entity: {entity}")]
    AbstractEntity { entity: String },

    /// Entity was already assigned an identifier by an earlier save
    #[error("Entity {entity} is already persisted with id {id}")]
    AlreadyPersisted { entity: String, id: i64 },

    /// A polymorphic result could not be narrowed to the requested type
    #[error("Expected entity {expected} but found {actual}")]
    HierarchyMismatch { expected: String, actual: String },

    /// Mapping metadata failed validation
    #[error("Invalid mapping for {entity}: {reason}")]
    InvalidMapping { entity: String, reason: String },

    /// A record carried a column the entity does not map
    #[error("Column {column} is not mapped by entity {entity}")]
    UnmappedColumn { entity: String, column: String },

    /// A stored value did not match the column's declared type
    #[error("Column {column} expected {expected} but found {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    /// Query text could not be parsed
    #[error("Invalid query '{query}': {reason}")]
    InvalidQuery { query: String, reason: String },

    /// A unique result was requested but several rows matched
    #[error("Query for {entity} returned {count} results where at most one was expected")]
    NotUnique { entity: String, count: usize },
}

impl From<CatalogError> for ExError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownEntity { entity } => ExError::new(ExErrorKind::UnknownEntity)
                .with_entity(entity)
                .with_message("Entity is not mapped"),

            CatalogError::AbstractEntity { entity } => ExError::new(ExErrorKind::AbstractEntity)
                .with_entity(entity)
                .with_message("Abstract entities cannot be instantiated"),

            CatalogError::AlreadyPersisted { entity, id } => {
                ExError::new(ExErrorKind::AlreadyPersisted)
                    .with_entity(entity)
                    .with_entity_id(id)
                    .with_op("save")
                    .with_message("Entity already has an identifier")
            }

            CatalogError::HierarchyMismatch { expected, actual } => {
                ExError::new(ExErrorKind::HierarchyMismatch)
                    .with_entity(actual.clone())
                    .with_message(format!("Expected {} but found {}", expected, actual))
            }

            CatalogError::InvalidMapping { entity, reason } => {
                ExError::new(ExErrorKind::InvalidMapping)
                    .with_entity(entity)
                    .with_op("build_metamodel")
                    .with_message(reason)
            }

            CatalogError::UnmappedColumn { entity, column } => {
                ExError::new(ExErrorKind::UnmappedColumn)
                    .with_entity(entity)
                    .with_message(format!("Column {} is not mapped", column))
            }

            CatalogError::TypeMismatch {
                column,
                expected,
                actual,
            } => ExError::new(ExErrorKind::TypeMismatch).with_message(format!(
                "Column {} expected {} but found {}",
                column, expected, actual
            )),

            CatalogError::InvalidQuery { query, reason } => {
                ExError::new(ExErrorKind::InvalidQuery)
                    .with_op("parse_query")
                    .with_message(format!("'{}': {}", query, reason))
            }

            CatalogError::NotUnique { entity, count } => ExError::new(ExErrorKind::NotUnique)
                .with_entity(entity)
                .with_op("unique_result")
                .with_message(format!("{} results", count)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_error_kind_codes() {
        let cases = [
            (ExErrorKind::UnknownEntity, "ERR_UNKNOWN_ENTITY"),
            (ExErrorKind::AbstractEntity, "ERR_ABSTRACT_ENTITY"),
            (ExErrorKind::InvalidMapping, "ERR_INVALID_MAPPING"),
            (ExErrorKind::SchemaMismatch, "ERR_SCHEMA_MISMATCH"),
            (ExErrorKind::AlreadyPersisted, "ERR_ALREADY_PERSISTED"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_already_persisted_carries_id() {
        let ex: ExError = CatalogError::AlreadyPersisted {
            entity: "Phone".to_string(),
            id: 7,
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::AlreadyPersisted);
        assert_eq!(ex.entity(), Some("Phone"));
        assert_eq!(ex.entity_id(), Some(7));
        assert_eq!(ex.op(), Some("save"));
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::Persistence)
            .with_op("sqlite")
            .with_entity("Tent")
            .with_message("disk I/O error");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_PERSISTENCE]"));
        assert!(text.contains("'sqlite'"));
        assert!(text.contains("entity: Tent"));
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::ConstraintViolation).with_message("UNIQUE failed");
        let outer = ExError::new(ExErrorKind::Persistence)
            .with_op("migration")
            .with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::ConstraintViolation)
        );
        assert!(std::error::Error::source(&outer).is_some());
        assert!(outer.to_string().contains("caused by [ERR_CONSTRAINT_VIOLATION]"));
    }
}
