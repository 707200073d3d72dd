use std::collections::{HashMap, HashSet};

use super::entity_mapping::EntityMapping;
use super::strategy::{ColumnDef, InheritanceStrategy, SqlType};
use crate::errors::{CatalogError, Result};

/// Primary key column present in every mapped table
pub const ID_COLUMN: &str = "id";
/// Result column carrying the concrete entity name of a polymorphic row
pub const TYPE_COLUMN: &str = "clazz_";
/// Discriminator column used when a single-table root does not name one
pub const DEFAULT_DISCRIMINATOR_COLUMN: &str = "DTYPE";

const RESERVED_TABLES: [&str; 2] = ["id_sequences", "schema_version"];

/// Validated mapping of one entity, with inherited settings resolved
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMeta {
    pub name: String,
    pub parent: Option<String>,
    pub root: String,
    pub strategy: InheritanceStrategy,
    pub is_abstract: bool,
    /// Table holding this entity's own columns; `None` for abstract
    /// table-per-concrete-class entities
    pub table: Option<String>,
    /// Set on single-table roots only
    pub discriminator_column: Option<String>,
    /// Set on concrete single-table entities only
    pub discriminator_value: Option<String>,
    /// Columns declared by this entity, excluding inherited ones
    pub columns: Vec<ColumnDef>,
    pub children: Vec<String>,
    pub depth: usize,
}

impl EntityMeta {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The validated set of entity mappings
#[derive(Debug, Clone)]
pub struct Metamodel {
    entities: Vec<EntityMeta>,
    index: HashMap<String, usize>,
}

fn invalid(entity: &str, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidMapping {
        entity: entity.to_string(),
        reason: reason.into(),
    }
}

fn check_identifier(entity: &str, what: &str, ident: &str) -> Result<()> {
    let mut chars = ident.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid(
            entity,
            format!("{} '{}' is not a valid identifier", what, ident),
        ))
    }
}

impl Metamodel {
    /// Validate mappings and resolve inherited settings
    ///
    /// Parents must appear before their subclasses.
    pub fn build(mappings: Vec<EntityMapping>) -> Result<Self> {
        let mut model = Metamodel {
            entities: Vec::with_capacity(mappings.len()),
            index: HashMap::new(),
        };

        for mapping in mappings {
            model.register(mapping)?;
        }
        model.check_tables()?;

        Ok(model)
    }

    fn register(&mut self, mapping: EntityMapping) -> Result<()> {
        let name = mapping.name.clone();
        check_identifier(&name, "entity name", &name)?;
        if self.index.contains_key(&name) {
            return Err(invalid(&name, "entity is mapped twice"));
        }

        let meta = match mapping.parent.clone() {
            None => self.resolve_root(mapping)?,
            Some(parent_name) => {
                let parent = self
                    .get(&parent_name)
                    .map_err(|_| {
                        invalid(
                            &name,
                            format!("parent '{}' is not mapped before it", parent_name),
                        )
                    })?
                    .clone();
                self.resolve_subclass(mapping, &parent)?
            }
        };

        self.check_columns(&meta)?;

        if let Some(parent) = &meta.parent {
            if let Some(&idx) = self.index.get(parent) {
                self.entities[idx].children.push(meta.name.clone());
            }
        }
        self.index.insert(meta.name.clone(), self.entities.len());
        self.entities.push(meta);
        Ok(())
    }

    fn resolve_root(&self, mapping: EntityMapping) -> Result<EntityMeta> {
        let name = mapping.name;
        let strategy = mapping
            .strategy
            .ok_or_else(|| invalid(&name, "root entity must declare a strategy"))?;

        let discriminator_column = match strategy {
            InheritanceStrategy::SingleTable => Some(
                mapping
                    .discriminator_column
                    .unwrap_or_else(|| DEFAULT_DISCRIMINATOR_COLUMN.to_string()),
            ),
            _ if mapping.discriminator_column.is_some() => {
                return Err(invalid(
                    &name,
                    format!("{} hierarchies have no discriminator column", strategy),
                ))
            }
            _ => None,
        };
        if let Some(column) = &discriminator_column {
            check_identifier(&name, "discriminator column", column)?;
        }

        let table = match strategy {
            InheritanceStrategy::TablePerConcreteClass if mapping.is_abstract => {
                if mapping.table.is_some() {
                    return Err(invalid(
                        &name,
                        "abstract table_per_concrete_class entities have no table",
                    ));
                }
                None
            }
            _ => Some(mapping.table.unwrap_or_else(|| name.clone())),
        };

        let discriminator_value = Self::resolve_discriminator_value(
            &name,
            strategy,
            mapping.is_abstract,
            mapping.discriminator_value,
        )?;

        Ok(EntityMeta {
            root: name.clone(),
            name,
            parent: None,
            strategy,
            is_abstract: mapping.is_abstract,
            table,
            discriminator_column,
            discriminator_value,
            columns: mapping.columns,
            children: Vec::new(),
            depth: 0,
        })
    }

    fn resolve_subclass(
        &self,
        mapping: EntityMapping,
        parent: &EntityMeta,
    ) -> Result<EntityMeta> {
        let name = mapping.name;
        if mapping.strategy.is_some() {
            return Err(invalid(
                &name,
                "only root entities declare a strategy; subclasses inherit it",
            ));
        }
        if mapping.discriminator_column.is_some() {
            return Err(invalid(&name, "only the root declares the discriminator column"));
        }

        let strategy = parent.strategy;
        let table = match strategy {
            InheritanceStrategy::SingleTable => {
                if mapping.table.is_some() {
                    return Err(invalid(
                        &name,
                        "single_table subclasses share the root table",
                    ));
                }
                parent.table.clone()
            }
            InheritanceStrategy::Joined => Some(mapping.table.unwrap_or_else(|| name.clone())),
            InheritanceStrategy::TablePerConcreteClass => {
                if mapping.is_abstract {
                    if mapping.table.is_some() {
                        return Err(invalid(
                            &name,
                            "abstract table_per_concrete_class entities have no table",
                        ));
                    }
                    None
                } else {
                    Some(mapping.table.unwrap_or_else(|| name.clone()))
                }
            }
        };

        let discriminator_value = Self::resolve_discriminator_value(
            &name,
            strategy,
            mapping.is_abstract,
            mapping.discriminator_value,
        )?;
        if let Some(value) = &discriminator_value {
            let taken = self
                .entities
                .iter()
                .filter(|e| e.root == parent.root)
                .any(|e| e.discriminator_value.as_deref() == Some(value.as_str()));
            if taken {
                return Err(invalid(
                    &name,
                    format!("discriminator value '{}' is already used", value),
                ));
            }
        }

        Ok(EntityMeta {
            name,
            parent: Some(parent.name.clone()),
            root: parent.root.clone(),
            strategy,
            is_abstract: mapping.is_abstract,
            table,
            discriminator_column: None,
            discriminator_value,
            columns: mapping.columns,
            children: Vec::new(),
            depth: parent.depth + 1,
        })
    }

    fn resolve_discriminator_value(
        name: &str,
        strategy: InheritanceStrategy,
        is_abstract: bool,
        declared: Option<String>,
    ) -> Result<Option<String>> {
        match strategy {
            InheritanceStrategy::SingleTable if !is_abstract => {
                let value = declared.unwrap_or_else(|| name.to_string());
                if value.is_empty() {
                    return Err(invalid(name, "discriminator value is empty"));
                }
                Ok(Some(value))
            }
            InheritanceStrategy::SingleTable => Ok(None),
            _ if declared.is_some() => Err(invalid(
                name,
                format!("{} hierarchies have no discriminator", strategy),
            )),
            _ => Ok(None),
        }
    }

    fn check_columns(&self, meta: &EntityMeta) -> Result<()> {
        let discriminator = self
            .get(&meta.root)
            .ok()
            .and_then(|root| root.discriminator_column.clone())
            .or_else(|| meta.discriminator_column.clone());

        let mut own = HashSet::new();
        for column in &meta.columns {
            check_identifier(&meta.name, "column", &column.name)?;
            let lowered = column.name.to_ascii_lowercase();
            if lowered == ID_COLUMN || lowered == TYPE_COLUMN {
                return Err(invalid(
                    &meta.name,
                    format!("column name '{}' is reserved", column.name),
                ));
            }
            if discriminator
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(&column.name))
            {
                return Err(invalid(
                    &meta.name,
                    format!("column '{}' collides with the discriminator", column.name),
                ));
            }
            if !own.insert(lowered) {
                return Err(invalid(
                    &meta.name,
                    format!("column '{}' is declared twice", column.name),
                ));
            }
        }

        if let Some(parent) = &meta.parent {
            for inherited in self.inherited_columns(parent)? {
                if own.contains(&inherited.name.to_ascii_lowercase()) {
                    return Err(invalid(
                        &meta.name,
                        format!("column '{}' is already inherited", inherited.name),
                    ));
                }
            }
        }

        let types: HashMap<String, SqlType> = self
            .entities
            .iter()
            .filter(|e| e.root == meta.root)
            .flat_map(|e| e.columns.iter())
            .map(|c| (c.name.to_ascii_lowercase(), c.sql_type))
            .collect();
        for column in &meta.columns {
            if let Some(existing) = types.get(&column.name.to_ascii_lowercase()) {
                if *existing != column.sql_type {
                    return Err(invalid(
                        &meta.name,
                        format!(
                            "column '{}' is {} elsewhere in the hierarchy",
                            column.name, existing
                        ),
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_tables(&self) -> Result<()> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for entity in &self.entities {
            let Some(table) = &entity.table else { continue };
            check_identifier(&entity.name, "table", table)?;
            let lowered = table.to_ascii_lowercase();
            if RESERVED_TABLES.contains(&lowered.as_str()) {
                return Err(invalid(
                    &entity.name,
                    format!("table name '{}' is reserved", table),
                ));
            }
            let shares_root_table =
                entity.strategy == InheritanceStrategy::SingleTable && !entity.is_root();
            if shares_root_table {
                continue;
            }
            if let Some(owner) = seen.insert(lowered, &entity.name) {
                return Err(invalid(
                    &entity.name,
                    format!("table '{}' is already used by {}", table, owner),
                ));
            }
        }
        Ok(())
    }

    /// Look up an entity by name
    pub fn get(&self, name: &str) -> Result<&EntityMeta> {
        self.index
            .get(name)
            .map(|&idx| &self.entities[idx])
            .ok_or_else(|| CatalogError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All entities in registration order
    pub fn entities(&self) -> impl Iterator<Item = &EntityMeta> {
        self.entities.iter()
    }

    /// Hierarchy roots in registration order
    pub fn hierarchies(&self) -> impl Iterator<Item = &EntityMeta> {
        self.entities.iter().filter(|e| e.is_root())
    }

    pub fn root_of(&self, name: &str) -> Result<&EntityMeta> {
        let entity = self.get(name)?;
        self.get(&entity.root)
    }

    /// Discriminator column of the entity's hierarchy, if single-table
    pub fn discriminator_column(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.root_of(name)?.discriminator_column.as_deref())
    }

    /// Root-first chain ending at `name`
    pub fn ancestry(&self, name: &str) -> Result<Vec<&EntityMeta>> {
        let mut chain = Vec::new();
        let mut current = Some(self.get(name)?);
        while let Some(entity) = current {
            chain.push(entity);
            current = match &entity.parent {
                Some(parent) => Some(self.get(parent)?),
                None => None,
            };
        }
        chain.reverse();
        Ok(chain)
    }

    /// `name` and every descendant, pre-order
    pub fn subtree(&self, name: &str) -> Result<Vec<&EntityMeta>> {
        let mut out = Vec::new();
        let mut stack = vec![self.get(name)?];
        while let Some(entity) = stack.pop() {
            out.push(entity);
            for child in entity.children.iter().rev() {
                stack.push(self.get(child)?);
            }
        }
        Ok(out)
    }

    /// Instantiable entities in the subtree of `name`
    pub fn concrete_subtree(&self, name: &str) -> Result<Vec<&EntityMeta>> {
        Ok(self
            .subtree(name)?
            .into_iter()
            .filter(|e| !e.is_abstract)
            .collect())
    }

    /// Columns declared along the ancestry of `name`, root first
    pub fn inherited_columns(&self, name: &str) -> Result<Vec<&ColumnDef>> {
        Ok(self
            .ancestry(name)?
            .into_iter()
            .flat_map(|e| e.columns.iter())
            .collect())
    }

    /// Columns a polymorphic read of `name` may return: its inherited
    /// columns followed by those of its descendants, without duplicates
    pub fn polymorphic_columns(&self, name: &str) -> Result<Vec<&ColumnDef>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let ancestry = self.ancestry(name)?;
        let descendants = self.subtree(name)?;
        for entity in ancestry.into_iter().chain(descendants.into_iter().skip(1)) {
            for column in &entity.columns {
                if seen.insert(column.name.to_ascii_lowercase()) {
                    out.push(column);
                }
            }
        }
        Ok(out)
    }

    /// Every column of the hierarchy `name` belongs to, root first,
    /// without duplicates
    pub fn hierarchy_columns(&self, name: &str) -> Result<Vec<&ColumnDef>> {
        let root = self.root_of(name)?;
        self.polymorphic_columns(&root.name)
    }

    /// Physical table holding `name`'s own columns; `None` for an abstract
    /// table-per-concrete-class entity
    pub fn table_of(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.get(name)?.table.as_deref())
    }
}
