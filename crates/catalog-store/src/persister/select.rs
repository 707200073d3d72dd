use catalog_core::mapping::{
    ColumnDef, EntityMeta, InheritanceStrategy, Metamodel, ID_COLUMN, TYPE_COLUMN,
};
use catalog_core::{CatalogError, Result};

use crate::sql;

/// A polymorphic read of one entity and its subtypes
///
/// Result rows are `id`, then `columns` in order, then `clazz_` naming the
/// concrete entity of the row.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectPlan {
    pub entity: String,
    pub sql: String,
    pub columns: Vec<ColumnDef>,
}

impl SelectPlan {
    /// Count of the rows the plan reads
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM ({})", self.sql)
    }
}

fn missing_table(entity: &str) -> CatalogError {
    CatalogError::InvalidMapping {
        entity: entity.to_string(),
        reason: "entity has no table".to_string(),
    }
}

fn id_filter(by_id: bool, column: &str) -> Option<String> {
    by_id.then(|| format!("{} = ?1", column))
}

fn finish(select: String, filters: Vec<String>, order_column: &str) -> String {
    let mut out = select;
    if !filters.is_empty() {
        out.push_str(&format!(" WHERE {}", filters.join(" AND ")));
    }
    out.push_str(&format!(" ORDER BY {}", order_column));
    out
}

/// Plan a polymorphic read of `entity`
///
/// Returns `None` when no concrete entity lies below `entity`, so there is
/// nothing to read. With `by_id` the SQL takes the identifier as `?1`.
pub fn select_plan(model: &Metamodel, entity: &str, by_id: bool) -> Result<Option<SelectPlan>> {
    let meta = model.get(entity)?;
    let concrete = model.concrete_subtree(entity)?;
    if concrete.is_empty() {
        return Ok(None);
    }

    let columns: Vec<ColumnDef> = model
        .polymorphic_columns(entity)?
        .into_iter()
        .cloned()
        .collect();

    let sql = match meta.strategy {
        InheritanceStrategy::SingleTable => single_table(model, meta, &concrete, &columns, by_id)?,
        InheritanceStrategy::Joined => joined(model, meta, &columns, by_id)?,
        InheritanceStrategy::TablePerConcreteClass => {
            table_per_concrete_class(model, &concrete, &columns, by_id)?
        }
    };

    Ok(Some(SelectPlan {
        entity: entity.to_string(),
        sql,
        columns,
    }))
}

fn single_table(
    model: &Metamodel,
    meta: &EntityMeta,
    concrete: &[&EntityMeta],
    columns: &[ColumnDef],
    by_id: bool,
) -> Result<String> {
    let root = model.root_of(&meta.name)?;
    let table = root
        .table
        .as_deref()
        .ok_or_else(|| missing_table(&root.name))?;
    let discriminator = root.discriminator_column.as_deref().ok_or_else(|| {
        CatalogError::InvalidMapping {
            entity: root.name.clone(),
            reason: "single_table root has no discriminator column".to_string(),
        }
    })?;
    let disc = sql::ident(discriminator);

    let mut whens = Vec::new();
    let mut values = Vec::new();
    for entity in concrete {
        if let Some(value) = &entity.discriminator_value {
            whens.push(format!(
                "WHEN {} THEN {}",
                sql::literal(value),
                sql::literal(&entity.name)
            ));
            values.push(sql::literal(value));
        }
    }

    let mut select = vec![sql::ident(ID_COLUMN)];
    select.extend(columns.iter().map(|c| sql::ident(&c.name)));
    select.push(format!(
        "CASE {} {} END AS {}",
        disc,
        whens.join(" "),
        sql::ident(TYPE_COLUMN)
    ));

    let mut filters = vec![format!("{} IN ({})", disc, values.join(", "))];
    filters.extend(id_filter(by_id, &sql::ident(ID_COLUMN)));

    Ok(finish(
        format!("SELECT {} FROM {}", select.join(", "), sql::ident(table)),
        filters,
        &sql::ident(ID_COLUMN),
    ))
}

fn joined(
    model: &Metamodel,
    meta: &EntityMeta,
    columns: &[ColumnDef],
    by_id: bool,
) -> Result<String> {
    let ancestry = model.ancestry(&meta.name)?;
    let descendants: Vec<&EntityMeta> = model.subtree(&meta.name)?.into_iter().skip(1).collect();

    // t0 is the queried entity; its ancestors and descendants follow
    let mut aliased: Vec<(&EntityMeta, String)> = vec![(meta, "t0".to_string())];
    for entity in ancestry.iter().rev().skip(1).copied() {
        aliased.push((entity, format!("t{}", aliased.len())));
    }
    let first_descendant = aliased.len();
    for entity in descendants.iter().copied() {
        aliased.push((entity, format!("t{}", aliased.len())));
    }

    fn id(alias: &str) -> String {
        sql::qualified(alias, ID_COLUMN)
    }

    let mut from = String::new();
    for (i, (entity, alias)) in aliased.iter().enumerate() {
        let table = entity
            .table
            .as_deref()
            .ok_or_else(|| missing_table(&entity.name))?;
        if i == 0 {
            from.push_str(&format!("{} {}", sql::ident(table), alias));
        } else {
            let join = if i < first_descendant {
                "INNER JOIN"
            } else {
                "LEFT JOIN"
            };
            from.push_str(&format!(
                " {} {} {} ON {} = {}",
                join,
                sql::ident(table),
                alias,
                id(alias),
                id("t0")
            ));
        }
    }

    let mut select = vec![format!("{} AS {}", id("t0"), sql::ident(ID_COLUMN))];
    for column in columns {
        let sources: Vec<String> = aliased
            .iter()
            .filter(|(entity, _)| entity.columns.iter().any(|c| c.name == column.name))
            .map(|(_, alias)| sql::qualified(alias, &column.name))
            .collect();
        let expr = match sources.len() {
            1 => sources[0].clone(),
            _ => format!("COALESCE({})", sources.join(", ")),
        };
        select.push(format!("{} AS {}", expr, sql::ident(&column.name)));
    }

    // Deepest matching subtype row decides the concrete entity
    let mut by_depth: Vec<&(&EntityMeta, String)> = aliased[first_descendant..]
        .iter()
        .filter(|(entity, _)| !entity.is_abstract)
        .collect();
    by_depth.sort_by(|a, b| b.0.depth.cmp(&a.0.depth));
    let whens: Vec<String> = by_depth
        .iter()
        .map(|(entity, alias)| {
            format!(
                "WHEN {} IS NOT NULL THEN {}",
                id(alias),
                sql::literal(&entity.name)
            )
        })
        .collect();
    let case = if whens.is_empty() {
        sql::literal(&meta.name)
    } else {
        format!(
            "CASE {} ELSE {} END",
            whens.join(" "),
            sql::literal(&meta.name)
        )
    };
    select.push(format!("{} AS {}", case, sql::ident(TYPE_COLUMN)));

    let filters: Vec<String> = id_filter(by_id, &id("t0")).into_iter().collect();
    Ok(finish(
        format!("SELECT {} FROM {}", select.join(", "), from),
        filters,
        &id("t0"),
    ))
}

fn table_per_concrete_class(
    model: &Metamodel,
    concrete: &[&EntityMeta],
    columns: &[ColumnDef],
    by_id: bool,
) -> Result<String> {
    let mut arms = Vec::with_capacity(concrete.len());
    for entity in concrete {
        let table = entity
            .table
            .as_deref()
            .ok_or_else(|| missing_table(&entity.name))?;
        let own: Vec<String> = model
            .inherited_columns(&entity.name)?
            .into_iter()
            .map(|c| c.name.clone())
            .collect();

        let mut select = vec![sql::ident(ID_COLUMN)];
        for column in columns {
            if own.contains(&column.name) {
                select.push(sql::ident(&column.name));
            } else {
                select.push(format!("NULL AS {}", sql::ident(&column.name)));
            }
        }
        select.push(format!(
            "{} AS {}",
            sql::literal(&entity.name),
            sql::ident(TYPE_COLUMN)
        ));
        arms.push(format!(
            "SELECT {} FROM {}",
            select.join(", "),
            sql::ident(table)
        ));
    }

    let filters: Vec<String> = id_filter(by_id, &sql::ident(ID_COLUMN)).into_iter().collect();
    Ok(finish(
        format!("SELECT * FROM ({})", arms.join(" UNION ALL ")),
        filters,
        &sql::ident(ID_COLUMN),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(entity: &str, by_id: bool) -> SelectPlan {
        let model = Metamodel::catalog().unwrap();
        select_plan(&model, entity, by_id).unwrap().unwrap()
    }

    #[test]
    fn test_single_table_filters_on_discriminator() {
        let plan = plan("CampingProduct", false);
        assert!(plan.sql.contains("FROM \"CampingProduct\""));
        assert!(plan.sql.contains("\"type\" IN ('STOVE', 'TENT')"));
        assert!(plan.sql.contains("WHEN 'TENT' THEN 'Tent'"));
        let names: Vec<_> = plan.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "description", "fuelType", "weight", "capacity"]
        );
    }

    #[test]
    fn test_subtype_query_narrows_discriminator_values() {
        let plan = plan("RingProduct", true);
        assert!(plan.sql.contains("\"DTYPE\" IN ('RingProduct')"));
        assert!(plan.sql.contains("\"id\" = ?1"));
    }

    #[test]
    fn test_joined_root_left_joins_subtypes() {
        let plan = plan("ElectricalProduct", false);
        assert!(plan.sql.contains("FROM \"ElectricalProduct\" t0"));
        assert!(plan.sql.contains("LEFT JOIN \"Phone\" t1 ON t1.\"id\" = t0.\"id\""));
        assert!(plan.sql.contains("WHEN t1.\"id\" IS NOT NULL THEN 'Phone'"));
    }

    #[test]
    fn test_joined_subtype_inner_joins_ancestors() {
        let plan = plan("Phone", false);
        assert!(plan.sql.contains("FROM \"Phone\" t0"));
        assert!(plan
            .sql
            .contains("INNER JOIN \"ElectricalProduct\" t1 ON t1.\"id\" = t0.\"id\""));
        assert!(plan.sql.contains("'Phone' AS \"clazz_\""));
    }

    #[test]
    fn test_table_per_concrete_class_unions_tables() {
        let plan = plan("FurnitureProduct", true);
        assert!(plan.sql.starts_with("SELECT * FROM (SELECT \"id\""));
        assert!(plan.sql.contains("'Chair' AS \"clazz_\" FROM \"Chair\""));
        assert!(plan.sql.ends_with("WHERE \"id\" = ?1 ORDER BY \"id\""));
    }

    #[test]
    fn test_count_wraps_select() {
        let plan = plan("Chair", false);
        assert!(plan.count_sql().starts_with("SELECT COUNT(*) FROM (SELECT"));
    }

    #[test]
    fn test_abstract_leaf_has_nothing_to_read() {
        let model = Metamodel::build(vec![catalog_core::EntityMapping::root(
            "Shape",
            InheritanceStrategy::TablePerConcreteClass,
        )
        .abstract_entity()])
        .unwrap();
        assert_eq!(select_plan(&model, "Shape", false).unwrap(), None);
    }
}
