//! Mapping of the product catalog
//!
//! Four hierarchies, one per strategy demonstration:
//!
//! | root | strategy | subtypes |
//! |---|---|---|
//! | `Product` | single table (`DTYPE`) | `RingProduct` |
//! | `ElectricalProduct` | joined | `Phone` |
//! | `CampingProduct` | single table (`type`) | `CampingStove`, `Tent` |
//! | `FurnitureProduct` | table per concrete class | `Chair` |

use super::entity_mapping::EntityMapping;
use super::metamodel::Metamodel;
use super::strategy::{InheritanceStrategy, SqlType};
use crate::errors::Result;

/// Every hierarchy root carries the base record fields
fn base_record(mapping: EntityMapping) -> EntityMapping {
    mapping
        .column("name", SqlType::Text)
        .column("description", SqlType::Text)
}

pub(crate) fn catalog_mappings() -> Vec<EntityMapping> {
    vec![
        base_record(EntityMapping::root("Product", InheritanceStrategy::SingleTable)),
        EntityMapping::subclass("RingProduct", "Product")
            .column("stoneType", SqlType::Text)
            .column("stoneSize", SqlType::Text),
        base_record(
            EntityMapping::root("ElectricalProduct", InheritanceStrategy::Joined)
                .abstract_entity(),
        ),
        EntityMapping::subclass("Phone", "ElectricalProduct")
            .column("screenSize", SqlType::Text)
            .column("storage", SqlType::Text),
        base_record(
            EntityMapping::root("CampingProduct", InheritanceStrategy::SingleTable)
                .abstract_entity()
                .discriminator_column("type"),
        ),
        EntityMapping::subclass("CampingStove", "CampingProduct")
            .discriminator_value("STOVE")
            .column("fuelType", SqlType::Text),
        EntityMapping::subclass("Tent", "CampingProduct")
            .discriminator_value("TENT")
            .column("weight", SqlType::Real)
            .column("capacity", SqlType::Integer),
        base_record(
            EntityMapping::root("FurnitureProduct", InheritanceStrategy::TablePerConcreteClass)
                .abstract_entity(),
        ),
        EntityMapping::subclass("Chair", "FurnitureProduct").column("material", SqlType::Text),
    ]
}

impl Metamodel {
    /// The product catalog mapping
    pub fn catalog() -> Result<Self> {
        Metamodel::build(catalog_mappings())
    }
}
