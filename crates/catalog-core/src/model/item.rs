use serde::Serialize;

use super::entity::{BaseRecord, Entity};
use super::products::{CampingStove, Chair, Phone, Product, RingProduct, Tent};
use super::value::Record;
use crate::errors::{CatalogError, Result};

/// Result of a polymorphic read: one variant per concrete entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity")]
pub enum CatalogItem {
    Product(Product),
    RingProduct(RingProduct),
    Phone(Phone),
    CampingStove(CampingStove),
    Tent(Tent),
    Chair(Chair),
}

macro_rules! catalog_variants {
    ($($variant:ident),+ $(,)?) => {
        impl CatalogItem {
            /// Entity names that can be hydrated
            pub const ENTITY_NAMES: &'static [&'static str] =
                &[$(<$variant as Entity>::ENTITY_NAME),+];

            /// Mapped name of the concrete entity held
            pub fn entity_name(&self) -> &'static str {
                match self {
                    $(CatalogItem::$variant(_) => <$variant as Entity>::ENTITY_NAME,)+
                }
            }

            pub fn base(&self) -> &BaseRecord {
                match self {
                    $(CatalogItem::$variant(e) => e.base(),)+
                }
            }

            pub fn to_record(&self) -> Record {
                match self {
                    $(CatalogItem::$variant(e) => e.to_record(),)+
                }
            }

            /// Rebuild the concrete entity named `entity_name`
            pub fn from_record(entity_name: &str, id: i64, record: &Record) -> Result<Self> {
                $(
                    if entity_name == <$variant as Entity>::ENTITY_NAME {
                        return Ok(CatalogItem::$variant($variant::from_record(id, record)?));
                    }
                )+
                Err(CatalogError::UnknownEntity {
                    entity: entity_name.to_string(),
                })
            }
        }

        $(
            impl From<$variant> for CatalogItem {
                fn from(entity: $variant) -> Self {
                    CatalogItem::$variant(entity)
                }
            }

            impl TryFrom<CatalogItem> for $variant {
                type Error = CatalogError;

                fn try_from(item: CatalogItem) -> Result<Self> {
                    match item {
                        CatalogItem::$variant(entity) => Ok(entity),
                        other => Err(CatalogError::HierarchyMismatch {
                            expected: <$variant as Entity>::ENTITY_NAME.to_string(),
                            actual: other.entity_name().to_string(),
                        }),
                    }
                }
            }
        )+
    };
}

catalog_variants!(Product, RingProduct, Phone, CampingStove, Tent, Chair);

impl CatalogItem {
    pub fn id(&self) -> Option<i64> {
        self.base().id
    }

    pub fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }
}
