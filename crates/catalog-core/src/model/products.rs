use serde::Serialize;

use super::entity::{BaseRecord, Entity};
use super::value::Record;
use crate::errors::Result;

macro_rules! base_builders {
    ($ty:ident) => {
        impl $ty {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    base: BaseRecord::named(name),
                    ..Default::default()
                }
            }

            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.base.description = Some(description.into());
                self
            }

            pub fn name(&self) -> Option<&str> {
                self.base.name.as_deref()
            }

            pub fn description(&self) -> Option<&str> {
                self.base.description.as_deref()
            }
        }
    };
}

/// Generic product, the concrete root of the `Product` hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseRecord,
}

base_builders!(Product);

impl Entity for Product {
    const ENTITY_NAME: &'static str = "Product";

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.base.write(&mut record);
        record
    }

    fn from_record(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            base: BaseRecord::read(id, record)?,
        })
    }
}

/// Ring, stored in the `Product` table under its own discriminator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingProduct {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub stone_type: Option<String>,
    pub stone_size: Option<String>,
}

base_builders!(RingProduct);

impl RingProduct {
    pub fn with_stone(mut self, stone_type: impl Into<String>, stone_size: impl Into<String>) -> Self {
        self.stone_type = Some(stone_type.into());
        self.stone_size = Some(stone_size.into());
        self
    }
}

impl Entity for RingProduct {
    const ENTITY_NAME: &'static str = "RingProduct";

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.base.write(&mut record);
        record.put("stoneType", &self.stone_type);
        record.put("stoneSize", &self.stone_size);
        record
    }

    fn from_record(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            base: BaseRecord::read(id, record)?,
            stone_type: record.text("stoneType")?,
            stone_size: record.text("stoneSize")?,
        })
    }
}

/// Phone, joined to the `ElectricalProduct` base table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub screen_size: Option<String>,
    pub storage: Option<String>,
}

base_builders!(Phone);

impl Phone {
    pub fn with_screen_size(mut self, screen_size: impl Into<String>) -> Self {
        self.screen_size = Some(screen_size.into());
        self
    }

    pub fn with_storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }
}

impl Entity for Phone {
    const ENTITY_NAME: &'static str = "Phone";

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.base.write(&mut record);
        record.put("screenSize", &self.screen_size);
        record.put("storage", &self.storage);
        record
    }

    fn from_record(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            base: BaseRecord::read(id, record)?,
            screen_size: record.text("screenSize")?,
            storage: record.text("storage")?,
        })
    }
}

/// Camping stove, discriminator `STOVE`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampingStove {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub fuel_type: Option<String>,
}

base_builders!(CampingStove);

impl CampingStove {
    pub fn with_fuel_type(mut self, fuel_type: impl Into<String>) -> Self {
        self.fuel_type = Some(fuel_type.into());
        self
    }
}

impl Entity for CampingStove {
    const ENTITY_NAME: &'static str = "CampingStove";

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.base.write(&mut record);
        record.put("fuelType", &self.fuel_type);
        record
    }

    fn from_record(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            base: BaseRecord::read(id, record)?,
            fuel_type: record.text("fuelType")?,
        })
    }
}

/// Tent, discriminator `TENT`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tent {
    #[serde(flatten)]
    pub base: BaseRecord,
    /// Kilograms
    pub weight: Option<f64>,
    /// Sleeping places
    pub capacity: Option<i32>,
}

base_builders!(Tent);

impl Tent {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

impl Entity for Tent {
    const ENTITY_NAME: &'static str = "Tent";

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.base.write(&mut record);
        record.put("weight", self.weight);
        record.put("capacity", self.capacity);
        record
    }

    fn from_record(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            base: BaseRecord::read(id, record)?,
            weight: record.real("weight")?,
            capacity: record.int32("capacity")?,
        })
    }
}

/// Chair, the only concrete furniture product; has its own table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Chair {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub material: Option<String>,
}

base_builders!(Chair);

impl Chair {
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

impl Entity for Chair {
    const ENTITY_NAME: &'static str = "Chair";

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new();
        self.base.write(&mut record);
        record.put("material", &self.material);
        record
    }

    fn from_record(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            base: BaseRecord::read(id, record)?,
            material: record.text("material")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tent_record_uses_mapped_column_names() {
        let tent = Tent::new("Mistral").with_weight(3.1).with_capacity(2);
        let record = tent.to_record();
        assert_eq!(record.real("weight").unwrap(), Some(3.1));
        assert_eq!(record.integer("capacity").unwrap(), Some(2));
        assert_eq!(record.text("name").unwrap().as_deref(), Some("Mistral"));
        assert!(record.get("description").is_some_and(|v| v.is_null()));
    }

    #[test]
    fn test_new_entity_has_no_id() {
        let phone = Phone::new("Samsung S4").with_storage("16Gb");
        assert_eq!(phone.id(), None);
        assert_eq!(phone.name(), Some("Samsung S4"));
    }

    #[test]
    fn test_from_record_assigns_id() {
        let record = Record::new()
            .with("name", "Firefly")
            .with("fuelType", "White spirit");
        let stove = CampingStove::from_record(4, &record).unwrap();
        assert_eq!(stove.id(), Some(4));
        assert_eq!(stove.fuel_type.as_deref(), Some("White spirit"));
        assert_eq!(stove.description(), None);
    }

    #[test]
    fn test_ring_serializes_camel_case() {
        let ring = RingProduct::new("Diamond ring").with_stone("Diamond", "0.5ct");
        let json = serde_json::to_value(&ring).unwrap();
        assert_eq!(json["stoneType"], "Diamond");
        assert_eq!(json["name"], "Diamond ring");
    }
}
