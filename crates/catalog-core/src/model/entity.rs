use serde::Serialize;

use super::value::Record;
use crate::errors::Result;

/// Fields every hierarchy root carries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaseRecord {
    /// Generated on first save
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl BaseRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            description: None,
        }
    }

    pub(crate) fn write(&self, record: &mut Record) {
        record.put("name", &self.name);
        record.put("description", &self.description);
    }

    pub(crate) fn read(id: i64, record: &Record) -> Result<Self> {
        Ok(Self {
            id: Some(id),
            name: record.text("name")?,
            description: record.text("description")?,
        })
    }
}

/// A concrete mapped entity
pub trait Entity: Sized {
    /// Name the entity is mapped under
    const ENTITY_NAME: &'static str;

    fn base(&self) -> &BaseRecord;

    fn base_mut(&mut self) -> &mut BaseRecord;

    fn id(&self) -> Option<i64> {
        self.base().id
    }

    /// Mapped column values, excluding the identifier
    fn to_record(&self) -> Record;

    /// Rebuild an entity from its identifier and column values
    fn from_record(id: i64, record: &Record) -> Result<Self>;
}
