//! Product catalog entities
//!
//! Plain data holders; all persistence behaviour lives in the store.

pub mod entity;
pub mod item;
pub mod products;
pub mod value;

pub use entity::{BaseRecord, Entity};
pub use item::CatalogItem;
pub use products::{CampingStove, Chair, Phone, Product, RingProduct, Tent};
pub use value::{Record, Value};
