//! # Entity Component Store
//!
//! Entities grouped into a fixed set of tables, each table split into one
//! row per component type.
//!
//! ## Design Philosophy
//!
//! - Entity handles are `{table, index, generation}` with odd = live
//! - Rows grow in lock-step with their table's generation array
//! - Destructors are closures bound at row registration
//! - Destroying an entity empties every row before returning

mod component;
mod entity;
mod row;
mod store;
mod table;

pub use component::{Component, Destructor};
pub use entity::{Entity, TableId};
pub use row::Row;
pub use store::{EntityStore, MAX_TABLES};
pub use table::EntityTable;
