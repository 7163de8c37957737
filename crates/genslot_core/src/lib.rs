//! # GENSLOT Core
//!
//! Generational-index slot storage:
//! - Stable, typed handles into densely packed arrays
//! - Stale handles never validate against a slot's new occupant
//! - Every slot's value is released exactly once
//!
//! ## Building Blocks
//!
//! 1. **Handles** - `(index, generation)` pairs checked on every access
//! 2. **Named tables** - refcounted values found by handle or by name
//! 3. **Entity store** - per-category tables of per-component rows with
//!    destructors
//!
//! ## Example
//!
//! ```rust
//! use genslot_core::{EntityStore, NamedTable};
//!
//! let mut textures: NamedTable<u64> = NamedTable::new()?;
//! let (albedo, _) = textures.add("albedo", 0xA1B0);
//!
//! let mut store = EntityStore::new(["drawables"])?;
//! let drawables = store.table_by_name("drawables").unwrap();
//! store.register_row_with(drawables, |_texture: u64| {})?;
//!
//! let entity = store.create(drawables);
//! store.insert(entity, *textures.get(albedo).unwrap())?;
//! # Ok::<(), genslot_core::StoreError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;
pub mod handle;
pub mod memory;
pub mod named_table;

pub use ecs::{Component, Destructor, Entity, EntityStore, EntityTable, Row, TableId, MAX_TABLES};
pub use error::{StoreError, StoreResult};
pub use handle::{is_current, Generation, Handle};
pub use memory::{FreeList, IdAllocator};
pub use named_table::{NamedTable, Released};
