//! # GENSLOT
//!
//! Application-facing layer over [`genslot_core`]:
//! - [`config`] - table layout and capacities from TOML
//! - [`sync`] - lock-per-table wrappers for sharing stores across threads
//!
//! ## Example
//!
//! ```rust
//! use genslot::{GenslotConfig, SharedEntityStore};
//!
//! let config = GenslotConfig::from_toml_str(r#"
//!     [entities]
//!     tables = ["drawables", "lights"]
//! "#)?;
//!
//! let mut store = config.build_entity_store()?;
//! let lights = store.table_by_name("lights").unwrap();
//! store.register_row::<[f32; 3]>(lights)?;
//!
//! let shared = SharedEntityStore::new(store);
//! let light = shared.create(lights);
//! shared.insert(light, [1.0f32, 0.9, 0.8])?;
//! assert!(shared.is_alive(light));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod sync;

pub use config::{ConfigError, ConfigResult, EntityStoreConfig, GenslotConfig, NamedTableConfig};
pub use sync::{SharedEntityStore, SharedNamedTable};

pub use genslot_core::*;
