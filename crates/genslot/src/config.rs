//! # Store Configuration
//!
//! Table layout and capacities, loaded once at startup from TOML.
//!
//! ```toml
//! [named]
//! initial_capacity = 128
//!
//! [entities]
//! tables = ["drawables", "lights", "cameras"]
//! initial_capacity = 1024
//! ```

use std::path::Path;

use bytemuck::Pod;
use genslot_core::{EntityStore, NamedTable, StoreError, MAX_TABLES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but describes an invalid layout.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for named refcounted tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamedTableConfig {
    /// Slots reserved up front.
    pub initial_capacity: usize,
}

impl Default for NamedTableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
        }
    }
}

/// Settings for the entity store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityStoreConfig {
    /// Entity categories, in `TableId` order.
    pub tables: Vec<String>,
    /// Entity slots reserved up front in each table.
    pub initial_capacity: usize,
}

impl Default for EntityStoreConfig {
    fn default() -> Self {
        Self {
            tables: vec!["default".to_owned()],
            initial_capacity: 256,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenslotConfig {
    /// Named table settings.
    pub named: NamedTableConfig,
    /// Entity store settings.
    pub entities: EntityStoreConfig,
}

impl GenslotConfig {
    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Store`] if the layout is invalid.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// as [`GenslotConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading slot store configuration");
        Self::from_toml_str(&source)
    }

    /// Checks the entity table list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] for an empty list, more than
    /// [`MAX_TABLES`] tables, an empty name or a duplicate name.
    pub fn validate(&self) -> Result<(), StoreError> {
        let tables = &self.entities.tables;
        if tables.is_empty() {
            return Err(StoreError::InvalidConfig(
                "entities.tables must name at least one table".into(),
            ));
        }
        if tables.len() > MAX_TABLES {
            return Err(StoreError::InvalidConfig(format!(
                "entities.tables has {} entries, at most {MAX_TABLES} allowed",
                tables.len()
            )));
        }
        for (i, name) in tables.iter().enumerate() {
            if name.is_empty() {
                return Err(StoreError::InvalidConfig(format!(
                    "entities.tables[{i}] is empty"
                )));
            }
            if tables[..i].contains(name) {
                return Err(StoreError::InvalidConfig(format!(
                    "entities.tables lists {name:?} twice"
                )));
            }
        }
        Ok(())
    }

    /// Builds an empty named table sized from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `T` is zero-sized.
    pub fn build_named_table<T: Pod>(&self) -> Result<NamedTable<T>, StoreError> {
        NamedTable::with_capacity(self.named.initial_capacity)
    }

    /// Builds an entity store with one table per configured category.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidConfig`] if the table list is invalid.
    pub fn build_entity_store(&self) -> Result<EntityStore, StoreError> {
        self.validate()?;
        EntityStore::with_capacity(&self.entities.tables, self.entities.initial_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenslotConfig::from_toml_str("").unwrap();
        assert_eq!(config, GenslotConfig::default());
        assert_eq!(config.named.initial_capacity, 64);
        assert_eq!(config.entities.tables, vec!["default".to_owned()]);
    }

    #[test]
    fn test_parse_tables() {
        let config = GenslotConfig::from_toml_str(
            r#"
            [named]
            initial_capacity = 8

            [entities]
            tables = ["drawables", "lights"]
            initial_capacity = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.named.initial_capacity, 8);
        assert_eq!(config.entities.tables, vec!["drawables", "lights"]);
        assert_eq!(config.entities.initial_capacity, 16);
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let err = GenslotConfig::from_toml_str(
            r#"
            [entities]
            tables = ["a", "b", "a"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Store(StoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_table_list_rejected() {
        let err = GenslotConfig::from_toml_str("[entities]\ntables = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Store(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = GenslotConfig::from_toml_str("[named]\ncapacity = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_build_entity_store() {
        let config = GenslotConfig {
            entities: EntityStoreConfig {
                tables: vec!["drawables".into(), "lights".into()],
                initial_capacity: 4,
            },
            ..GenslotConfig::default()
        };
        let store = config.build_entity_store().unwrap();
        assert_eq!(store.table_count(), 2);
        assert!(store.table_by_name("lights").is_some());
    }
}
