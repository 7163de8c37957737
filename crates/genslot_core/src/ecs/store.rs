//! # Entity Store
//!
//! The container for all entity tables. Categories are a closed set fixed
//! at construction: each name becomes a [`TableId`] in declaration order.

use super::component::Component;
use super::entity::{Entity, TableId};
use super::table::EntityTable;
use crate::error::{StoreError, StoreResult};

/// Maximum number of entity categories (a [`TableId`] is one byte).
pub const MAX_TABLES: usize = u8::MAX as usize + 1;

/// The entity store - one [`EntityTable`] per category.
///
/// # Example
///
/// ```rust
/// use genslot_core::EntityStore;
///
/// let mut store = EntityStore::new(["drawables", "lights"])?;
/// let drawables = store.table_by_name("drawables").unwrap();
/// store.register_row::<u32>(drawables)?;
///
/// let entity = store.create(drawables);
/// store.insert(entity, 7u32)?;
/// assert_eq!(store.get::<u32>(entity), Some(&7));
///
/// assert!(store.destroy(entity));
/// assert!(!store.is_alive(entity));
/// # Ok::<(), genslot_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct EntityStore {
    tables: Vec<EntityTable>,
}

impl EntityStore {
    /// Creates a store with one empty table per category name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if there are no names, more
    /// than [`MAX_TABLES`] names, an empty name or a duplicate name.
    pub fn new<I, S>(names: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_capacity(names, 0)
    }

    /// Creates a store whose tables each have room for `capacity` entities.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::new`].
    pub fn with_capacity<I, S>(names: I, capacity: usize) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tables: Vec<EntityTable> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(StoreError::InvalidArgument("empty table name".into()));
            }
            if tables.iter().any(|table| table.name() == name) {
                return Err(StoreError::InvalidArgument(format!(
                    "duplicate table name {name:?}"
                )));
            }
            let Ok(raw) = u8::try_from(tables.len()) else {
                return Err(StoreError::InvalidArgument(format!(
                    "at most {MAX_TABLES} tables are supported"
                )));
            };
            tables.push(EntityTable::with_capacity(TableId::new(raw), name, capacity));
        }

        if tables.is_empty() {
            return Err(StoreError::InvalidArgument(
                "an entity store needs at least one table".into(),
            ));
        }

        tracing::debug!(tables = tables.len(), "entity store created");
        Ok(Self { tables })
    }

    /// Returns the number of tables.
    #[inline]
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns the number of live entities across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.iter().map(EntityTable::len).sum()
    }

    /// Checks if no entity is live in any table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(EntityTable::is_empty)
    }

    /// Finds a table by category name.
    #[must_use]
    pub fn table_by_name(&self, name: &str) -> Option<TableId> {
        self.tables
            .iter()
            .find(|table| table.name() == name)
            .map(EntityTable::id)
    }

    /// Returns a table for direct iteration over its rows.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    #[inline]
    #[must_use]
    pub fn table(&self, id: TableId) -> &EntityTable {
        &self.tables[id.slot()]
    }

    /// Returns a table mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    #[inline]
    pub fn table_mut(&mut self, id: TableId) -> &mut EntityTable {
        &mut self.tables[id.slot()]
    }

    /// Returns the table an entity belongs to.
    ///
    /// # Panics
    ///
    /// Panics if the entity's table was not issued by this store.
    #[inline]
    #[must_use]
    pub fn table_of(&self, entity: Entity) -> &EntityTable {
        self.table(entity.table())
    }

    /// Returns the table an entity belongs to, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity's table was not issued by this store.
    #[inline]
    pub fn table_of_mut(&mut self, entity: Entity) -> &mut EntityTable {
        self.table_mut(entity.table())
    }

    /// Iterates over all tables in id order.
    pub fn tables(&self) -> impl Iterator<Item = &EntityTable> + '_ {
        self.tables.iter()
    }

    /// Registers a row for `T` on a table, dropping values on removal.
    ///
    /// # Errors
    ///
    /// See [`EntityTable::register_row_with`].
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn register_row<T: Component>(&mut self, id: TableId) -> StoreResult<()> {
        self.table_mut(id).register_row::<T>()
    }

    /// Registers a row for `T` on a table with a destructor.
    ///
    /// # Errors
    ///
    /// See [`EntityTable::register_row_with`].
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn register_row_with<T, F>(&mut self, id: TableId, destructor: F) -> StoreResult<()>
    where
        T: Component,
        F: FnMut(T) + Send + 'static,
    {
        self.table_mut(id).register_row_with(destructor)
    }

    /// Creates an entity in a table.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn create(&mut self, id: TableId) -> Entity {
        self.table_mut(id).create()
    }

    /// Destroys an entity, running every row destructor on its values.
    ///
    /// Returns `false` with no side effect if the entity is stale.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.tables
            .get_mut(entity.table().slot())
            .is_some_and(|table| table.destroy(entity))
    }

    /// Checks if an entity is live.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.tables
            .get(entity.table().slot())
            .is_some_and(|table| table.is_alive(entity))
    }

    /// Attaches a component to a live entity.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StaleHandle`] if the entity is not live.
    /// - [`StoreError::UnregisteredRow`] if its table has no row for `T`.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> StoreResult<()> {
        self.tables
            .get_mut(entity.table().slot())
            .ok_or(StoreError::StaleHandle)?
            .insert(entity, value)
    }

    /// Detaches and destroys a component of a live entity.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        self.tables
            .get_mut(entity.table().slot())
            .is_some_and(|table| table.remove::<T>(entity))
    }

    /// Gets a component of a live entity.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.tables.get(entity.table().slot())?.get(entity)
    }

    /// Gets a component of a live entity mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.tables.get_mut(entity.table().slot())?.get_mut(entity)
    }

    /// Checks if a live entity has a component.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Tears the store down: every live component goes through its row's
    /// destructor exactly once and every entity is freed. Row schemas and
    /// slot generations are kept, so the store stays usable and entities
    /// issued before the shutdown remain stale.
    ///
    /// # Returns
    ///
    /// Number of component values destroyed.
    pub fn shutdown(&mut self) -> usize {
        let destroyed: usize = self.tables.iter_mut().map(EntityTable::clear).sum();
        tracing::debug!(destroyed, "entity store shut down");
        destroyed
    }
}
