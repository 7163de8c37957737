//! # Entity Tables
//!
//! One table per entity category. A table owns the generational ids of its
//! entities plus one [`Row`] per registered component type. An entity's
//! index is valid in every row of its table at once.

use std::any::TypeId;

use super::component::{component_name, Component};
use super::entity::{Entity, TableId};
use super::row::{ErasedRow, Row};
use crate::error::{StoreError, StoreResult};
use crate::handle::Generation;
use crate::memory::IdAllocator;

/// A registered row and the component type it stores.
struct RowEntry {
    type_id: TypeId,
    row: Box<dyn ErasedRow>,
}

/// Entities of one category and their component rows.
///
/// The schema is fixed: rows must be registered before the first entity is
/// created. Rows are grown to the table's width on every [`create`], so any
/// live index is in range for every row.
///
/// [`create`]: EntityTable::create
pub struct EntityTable {
    /// Position in the owning store.
    id: TableId,
    /// Category name.
    name: Box<str>,
    /// Entity generations and freelist.
    ids: IdAllocator,
    /// Registered rows, in registration order.
    rows: Vec<RowEntry>,
}

impl EntityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(id: TableId, name: &str) -> Self {
        Self::with_capacity(id, name, 0)
    }

    /// Creates an empty table with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(id: TableId, name: &str, capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            ids: IdAllocator::with_capacity(capacity),
            rows: Vec::new(),
        }
    }

    /// Returns the table id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Returns the category name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks if no entity is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of slots ever issued.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.ids.capacity()
    }

    /// Returns the number of registered rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the entity generation array, one entry per slot.
    #[inline]
    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        self.ids.generations()
    }

    /// Registers a row whose values are dropped on removal.
    ///
    /// # Errors
    ///
    /// See [`EntityTable::register_row_with`].
    pub fn register_row<T: Component>(&mut self) -> StoreResult<()> {
        self.register(Row::<T>::new())
    }

    /// Registers a row that hands every removed value to `destructor`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::RowAfterCreate`] if the table has issued entities.
    /// - [`StoreError::RowAlreadyRegistered`] if `T` already has a row.
    pub fn register_row_with<T, F>(&mut self, destructor: F) -> StoreResult<()>
    where
        T: Component,
        F: FnMut(T) + Send + 'static,
    {
        self.register(Row::<T>::with_destructor(destructor))
    }

    fn register<T: Component>(&mut self, row: Row<T>) -> StoreResult<()> {
        let component = component_name::<T>();
        if self.width() > 0 {
            return Err(StoreError::RowAfterCreate {
                table: self.id,
                component,
            });
        }
        if self.position::<T>().is_some() {
            return Err(StoreError::RowAlreadyRegistered {
                table: self.id,
                component,
            });
        }

        tracing::debug!(table = %self.id, name = %self.name, component, "row registered");
        self.rows.push(RowEntry {
            type_id: TypeId::of::<T>(),
            row: Box::new(row),
        });
        Ok(())
    }

    /// Creates an entity, reusing the oldest freed slot first.
    ///
    /// Every row is grown so the new index is in range.
    pub fn create(&mut self) -> Entity {
        let handle = self.ids.alloc();
        let width = self.ids.capacity();
        for entry in &mut self.rows {
            entry.row.reserve_slots(width);
        }

        let entity = Entity::new(self.id, handle);
        tracing::trace!(%entity, "entity created");
        entity
    }

    /// Destroys an entity.
    ///
    /// Every row holding a value for the entity runs its destructor on it,
    /// then the slot's generation is flipped to free and the index is
    /// queued for reuse.
    ///
    /// # Returns
    ///
    /// `false` with no side effect if the entity is stale or belongs to
    /// another table.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let (index, generation) = (entity.index(), entity.generation());
        for entry in &mut self.rows {
            entry.row.remove(index, generation);
        }
        let freed = self.ids.free(entity.handle());
        debug_assert!(freed);

        tracing::trace!(%entity, "entity destroyed");
        true
    }

    /// Checks if the entity is live in this table.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        entity.table() == self.id && self.ids.exists(entity.handle())
    }

    /// Returns the row for `T`, if registered.
    #[must_use]
    pub fn row<T: Component>(&self) -> Option<&Row<T>> {
        let slot = self.position::<T>()?;
        self.rows[slot].row.as_any().downcast_ref()
    }

    /// Returns the row for `T` mutably, if registered.
    pub fn row_mut<T: Component>(&mut self) -> Option<&mut Row<T>> {
        let slot = self.position::<T>()?;
        self.rows[slot].row.as_any_mut().downcast_mut()
    }

    /// Attaches a component to a live entity, replacing (and destroying)
    /// any value it already had.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StaleHandle`] if the entity is not live here.
    /// - [`StoreError::UnregisteredRow`] if `T` has no row.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> StoreResult<()> {
        if !self.is_alive(entity) {
            return Err(StoreError::StaleHandle);
        }
        let table = self.id;
        let row = self.row_mut::<T>().ok_or(StoreError::UnregisteredRow {
            table,
            component: component_name::<T>(),
        })?;
        row.insert(entity.index(), entity.generation(), value);
        Ok(())
    }

    /// Detaches and destroys a component.
    ///
    /// Returns `false` if the entity is stale or has no such component.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.row_mut::<T>()
            .is_some_and(|row| row.remove(entity.index(), entity.generation()))
    }

    /// Gets a component of a live entity.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.row::<T>()?.get(entity.index(), entity.generation())
    }

    /// Gets a component of a live entity mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.row_mut::<T>()?
            .get_mut(entity.index(), entity.generation())
    }

    /// Checks if a live entity has a component.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Iterates over all live entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        let id = self.id;
        self.ids.iter().map(move |handle| Entity::new(id, handle))
    }

    /// Destroys every live component and frees every entity.
    ///
    /// Registered rows and the generation array are kept: the table stays
    /// usable, and entities issued before the clear never validate against
    /// later occupants of their slots.
    ///
    /// # Returns
    ///
    /// Number of component values handed to destructors.
    pub fn clear(&mut self) -> usize {
        if !self.ids.is_empty() {
            tracing::warn!(table = %self.id, live = self.ids.len(), "clearing table with live entities");
        }
        let destroyed: usize = self.rows.iter_mut().map(|entry| entry.row.clear()).sum();
        self.ids.free_all();
        destroyed
    }

    fn position<T: Component>(&self) -> Option<usize> {
        let type_id = TypeId::of::<T>();
        self.rows.iter().position(|entry| entry.type_id == type_id)
    }
}

impl std::fmt::Debug for EntityTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<&str> = self.rows.iter().map(|entry| entry.row.component()).collect();
        f.debug_struct("EntityTable")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("live", &self.ids.len())
            .field("width", &self.ids.capacity())
            .field("rows", &rows)
            .finish()
    }
}
