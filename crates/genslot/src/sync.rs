//! # Shared Stores
//!
//! The core tables are single-owner. These wrappers put one lock around
//! each table instance so several threads can share it:
//!
//! - [`SharedNamedTable`] - `parking_lot::RwLock`, readers run in parallel
//! - [`SharedEntityStore`] - `parking_lot::Mutex`, rows hold `FnMut`
//!   destructors and are `Send` but not `Sync`
//!
//! Lock guards must not be held across calls back into the same wrapper.

use std::sync::Arc;

use bytemuck::Pod;
use genslot_core::{
    Component, Entity, EntityStore, Handle, NamedTable, Released, StoreResult, TableId,
};
use parking_lot::{Mutex, RwLock};

/// A [`NamedTable`] behind a reader-writer lock. Cloning shares the table.
pub struct SharedNamedTable<T: Pod> {
    inner: Arc<RwLock<NamedTable<T>>>,
}

impl<T: Pod> Clone for SharedNamedTable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Pod + Send + Sync> SharedNamedTable<T> {
    /// Wraps an existing table.
    #[must_use]
    pub fn new(table: NamedTable<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Runs `f` with shared access to the table.
    pub fn read<R>(&self, f: impl FnOnce(&NamedTable<T>) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Runs `f` with exclusive access to the table.
    pub fn write<R>(&self, f: impl FnOnce(&mut NamedTable<T>) -> R) -> R {
        f(&mut *self.inner.write())
    }

    /// See [`NamedTable::add`].
    pub fn add(&self, name: &str, value: T) -> (Handle, bool) {
        self.inner.write().add(name, value)
    }

    /// See [`NamedTable::retain`].
    pub fn retain(&self, handle: Handle) -> bool {
        self.inner.write().retain(handle)
    }

    /// See [`NamedTable::release`].
    pub fn release(&self, handle: Handle) -> Option<Released<T>> {
        self.inner.write().release(handle)
    }

    /// Returns a copy of the value under `handle`.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<T> {
        self.inner.read().get(handle).copied()
    }

    /// See [`NamedTable::set`].
    pub fn set(&self, handle: Handle, value: T) -> bool {
        self.inner.write().set(handle, value)
    }

    /// See [`NamedTable::lookup`].
    #[must_use]
    pub fn lookup(&self, name: &str) -> Handle {
        self.inner.read().lookup(name)
    }

    /// See [`NamedTable::is_current`].
    #[must_use]
    pub fn is_current(&self, handle: Handle) -> bool {
        self.inner.read().is_current(handle)
    }

    /// Returns the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Checks if the table has no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// An [`EntityStore`] behind a mutex. Cloning shares the store.
#[derive(Clone)]
pub struct SharedEntityStore {
    inner: Arc<Mutex<EntityStore>>,
}

impl SharedEntityStore {
    /// Wraps an existing store.
    #[must_use]
    pub fn new(store: EntityStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with shared access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Runs `f` with exclusive access to the store.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut EntityStore) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// See [`EntityStore::create`].
    pub fn create(&self, table: TableId) -> Entity {
        self.inner.lock().create(table)
    }

    /// See [`EntityStore::destroy`].
    pub fn destroy(&self, entity: Entity) -> bool {
        self.inner.lock().destroy(entity)
    }

    /// See [`EntityStore::is_alive`].
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.inner.lock().is_alive(entity)
    }

    /// See [`EntityStore::insert`].
    ///
    /// # Errors
    ///
    /// See [`EntityStore::insert`].
    pub fn insert<T: Component>(&self, entity: Entity, value: T) -> StoreResult<()> {
        self.inner.lock().insert(entity, value)
    }

    /// Returns the number of live entities across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Checks if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_named_table_across_threads() {
        let table = SharedNamedTable::new(NamedTable::<u32>::new().unwrap());

        let workers: Vec<_> = (0..4u32)
            .map(|t| {
                let table = table.clone();
                thread::spawn(move || {
                    for i in 0..25u32 {
                        let (handle, added) = table.add(&format!("t{t}-{i}"), t * 100 + i);
                        assert!(added);
                        assert_eq!(table.get(handle), Some(t * 100 + i));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(table.len(), 100);
        let handle = table.lookup("t2-7");
        assert_eq!(table.get(handle), Some(207));
        assert!(table.release(handle).is_some_and(|r| r.is_freed()));
        assert!(!table.is_current(handle));
    }

    #[test]
    fn test_shared_entity_store_across_threads() {
        let mut store = EntityStore::new(["units"]).unwrap();
        let units = TableId::new(0);
        store.register_row::<u64>(units).unwrap();
        let store = SharedEntityStore::new(store);

        let workers: Vec<_> = (0..4u64)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..50u64)
                        .map(|i| {
                            let entity = store.create(units);
                            store.insert(entity, t * 1000 + i).unwrap();
                            entity
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut entities = Vec::new();
        for worker in workers {
            entities.extend(worker.join().unwrap());
        }

        assert_eq!(store.len(), 200);
        entities.sort_by_key(|e| e.index());
        entities.dedup();
        assert_eq!(entities.len(), 200);

        for entity in &entities {
            assert!(store.destroy(*entity));
        }
        assert!(store.is_empty());
        assert!(!store.with(|s| s.is_alive(entities[0])));
    }
}
