//! # Component Rows
//!
//! Dense storage for one component type within one entity table.
//!
//! The row uses a dense array strategy:
//! - One slot per table index, grown in lock-step with the table
//! - Each slot records the generation of the entity that owns its value
//! - Access is O(1) via `(index, generation)`

use std::any::Any;

use super::component::{component_name, Component, Destructor};
use crate::handle::Generation;

/// Storage for a single component type.
///
/// `generations[i]` is the generation of the entity whose value sits in
/// `values[i]`, or [`Generation::NONE`] if the slot is empty. Every value
/// leaving the row goes through the destructor exactly once, including
/// values still present when the row is dropped.
///
/// # Type Parameters
///
/// * `T` - The component type to store
pub struct Row<T: Component> {
    /// Owner generation per slot; `NONE` while empty.
    generations: Vec<Generation>,
    /// Value per slot.
    values: Vec<Option<T>>,
    /// Teardown callback bound at registration.
    destructor: Option<Destructor<T>>,
}

impl<T: Component> Row<T> {
    /// Creates an empty row whose values are simply dropped on removal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            values: Vec::new(),
            destructor: None,
        }
    }

    /// Creates an empty row that hands every removed value to `destructor`.
    #[must_use]
    pub fn with_destructor<F>(destructor: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        Self {
            generations: Vec::new(),
            values: Vec::new(),
            destructor: Some(Box::new(destructor)),
        }
    }

    /// Returns the number of slots (matches the owning table's width).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if the row has no slots at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Grows the row to at least `len` empty slots. Never shrinks.
    pub(crate) fn reserve_slots(&mut self, len: usize) {
        if len > self.values.len() {
            self.generations.resize(len, Generation::NONE);
            self.values.resize_with(len, || None);
        }
    }

    /// Checks if the slot holds a value owned by `generation`.
    #[inline]
    #[must_use]
    pub fn has(&self, index: u32, generation: Generation) -> bool {
        !generation.is_none()
            && self.generations.get(index as usize) == Some(&generation)
    }

    /// Gets the value owned by `(index, generation)`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u32, generation: Generation) -> Option<&T> {
        if !self.has(index, generation) {
            return None;
        }
        self.values[index as usize].as_ref()
    }

    /// Gets the value owned by `(index, generation)` mutably.
    #[inline]
    pub fn get_mut(&mut self, index: u32, generation: Generation) -> Option<&mut T> {
        if !self.has(index, generation) {
            return None;
        }
        self.values[index as usize].as_mut()
    }

    /// Stores a value for `(index, generation)`.
    ///
    /// Grows the row if needed. A value already in the slot is passed to
    /// the destructor before being replaced. The owning table checks
    /// liveness before calling this.
    pub(crate) fn insert(&mut self, index: u32, generation: Generation, value: T) {
        debug_assert!(!generation.is_none(), "cannot insert with NONE generation");
        let slot = index as usize;
        self.reserve_slots(slot + 1);

        self.generations[slot] = generation;
        if let Some(previous) = self.values[slot].replace(value) {
            self.destroy(previous);
        }
    }

    /// Removes the value owned by `(index, generation)`, running the
    /// destructor on it.
    ///
    /// Idempotent: returns `false` and does nothing if the slot is already
    /// empty or owned by another generation.
    pub fn remove(&mut self, index: u32, generation: Generation) -> bool {
        if !self.has(index, generation) {
            return false;
        }
        let slot = index as usize;
        self.generations[slot] = Generation::NONE;
        match self.values[slot].take() {
            Some(value) => {
                self.destroy(value);
                true
            }
            None => false,
        }
    }

    /// Returns the owner generation of every slot.
    #[inline]
    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    /// Returns every slot, empty ones as `None`.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Iterates over occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.values.iter().enumerate().filter_map(|(slot, value)| {
            #[allow(clippy::cast_possible_truncation)]
            let index = slot as u32;
            value.as_ref().map(|v| (index, v))
        })
    }

    /// Iterates mutably over occupied slots with their indices.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> + '_ {
        self.values.iter_mut().enumerate().filter_map(|(slot, value)| {
            #[allow(clippy::cast_possible_truncation)]
            let index = slot as u32;
            value.as_mut().map(|v| (index, v))
        })
    }

    /// Destroys every value. Slots stay allocated, empty.
    ///
    /// # Returns
    ///
    /// Number of values handed to the destructor.
    pub fn clear(&mut self) -> usize {
        let mut destroyed = 0;
        let destructor = &mut self.destructor;
        for (generation, slot) in self.generations.iter_mut().zip(&mut self.values) {
            *generation = Generation::NONE;
            if let Some(value) = slot.take() {
                match destructor.as_mut() {
                    Some(destructor) => destructor(value),
                    None => drop(value),
                }
                destroyed += 1;
            }
        }
        destroyed
    }

    fn destroy(&mut self, value: T) {
        match self.destructor.as_mut() {
            Some(destructor) => destructor(value),
            None => drop(value),
        }
    }
}

impl<T: Component> Default for Row<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> Drop for Row<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Type-erased view of a row, used by tables to drive every row of an
/// entity without knowing the component types.
pub(crate) trait ErasedRow: Send {
    /// Type name of the stored component.
    fn component(&self) -> &'static str;
    /// Grows the row to at least `len` slots.
    fn reserve_slots(&mut self, len: usize);
    /// Removes the value owned by `(index, generation)`, if any.
    fn remove(&mut self, index: u32, generation: Generation) -> bool;
    /// Destroys every value.
    fn clear(&mut self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedRow for Row<T> {
    fn component(&self) -> &'static str {
        component_name::<T>()
    }

    fn reserve_slots(&mut self, len: usize) {
        Row::reserve_slots(self, len);
    }

    fn remove(&mut self, index: u32, generation: Generation) -> bool {
        Row::remove(self, index, generation)
    }

    fn clear(&mut self) -> usize {
        Row::clear(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_row() -> (Row<String>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let row = Row::with_destructor(move |value: String| sink.lock().unwrap().push(value));
        (row, log)
    }

    #[test]
    fn test_insert_get() {
        let mut row: Row<u32> = Row::new();
        let generation = Generation::new(1);
        row.insert(4, generation, 42);

        assert_eq!(row.len(), 5);
        assert_eq!(row.get(4, generation), Some(&42));
        assert_eq!(row.get(4, Generation::new(3)), None);
        assert_eq!(row.get(3, generation), None);
        assert_eq!(row.get(100, generation), None);
    }

    #[test]
    fn test_remove_runs_destructor_once() {
        let (mut row, log) = recording_row();
        let generation = Generation::new(1);
        row.insert(0, generation, "mesh".to_owned());

        assert!(row.remove(0, generation));
        assert!(!row.remove(0, generation));
        assert_eq!(*log.lock().unwrap(), vec!["mesh".to_owned()]);
        assert!(!row.has(0, generation));
    }

    #[test]
    fn test_replace_destroys_previous() {
        let (mut row, log) = recording_row();
        let generation = Generation::new(1);
        row.insert(0, generation, "old".to_owned());
        row.insert(0, generation, "new".to_owned());

        assert_eq!(*log.lock().unwrap(), vec!["old".to_owned()]);
        assert_eq!(row.get(0, generation).map(String::as_str), Some("new"));
    }

    #[test]
    fn test_drop_destroys_remaining_values() {
        let (mut row, log) = recording_row();
        row.insert(0, Generation::new(1), "a".to_owned());
        row.insert(2, Generation::new(3), "b".to_owned());
        row.remove(0, Generation::new(1));
        drop(row);

        assert_eq!(*log.lock().unwrap(), vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn test_clear_keeps_slots() {
        let (mut row, log) = recording_row();
        row.insert(0, Generation::new(1), "a".to_owned());
        row.insert(3, Generation::new(5), "b".to_owned());

        assert_eq!(row.clear(), 2);
        assert_eq!(row.len(), 4);
        assert!(!row.has(3, Generation::new(5)));
        assert_eq!(row.clear(), 0);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_iter_skips_empty_slots() {
        let mut row: Row<u8> = Row::new();
        row.insert(1, Generation::new(1), 10);
        row.insert(3, Generation::new(1), 30);

        let items: Vec<(u32, u8)> = row.iter().map(|(i, v)| (i, *v)).collect();
        assert_eq!(items, vec![(1, 10), (3, 30)]);
    }
}
