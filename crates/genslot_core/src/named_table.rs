//! # Named Refcounted Table
//!
//! A flat table of fixed-layout values addressed by handle or by name.
//!
//! Every slot carries a generation, a reference count and an optional name,
//! all kept in parallel arrays that grow in lock-step. A slot is live iff
//! its refcount is non-zero. Live names are unique and indexed for lookup.
//!
//! Values are plain data ([`Pod`]): the table owns no nested resources and
//! runs no destructors. Callers that wrap native resources take the value
//! back from [`NamedTable::release`] and free it themselves.

use std::collections::HashMap;

use bytemuck::Pod;

use crate::error::{StoreError, StoreResult};
use crate::handle::{is_current, Generation, Handle};
use crate::memory::FreeList;

/// Outcome of a [`NamedTable::release`] on a current handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Released<T> {
    /// References remain; the slot is still live.
    Retained {
        /// Reference count after the decrement.
        refcount: u32,
    },
    /// The last reference was dropped. Carries the value that was stored.
    Freed(T),
}

impl<T> Released<T> {
    /// Returns true if this release freed the slot.
    #[inline]
    #[must_use]
    pub const fn is_freed(&self) -> bool {
        matches!(self, Self::Freed(_))
    }

    /// Returns the freed value, if this release freed the slot.
    #[inline]
    #[must_use]
    pub fn into_freed(self) -> Option<T> {
        match self {
            Self::Freed(value) => Some(value),
            Self::Retained { .. } => None,
        }
    }
}

/// Named, refcounted table of `T` values.
///
/// All operations taking a handle are O(1) and never allocate. Stale
/// handles are reported as `false`/`None` and leave every slot untouched.
///
/// # Thread Safety
///
/// Single writer. Use `genslot::SharedNamedTable` for shared access.
///
/// # Example
///
/// ```rust
/// use genslot_core::{NamedTable, Released};
///
/// let mut table: NamedTable<u32> = NamedTable::new()?;
/// let (rock, added) = table.add("rock", 0xCAFE);
/// assert!(added);
/// assert_eq!(table.lookup("rock"), rock);
///
/// assert_eq!(table.release(rock), Some(Released::Freed(0xCAFE)));
/// assert!(!table.is_current(rock));
/// # Ok::<(), genslot_core::StoreError>(())
/// ```
pub struct NamedTable<T: Pod> {
    /// Generation per slot.
    generations: Vec<Generation>,
    /// Reference count per slot; zero means free.
    refcounts: Vec<u32>,
    /// Name per live slot.
    names: Vec<Option<Box<str>>>,
    /// Value per slot; zeroed while free.
    values: Vec<T>,
    /// Released slot indices.
    free: FreeList,
    /// Live name -> slot index.
    lookup: HashMap<Box<str>, u32>,
}

impl<T: Pod> NamedTable<T> {
    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `T` is zero-sized.
    pub fn new() -> StoreResult<Self> {
        Self::with_capacity(0)
    }

    /// Creates an empty table with room for `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `T` is zero-sized.
    pub fn with_capacity(capacity: usize) -> StoreResult<Self> {
        if std::mem::size_of::<T>() == 0 {
            return Err(StoreError::InvalidArgument(format!(
                "element type {} has zero size",
                std::any::type_name::<T>()
            )));
        }

        Ok(Self {
            generations: Vec::with_capacity(capacity),
            refcounts: Vec::with_capacity(capacity),
            names: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            free: FreeList::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        })
    }

    /// Returns the number of live slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Checks if no slot is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Returns the high-water mark of slots ever issued.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.generations.len()
    }

    /// Checks if the handle names a live slot.
    #[inline]
    #[must_use]
    pub fn is_current(&self, handle: Handle) -> bool {
        is_current(&self.generations, handle) && self.refcounts[handle.slot()] > 0
    }

    /// Adds a named value with a refcount of one.
    ///
    /// # Returns
    ///
    /// - `(handle, true)` when a slot was filled.
    /// - `(existing, false)` when `name` is already live. The stored value
    ///   and refcount are left as they were.
    /// - `(Handle::NULL, false)` when `name` is empty.
    pub fn add(&mut self, name: &str, value: T) -> (Handle, bool) {
        if name.is_empty() {
            return (Handle::NULL, false);
        }

        let existing = self.lookup(name);
        if !existing.is_null() {
            return (existing, false);
        }

        let index = match self.free.pop() {
            Some(index) => {
                tracing::debug!(index, name, "reusing named slot");
                index
            }
            None => self.grow(),
        };

        let slot = index as usize;
        self.refcounts[slot] = 1;
        self.names[slot] = Some(name.into());
        self.values[slot] = value;
        self.lookup.insert(name.into(), index);

        (Handle::new(index, self.generations[slot]), true)
    }

    /// Adds a reference to a live slot.
    ///
    /// Returns `false` if the handle is stale or the count is already
    /// `u32::MAX`.
    pub fn retain(&mut self, handle: Handle) -> bool {
        if !self.is_current(handle) {
            return false;
        }
        let slot = handle.slot();
        let Some(refcount) = self.refcounts[slot].checked_add(1) else {
            tracing::warn!(%handle, "refcount saturated");
            return false;
        };
        self.refcounts[slot] = refcount;
        true
    }

    /// Drops a reference to a live slot.
    ///
    /// When the count reaches zero the name is unregistered, the value is
    /// moved out and zeroed in place, the generation is bumped and the
    /// index is queued for reuse.
    ///
    /// # Returns
    ///
    /// `None` if the handle is stale, otherwise whether the slot survived.
    pub fn release(&mut self, handle: Handle) -> Option<Released<T>> {
        if !self.is_current(handle) {
            return None;
        }

        let slot = handle.slot();
        self.refcounts[slot] -= 1;
        let refcount = self.refcounts[slot];
        if refcount > 0 {
            return Some(Released::Retained { refcount });
        }

        if let Some(name) = self.names[slot].take() {
            self.lookup.remove(&name);
            tracing::debug!(%handle, name = &*name, "named slot released");
        }
        let value = std::mem::replace(&mut self.values[slot], T::zeroed());
        self.generations[slot] = self.generations[slot].next();
        self.free.push(handle.index());

        Some(Released::Freed(value))
    }

    /// Returns the value behind a live handle.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.is_current(handle).then(|| &self.values[handle.slot()])
    }

    /// Returns the value behind a live handle, mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if !self.is_current(handle) {
            return None;
        }
        Some(&mut self.values[handle.slot()])
    }

    /// Overwrites the value behind a live handle.
    ///
    /// Returns `false` (and drops nothing) if the handle is stale.
    #[inline]
    pub fn set(&mut self, handle: Handle, value: T) -> bool {
        match self.get_mut(handle) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Finds the live slot registered under `name`.
    ///
    /// Returns [`Handle::NULL`] if the name is absent.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Handle {
        self.lookup.get(name).map_or(Handle::NULL, |&index| {
            Handle::new(index, self.generations[index as usize])
        })
    }

    /// Returns the name of a live slot.
    #[must_use]
    pub fn name_of(&self, handle: Handle) -> Option<&str> {
        if !self.is_current(handle) {
            return None;
        }
        self.names[handle.slot()].as_deref()
    }

    /// Returns the reference count of a live slot.
    #[must_use]
    pub fn refcount(&self, handle: Handle) -> Option<u32> {
        self.is_current(handle)
            .then(|| self.refcounts[handle.slot()])
    }

    /// Iterates over all live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &str, &T)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(move |(slot, name)| {
                let name = name.as_deref()?;
                #[allow(clippy::cast_possible_truncation)]
                let handle = Handle::new(slot as u32, self.generations[slot]);
                Some((handle, name, &self.values[slot]))
            })
    }

    /// Resets the table to width zero.
    ///
    /// Refcounts are not honored and nothing is destroyed: release nested
    /// resources before calling this. Indices restart at zero, so handles
    /// issued before the clear must be discarded by their holders.
    pub fn clear(&mut self) {
        if !self.lookup.is_empty() {
            tracing::warn!(live = self.lookup.len(), "clearing named table with live slots");
        }
        self.generations.clear();
        self.refcounts.clear();
        self.names.clear();
        self.values.clear();
        self.free.clear();
        self.lookup.clear();
    }

    /// Appends a fresh slot to every parallel array.
    fn grow(&mut self) -> u32 {
        let len = self.generations.len();
        assert!(len < u32::MAX as usize, "slot count cannot exceed u32::MAX");

        self.generations.push(Generation::FIRST);
        self.refcounts.push(0);
        self.names.push(None);
        self.values.push(T::zeroed());

        #[allow(clippy::cast_possible_truncation)]
        let index = len as u32;
        index
    }
}
