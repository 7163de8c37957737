//! # Generational Id Allocator
//!
//! Hands out `(index, generation)` handles over a growable generation array,
//! recycling freed indices through a FIFO [`FreeList`].

use super::freelist::FreeList;
use crate::handle::{is_current, Generation, Handle};

/// Allocator for generational slot ids.
///
/// Liveness is encoded in the generation parity: odd generations are
/// occupied, even ones are free. No separate flag array is kept.
///
/// # Thread Safety
///
/// This allocator is NOT thread-safe. Wrap the owning table in a lock for
/// shared access.
///
/// # Example
///
/// ```rust
/// use genslot_core::IdAllocator;
///
/// let mut ids = IdAllocator::new();
/// let a = ids.alloc();
/// assert!(ids.exists(a));
///
/// ids.free(a);
/// let b = ids.alloc();
/// assert_eq!(a.index(), b.index());
/// assert_ne!(a.generation(), b.generation());
/// ```
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    /// Generation of every slot ever issued (high-water mark).
    generations: Vec<Generation>,
    /// Indices waiting for reuse.
    free: FreeList,
    /// Number of live slots.
    live: usize,
}

impl IdAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty allocator with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            free: FreeList::with_capacity(capacity),
            live: 0,
        }
    }

    /// Returns the number of live ids.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Checks if no id is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the number of slots ever issued. Never shrinks except on
    /// [`IdAllocator::clear`].
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Returns the generation array, one entry per slot.
    #[inline]
    #[must_use]
    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    /// Allocates an id, reusing the oldest freed index first.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots would be needed.
    pub fn alloc(&mut self) -> Handle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let len = self.generations.len();
                assert!(
                    len < u32::MAX as usize,
                    "slot count cannot exceed u32::MAX"
                );
                self.generations.push(Generation::NONE);
                #[allow(clippy::cast_possible_truncation)]
                let index = len as u32;
                index
            }
        };

        let slot = &mut self.generations[index as usize];
        *slot = slot.to_live();
        self.live += 1;

        Handle::new(index, *slot)
    }

    /// Frees a live id.
    ///
    /// # Returns
    ///
    /// `true` if the id was live, `false` if it was stale. A stale id
    /// leaves the allocator untouched.
    pub fn free(&mut self, id: Handle) -> bool {
        if !self.exists(id) {
            return false;
        }
        self.release(id.index());
        true
    }

    /// Frees whatever id currently occupies `index`.
    ///
    /// Returns `false` if the slot is out of range or already free.
    pub fn free_at(&mut self, index: u32) -> bool {
        if !self.exists_at(index) {
            return false;
        }
        self.release(index);
        true
    }

    /// Checks if the id names a live slot.
    #[inline]
    #[must_use]
    pub fn exists(&self, id: Handle) -> bool {
        id.generation().is_live() && is_current(&self.generations, id)
    }

    /// Checks if the slot at `index` is occupied.
    #[inline]
    #[must_use]
    pub fn exists_at(&self, index: u32) -> bool {
        self.generations
            .get(index as usize)
            .is_some_and(|generation| generation.is_live())
    }

    /// Returns the live handle at `index`, if any.
    #[must_use]
    pub fn handle_at(&self, index: u32) -> Option<Handle> {
        let generation = *self.generations.get(index as usize)?;
        generation
            .is_live()
            .then(|| Handle::new(index, generation))
    }

    /// Iterates over the handles of all live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| generation.is_live())
            .map(|(index, generation)| {
                #[allow(clippy::cast_possible_truncation)]
                let index = index as u32;
                Handle::new(index, *generation)
            })
    }

    /// Frees every live id in index order.
    ///
    /// Generations are kept, so no handle issued before this call is
    /// current afterwards and reissued slots get fresh generations.
    ///
    /// # Returns
    ///
    /// Number of ids freed.
    pub fn free_all(&mut self) -> usize {
        let mut freed = 0;
        for slot in 0..self.generations.len() {
            #[allow(clippy::cast_possible_truncation)]
            let index = slot as u32;
            if self.exists_at(index) {
                self.release(index);
                freed += 1;
            }
        }
        freed
    }

    /// Forgets every slot. Handles issued before the clear must be dropped
    /// by their holders: indices restart at zero with fresh generations.
    pub fn clear(&mut self) {
        self.generations.clear();
        self.free.clear();
        self.live = 0;
    }

    fn release(&mut self, index: u32) {
        let slot = &mut self.generations[index as usize];
        let freed = slot.to_free();
        if freed.is_none() {
            tracing::debug!(index, "slot generation wrapped");
        }
        *slot = freed;
        self.free.push(index);
        self.live -= 1;
    }
}
