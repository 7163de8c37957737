//! # Handles
//!
//! A handle names a slot at a point in time. It is made of:
//! - An index into the backing arrays
//! - The generation the slot had when the handle was issued
//!
//! A handle is *current* for a table when its index is in range and the
//! slot's generation still matches. Freeing a slot bumps its generation, so
//! every handle issued before the free stops matching.

use std::fmt;

/// Per-slot generation counter.
///
/// Generation `0` means "never issued" and is never part of a valid handle.
/// Two advancement schemes are used:
/// - [`Generation::next`] for tables that track liveness separately
///   (named tables): increments, wrapping past `u16::MAX` straight to `1`.
/// - The parity scheme ([`Generation::to_live`] / [`Generation::to_free`])
///   for entity tables, where an odd generation marks an occupied slot and
///   an even one a free slot.
///
/// After `2^16` recycles of one slot a stale handle can alias a live one.
/// This is a known limit and is not detected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Generation(u16);

impl Generation {
    /// The reserved "never issued" generation.
    pub const NONE: Self = Self(0);

    /// The generation stamped on a slot's first allocation.
    pub const FIRST: Self = Self(1);

    /// Creates a generation from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Returns true for the reserved "never issued" generation.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns the following generation, skipping `0` on wrap.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        match self.0.wrapping_add(1) {
            0 => Self::FIRST,
            n => Self(n),
        }
    }

    /// Odd generations mark occupied slots.
    #[inline]
    #[must_use]
    pub const fn is_live(self) -> bool {
        self.0 & 1 == 1
    }

    /// Forces the live bit on. A free slot at `2k` becomes live at `2k + 1`.
    #[inline]
    #[must_use]
    pub const fn to_live(self) -> Self {
        Self(self.0 | 1)
    }

    /// Steps a live generation to the following even (free) value.
    ///
    /// `u16::MAX` wraps to `0`, which is even and therefore free; the next
    /// [`Generation::to_live`] yields `1`.
    #[inline]
    #[must_use]
    pub const fn to_free(self) -> Self {
        Self(self.0.wrapping_add(1) & !1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Opaque `(index, generation)` pair naming a slot.
///
/// Handles are plain values: copying one never affects the slot. Two
/// handles are equal iff both fields match. They carry no meaning across
/// process restarts because freelist order is not reproducible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: Generation,
}

impl Handle {
    /// The zero handle, returned when nothing was found or issued.
    pub const NULL: Self = Self {
        index: 0,
        generation: Generation::NONE,
    };

    /// Creates a handle from its parts.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation the slot had when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }

    /// Checks whether this is the zero handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.generation.is_none()
    }

    /// Slot index widened for array access.
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.index, self.generation)
    }
}

/// Validity predicate shared by every table kind.
///
/// O(1), no side effects: the index must be in range and the stored
/// generation must equal the handle's.
#[inline]
#[must_use]
pub fn is_current(generations: &[Generation], handle: Handle) -> bool {
    generations
        .get(handle.slot())
        .is_some_and(|stored| *stored == handle.generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_skips_zero() {
        assert_eq!(Generation::new(1).next(), Generation::new(2));
        assert_eq!(Generation::new(u16::MAX).next(), Generation::FIRST);
    }

    #[test]
    fn test_parity_cycle() {
        let live = Generation::NONE.to_live();
        assert_eq!(live, Generation::FIRST);
        assert!(live.is_live());

        let free = live.to_free();
        assert_eq!(free, Generation::new(2));
        assert!(!free.is_live());

        let reissued = free.to_live();
        assert_eq!(reissued, Generation::new(3));
        assert_ne!(reissued, live);
    }

    #[test]
    fn test_parity_wrap_never_yields_zero_live() {
        let last = Generation::new(u16::MAX);
        assert!(last.is_live());
        let free = last.to_free();
        assert_eq!(free, Generation::NONE);
        assert_eq!(free.to_live(), Generation::FIRST);
    }

    #[test]
    fn test_null_handle() {
        assert!(Handle::NULL.is_null());
        assert_eq!(Handle::default(), Handle::NULL);
        assert!(!Handle::new(0, Generation::FIRST).is_null());
    }

    #[test]
    fn test_is_current() {
        let generations = [Generation::new(1), Generation::new(4)];
        assert!(is_current(&generations, Handle::new(0, Generation::new(1))));
        assert!(!is_current(&generations, Handle::new(1, Generation::new(3))));
        assert!(!is_current(&generations, Handle::new(2, Generation::new(1))));
        assert!(!is_current(&generations, Handle::NULL));
    }
}
