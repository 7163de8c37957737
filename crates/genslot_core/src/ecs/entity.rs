//! # Entity Handles
//!
//! Entities are lightweight identifiers consisting of:
//! - The table (entity category) they belong to
//! - A slot index, valid in every row of that table
//! - A generation counter for safe reuse

use std::fmt;

use crate::handle::{Generation, Handle};

/// Identifier of an entity table.
///
/// Categories are a closed set fixed when the store is built, so a
/// `TableId` is assumed valid for the store that issued it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TableId(u8);

impl TableId {
    /// Creates a table id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position of the table in its store.
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to an entity: `{table, index, generation}`.
///
/// The generation of a live entity is always odd.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Entity {
    table: TableId,
    handle: Handle,
}

impl Entity {
    /// Null entity, never alive.
    pub const NULL: Self = Self {
        table: TableId(0),
        handle: Handle::NULL,
    };

    /// Creates an entity handle from its parts.
    #[inline]
    #[must_use]
    pub const fn new(table: TableId, handle: Handle) -> Self {
        Self { table, handle }
    }

    /// Returns the owning table.
    #[inline]
    #[must_use]
    pub const fn table(self) -> TableId {
        self.table
    }

    /// Returns the slot handle within the table.
    #[inline]
    #[must_use]
    pub const fn handle(self) -> Handle {
        self.handle
    }

    /// Returns the slot index within the table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.handle.index()
    }

    /// Returns the generation the slot had when this entity was created.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> Generation {
        self.handle.generation()
    }

    /// Checks if this is the null entity.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.handle.is_null()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.table, self.handle)
    }
}
