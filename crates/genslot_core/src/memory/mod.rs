//! # Slot Bookkeeping
//!
//! Shared primitives behind every table kind.
//!
//! ## Design Philosophy
//!
//! Slots are never returned to the allocator. Freed indices are queued and
//! reused before the backing arrays grow:
//! - Backing arrays only grow (high-water mark)
//! - Reuse is FIFO
//! - Generations are bumped on every Live -> Free transition

mod freelist;
mod id_alloc;

pub use freelist::FreeList;
pub use id_alloc::IdAllocator;
