//! Paged sparse index mapping entity ids to dense slots.
//!
//! Pages are fixed-size slot arrays allocated the first time a key in
//! their range is written, so memory tracks the number of touched ranges
//! rather than the full id space.

mod index;
mod page;

pub use index::PagedIndex;
pub use page::IndexPage;

/// Dense slot number stored in the sparse index.
pub type Slot = u32;

/// Marker for "no dense slot".
pub const INVALID_SLOT: Slot = Slot::MAX;
