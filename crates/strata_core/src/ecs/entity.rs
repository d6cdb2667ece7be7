//! Entity handles
//!
//! An entity is a plain integer key in `[0, max_entities)`. It carries no
//! data; components are looked up by id in each pool's sparse index.

use std::fmt;

/// Entity handle (opaque id)
///
/// `Entity::NONE` is returned when the store has no free ids left; callers
/// check [`Entity::is_none`] or `Store::valid` before using a fresh handle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    /// Sentinel for "no entity".
    pub const NONE: Entity = Entity(u32::MAX);

    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    /// Id widened for indexing into per-entity tables.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Entity(NONE)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}
