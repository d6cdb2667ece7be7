//! Fixed-width component membership mask.

use crate::ecs::{ComponentId, MAX_COMPONENTS};
use std::ops::{BitAnd, BitOr};

/// Bit `k` is set when the entity owns the component with id `k`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature(u64);

const _: () = assert!(MAX_COMPONENTS <= u64::BITS as usize);

impl Signature {
    pub const EMPTY: Signature = Signature(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn of(id: ComponentId) -> Self {
        debug_assert!((id as usize) < MAX_COMPONENTS, "component id {id} exceeds signature width");
        Self(1u64 << id)
    }

    #[inline]
    pub fn with(self, id: ComponentId) -> Self {
        self | Self::of(id)
    }

    #[inline]
    pub fn insert(&mut self, id: ComponentId) {
        self.0 |= Self::of(id).0;
    }

    #[inline]
    pub fn remove(&mut self, id: ComponentId) {
        self.0 &= !Self::of(id).0;
    }

    #[inline]
    pub fn contains(self, id: ComponentId) -> bool {
        self.0 & Self::of(id).0 != 0
    }

    /// True when every bit of `required` is also set here.
    #[inline]
    pub fn contains_all(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set bits.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for Signature {
    type Output = Signature;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Signature {
    type Output = Signature;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl FromIterator<ComponentId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        iter.into_iter().fold(Signature::EMPTY, Signature::with)
    }
}
