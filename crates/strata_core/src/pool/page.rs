use super::{Slot, INVALID_SLOT};

/// One fixed-size block of the sparse index.
pub struct IndexPage {
    slots: Box<[Slot]>,
    used: usize,
}

impl IndexPage {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            slots: vec![INVALID_SLOT; rows].into_boxed_slice(),
            used: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of rows currently holding a valid slot.
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn get(&self, local: usize) -> Option<Slot> {
        match self.slots.get(local) {
            Some(&slot) if slot != INVALID_SLOT => Some(slot),
            _ => None,
        }
    }

    #[inline]
    pub fn set(&mut self, local: usize, slot: Slot) {
        debug_assert!(slot != INVALID_SLOT, "INVALID_SLOT is reserved");
        let entry = &mut self.slots[local];
        if *entry == INVALID_SLOT {
            self.used += 1;
        }
        *entry = slot;
    }

    /// Invalidate a row, returning the slot it held.
    #[inline]
    pub fn invalidate(&mut self, local: usize) -> Option<Slot> {
        let entry = self.slots.get_mut(local)?;
        if *entry == INVALID_SLOT {
            return None;
        }
        let slot = std::mem::replace(entry, INVALID_SLOT);
        self.used -= 1;
        Some(slot)
    }

    pub fn clear(&mut self) {
        self.slots.fill(INVALID_SLOT);
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_is_all_invalid() {
        let page = IndexPage::with_capacity(8);
        assert_eq!(page.capacity(), 8);
        assert_eq!(page.used(), 0);
        assert!((0..8).all(|i| page.get(i).is_none()));
    }

    #[test]
    fn set_and_invalidate_track_usage() {
        let mut page = IndexPage::with_capacity(4);
        page.set(1, 10);
        page.set(1, 11);
        page.set(3, 0);
        assert_eq!(page.used(), 2);
        assert_eq!(page.get(1), Some(11));

        assert_eq!(page.invalidate(1), Some(11));
        assert_eq!(page.invalidate(1), None);
        assert_eq!(page.used(), 1);

        page.clear();
        assert_eq!(page.used(), 0);
        assert_eq!(page.get(3), None);
    }
}
