use super::{IndexPage, Slot};

/// Sparse key -> slot map split into lazily allocated pages.
///
/// Keys are entity ids. A lookup is one shift to find the page and one mask
/// to find the row; pages that were never written answer "absent" without
/// being allocated.
pub struct PagedIndex {
    rows_per_page: usize,
    shift: u32,
    mask: usize,
    pages: Vec<Option<IndexPage>>,
}

impl PagedIndex {
    /// `rows_per_page` must be a non-zero power of two.
    pub fn with_rows_per_page(rows_per_page: usize) -> Self {
        assert!(rows_per_page.is_power_of_two() && rows_per_page > 0);
        Self {
            rows_per_page,
            shift: rows_per_page.trailing_zeros(),
            mask: rows_per_page - 1,
            pages: Vec::new(),
        }
    }

    #[inline]
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    #[inline]
    fn page_of(&self, key: usize) -> usize {
        key >> self.shift
    }

    #[inline]
    fn local_of(&self, key: usize) -> usize {
        key & self.mask
    }

    #[inline]
    pub fn get(&self, key: usize) -> Option<Slot> {
        self.pages
            .get(self.page_of(key))?
            .as_ref()?
            .get(self.local_of(key))
    }

    #[inline]
    pub fn contains(&self, key: usize) -> bool {
        self.get(key).is_some()
    }

    /// Point `key` at `slot`, allocating its page on first touch.
    pub fn insert(&mut self, key: usize, slot: Slot) {
        let pid = self.page_of(key);
        let local = self.local_of(key);
        if pid >= self.pages.len() {
            self.pages.resize_with(pid + 1, || None);
        }
        let rows = self.rows_per_page;
        self.pages[pid]
            .get_or_insert_with(|| IndexPage::with_capacity(rows))
            .set(local, slot);
    }

    /// Invalidate `key`, returning the slot it pointed at.
    pub fn remove(&mut self, key: usize) -> Option<Slot> {
        let pid = self.page_of(key);
        let local = self.local_of(key);
        self.pages.get_mut(pid)?.as_mut()?.invalidate(local)
    }

    /// Invalidate every listed key. Pages stay allocated for reuse.
    pub fn remove_all(&mut self, keys: impl IntoIterator<Item = usize>) {
        for key in keys {
            self.remove(key);
        }
    }

    /// Number of pages that have been materialized.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    /// Number of keys currently mapped.
    pub fn len(&self) -> usize {
        self.pages.iter().flatten().map(IndexPage::used).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
