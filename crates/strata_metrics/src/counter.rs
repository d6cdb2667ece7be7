//! Named event counters

use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct Counters {
    values: BTreeMap<&'static str, u64>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, value: u64) {
        *self.values.entry(name).or_insert(0) += value;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    /// Every counter in name order.
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        self.values.iter().map(|(&k, &v)| (k, v)).collect()
    }
}
