//! Store construction settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ENTITIES: u32 = 1_000_000;
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Capacity settings fixed for the lifetime of a store.
///
/// `max_entities` is a hard ceiling: the free list, reverse index and
/// signature table are sized to it up front. `page_size` is the number of
/// entity ids covered by one sparse-index page and must be a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_entities: u32,
    pub page_size: usize,
}

impl StoreConfig {
    pub fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn validate(&self) {
        assert!(
            self.page_size.is_power_of_two() && self.page_size > 0,
            "page_size must be a non-zero power of two, got {}",
            self.page_size
        );
        assert!(
            self.max_entities < u32::MAX,
            "max_entities must leave u32::MAX free for Entity::NONE"
        );
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = StoreConfig::default()
            .with_max_entities(128)
            .with_page_size(32);
        assert_eq!(config.max_entities, 128);
        assert_eq!(config.page_size, 32);
        config.validate();
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn odd_page_size_is_rejected() {
        StoreConfig::default().with_page_size(100).validate();
    }
}
