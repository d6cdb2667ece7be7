//! Strata Core
//!
//! In-process entity/component store:
//! - Paged sparse-set pools, one per component type
//! - Bitmask signatures for entity membership
//! - Version-checked, cached multi-component views
//! - Deferred entity destruction applied at an explicit sync point

pub mod ecs;
pub mod pool;

pub use ecs::{
    ComponentId, ComponentRegistry, Entity, EntityMut, Signature, Store, StoreConfig,
    StoreError, ViewHandle,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
