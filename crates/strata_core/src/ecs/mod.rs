//! Entity/component store.
//!
//! Components live in paged sparse-set pools, one per registered type.
//! Each entity carries a 64-bit signature mirroring pool membership, which
//! lets views test "has all of these" with a single mask comparison. Views
//! cache their join and recompute it only after a participating pool
//! changed structurally.

mod component;
mod config;
mod entities;
mod entity;
mod error;
mod handle;
mod pools;
mod signature;
mod storage;
mod store;
mod view;

pub use component::{Component, ComponentId, ComponentMeta, ComponentRegistry, MAX_COMPONENTS};
pub use config::{StoreConfig, DEFAULT_MAX_ENTITIES, DEFAULT_PAGE_SIZE};
pub use entities::EntityTable;
pub use entity::Entity;
pub use error::StoreError;
pub use handle::EntityMut;
pub use pools::Pools;
pub use signature::Signature;
pub use storage::ComponentPool;
pub use store::Store;
pub use view::{ComponentSet, DensePtr, ViewHandle, ViewId};

/// Create an entity and attach each component in order.
///
/// Evaluates to the new [`Entity`], or [`Entity::NONE`] if the store is full
/// (in which case no component is attached).
#[macro_export]
macro_rules! spawn {
    ($store:expr $(, $component:expr)* $(,)?) => {{
        let store: &mut $crate::ecs::Store = &mut $store;
        let entity = store.create();
        if !entity.is_none() {
            $(
                store.add_component(entity, $component);
            )*
        }
        entity
    }};
}

/// Register several component types at once.
#[macro_export]
macro_rules! register {
    ($store:expr, $($ty:ty),+ $(,)?) => {{
        let store: &mut $crate::ecs::Store = &mut $store;
        $(
            store.register::<$ty>();
        )+
    }};
}
