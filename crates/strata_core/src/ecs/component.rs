// component.rs - Runtime component type registration
//
// Every distinct Rust type used as a component gets a small integer id the
// first time it is registered. The id doubles as its signature bit and as
// the index of its pool inside a store.

use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::mem::{align_of, size_of};
use std::sync::{Arc, PoisonError, RwLock};

pub type ComponentId = u32;

/// Number of distinct component types a store can hold (signature width).
pub const MAX_COMPONENTS: usize = 64;

/// Marker trait for values that can be stored as components.
///
/// Implemented for every `'static + Send + Sync` type so pools can be shared
/// with worker threads during parallel passes.
pub trait Component: 'static + Send + Sync {
    /// Human-readable name for diagnostics.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        type_name::<Self>()
    }
}

impl<T: 'static + Send + Sync> Component for T {}

/// Metadata recorded for each registered component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentMeta {
    pub id: ComponentId,
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
}

#[derive(Default)]
struct RegistryInner {
    by_type: HashMap<TypeId, ComponentId>,
    metas: Vec<ComponentMeta>,
}

/// Assigns stable component ids, shared by every store that uses it.
///
/// Ids are handed out from a monotonically increasing counter and never
/// reused. The process-wide instance is [`ComponentRegistry::global`];
/// tests build private registries so id assignment does not depend on the
/// order in which test cases run.
#[derive(Default)]
pub struct ComponentRegistry {
    inner: RwLock<RegistryInner>,
}

static GLOBAL: Lazy<Arc<ComponentRegistry>> = Lazy::new(|| Arc::new(ComponentRegistry::new()));

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by stores built with `Store::new`.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Id for `C`, allocating the next counter value on first use.
    ///
    /// The returned id may exceed [`MAX_COMPONENTS`]; stores reject such ids
    /// when the type is registered with them.
    pub fn id_of<C: Component>(&self) -> ComponentId {
        if let Some(id) = self.lookup::<C>() {
            return id;
        }
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let next = inner.metas.len() as ComponentId;
        let id = *inner.by_type.entry(TypeId::of::<C>()).or_insert(next);
        if id == next {
            inner.metas.push(ComponentMeta {
                id,
                name: C::name(),
                size: size_of::<C>(),
                align: align_of::<C>(),
            });
        }
        id
    }

    /// Id for `C` if it has been assigned one.
    pub fn lookup<C: Component>(&self) -> Option<ComponentId> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_type
            .get(&TypeId::of::<C>())
            .copied()
    }

    /// Look up component metadata by id.
    pub fn meta_of(&self, id: ComponentId) -> Option<ComponentMeta> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .metas
            .get(id as usize)
            .cloned()
    }

    /// Number of ids handed out so far.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .metas
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
