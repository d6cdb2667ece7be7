// view.rs - Cached multi-component joins
//
// A view remembers the version of every participating pool. As long as
// those versions are unchanged, the cached (entity, slots) list is reused
// as-is; any insertion or removal in one of the pools triggers a rebuild
// on the next query.

use crate::ecs::{Component, ComponentId, Entity, Pools, Signature};
use crate::pool::Slot;
use rayon::prelude::*;
use std::marker::PhantomData;

/// Snapshot value that never matches a live pool version.
const NEVER_SEEN: u64 = u64::MAX;

/// Stable identifier of a cached view inside its store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(u32);

impl ViewId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Cache key: combined signature plus the requested component order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ViewKey {
    pub signature: Signature,
    pub order: Vec<ComponentId>,
}

/// Raw base pointer of one pool's dense component array.
#[doc(hidden)]
pub struct DensePtr<C> {
    ptr: *mut C,
    len: usize,
}

impl<C> Clone for DensePtr<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for DensePtr<C> {}

// SAFETY: a DensePtr only hands out `&mut C` for distinct slots, so sharing
// it across threads is equivalent to sending those `&mut C` to them.
unsafe impl<C: Send> Send for DensePtr<C> {}
unsafe impl<C: Send> Sync for DensePtr<C> {}

impl<C> DensePtr<C> {
    #[inline]
    pub fn new(slice: &mut [C]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
        }
    }

    /// # Safety
    /// `slot` must be in bounds, the backing pool must not be resized while
    /// the reference lives, and no other live reference may alias the slot.
    #[inline]
    pub unsafe fn slot_mut<'w>(self, slot: Slot) -> &'w mut C {
        debug_assert!((slot as usize) < self.len, "slot {slot} out of bounds ({})", self.len);
        &mut *self.ptr.add(slot as usize)
    }
}

/// A tuple of component types that can be joined by a view.
///
/// Implemented for tuples of one to eight distinct component types. Each
/// matching entity yields one `&mut` per component, in tuple order.
pub trait ComponentSet: 'static {
    /// Dense slot of each component for one matching entity.
    type Slots: Copy + Send + Sync + 'static;
    #[doc(hidden)]
    type Pointers: Copy + Send + Sync;
    /// Per-entity item handed to visitors.
    type Item<'w>;

    /// Component ids in tuple order. Unregistered types are fatal.
    fn component_ids(pools: &Pools) -> Vec<ComponentId>;

    /// Type name of the first component appearing twice in the tuple.
    fn duplicate_name(ids: &[ComponentId]) -> Option<&'static str>;

    /// Slots of `entity` in each pool, or `None` if any pool lacks it.
    fn slots(pools: &Pools, ids: &[ComponentId], entity: Entity) -> Option<Self::Slots>;

    #[doc(hidden)]
    fn pointers(pools: &mut Pools) -> Self::Pointers;

    /// # Safety
    /// `slots` must come from [`ComponentSet::slots`] against the current
    /// pool contents, and no other live reference may alias those slots.
    #[doc(hidden)]
    unsafe fn fetch<'w>(pointers: Self::Pointers, slots: Self::Slots) -> Self::Item<'w>;
}

macro_rules! impl_component_set {
    ($len:literal => $($name:ident : $idx:tt),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Slots = [Slot; $len];
            type Pointers = ($(DensePtr<$name>,)+);
            type Item<'w> = ($(&'w mut $name,)+);

            fn component_ids(pools: &Pools) -> Vec<ComponentId> {
                vec![$(pools.id_of::<$name>()),+]
            }

            fn duplicate_name(ids: &[ComponentId]) -> Option<&'static str> {
                let names = [$($name::name()),+];
                (0..ids.len())
                    .find(|&i| ids[..i].contains(&ids[i]))
                    .map(|i| names[i])
            }

            #[inline]
            fn slots(pools: &Pools, ids: &[ComponentId], entity: Entity) -> Option<Self::Slots> {
                Some([$(pools.slot_of(ids[$idx], entity)?),+])
            }

            fn pointers(pools: &mut Pools) -> Self::Pointers {
                ($(DensePtr::new(pools.pool_mut::<$name>().components_mut()),)+)
            }

            #[inline]
            unsafe fn fetch<'w>(pointers: Self::Pointers, slots: Self::Slots) -> Self::Item<'w> {
                ($(pointers.$idx.slot_mut(slots[$idx]),)+)
            }
        }
    };
}

impl_component_set!(1 => A: 0);
impl_component_set!(2 => A: 0, B: 1);
impl_component_set!(3 => A: 0, B: 1, C: 2);
impl_component_set!(4 => A: 0, B: 1, C: 2, D: 3);
impl_component_set!(5 => A: 0, B: 1, C: 2, D: 3, E: 4);
impl_component_set!(6 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_component_set!(7 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_component_set!(8 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

/// Cached join for one component tuple.
pub(crate) struct ViewCache<Q: ComponentSet> {
    id: ViewId,
    signature: Signature,
    ids: Vec<ComponentId>,
    versions: Vec<u64>,
    entries: Vec<(Entity, Q::Slots)>,
    rebuilds: u64,
    _query: PhantomData<fn() -> Q>,
}

impl<Q: ComponentSet> ViewCache<Q> {
    pub fn new(id: ViewId, key: &ViewKey) -> Self {
        Self {
            id,
            signature: key.signature,
            ids: key.order.clone(),
            versions: vec![NEVER_SEEN; key.order.len()],
            entries: Vec::new(),
            rebuilds: 0,
            _query: PhantomData,
        }
    }

    fn is_current(&self, pools: &Pools) -> bool {
        self.ids
            .iter()
            .zip(&self.versions)
            .all(|(&id, &seen)| pools.version_of(id) == seen)
    }

    /// Rebuild the cached join if any participating pool changed.
    pub fn refresh(&mut self, pools: &Pools, signatures: &[Signature]) {
        if self.is_current(pools) {
            return;
        }
        for (seen, &id) in self.versions.iter_mut().zip(&self.ids) {
            *seen = pools.version_of(id);
        }

        // Iterate the most selective pool; the signature test rejects
        // entities missing any other component in one comparison.
        let base = self
            .ids
            .iter()
            .map(|&id| pools.entities_of(id))
            .min_by_key(|entities| entities.len())
            .unwrap_or(&[]);

        self.entries.clear();
        self.entries.reserve(base.len());
        for &entity in base {
            if !signatures[entity.index()].contains_all(self.signature) {
                continue;
            }
            if let Some(slots) = Q::slots(pools, &self.ids, entity) {
                self.entries.push((entity, slots));
            }
        }

        self.rebuilds += 1;
        tracing::debug!(
            view = self.id.index(),
            candidates = base.len(),
            matched = self.entries.len(),
            "rebuilt view cache"
        );
    }
}

/// Borrowed access to a cached view.
///
/// Obtained from `Store::view`. The handle borrows the store exclusively, so
/// no structural change can happen while it (or anything it handed out) is
/// alive. Request the view again for a second pass; the store returns the
/// same cached object.
pub struct ViewHandle<'w, Q: ComponentSet> {
    cache: &'w mut ViewCache<Q>,
    pools: &'w mut Pools,
    signatures: &'w [Signature],
}

impl<'w, Q: ComponentSet> ViewHandle<'w, Q> {
    pub(crate) fn new(
        cache: &'w mut ViewCache<Q>,
        pools: &'w mut Pools,
        signatures: &'w [Signature],
    ) -> Self {
        Self {
            cache,
            pools,
            signatures,
        }
    }

    /// Identity of the underlying cached view.
    pub fn id(&self) -> ViewId {
        self.cache.id
    }

    /// Combined signature of the joined component types.
    pub fn signature(&self) -> Signature {
        self.cache.signature
    }

    /// How many times the cached join has been recomputed.
    pub fn rebuild_count(&self) -> u64 {
        self.cache.rebuilds
    }

    fn refresh(&mut self) {
        self.cache.refresh(self.pools, self.signatures);
    }

    /// Number of matching entities.
    pub fn len(&mut self) -> usize {
        self.refresh();
        self.cache.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Matching entity ids, in cache order.
    pub fn entities(&mut self) -> Vec<Entity> {
        self.refresh();
        self.cache.entries.iter().map(|&(entity, _)| entity).collect()
    }

    /// Visit every matching entity with mutable access to its components.
    ///
    /// Order follows the iterated pool and is not stable across rebuilds.
    pub fn each<F>(mut self, mut f: F)
    where
        F: FnMut(Entity, Q::Item<'w>),
    {
        self.refresh();
        let pointers = Q::pointers(self.pools);
        for &(entity, slots) in &self.cache.entries {
            // SAFETY: the cache was rebuilt against the current pool
            // versions, each entity appears once, and the store stays
            // exclusively borrowed for 'w.
            f(entity, unsafe { Q::fetch(pointers, slots) });
        }
    }

    /// Parallel [`ViewHandle::each`]: rayon splits the cached join across
    /// worker threads and the call returns once every entity was visited.
    /// A panicking visitor propagates to the caller.
    pub fn par_each<F>(mut self, f: F)
    where
        F: Fn(Entity, Q::Item<'w>) + Send + Sync,
    {
        self.refresh();
        let pointers = Q::pointers(self.pools);
        self.cache.entries.par_iter().for_each(|&(entity, slots)| {
            // SAFETY: entries hold distinct entities, so workers never
            // receive aliasing slots; see `each` for the rest.
            f(entity, unsafe { Q::fetch(pointers, slots) });
        });
    }
}
