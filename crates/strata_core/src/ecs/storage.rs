// storage.rs - Per-type paged sparse set
//
// Components live in a dense Vec next to a parallel Vec of owning entities.
// A paged sparse index maps entity id -> dense slot. Removal swaps the last
// element into the hole so both dense arrays stay packed.

use crate::ecs::{Component, Entity};
use crate::pool::{PagedIndex, Slot};
use std::any::Any;

/// Dense storage for every instance of one component type.
pub struct ComponentPool<C> {
    components: Vec<C>,
    entities: Vec<Entity>,
    index: PagedIndex,
    version: u64,
}

impl<C: Component> ComponentPool<C> {
    /// Create a pool whose sparse index pages cover `page_size` entity ids.
    pub fn new(page_size: usize) -> Self {
        Self {
            components: Vec::new(),
            entities: Vec::new(),
            index: PagedIndex::with_rows_per_page(page_size),
            version: 0,
        }
    }

    /// Attach `value` to `entity`.
    ///
    /// A new entity is appended and bumps the version. An entity that is
    /// already present has its value overwritten in place; membership is
    /// unchanged, so the version is left alone. Returns `true` when the
    /// entity was newly inserted.
    pub fn insert(&mut self, entity: Entity, value: C) -> bool {
        if let Some(slot) = self.index.get(entity.index()) {
            self.components[slot as usize] = value;
            return false;
        }

        let slot = self.components.len() as Slot;
        self.components.push(value);
        self.entities.push(entity);
        self.index.insert(entity.index(), slot);
        self.version += 1;
        true
    }

    /// Detach and return the component of `entity`, if it has one.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let slot = self.index.remove(entity.index())? as usize;
        debug_assert!(
            !self.components.is_empty(),
            "sparse index points into an empty {} pool",
            C::name()
        );

        let last = self.components.len() - 1;
        let value = self.components.swap_remove(slot);
        self.entities.swap_remove(slot);
        if slot != last {
            // The former last element now lives in `slot`.
            let moved = self.entities[slot];
            self.index.insert(moved.index(), slot as Slot);
        }

        self.version += 1;
        Some(value)
    }

    /// Remove every component, bumping the version once.
    pub fn clear(&mut self) {
        self.index.remove_all(self.entities.iter().map(|e| e.index()));
        self.components.clear();
        self.entities.clear();
        self.version += 1;
    }

    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        let slot = self.index.get(entity.index())?;
        self.components.get(slot as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        let slot = self.index.get(entity.index())?;
        self.components.get_mut(slot as usize)
    }

    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains(entity.index())
    }

    /// Dense slot currently holding `entity`'s component.
    #[inline]
    pub fn slot_of(&self, entity: Entity) -> Option<Slot> {
        self.index.get(entity.index())
    }

    /// Dense component values, in slot order.
    ///
    /// Slot order follows insertion history and is reshuffled by removals.
    #[inline]
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// Mutable dense values. Membership cannot change through this slice.
    #[inline]
    pub fn components_mut(&mut self) -> &mut [C] {
        &mut self.components
    }

    /// Owning entity of each dense slot.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Structural change counter (insertions and removals only).
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of sparse index pages materialized so far.
    pub fn allocated_pages(&self) -> usize {
        self.index.allocated_pages()
    }
}

/// Type-erased view of a pool, used where the component type is not known
/// statically (reclaiming entities, view rebuilds).
pub(crate) trait ErasedPool: Any + Send + Sync {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn slot_of(&self, entity: Entity) -> Option<Slot>;
    fn version(&self) -> u64;
    fn entities(&self) -> &[Entity];
    fn component_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedPool for ComponentPool<C> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn slot_of(&self, entity: Entity) -> Option<Slot> {
        ComponentPool::slot_of(self, entity)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn component_name(&self) -> &'static str {
        C::name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
