// store.rs - Top-level entity/component store
//
// Owns the entity table, the pool collection and the view cache. All
// structural operations take `&mut self`; read-only lookups take `&self`.

use crate::ecs::error::fatal;
use crate::ecs::view::{ViewCache, ViewId, ViewKey};
use crate::ecs::{
    Component, ComponentId, ComponentRegistry, ComponentSet, Entity, EntityMut, EntityTable, Pools,
    Signature, StoreConfig, StoreError, ViewHandle,
};
use rayon::prelude::*;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

/// In-process store associating typed components with integer entities.
///
/// ```ignore
/// let mut store = Store::with_config(StoreConfig::default().with_max_entities(1024));
/// store.register::<Position>();
///
/// let e = store.create();
/// store.add_component(e, Position { x: 1.0, y: 1.0 });
///
/// store.view::<(Position,)>().each(|_e, (pos,)| pos.x += 1.0);
///
/// store.destroy(e); // staged
/// store.update();   // applied
/// ```
pub struct Store {
    config: StoreConfig,
    pools: Pools,
    entities: EntityTable,
    views: HashMap<ViewKey, Box<dyn Any + Send + Sync>>,
}

impl Store {
    /// Create a store with default capacity using the global registry.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with custom capacity using the global registry.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_registry(config, ComponentRegistry::global())
    }

    /// Create a store that takes component ids from `registry`.
    pub fn with_registry(config: StoreConfig, registry: Arc<ComponentRegistry>) -> Self {
        config.validate();
        Self {
            config,
            pools: Pools::new(registry, config.page_size),
            entities: EntityTable::new(config.max_entities),
            views: HashMap::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn pools(&self) -> &Pools {
        &self.pools
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register component type `C`. Idempotent; must precede any other
    /// operation on `C`. Exceeding the signature width is fatal.
    pub fn register<C: Component>(&mut self) -> ComponentId {
        self.pools.register::<C>()
    }

    /// Like [`Store::register`], but reports an exhausted signature width
    /// as an error instead of panicking.
    pub fn try_register<C: Component>(&mut self) -> Result<ComponentId, StoreError> {
        self.pools.try_register::<C>()
    }

    pub fn is_registered<C: Component>(&self) -> bool {
        self.pools.is_registered::<C>()
    }

    // ------------------------------------------------------------------
    // Entity lifecycle
    // ------------------------------------------------------------------

    /// Allocate an entity. Returns [`Entity::NONE`] (and logs a warning)
    /// when every id is in use.
    pub fn create(&mut self) -> Entity {
        match self.try_create() {
            Ok(entity) => entity,
            Err(err) => {
                tracing::warn!(error = %err, "entity creation failed");
                Entity::NONE
            }
        }
    }

    /// Allocate an entity, reporting exhaustion as an error.
    pub fn try_create(&mut self) -> Result<Entity, StoreError> {
        self.entities.allocate().ok_or(StoreError::EntityCapacity {
            max: self.entities.capacity(),
        })
    }

    /// Stage `entity` for destruction at the next [`Store::update`].
    ///
    /// The entity stays alive, readable and iterable until then. Invalid
    /// ids are ignored.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.valid(entity) {
            return;
        }
        self.entities.stage_destroy(entity);
    }

    /// Apply every staged destruction: the entity leaves the alive list,
    /// loses its signature and components, and its id becomes free again.
    pub fn update(&mut self) {
        if self.entities.pending().is_empty() {
            return;
        }

        let pending = self.entities.take_pending();
        let mut reclaimed = 0usize;
        for &entity in &pending {
            if self.entities.release(entity) {
                self.pools.destroy_all(entity);
                reclaimed += 1;
            }
        }
        self.entities.recycle_pending(pending);

        tracing::debug!(reclaimed, alive = self.entities.alive().len(), "applied deferred destruction");
    }

    /// Destroy every alive entity and apply it immediately.
    pub fn reset(&mut self) {
        let alive = self.entities.alive().to_vec();
        for entity in alive {
            self.destroy(entity);
        }
        self.update();
    }

    /// True if `entity` is in range and alive (staged entities count as
    /// alive). Out-of-range ids are logged.
    pub fn valid(&self, entity: Entity) -> bool {
        if !self.entities.in_range(entity) {
            tracing::warn!(%entity, max = self.entities.capacity(), "entity id out of range");
            return false;
        }
        self.entities.is_alive(entity)
    }

    /// Live entities in dense order.
    pub fn alive(&self) -> &[Entity] {
        self.entities.alive()
    }

    pub fn alive_count(&self) -> usize {
        self.entities.alive().len()
    }

    /// Number of destruction requests waiting for the next sync point.
    pub fn pending_destroy_count(&self) -> usize {
        self.entities.pending().len()
    }

    pub fn is_pending_destroy(&self, entity: Entity) -> bool {
        self.entities.is_pending(entity)
    }

    /// Membership mask of `entity` (empty for free or out-of-range ids).
    pub fn signature(&self, entity: Entity) -> Signature {
        self.entities.signature(entity)
    }

    /// Bound handle for chained operations on one entity.
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        EntityMut::new(self, entity)
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Attach `value` to `entity`, overwriting an existing value in place.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) {
        if !self.check_alive(entity) {
            return;
        }
        let id = self.pools.id_of::<C>();
        self.pools.insert(entity, value);
        self.entities.set_bit(entity, id);
    }

    /// Detach `C` from `entity`, returning the removed value.
    pub fn remove_component<C: Component>(&mut self, entity: Entity) -> Option<C> {
        if !self.check_alive(entity) {
            return None;
        }
        let id = self.pools.id_of::<C>();
        let removed = self.pools.remove::<C>(entity);
        self.entities.clear_bit(entity, id);
        removed
    }

    pub fn get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.valid(entity) {
            return None;
        }
        self.pools.get::<C>(entity)
    }

    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        if !self.valid(entity) {
            return None;
        }
        self.pools.get_mut::<C>(entity)
    }

    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.get_component::<C>(entity).is_some()
    }

    /// Remove `C` from every entity that has it.
    pub fn clear<C: Component>(&mut self) {
        let id = self.pools.id_of::<C>();
        let pool = self.pools.pool_mut::<C>();
        for &entity in pool.entities() {
            self.entities.clear_bit(entity, id);
        }
        pool.clear();
    }

    /// Structural version of `C`'s pool.
    pub fn version<C: Component>(&self) -> u64 {
        self.pools.pool::<C>().version()
    }

    /// Entities owning `C`, in the pool's dense order.
    pub fn entities_with<C: Component>(&self) -> &[Entity] {
        self.pools.pool::<C>().entities()
    }

    fn check_alive(&self, entity: Entity) -> bool {
        if self.valid(entity) {
            return true;
        }
        if self.entities.in_range(entity) {
            tracing::warn!(error = %StoreError::InvalidEntity { entity }, "component change ignored");
        }
        false
    }

    // ------------------------------------------------------------------
    // Views and parallel passes
    // ------------------------------------------------------------------

    /// Cached join over the component tuple `Q`.
    ///
    /// Repeated requests for the same tuple return the same cached view
    /// (same [`ViewHandle::id`]); its join is recomputed only after a
    /// participating pool changed membership.
    pub fn view<Q: ComponentSet>(&mut self) -> ViewHandle<'_, Q> {
        let key = self.view_key::<Q>();
        let next_id = ViewId::new(self.views.len() as u32);

        let Store {
            pools,
            entities,
            views,
            ..
        } = self;
        let slot = views
            .entry(key)
            .or_insert_with_key(|key| Box::new(ViewCache::<Q>::new(next_id, key)));
        let cache = match slot.downcast_mut::<ViewCache<Q>>() {
            Some(cache) => cache,
            None => unreachable!("view key shared by two component tuples"),
        };
        ViewHandle::new(cache, pools, entities.signatures())
    }

    /// Number of distinct cached views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Split the alive list into `workers` contiguous slices and visit every
    /// entity owning all of `Q`, one rayon task per slice. Entities missing
    /// a component are skipped. Blocks until all slices are done.
    pub fn par_for_each<'w, Q, F>(&'w mut self, workers: usize, f: F)
    where
        Q: ComponentSet,
        F: Fn(Entity, Q::Item<'w>) + Send + Sync,
    {
        let ViewKey { order: ids, .. } = self.view_key::<Q>();
        if self.entities.alive().is_empty() {
            return;
        }
        let chunk = self.entities.alive().len().div_ceil(workers.max(1));

        let pointers = Q::pointers(&mut self.pools);
        let pools = &self.pools;
        self.entities.alive().par_chunks(chunk).for_each(|slice| {
            for &entity in slice {
                if let Some(slots) = Q::slots(pools, &ids, entity) {
                    // SAFETY: alive ids are distinct, so slices never share
                    // slots, and the store is exclusively borrowed for 'w.
                    f(entity, unsafe { Q::fetch(pointers, slots) });
                }
            }
        });
    }

    fn view_key<Q: ComponentSet>(&self) -> ViewKey {
        let order = Q::component_ids(&self.pools);
        if let Some(name) = Q::duplicate_name(&order) {
            fatal(StoreError::DuplicateComponent { name });
        }
        let signature = order.iter().copied().collect();
        tracing::trace!(query = type_name::<Q>(), "resolved view key");
        ViewKey { signature, order }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
