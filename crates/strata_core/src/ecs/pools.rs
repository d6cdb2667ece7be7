// pools.rs - One pool per registered component type
//
// Pools are stored in a Vec indexed by component id. Typed access goes
// through a downcast; store-wide operations (reclaiming an entity, view
// rebuilds) go through the erased interface.

use crate::ecs::error::fatal;
use crate::ecs::storage::{ComponentPool, ErasedPool};
use crate::ecs::{Component, ComponentId, ComponentRegistry, Entity, StoreError, MAX_COMPONENTS};
use crate::pool::Slot;
use std::sync::Arc;

/// Owns every component pool of a store.
pub struct Pools {
    registry: Arc<ComponentRegistry>,
    page_size: usize,
    pools: Vec<Option<Box<dyn ErasedPool>>>,
}

impl Pools {
    pub fn new(registry: Arc<ComponentRegistry>, page_size: usize) -> Self {
        Self {
            registry,
            page_size,
            pools: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// Register `C`, creating its pool if needed. Idempotent.
    pub fn try_register<C: Component>(&mut self) -> Result<ComponentId, StoreError> {
        let id = self.registry.id_of::<C>();
        if id as usize >= MAX_COMPONENTS {
            return Err(StoreError::ComponentCapacity {
                name: C::name(),
                id,
                max: MAX_COMPONENTS,
            });
        }

        let idx = id as usize;
        if idx >= self.pools.len() {
            self.pools.resize_with(idx + 1, || None);
        }
        if self.pools[idx].is_none() {
            tracing::debug!(component = C::name(), id, "registered component pool");
            self.pools[idx] = Some(Box::new(ComponentPool::<C>::new(self.page_size)));
        }
        Ok(id)
    }

    /// Register `C`; exhausting the signature width is fatal.
    pub fn register<C: Component>(&mut self) -> ComponentId {
        match self.try_register::<C>() {
            Ok(id) => id,
            Err(err) => fatal(err),
        }
    }

    pub fn is_registered<C: Component>(&self) -> bool {
        self.registered_id::<C>().is_some()
    }

    fn registered_id<C: Component>(&self) -> Option<ComponentId> {
        let id = self.registry.lookup::<C>()?;
        matches!(self.pools.get(id as usize), Some(Some(_))).then_some(id)
    }

    /// Id of a registered component type; unknown types are fatal.
    pub fn id_of<C: Component>(&self) -> ComponentId {
        match self.registered_id::<C>() {
            Some(id) => id,
            None => fatal(StoreError::UnregisteredComponent { name: C::name() }),
        }
    }

    pub fn pool<C: Component>(&self) -> &ComponentPool<C> {
        let id = self.id_of::<C>();
        match self.erased(id).as_any().downcast_ref::<ComponentPool<C>>() {
            Some(pool) => pool,
            None => unreachable!("pool {id} does not hold {}", C::name()),
        }
    }

    pub fn pool_mut<C: Component>(&mut self) -> &mut ComponentPool<C> {
        let id = self.id_of::<C>();
        match self.erased_mut(id).as_any_mut().downcast_mut::<ComponentPool<C>>() {
            Some(pool) => pool,
            None => unreachable!("pool {id} does not hold {}", C::name()),
        }
    }

    pub fn insert<C: Component>(&mut self, entity: Entity, value: C) -> bool {
        self.pool_mut::<C>().insert(entity, value)
    }

    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.pool_mut::<C>().remove(entity)
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.pool::<C>().get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.pool_mut::<C>().get_mut(entity)
    }

    pub fn clear<C: Component>(&mut self) {
        self.pool_mut::<C>().clear();
    }

    /// Remove `entity` from every registered pool.
    pub fn destroy_all(&mut self, entity: Entity) {
        for pool in self.pools.iter_mut().flatten() {
            pool.remove_entity(entity);
        }
    }

    /// Live version of the pool with `id`.
    pub fn version_of(&self, id: ComponentId) -> u64 {
        self.erased(id).version()
    }

    /// Dense owner list of the pool with `id`.
    pub fn entities_of(&self, id: ComponentId) -> &[Entity] {
        self.erased(id).entities()
    }

    /// Dense slot of `entity` in the pool with `id`.
    #[inline]
    pub fn slot_of(&self, id: ComponentId, entity: Entity) -> Option<Slot> {
        self.erased(id).slot_of(entity)
    }

    /// Number of registered pools.
    pub fn len(&self) -> usize {
        self.pools.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered component names with their ids, in id order.
    pub fn names(&self) -> impl Iterator<Item = (ComponentId, &'static str)> + '_ {
        self.pools
            .iter()
            .enumerate()
            .filter_map(|(id, pool)| Some((id as ComponentId, pool.as_ref()?.component_name())))
    }

    fn erased(&self, id: ComponentId) -> &dyn ErasedPool {
        match self.pools.get(id as usize) {
            Some(Some(pool)) => &**pool,
            _ => fatal(self.unregistered(id)),
        }
    }

    fn erased_mut(&mut self, id: ComponentId) -> &mut dyn ErasedPool {
        if !matches!(self.pools.get(id as usize), Some(Some(_))) {
            fatal(self.unregistered(id));
        }
        match self.pools[id as usize].as_mut() {
            Some(pool) => &mut **pool,
            None => unreachable!(),
        }
    }

    fn unregistered(&self, id: ComponentId) -> StoreError {
        let name = self
            .registry
            .meta_of(id)
            .map(|meta| meta.name)
            .unwrap_or("<unknown>");
        StoreError::UnregisteredComponent { name }
    }
}
