// handle.rs - Entity handle bound to its store

use crate::ecs::{Component, Entity, Store};

/// Mutable handle pairing an entity with the store that owns it.
///
/// ```ignore
/// store
///     .entity_mut(e)
///     .add(Position { x: 0.0, y: 0.0 })
///     .add(Velocity { x: 1.0, y: 0.0 });
/// ```
pub struct EntityMut<'s> {
    store: &'s mut Store,
    entity: Entity,
}

impl<'s> EntityMut<'s> {
    pub(crate) fn new(store: &'s mut Store, entity: Entity) -> Self {
        Self { store, entity }
    }

    #[inline]
    pub fn id(&self) -> Entity {
        self.entity
    }

    pub fn valid(&self) -> bool {
        self.store.valid(self.entity)
    }

    pub fn add<C: Component>(&mut self, value: C) -> &mut Self {
        self.store.add_component(self.entity, value);
        self
    }

    pub fn remove<C: Component>(&mut self) -> Option<C> {
        self.store.remove_component::<C>(self.entity)
    }

    pub fn get<C: Component>(&self) -> Option<&C> {
        self.store.get_component::<C>(self.entity)
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.store.get_component_mut::<C>(self.entity)
    }

    pub fn has<C: Component>(&self) -> bool {
        self.store.has_component::<C>(self.entity)
    }

    /// Stage the entity for destruction; it stays usable until the next
    /// `Store::update`.
    pub fn destroy(self) {
        self.store.destroy(self.entity);
    }
}
