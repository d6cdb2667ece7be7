// entities.rs - Entity id allocation and liveness tracking
//
// Free ids sit in a FIFO queue. Live ids are kept in a dense list with a
// reverse index (`positions`), so liveness checks and removals are O(1).
// Destruction is two-phase: ids are staged in `pending` and released at the
// next sync point.

use crate::ecs::{ComponentId, Entity, Signature};
use crate::pool::{Slot, INVALID_SLOT};
use std::collections::VecDeque;

pub struct EntityTable {
    capacity: u32,
    available: VecDeque<Entity>,
    alive: Vec<Entity>,
    positions: Vec<Slot>,
    signatures: Vec<Signature>,
    pending: Vec<Entity>,
}

impl EntityTable {
    /// Pre-size every table for `capacity` ids and queue them all as free.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            available: (0..capacity).map(Entity::from_raw).collect(),
            alive: Vec::new(),
            positions: vec![INVALID_SLOT; capacity as usize],
            signatures: vec![Signature::EMPTY; capacity as usize],
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Pop the next free id and mark it alive.
    pub fn allocate(&mut self) -> Option<Entity> {
        let entity = self.available.pop_front()?;
        self.positions[entity.index()] = self.alive.len() as Slot;
        self.alive.push(entity);
        Some(entity)
    }

    #[inline]
    pub fn in_range(&self, entity: Entity) -> bool {
        entity.id() < self.capacity
    }

    /// Alive (including staged for destruction). Out-of-range ids are not alive.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.positions
            .get(entity.index())
            .is_some_and(|&pos| pos != INVALID_SLOT)
    }

    /// Stage an alive entity for destruction at the next sync point.
    pub fn stage_destroy(&mut self, entity: Entity) {
        debug_assert!(self.is_alive(entity));
        self.pending.push(entity);
    }

    pub fn pending(&self) -> &[Entity] {
        &self.pending
    }

    pub fn is_pending(&self, entity: Entity) -> bool {
        self.pending.contains(&entity)
    }

    /// Drain the staged ids, leaving the staging buffer empty.
    pub fn take_pending(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }

    /// Hand a drained buffer back so its allocation is reused.
    pub fn recycle_pending(&mut self, mut buffer: Vec<Entity>) {
        if self.pending.is_empty() {
            buffer.clear();
            self.pending = buffer;
        }
    }

    /// Remove `entity` from the alive list, clear its signature and return
    /// its id to the free queue. Returns `false` if it was not alive (for
    /// example when it was staged twice).
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let pos = self.positions[entity.index()] as usize;
        self.alive.swap_remove(pos);
        if let Some(&moved) = self.alive.get(pos) {
            self.positions[moved.index()] = pos as Slot;
        }
        self.positions[entity.index()] = INVALID_SLOT;
        self.signatures[entity.index()] = Signature::EMPTY;
        self.available.push_back(entity);
        true
    }

    /// Live ids in dense order.
    #[inline]
    pub fn alive(&self) -> &[Entity] {
        &self.alive
    }

    /// Position of `entity` inside [`EntityTable::alive`].
    pub fn position(&self, entity: Entity) -> Option<usize> {
        match self.positions.get(entity.index()) {
            Some(&pos) if pos != INVALID_SLOT => Some(pos as usize),
            _ => None,
        }
    }

    #[inline]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures
            .get(entity.index())
            .copied()
            .unwrap_or(Signature::EMPTY)
    }

    /// Signature table indexed by entity id.
    #[inline]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    #[inline]
    pub fn set_bit(&mut self, entity: Entity, id: ComponentId) {
        self.signatures[entity.index()].insert(id);
    }

    #[inline]
    pub fn clear_bit(&mut self, entity: Entity, id: ComponentId) {
        self.signatures[entity.index()].remove(id);
    }

    /// Number of ids waiting in the free queue.
    pub fn free_count(&self) -> usize {
        self.available.len()
    }
}
