//! Owned collection of live entities for one sketch.

use super::states::EntityId;

/// Entities in insertion order, each tagged with a stable [`EntityId`]
#[derive(Debug, Clone)]
pub struct StateStore<E> {
    entries: Vec<(EntityId, E)>,
    next_id: u64,
}

impl<E> Default for StateStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> StateStore<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn add(&mut self, entity: E) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, entity));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entries.iter().find(|(eid, _)| *eid == id).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.entries.iter_mut().find(|(eid, _)| *eid == id).map(|(_, e)| e)
    }

    /// Remove a single entity, preserving the order of the rest
    pub fn remove(&mut self, id: EntityId) -> Option<E> {
        let idx = self.entries.iter().position(|(eid, _)| *eid == id)?;
        Some(self.entries.remove(idx).1)
    }

    /// Drop every entity, returning the ids that were released
    pub fn clear(&mut self) -> Vec<EntityId> {
        self.entries.drain(..).map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> + '_ {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut E)> + '_ {
        self.entries.iter_mut().map(|(id, e)| (*id, e))
    }

    pub fn values(&self) -> impl Iterator<Item = &E> + '_ {
        self.entries.iter().map(|(_, e)| e)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> + '_ {
        self.entries.iter_mut().map(|(_, e)| e)
    }
}
