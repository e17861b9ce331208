//! Entities with Generational Indices
//!
//! An entity is just a handle: a slot index plus the generation of that slot.
//! Freed slots are recycled, and the generation bump makes stale handles
//! fail `is_alive` instead of silently aliasing the new occupant.

use std::fmt;

/// A handle to an entity in a [`World`](super::World).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// A null/invalid entity reference.
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    /// Create an entity handle (internal use).
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index, used to address component storage.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Check if this is the null entity.
    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index, self.generation)
        }
    }
}

/// Allocates and tracks entity lifetimes.
pub struct EntityAllocator {
    /// Generation counter for each slot
    generations: Vec<u32>,
    /// Liveness per slot, so iteration doesn't have to scan the free list
    alive: Vec<bool>,
    /// Free slots available for reuse (LIFO)
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
        }
    }

    /// Allocate a new entity, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already bumped on free
            self.alive[index as usize] = true;
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        }
    }

    /// Free an entity, making its slot available for reuse.
    /// Returns true if the entity was alive and is now freed.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let idx = entity.index as usize;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.alive[idx] = false;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    /// Check if an entity handle still refers to a live entity.
    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let idx = entity.index as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == entity.generation
    }

    /// Number of live entities.
    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Highest index ever allocated + 1.
    pub fn capacity(&self) -> u32 {
        self.generations.len() as u32
    }

    /// Iterate over all live entities in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| Entity::new(idx as u32, self.generations[idx]))
    }

    /// Free every live entity.
    pub fn clear(&mut self) {
        for idx in 0..self.generations.len() {
            if self.alive[idx] {
                self.generations[idx] = self.generations[idx].wrapping_add(1);
                self.alive[idx] = false;
                self.free_indices.push(idx as u32);
            }
        }
        self.alive_count = 0;
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut entities = EntityAllocator::default();

        let e1 = entities.allocate();
        let e2 = entities.allocate();
        assert_eq!(entities.alive_count(), 2);
        assert!(entities.is_alive(e1));
        assert!(entities.is_alive(e2));

        assert!(entities.free(e1));
        assert_eq!(entities.alive_count(), 1);
        assert!(!entities.is_alive(e1));
        assert!(entities.is_alive(e2));

        // Double free is rejected
        assert!(!entities.free(e1));
        assert_eq!(entities.alive_count(), 1);
    }

    #[test]
    fn test_generation_prevents_reuse_collision() {
        let mut entities = EntityAllocator::default();

        let e1 = entities.allocate();
        entities.free(e1);

        let e2 = entities.allocate();
        assert_eq!(e2.index(), e1.index());
        assert_ne!(e2.generation(), e1.generation());
        assert!(!entities.is_alive(e1));
        assert!(entities.is_alive(e2));
    }

    #[test]
    fn test_iter_alive_skips_freed() {
        let mut entities = EntityAllocator::default();
        let e0 = entities.allocate();
        let e1 = entities.allocate();
        let e2 = entities.allocate();
        entities.free(e1);

        let alive: Vec<_> = entities.iter_alive().collect();
        assert_eq!(alive, vec![e0, e2]);
    }

    #[test]
    fn test_clear() {
        let mut entities = EntityAllocator::default();
        let e0 = entities.allocate();
        let e1 = entities.allocate();
        entities.clear();

        assert_eq!(entities.alive_count(), 0);
        assert!(!entities.is_alive(e0));
        assert!(!entities.is_alive(e1));
        assert_eq!(entities.iter_alive().count(), 0);
        assert_eq!(entities.capacity(), 2);
    }

    #[test]
    fn test_null_entity() {
        let entities = EntityAllocator::new();
        assert!(!entities.is_alive(Entity::NULL));
        assert!(Entity::NULL.is_null());
        assert_eq!(Entity::default(), Entity::NULL);
    }
}
