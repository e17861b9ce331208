//! Component Storage
//!
//! `ComponentStorage<T>` is a sparse array from entity index to component
//! data. The world keeps one per component type behind the type-erased
//! [`AnyStorage`] trait so despawn and filtering can work without knowing `T`.

use std::any::Any;

use super::entity::Entity;

/// Sparse storage for a single component type.
///
/// The index is the entity's slot index (not generation); liveness is the
/// world's job.
pub struct ComponentStorage<T> {
    data: Vec<Option<T>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a component for an entity, returning the previous value.
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx].replace(component)
    }

    /// Remove a component from an entity.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::take)
    }

    /// Get a component for an entity.
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.data.get(entity.index() as usize).and_then(Option::as_ref)
    }

    /// Get a mutable component for an entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.data.get_mut(entity.index() as usize).and_then(Option::as_mut)
    }

    /// Check if an entity has this component.
    pub fn contains(&self, entity: Entity) -> bool {
        self.contains_index(entity.index())
    }

    /// Check by raw slot index.
    pub fn contains_index(&self, index: u32) -> bool {
        matches!(self.data.get(index as usize), Some(Some(_)))
    }

    /// Iterate over all (index, component) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_ref().map(|c| (idx as u32, c)))
    }

    /// Iterate mutably over all (index, component) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, opt)| opt.as_mut().map(|c| (idx as u32, c)))
    }

    /// Clear the component from an entity slot.
    pub fn clear_slot(&mut self, index: u32) -> bool {
        match self.data.get_mut(index as usize) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    /// Remove all components.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of entities that have this component.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a `ComponentStorage<T>`.
pub(crate) trait AnyStorage: Any {
    fn contains_index(&self, index: u32) -> bool;
    fn clear_slot(&mut self, index: u32) -> bool;
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> AnyStorage for ComponentStorage<T> {
    fn contains_index(&self, index: u32) -> bool {
        ComponentStorage::contains_index(self, index)
    }

    fn clear_slot(&mut self, index: u32) -> bool {
        ComponentStorage::clear_slot(self, index)
    }

    fn clear(&mut self) {
        ComponentStorage::clear(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
