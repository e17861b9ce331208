//! World
//!
//! The world owns entity lifetimes plus one sparse storage per component
//! type, created on first insert and keyed by `TypeId`. Tags get their own
//! storages keyed by tag id.
//!
//! Despawn is deferred by default (`despawn` + `flush_despawns`) so scripts
//! can kill entities while a query snapshot is being walked.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use super::component::{AnyStorage, ComponentStorage};
use super::entity::{Entity, EntityAllocator};
use super::query::{ComponentId, Filter, Query};
use super::tag::Tag;

/// Container for all entities, components and tags.
pub struct World {
    entities: EntityAllocator,

    /// Entities queued for despawn at end of frame
    despawn_queue: Vec<Entity>,

    components: HashMap<TypeId, Box<dyn AnyStorage>>,

    /// Tag id → membership
    tags: HashMap<u32, ComponentStorage<()>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            despawn_queue: Vec::new(),
            components: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    // =========================================================================
    // Entity Management
    // =========================================================================

    /// Create a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Queue an entity for despawn at end of frame.
    pub fn despawn(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.despawn_queue.contains(&entity) {
            self.despawn_queue.push(entity);
        }
    }

    /// Immediately despawn an entity and drop all its components and tags.
    /// Returns false if the entity was already dead.
    pub fn despawn_immediate(&mut self, entity: Entity) -> bool {
        if !self.entities.free(entity) {
            return false;
        }

        let idx = entity.index();
        for storage in self.components.values_mut() {
            storage.clear_slot(idx);
        }
        for members in self.tags.values_mut() {
            members.clear_slot(idx);
        }
        true
    }

    /// Process all queued despawns. Returns how many entities died.
    pub fn flush_despawns(&mut self) -> usize {
        let queue = std::mem::take(&mut self.despawn_queue);
        queue
            .into_iter()
            .filter(|&entity| self.despawn_immediate(entity))
            .count()
    }

    /// Whether `entity` is live. Still true for entities queued by `despawn`.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Whether `entity` is waiting for the next `flush_despawns`.
    pub fn is_despawn_queued(&self, entity: Entity) -> bool {
        !self.despawn_queue.is_empty() && self.despawn_queue.contains(&entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    /// All live entities, in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    /// Despawn everything. Component storages are kept but emptied.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.despawn_queue.clear();
        for storage in self.components.values_mut() {
            storage.clear();
        }
        for members in self.tags.values_mut() {
            members.clear();
        }
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attach a component, replacing (and returning) any previous value.
    /// Inserting on a dead entity is ignored and hands the value back.
    pub fn insert<T: 'static>(&mut self, entity: Entity, component: T) -> Option<T> {
        if !self.is_alive(entity) {
            log::warn!("insert {} on dead {:?} ignored", type_name::<T>(), entity);
            return Some(component);
        }
        self.storage_mut_or_default::<T>().insert(entity, component)
    }

    /// Detach and return a component.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> Option<T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Get a component of a live entity.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component of a live entity.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_alive(entity) {
            return None;
        }
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Check if a live entity has a component.
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Typed storage for `T`, if any entity ever had one.
    pub fn storage<T: 'static>(&self) -> Option<&ComponentStorage<T>> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<ComponentStorage<T>>())
    }

    /// Mutable typed storage for `T`, if it exists.
    pub fn storage_mut<T: 'static>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<ComponentStorage<T>>())
    }

    fn storage_mut_or_default<T: 'static>(&mut self) -> &mut ComponentStorage<T> {
        let storage = self
            .components
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));
        match storage.as_any_mut().downcast_mut::<ComponentStorage<T>>() {
            Some(storage) => storage,
            None => unreachable!("storage keyed by TypeId of {} holds another type", type_name::<T>()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Live entities matching `query`, in slot order.
    pub fn query<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = Entity> + 'a {
        query.iter(self)
    }

    /// First live entity matching `query`.
    pub fn first(&self, query: &Query) -> Option<Entity> {
        query.first(self)
    }

    /// First live entity carrying `T`, for settings-style singletons.
    pub fn singleton<T: 'static>(&self) -> Option<Entity> {
        self.first(&Query::new(Filter::contains([ComponentId::of::<T>()])))
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Mark a live entity with `tag`.
    pub fn add_tag(&mut self, entity: Entity, tag: &Tag) {
        if self.is_alive(entity) {
            self.tags.entry(tag.id()).or_default().insert(entity, ());
        }
    }

    /// Unmark an entity. Returns true if it had the tag.
    pub fn remove_tag(&mut self, entity: Entity, tag: &Tag) -> bool {
        self.tags
            .get_mut(&tag.id())
            .is_some_and(|members| members.remove(entity).is_some())
    }

    /// Check if a live entity carries `tag`.
    pub fn has_tag(&self, entity: Entity, tag: &Tag) -> bool {
        self.is_alive(entity)
            && self
                .tags
                .get(&tag.id())
                .is_some_and(|members| members.contains(entity))
    }

    /// Presence check used by filters. Assumes `entity` is alive.
    pub(crate) fn contains_id(&self, entity: Entity, id: &ComponentId) -> bool {
        match id {
            ComponentId::Component { type_id, .. } => self
                .components
                .get(type_id)
                .is_some_and(|s| s.contains_index(entity.index())),
            ComponentId::Tag(tag) => self
                .tags
                .get(&tag.id())
                .is_some_and(|members| members.contains(entity)),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
