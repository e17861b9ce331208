//! Filters and Queries
//!
//! A [`Filter`] is a predicate over which components and tags an entity
//! carries. A [`Query`] wraps a filter and walks a world's live entities.
//! Queries are plain values, built once at setup and reused every frame.

use std::any::{type_name, TypeId};
use std::fmt;

use super::entity::Entity;
use super::tag::Tag;
use super::world::World;

/// Identifies something an entity can "contain": a component type or a tag.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Component { type_id: TypeId, name: &'static str },
    Tag(Tag),
}

impl ComponentId {
    /// Id of component type `T`.
    pub fn of<T: 'static>() -> Self {
        ComponentId::Component {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl From<Tag> for ComponentId {
    fn from(tag: Tag) -> Self {
        ComponentId::Tag(tag)
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Component { name, .. } => write!(f, "{}", name),
            ComponentId::Tag(tag) => write!(f, "{:?}", tag),
        }
    }
}

/// Predicate over the components/tags of an entity.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Entity has every listed id. An empty list matches everything.
    Contains(Vec<ComponentId>),
    Not(Box<Filter>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn contains(ids: impl IntoIterator<Item = ComponentId>) -> Self {
        Filter::Contains(ids.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Matches when every filter matches.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Matches when any filter matches.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Evaluate against a live entity.
    pub fn matches(&self, world: &World, entity: Entity) -> bool {
        match self {
            Filter::Contains(ids) => ids.iter().all(|id| world.contains_id(entity, id)),
            Filter::Not(inner) => !inner.matches(world, entity),
            Filter::And(filters) => filters.iter().all(|f| f.matches(world, entity)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(world, entity)),
        }
    }
}

/// A reusable filter over a world's live entities.
#[derive(Debug, Clone)]
pub struct Query {
    filter: Filter,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self { filter }
    }

    /// Narrow this query to entities that also carry `tag`.
    pub fn with_tag(&self, tag: &Tag) -> Query {
        Query::new(Filter::and([
            self.filter.clone(),
            Filter::contains([tag.clone().into()]),
        ]))
    }

    /// Matching entities, in slot order.
    pub fn iter<'a>(&'a self, world: &'a World) -> impl Iterator<Item = Entity> + 'a {
        world
            .entities()
            .filter(move |&entity| self.filter.matches(world, entity))
    }

    /// First matching entity.
    pub fn first(&self, world: &World) -> Option<Entity> {
        self.iter(world).next()
    }

    /// Number of matching entities.
    pub fn count(&self, world: &World) -> usize {
        self.iter(world).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    struct Velocity;
    struct Frozen;

    fn setup() -> (World, Entity, Entity, Entity) {
        let mut world = World::new();
        let moving = world.spawn();
        world.insert(moving, Position);
        world.insert(moving, Velocity);

        let still = world.spawn();
        world.insert(still, Position);

        let frozen = world.spawn();
        world.insert(frozen, Position);
        world.insert(frozen, Velocity);
        world.insert(frozen, Frozen);

        (world, moving, still, frozen)
    }

    #[test]
    fn test_contains() {
        let (world, moving, _, frozen) = setup();
        let query = Query::new(Filter::contains([
            ComponentId::of::<Position>(),
            ComponentId::of::<Velocity>(),
        ]));
        let found: Vec<_> = query.iter(&world).collect();
        assert_eq!(found, vec![moving, frozen]);
    }

    #[test]
    fn test_not_and() {
        let (world, moving, _, _) = setup();
        let query = Query::new(Filter::and([
            Filter::contains([ComponentId::of::<Velocity>()]),
            Filter::not(Filter::contains([ComponentId::of::<Frozen>()])),
        ]));
        assert_eq!(query.iter(&world).collect::<Vec<_>>(), vec![moving]);
    }

    #[test]
    fn test_or() {
        let (world, _, still, frozen) = setup();
        let query = Query::new(Filter::or([
            Filter::contains([ComponentId::of::<Frozen>()]),
            Filter::not(Filter::contains([ComponentId::of::<Velocity>()])),
        ]));
        assert_eq!(query.iter(&world).collect::<Vec<_>>(), vec![still, frozen]);
    }

    #[test]
    fn test_empty_contains_matches_all() {
        let (world, ..) = setup();
        assert_eq!(Query::new(Filter::contains([])).count(&world), 3);
    }

    #[test]
    fn test_with_tag() {
        let (mut world, moving, still, _) = setup();
        let tag = Tag::new("Selected");
        world.add_tag(moving, &tag);
        world.add_tag(still, &tag);

        let query = Query::new(Filter::contains([ComponentId::of::<Velocity>()])).with_tag(&tag);
        assert_eq!(query.first(&world), Some(moving));
        assert_eq!(query.count(&world), 1);
    }

    #[test]
    fn test_tag_as_filter_id() {
        let (mut world, _, still, frozen) = setup();
        let tag = Tag::new("Pinned");
        world.add_tag(still, &tag);

        let query = Query::new(Filter::or([
            Filter::contains([tag.clone().into()]),
            Filter::contains([ComponentId::of::<Frozen>()]),
        ]));
        assert_eq!(query.iter(&world).collect::<Vec<_>>(), vec![still, frozen]);
    }

    #[test]
    fn test_unknown_component_matches_nothing() {
        let (world, ..) = setup();
        struct NeverInserted;
        let query = Query::new(Filter::contains([ComponentId::of::<NeverInserted>()]));
        assert_eq!(query.first(&world), None);
    }
}
