//! ECS Module
//!
//! A small entity-component-system plus the layered draw dispatch built on
//! top of it.
//!
//! Key concepts:
//! - Entity: generational index, safe to hold across despawns
//! - Component: any `'static` value, stored sparsely per type
//! - Tag: runtime-named marker (every draw layer owns one)
//! - Query: reusable filter over components and tags
//! - Layer: numbered bucket of renderers keyed by payload type
//! - Ecs: owns the world and layers, runs systems/scripts, dispatches draws
//!
//! Frame flow: the host calls [`Ecs::update`] once, then [`Ecs::draw`] for
//! each layer in whatever order it wants them stacked.

pub mod component;
pub mod entity;
pub mod layer;
pub mod query;
pub mod tag;
pub mod time;
pub mod world;

pub use component::ComponentStorage;
pub use entity::Entity;
pub use layer::{Layer, LayerId, Layers, Renderer};
pub use query::{ComponentId, Filter, Query};
pub use tag::Tag;
pub use time::Time;
pub use world::World;

/// A system run once per update with full access to the `Ecs`.
pub type UpdateSystem = Box<dyn FnMut(&mut Ecs)>;

/// A per-entity update, run for every entity its query matches.
pub type ScriptUpdate = Box<dyn FnMut(&mut World, Entity)>;

struct Script {
    query: Query,
    update: ScriptUpdate,
}

/// The execution context: world, time, systems, scripts and draw layers.
///
/// Renderers receive `&Ecs`, so they can read the world but not restructure
/// it mid-draw.
pub struct Ecs {
    pub world: World,
    pub time: Time,
    layers: Layers<Ecs>,
    systems: Vec<UpdateSystem>,
    scripts: Vec<Script>,
}

impl Ecs {
    pub fn new(world: World) -> Self {
        Self {
            world,
            time: Time::new(),
            layers: Layers::new(),
            systems: Vec::new(),
            scripts: Vec::new(),
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Add an update system. Systems run in the order added.
    pub fn add_system(&mut self, system: impl FnMut(&mut Ecs) + 'static) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Add a per-entity update script over `query`. Scripts run after all
    /// systems, in the order added.
    pub fn add_script(
        &mut self,
        query: Query,
        update: impl FnMut(&mut World, Entity) + 'static,
    ) -> &mut Self {
        self.scripts.push(Script {
            query,
            update: Box::new(update),
        });
        self
    }

    /// Register a renderer drawing payloads of type `A` on `layer`.
    pub fn add_renderer<A, F>(&mut self, layer: LayerId, renderer: F) -> &mut Self
    where
        A: 'static,
        F: Fn(&Ecs, &mut A) + 'static,
    {
        self.layers.get_or_create(layer).add_renderer(renderer);
        self
    }

    /// Register a per-entity renderer on `layer`. It is called for every
    /// entity that matches `query` and was created on that layer.
    pub fn add_draw_script<A, F>(&mut self, layer: LayerId, query: Query, draw: F) -> &mut Self
    where
        A: 'static,
        F: Fn(&World, Entity, &mut A) + 'static,
    {
        let layer = self.layers.get_or_create(layer);
        let query = query.with_tag(layer.tag());
        layer.add_renderer(move |ecs: &Ecs, arg: &mut A| {
            for entity in query.iter(&ecs.world) {
                draw(&ecs.world, entity, &mut *arg);
            }
        });
        self
    }

    // =========================================================================
    // Entities & layers
    // =========================================================================

    /// Spawn an entity on `layer`.
    pub fn create(&mut self, layer: LayerId) -> Entity {
        let tag = self.layer_tag(layer);
        let entity = self.world.spawn();
        self.world.add_tag(entity, &tag);
        entity
    }

    /// Tag marking entities of `layer`, creating the layer if needed.
    pub fn layer_tag(&mut self, layer: LayerId) -> Tag {
        self.layers.get_or_create(layer).tag().clone()
    }

    /// The draw layers created so far.
    pub fn layers(&self) -> &Layers<Ecs> {
        &self.layers
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advance time, run systems then scripts, then apply queued despawns.
    /// Entities despawned earlier in the update are not visited again.
    pub fn update(&mut self, delta: f32) {
        self.time.advance(delta);

        let mut systems = std::mem::take(&mut self.systems);
        for system in systems.iter_mut() {
            system(self);
        }
        // Systems added while updating start running next frame
        systems.append(&mut self.systems);
        self.systems = systems;

        let mut matched = Vec::new();
        for script in &mut self.scripts {
            matched.clear();
            matched.extend(script.query.iter(&self.world));
            for &entity in &matched {
                if self.world.is_alive(entity) && !self.world.is_despawn_queued(entity) {
                    (script.update)(&mut self.world, entity);
                }
            }
        }

        let despawned = self.world.flush_despawns();
        if despawned > 0 {
            log::trace!("frame {}: despawned {}", self.time.frame, despawned);
        }
    }

    /// Draw `layer` with `arg`, passing `self` as the renderer context.
    pub fn draw<A: 'static>(&self, layer: LayerId, arg: &mut A) {
        self.layers.draw(layer, self, arg);
    }
}

impl Default for Ecs {
    fn default() -> Self {
        Self::new(World::new())
    }
}
