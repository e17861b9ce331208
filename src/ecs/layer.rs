//! Draw Layers
//!
//! A layer is a numbered bucket of renderers drawn together. Each renderer
//! declares the payload type it draws (`&mut A`), and the layer buckets
//! renderers by `TypeId::of::<A>()`. Drawing a layer with some payload only
//! runs the renderers registered for exactly that payload type, in the order
//! they were added.
//!
//! The registry is generic over the context type `C` handed to every
//! renderer. `Ecs` uses `Layers<Ecs>`, tests use whatever is convenient.
//!
//! ```
//! use bunnymark_ecs::ecs::{LayerId, Layers};
//!
//! struct Ctx;
//! struct Sprite;
//! struct Metrics;
//!
//! let mut layers: Layers<Ctx> = Layers::new();
//! let layer = layers.get_or_create(LayerId(3));
//! layer.add_renderer(|_: &Ctx, log: &mut Vec<&'static str>| log.push("r1"));
//! layer.add_renderer(|_: &Ctx, log: &mut Vec<&'static str>| log.push("r2"));
//! layer.add_renderer(|_: &Ctx, _: &mut Metrics| panic!("wrong payload"));
//!
//! let mut log: Vec<&'static str> = Vec::new();
//! layers.draw(LayerId(3), &Ctx, &mut log);
//! assert_eq!(log, ["r1", "r2"]);
//!
//! // Nobody draws sprites on this layer: nothing happens.
//! layers.draw(LayerId(3), &Ctx, &mut Sprite);
//! ```
//!
//! Renderer shape is checked by the compiler. A renderer whose first
//! parameter isn't the context type is rejected at registration:
//!
//! ```compile_fail
//! use bunnymark_ecs::ecs::{LayerId, Layers};
//!
//! struct Ctx;
//! struct Sprite;
//!
//! let mut layers: Layers<Ctx> = Layers::new();
//! layers
//!     .get_or_create(LayerId(0))
//!     .add_renderer(|_: &String, _: &mut Sprite| {});
//! ```
//!
//! as is one that takes the wrong number of parameters:
//!
//! ```compile_fail
//! use bunnymark_ecs::ecs::{LayerId, Layers};
//!
//! struct Ctx;
//!
//! let mut layers: Layers<Ctx> = Layers::new();
//! layers
//!     .get_or_create(LayerId(0))
//!     .add_renderer(|_: &Ctx| {});
//! ```
//!
//! and one that returns a value:
//!
//! ```compile_fail
//! use bunnymark_ecs::ecs::{LayerId, Layers};
//!
//! struct Ctx;
//! struct Sprite;
//!
//! let mut layers: Layers<Ctx> = Layers::new();
//! layers
//!     .get_or_create(LayerId(0))
//!     .add_renderer(|_: &Ctx, _: &mut Sprite| 42);
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use super::tag::Tag;

/// Identifies a draw layer. Small integers, chosen by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LayerId(pub u32);

impl LayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer{}", self.0)
    }
}

/// A renderer drawing payloads of type `A` with context `C`.
pub type Renderer<C, A> = Box<dyn Fn(&C, &mut A)>;

/// One draw layer: its id, the tag marking its entities, and its renderers.
pub struct Layer<C> {
    id: LayerId,
    tag: Tag,
    /// `TypeId::of::<A>()` → `Vec<Renderer<C, A>>`
    renderers: HashMap<TypeId, Box<dyn Any>>,
    context: PhantomData<fn(&C)>,
}

impl<C: 'static> Layer<C> {
    fn new(id: LayerId) -> Self {
        Self {
            id,
            tag: Tag::new(id.to_string()),
            renderers: HashMap::new(),
            context: PhantomData,
        }
    }

    /// This layer's id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Tag the host ECS uses to mark entities living on this layer.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Register a renderer for payloads of type `A`.
    ///
    /// Renderers for the same `A` run in registration order. Nothing is
    /// deduplicated: adding the same renderer twice makes it run twice.
    pub fn add_renderer<A, F>(&mut self, renderer: F)
    where
        A: 'static,
        F: Fn(&C, &mut A) + 'static,
    {
        let list = self
            .renderers
            .entry(TypeId::of::<A>())
            .or_insert_with(|| Box::new(Vec::<Renderer<C, A>>::new()));
        let Some(list) = list.downcast_mut::<Vec<Renderer<C, A>>>() else {
            unreachable!("{} renderer list keyed by the wrong type", type_name::<A>());
        };
        list.push(Box::new(renderer));
        log::debug!("{}: renderer #{} for {}", self.id, list.len(), type_name::<A>());
    }

    /// Run every renderer registered for `A`, in order. No renderers for
    /// `A` is not an error; the call just does nothing.
    pub fn draw<A: 'static>(&self, ctx: &C, arg: &mut A) {
        for renderer in self.renderers_for::<A>() {
            renderer(ctx, &mut *arg);
        }
    }

    /// Number of renderers registered for payload type `A`.
    pub fn renderer_count<A: 'static>(&self) -> usize {
        self.renderers_for::<A>().len()
    }

    fn renderers_for<A: 'static>(&self) -> &[Renderer<C, A>] {
        let Some(list) = self.renderers.get(&TypeId::of::<A>()) else {
            return &[];
        };
        match list.downcast_ref::<Vec<Renderer<C, A>>>() {
            Some(list) => list,
            None => panic!("{}: renderer list for {} has mismatched type", self.id, type_name::<A>()),
        }
    }
}

/// The layer table: `LayerId` → `Layer`, created lazily and never shrunk.
pub struct Layers<C> {
    slots: Vec<Option<Layer<C>>>,
}

impl<C: 'static> Layers<C> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// The layer for `id`, creating it (and growing the table) if needed.
    pub fn get_or_create(&mut self, id: LayerId) -> &mut Layer<C> {
        let idx = id.index();
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx].get_or_insert_with(|| {
            log::debug!("creating {}", id);
            Layer::new(id)
        })
    }

    /// The layer for `id`, if it was ever created.
    pub fn get(&self, id: LayerId) -> Option<&Layer<C>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Draw layer `id` with `arg`. A layer that was never created has no
    /// renderers, so this is a no-op for it.
    pub fn draw<A: 'static>(&self, id: LayerId, ctx: &C, arg: &mut A) {
        if let Some(layer) = self.get(id) {
            layer.draw(ctx, arg);
        }
    }

    /// Number of layers created so far.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Created layers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer<C>> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

impl<C: 'static> Default for Layers<C> {
    fn default() -> Self {
        Self::new()
    }
}
