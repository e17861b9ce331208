//! Layered draw dispatch for a small ECS
//!
//! [`ecs`] holds the entity-component-system and the layer registry: each
//! numbered layer keeps renderers grouped by the payload type they draw, and
//! drawing a layer with a payload runs exactly the renderers registered for
//! that type, in registration order. [`bunnymark`] is a sprite benchmark
//! built on it.

pub mod bunnymark;
pub mod ecs;
