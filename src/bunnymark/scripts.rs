//! Bunny Scripts
//!
//! Per-entity behavior: bounce off the screen edges, integrate velocity,
//! apply gravity, and draw the sprite. Update scripts copy their components
//! out, step them, and write them back, so the math lives in plain functions.

use std::cell::Cell;
use std::rc::Rc;

use macroquad::prelude::*;

use crate::ecs::{ComponentId, Entity, Filter, Query, World};

use super::components::{Bounds, Gravity, Hue, Position, Sprite, Velocity};
use super::Screen;

/// Vertical velocity kept after hitting the floor
const FLOOR_DAMPING: f32 = 0.85;
/// Upper bound of the random upward kick on a floor bounce
const FLOOR_KICK: f32 = 0.01;

// =============================================================================
// Queries
// =============================================================================

pub fn bounce_query() -> Query {
    Query::new(Filter::contains([
        ComponentId::of::<Position>(),
        ComponentId::of::<Velocity>(),
        ComponentId::of::<Sprite>(),
    ]))
}

pub fn velocity_query() -> Query {
    Query::new(Filter::contains([
        ComponentId::of::<Position>(),
        ComponentId::of::<Velocity>(),
    ]))
}

pub fn gravity_query() -> Query {
    Query::new(Filter::contains([
        ComponentId::of::<Velocity>(),
        ComponentId::of::<Gravity>(),
    ]))
}

pub fn render_query() -> Query {
    Query::new(Filter::contains([
        ComponentId::of::<Position>(),
        ComponentId::of::<Hue>(),
        ComponentId::of::<Sprite>(),
    ]))
}

// =============================================================================
// Steps
// =============================================================================

/// Keep a sprite inside the screen. `kick` is the extra upward speed given
/// on a floor bounce (callers pass a random value, tests a fixed one).
pub fn bounce_step(pos: &mut Position, vel: &mut Velocity, sprite: &Sprite, bounds: Bounds, kick: f32) {
    let (rel_w, rel_h) = bounds.relative(sprite);

    if pos.x + rel_w > 1.0 {
        vel.x = -vel.x;
        pos.x = 1.0 - rel_w;
    }
    if pos.x < 0.0 {
        vel.x = -vel.x;
        pos.x = 0.0;
    }
    if pos.y + rel_h > 1.0 {
        vel.y *= -FLOOR_DAMPING;
        pos.y = 1.0 - rel_h;
        vel.y -= kick;
    }
    if pos.y < 0.0 {
        vel.y = 0.0;
        pos.y = 0.0;
    }
}

pub fn velocity_step(pos: &mut Position, vel: &Velocity) {
    pos.x += vel.x;
    pos.y += vel.y;
}

pub fn gravity_step(vel: &mut Velocity, gravity: &Gravity) {
    vel.y += gravity.value;
}

// =============================================================================
// Scripts
// =============================================================================

/// Bounce script. Reads the current screen size from `bounds` each call.
pub fn bounce(bounds: Rc<Cell<Bounds>>) -> impl FnMut(&mut World, Entity) {
    move |world, entity| {
        let (Some(mut pos), Some(mut vel), Some(sprite)) = (
            world.get::<Position>(entity).copied(),
            world.get::<Velocity>(entity).copied(),
            world.get::<Sprite>(entity).copied(),
        ) else {
            return;
        };
        // Half the floor bounces get a kick, like the classic benchmark
        let kick = if macroquad::rand::gen_range(0, 2) == 0 {
            macroquad::rand::gen_range(0.0, FLOOR_KICK)
        } else {
            0.0
        };
        bounce_step(&mut pos, &mut vel, &sprite, bounds.get(), kick);
        world.insert(entity, pos);
        world.insert(entity, vel);
    }
}

pub fn velocity(world: &mut World, entity: Entity) {
    let Some(vel) = world.get::<Velocity>(entity).copied() else {
        return;
    };
    if let Some(pos) = world.get_mut::<Position>(entity) {
        velocity_step(pos, &vel);
    }
}

pub fn gravity(world: &mut World, entity: Entity) {
    let Some(gravity) = world.get::<Gravity>(entity).copied() else {
        return;
    };
    if let Some(vel) = world.get_mut::<Velocity>(entity) {
        gravity_step(vel, &gravity);
    }
}

/// Draw script for the bunnies layer.
pub fn render(texture: Texture2D) -> impl Fn(&World, Entity, &mut Screen) {
    move |world, entity, screen| {
        let Some(pos) = world.get::<Position>(entity) else {
            return;
        };
        let tint = match world.get::<Hue>(entity) {
            Some(hue) if screen.colorful => hue.tint(),
            _ => WHITE,
        };
        draw_texture(&texture, pos.x * screen.width, pos.y * screen.height, tint);
        screen.sprites_drawn += 1;
    }
}
