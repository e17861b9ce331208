//! Bunnymark
//!
//! Sprite throughput benchmark built on the layered ECS. Hold the left mouse
//! button to spawn bunnies, scroll to change how many spawn per update, right
//! click to toggle per-bunny tints.
//!
//! Layers, bottom to top:
//! - [`LAYER_BACKGROUND`]: clears to the background color
//! - [`LAYER_BUNNIES`]: one draw script per bunny
//! - [`LAYER_METRICS`]: TPS/FPS/object plots and settings text

pub mod assets;
pub mod cli;
pub mod components;
pub mod config;
pub mod plot;
pub mod scripts;
pub mod systems;

use std::cell::Cell;
use std::rc::Rc;

use macroquad::prelude::*;

use crate::ecs::{Ecs, LayerId, World};

use components::{Bounds, Settings, Sprite};
use config::BenchConfig;
use plot::Plot;

pub const LAYER_BACKGROUND: LayerId = LayerId(0);
pub const LAYER_BUNNIES: LayerId = LayerId(1);
pub const LAYER_METRICS: LayerId = LayerId(2);

/// Draw payload shared by every layer of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
    pub colorful: bool,
    /// Incremented by the bunny draw script
    pub sprites_drawn: u32,
}

/// Build the initial world: just the settings singleton.
pub fn create_world(config: &BenchConfig) -> World {
    let mut world = World::new();
    let settings = world.spawn();
    world.insert(
        settings,
        Settings {
            amount: config.amount,
            colorful: config.colorful,
            tick_interval: config.metrics_interval,
            since_tick: 0.0,
            ticks: 0,
            tps: Plot::new(config.plot_samples, config.max_tps),
            fps: Plot::new(config.plot_samples, config.max_fps),
            objects: Plot::new(config.plot_samples, config.max_objects),
            memory_mib: None,
        },
    );
    world
}

/// Seed macroquad's RNG from the wall clock so every run spawns a different
/// flock. Returns the seed.
pub fn seed_rng() -> u64 {
    let seed = (macroquad::miniquad::date::now() * 1000.0) as u64;
    macroquad::rand::srand(seed);
    log::debug!("rng seed {}", seed);
    seed
}

/// The running benchmark.
pub struct Game {
    pub ecs: Ecs,
    bounds: Rc<Cell<Bounds>>,
}

impl Game {
    pub fn new(config: &BenchConfig, texture: Texture2D) -> Self {
        let sprite = Sprite {
            width: texture.width(),
            height: texture.height(),
        };
        let bounds = Rc::new(Cell::new(Bounds::new(
            config.window_width as f32,
            config.window_height as f32,
        )));

        let mut ecs = Ecs::new(create_world(config));
        ecs.add_system(systems::spawn_system(sprite, config.gravity))
            .add_system(systems::metrics_system())
            .add_script(scripts::bounce_query(), scripts::bounce(bounds.clone()))
            .add_script(scripts::velocity_query(), scripts::velocity)
            .add_script(scripts::gravity_query(), scripts::gravity)
            .add_renderer(LAYER_BACKGROUND, systems::draw_background)
            .add_draw_script(LAYER_BUNNIES, scripts::render_query(), scripts::render(texture))
            .add_renderer(LAYER_METRICS, systems::draw_metrics);

        log::info!(
            "bunnymark ready: {} per spawn, sprite {}x{}",
            config.amount,
            sprite.width,
            sprite.height
        );
        Self { ecs, bounds }
    }

    pub fn update(&mut self) {
        self.bounds.set(Bounds::new(screen_width(), screen_height()));
        self.ecs.update(get_frame_time());
    }

    pub fn draw(&self) {
        let colorful = self
            .ecs
            .world
            .singleton::<Settings>()
            .and_then(|e| self.ecs.world.get::<Settings>(e))
            .is_some_and(|s| s.colorful);
        let mut screen = Screen {
            width: screen_width(),
            height: screen_height(),
            colorful,
            sprites_drawn: 0,
        };

        clear_background(BLACK);
        for layer in [LAYER_BACKGROUND, LAYER_BUNNIES, LAYER_METRICS] {
            self.ecs.draw(layer, &mut screen);
        }
    }
}
