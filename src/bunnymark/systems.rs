//! Bunnymark Systems
//!
//! Whole-world behavior: spawning on input, sampling metrics, and the
//! background/metrics renderers. Input is read through [`SpawnInput`] so the
//! spawn logic itself runs without a window.

use std::f32::consts::TAU;

use macroquad::prelude::*;

use crate::ecs::Ecs;

use super::components::{Gravity, Hue, Position, Settings, Sprite, Velocity};
use super::{Screen, LAYER_BUNNIES};

const BACKGROUND: Color = Color::new(0.11, 0.12, 0.15, 1.0);
const PLOT_WIDTH: f32 = 160.0;
const PLOT_HEIGHT: f32 = 36.0;
const TEXT_SIZE: f32 = 20.0;

/// Initial speed range of a new bunny (normalized units per update)
const SPAWN_SPEED_X: f32 = 0.005;
const SPAWN_SPEED_Y: f32 = 0.005;

// =============================================================================
// Spawn
// =============================================================================

/// Input relevant to spawning, sampled once per update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnInput {
    /// Left mouse held or screen touched
    pub spawn: bool,
    /// Vertical wheel movement this frame
    pub wheel: f32,
    /// Right mouse pressed this frame
    pub toggle_colorful: bool,
}

impl SpawnInput {
    pub fn poll() -> Self {
        Self {
            spawn: is_mouse_button_down(MouseButton::Left) || !touches().is_empty(),
            wheel: mouse_wheel().1,
            toggle_colorful: is_mouse_button_pressed(MouseButton::Right),
        }
    }
}

pub fn spawn_system(sprite: Sprite, gravity: f32) -> impl FnMut(&mut Ecs) {
    move |ecs| {
        apply_spawn(ecs, &SpawnInput::poll(), sprite, gravity);
    }
}

/// Apply one frame of input: adjust amount, toggle colors, maybe spawn.
/// Returns the number of bunnies spawned.
pub fn apply_spawn(ecs: &mut Ecs, input: &SpawnInput, sprite: Sprite, gravity: f32) -> u32 {
    let Some(settings) = ecs.world.singleton::<Settings>() else {
        return 0;
    };
    let Some(settings) = ecs.world.get_mut::<Settings>(settings) else {
        return 0;
    };

    settings.adjust_amount(input.wheel);
    if input.toggle_colorful {
        settings.colorful = !settings.colorful;
        log::info!("colorful: {}", settings.colorful);
    }

    if !input.spawn {
        return 0;
    }
    let amount = settings.amount;
    spawn_bunnies(ecs, amount, sprite, gravity);
    amount
}

/// Spawn `amount` bunnies at the top-left corner with random velocity.
pub fn spawn_bunnies(ecs: &mut Ecs, amount: u32, sprite: Sprite, gravity: f32) {
    for _ in 0..amount {
        let bunny = ecs.create(LAYER_BUNNIES);
        ecs.world.insert(bunny, Position::default());
        ecs.world.insert(
            bunny,
            Velocity {
                x: macroquad::rand::gen_range(0.0, SPAWN_SPEED_X),
                y: macroquad::rand::gen_range(-SPAWN_SPEED_Y, SPAWN_SPEED_Y) * 0.5,
            },
        );
        ecs.world.insert(bunny, Gravity { value: gravity });
        ecs.world.insert(bunny, Hue { value: macroquad::rand::gen_range(0.0, TAU) });
        ecs.world.insert(bunny, sprite);
    }
    log::debug!("spawned {} bunnies, {} entities alive", amount, ecs.world.entity_count());
}

// =============================================================================
// Metrics
// =============================================================================

pub fn metrics_system() -> impl FnMut(&mut Ecs) {
    |ecs| {
        update_metrics(ecs, get_fps() as f32);
    }
}

/// Count this update and, once the sampling interval has passed, push a
/// sample into the plots. Returns true when a sample was taken.
pub fn update_metrics(ecs: &mut Ecs, fps: f32) -> bool {
    let Some(entity) = ecs.world.singleton::<Settings>() else {
        return false;
    };
    let delta = ecs.time.delta;
    let Some(settings) = ecs.world.get_mut::<Settings>(entity) else {
        return false;
    };
    settings.ticks += 1;
    settings.since_tick += delta;
    if settings.since_tick < settings.tick_interval {
        return false;
    }

    let objects = ecs.world.storage::<Sprite>().map_or(0, |s| s.count());
    let memory = resident_memory_mib();
    let Some(settings) = ecs.world.get_mut::<Settings>(entity) else {
        return false;
    };
    let tps = settings.ticks as f32 / settings.since_tick;
    settings.record(tps, fps, objects, memory);
    log::trace!("tps {:.1} fps {:.1} objects {}", tps, fps, objects);
    true
}

fn resident_memory_mib() -> Option<f32> {
    memory_stats::memory_stats().map(|stats| stats.physical_mem as f32 / (1024.0 * 1024.0))
}

// =============================================================================
// Renderers
// =============================================================================

pub fn draw_background(_: &Ecs, screen: &mut Screen) {
    draw_rectangle(0.0, 0.0, screen.width, screen.height, BACKGROUND);
}

pub fn draw_metrics(ecs: &Ecs, screen: &mut Screen) {
    let Some(settings) = ecs
        .world
        .singleton::<Settings>()
        .and_then(|entity| ecs.world.get::<Settings>(entity))
    else {
        return;
    };

    let x = 10.0;
    let mut y = TEXT_SIZE;
    for (label, plot, color) in [
        ("TPS", &settings.tps, GREEN),
        ("FPS", &settings.fps, SKYBLUE),
        ("Objects", &settings.objects, ORANGE),
    ] {
        let text = format!("{}: {:.0}", label, plot.latest().unwrap_or(0.0));
        draw_text(&text, x, y, TEXT_SIZE, WHITE);
        plot.draw(x, y + 4.0, PLOT_WIDTH, PLOT_HEIGHT, color);
        y += PLOT_HEIGHT + TEXT_SIZE + 8.0;
    }

    let mut lines = vec![
        format!("Amount: {} (wheel)", settings.amount),
        format!("Colorful: {} (right click)", settings.colorful),
        format!("Drawn: {}", screen.sprites_drawn),
    ];
    if let Some(mib) = settings.memory_mib {
        lines.push(format!("Memory: {:.1} MiB", mib));
    }
    for line in lines {
        draw_text(&line, x, y, TEXT_SIZE, WHITE);
        y += TEXT_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bunnymark::config::BenchConfig;
    use crate::bunnymark::create_world;

    const SPRITE: Sprite = Sprite { width: 26.0, height: 37.0 };

    fn ecs_with(config: &BenchConfig) -> Ecs {
        Ecs::new(create_world(config))
    }

    fn settings(ecs: &Ecs) -> &Settings {
        let entity = ecs.world.singleton::<Settings>().unwrap();
        ecs.world.get::<Settings>(entity).unwrap()
    }

    #[test]
    fn test_spawn_on_click() {
        let config = BenchConfig { amount: 25, ..Default::default() };
        let mut ecs = ecs_with(&config);
        let input = SpawnInput { spawn: true, ..Default::default() };

        assert_eq!(apply_spawn(&mut ecs, &input, SPRITE, 0.001), 25);
        assert_eq!(ecs.world.storage::<Sprite>().map(|s| s.count()), Some(25));

        let bunnies_tag = ecs.layer_tag(LAYER_BUNNIES);
        let tagged = ecs.world.entities().filter(|&e| ecs.world.has_tag(e, &bunnies_tag)).count();
        assert_eq!(tagged, 25);
    }

    #[test]
    fn test_no_spawn_without_input() {
        let mut ecs = ecs_with(&BenchConfig::default());
        assert_eq!(apply_spawn(&mut ecs, &SpawnInput::default(), SPRITE, 0.001), 0);
        assert!(ecs.world.storage::<Sprite>().is_none());
    }

    #[test]
    fn test_wheel_and_toggle() {
        let config = BenchConfig { amount: 5, ..Default::default() };
        let mut ecs = ecs_with(&config);

        let input = SpawnInput { wheel: 1.0, toggle_colorful: true, ..Default::default() };
        apply_spawn(&mut ecs, &input, SPRITE, 0.0);
        assert_eq!(settings(&ecs).amount, 15);
        assert!(settings(&ecs).colorful);

        let input = SpawnInput { wheel: -1.0, toggle_colorful: true, ..Default::default() };
        apply_spawn(&mut ecs, &input, SPRITE, 0.0);
        apply_spawn(&mut ecs, &SpawnInput { wheel: -1.0, ..Default::default() }, SPRITE, 0.0);
        assert_eq!(settings(&ecs).amount, 0);
        assert!(!settings(&ecs).colorful);
    }

    #[test]
    fn test_spawned_bunny_shape() {
        let mut ecs = ecs_with(&BenchConfig::default());
        spawn_bunnies(&mut ecs, 50, SPRITE, 0.002);

        for (_, vel) in ecs.world.storage::<Velocity>().unwrap().iter() {
            assert!((0.0..=SPAWN_SPEED_X).contains(&vel.x));
            assert!(vel.y.abs() <= SPAWN_SPEED_Y * 0.5);
        }
        for (_, hue) in ecs.world.storage::<Hue>().unwrap().iter() {
            assert!((0.0..=TAU).contains(&hue.value));
        }
        let gravity = ecs.world.storage::<Gravity>().unwrap();
        assert!(gravity.iter().all(|(_, g)| g.value == 0.002));
    }

    #[test]
    fn test_metrics_sample_after_interval() {
        let config = BenchConfig { metrics_interval: 0.45, ..Default::default() };
        let mut ecs = ecs_with(&config);
        spawn_bunnies(&mut ecs, 3, SPRITE, 0.0);

        for _ in 0..4 {
            ecs.time.advance(0.1);
            assert!(!update_metrics(&mut ecs, 60.0));
        }
        ecs.time.advance(0.1);
        assert!(update_metrics(&mut ecs, 58.0));

        let s = settings(&ecs);
        assert_eq!(s.objects.latest(), Some(3.0));
        assert_eq!(s.fps.latest(), Some(58.0));
        let tps = s.tps.latest().unwrap();
        assert!((tps - 10.0).abs() < 0.01, "tps was {}", tps);
        assert_eq!(s.ticks, 0);
    }
}
