//! Bunnymark Components
//!
//! Plain data; behavior lives in the scripts and systems. Positions are
//! normalized to the screen (0..1 on both axes) so resizing the window keeps
//! the bunnies inside.

use std::f32::consts::TAU;

use macroquad::color::Color;

use super::plot::Plot;

/// Normalized screen position (top-left of the sprite)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Per-update displacement, in normalized units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gravity {
    pub value: f32,
}

/// Hue rotation in radians, used when colorful mode is on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hue {
    pub value: f32,
}

impl Hue {
    /// Tint color for this hue.
    pub fn tint(&self) -> Color {
        let h = self.value.rem_euclid(TAU) / TAU;
        macroquad::color::hsl_to_rgb(h, 1.0, 0.75)
    }
}

/// Sprite size in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
}

/// Screen size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Sprite size relative to the screen, clamped to at most 1.
    pub fn relative(&self, sprite: &Sprite) -> (f32, f32) {
        let rel = |size: f32, total: f32| if total > 0.0 { (size / total).min(1.0) } else { 1.0 };
        (rel(sprite.width, self.width), rel(sprite.height, self.height))
    }
}

/// Singleton holding user-tweakable state and the metrics history.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bunnies spawned per update while the mouse is held
    pub amount: u32,
    pub colorful: bool,

    /// Seconds between metrics samples
    pub tick_interval: f32,
    /// Seconds since the last sample
    pub since_tick: f32,
    /// Updates since the last sample
    pub ticks: u32,

    pub tps: Plot,
    pub fps: Plot,
    pub objects: Plot,
    /// Resident memory in MiB at the last sample, if the platform reports it
    pub memory_mib: Option<f32>,
}

impl Settings {
    /// Store one metrics sample and restart the sampling window.
    pub fn record(&mut self, tps: f32, fps: f32, objects: usize, memory_mib: Option<f32>) {
        self.tps.push(tps);
        self.fps.push(fps);
        self.objects.push(objects as f32);
        self.memory_mib = memory_mib;
        self.since_tick = 0.0;
        self.ticks = 0;
    }

    /// Apply a mouse wheel step: 10 bunnies per notch, never below zero.
    pub fn adjust_amount(&mut self, wheel: f32) {
        if wheel != 0.0 && wheel.is_finite() {
            self.amount = self.amount.saturating_add_signed(wheel.signum() as i32 * 10);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(amount: u32) -> Settings {
        Settings {
            amount,
            colorful: false,
            tick_interval: 0.5,
            since_tick: 0.0,
            ticks: 0,
            tps: Plot::new(4, 60.0),
            fps: Plot::new(4, 60.0),
            objects: Plot::new(4, 1000.0),
            memory_mib: None,
        }
    }

    #[test]
    fn test_adjust_amount() {
        let mut s = settings(15);
        s.adjust_amount(1.0);
        assert_eq!(s.amount, 25);
        s.adjust_amount(-3.0);
        assert_eq!(s.amount, 15);
        s.adjust_amount(-1.0);
        s.adjust_amount(-1.0);
        assert_eq!(s.amount, 0);
        s.adjust_amount(0.0);
        assert_eq!(s.amount, 0);
    }

    #[test]
    fn test_record_resets_window() {
        let mut s = settings(0);
        s.ticks = 30;
        s.since_tick = 0.6;
        s.record(50.0, 59.0, 1200, Some(12.5));

        assert_eq!(s.ticks, 0);
        assert_eq!(s.since_tick, 0.0);
        assert_eq!(s.tps.latest(), Some(50.0));
        assert_eq!(s.objects.latest(), Some(1000.0));
        assert_eq!(s.memory_mib, Some(12.5));
    }

    #[test]
    fn test_relative_size() {
        let bounds = Bounds::new(200.0, 100.0);
        let (w, h) = bounds.relative(&Sprite { width: 20.0, height: 50.0 });
        assert!((w - 0.1).abs() < 1e-6);
        assert!((h - 0.5).abs() < 1e-6);

        // Degenerate screen: sprite covers it
        assert_eq!(Bounds::new(0.0, 0.0).relative(&Sprite { width: 1.0, height: 1.0 }), (1.0, 1.0));
    }

    #[test]
    fn test_hue_tint_wraps() {
        let a = Hue { value: 1.0 }.tint();
        let b = Hue { value: 1.0 + TAU }.tint();
        assert!((a.r - b.r).abs() < 1e-4);
        assert!((a.g - b.g).abs() < 1e-4);
        assert!((a.b - b.b).abs() < 1e-4);
    }
}
