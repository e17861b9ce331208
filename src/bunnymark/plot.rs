//! Metrics Plot
//!
//! A fixed-size history of samples drawn as a small bar chart. Values are
//! clamped to the plot's max so a spike can't blow up the layout.

use std::collections::VecDeque;

use macroquad::prelude::*;

#[derive(Debug, Clone)]
pub struct Plot {
    samples: VecDeque<f32>,
    capacity: usize,
    max: f32,
}

impl Plot {
    /// `capacity` samples are kept; at least one.
    pub fn new(capacity: usize, max: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            max,
        }
    }

    /// Append a sample, dropping the oldest when full.
    pub fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        let value = if value.is_finite() { value.clamp(0.0, self.max) } else { 0.0 };
        self.samples.push_back(value);
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Oldest first.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value drawn as a full-height bar.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Draw as bars inside the given rectangle, newest on the right.
    pub fn draw(&self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        draw_rectangle(x, y, w, h, Color::new(0.0, 0.0, 0.0, 0.5));
        if self.max <= 0.0 {
            return;
        }
        let bar_w = w / self.capacity as f32;
        let offset = self.capacity - self.samples.len();
        for (i, value) in self.samples().enumerate() {
            let bar_h = h * value / self.max;
            let bx = x + (offset + i) as f32 * bar_w;
            draw_rectangle(bx, y + h - bar_h, (bar_w - 1.0).max(1.0), bar_h, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_drops_oldest() {
        let mut plot = Plot::new(3, 100.0);
        for v in [1.0, 2.0, 3.0, 4.0] {
            plot.push(v);
        }
        assert_eq!(plot.samples().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(plot.latest(), Some(4.0));
        assert_eq!(plot.len(), 3);
    }

    #[test]
    fn test_values_clamped() {
        let mut plot = Plot::new(4, 60.0);
        plot.push(75.0);
        plot.push(-2.0);
        plot.push(f32::INFINITY);
        assert_eq!(plot.samples().collect::<Vec<_>>(), vec![60.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut plot = Plot::new(0, 10.0);
        plot.push(1.0);
        plot.push(2.0);
        assert_eq!(plot.samples().collect::<Vec<_>>(), vec![2.0]);
    }
}
