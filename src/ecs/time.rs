//! Frame time bookkeeping for the update loop.

/// Time as seen by systems during `Ecs::update`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    /// Seconds since the previous update
    pub delta: f32,
    /// Seconds accumulated over all updates
    pub elapsed: f64,
    /// Number of completed updates
    pub frame: u64,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.delta = delta;
        self.elapsed += delta as f64;
        self.frame += 1;
    }
}
