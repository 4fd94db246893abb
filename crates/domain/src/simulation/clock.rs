use serde::{Deserialize, Serialize};

/// Frame counter and delta sanitizer for the simulation loop.
///
/// Host timers can stall (debugger, suspended tab, overloaded runtime), so a
/// raw delta is never trusted: negative or non-finite values become zero and
/// large gaps are capped so the NPC cannot teleport through a long pause.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameClock {
    frame: u64,
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame and return the delta the simulation should integrate.
    pub fn advance(&mut self, raw_dt: f32, max_dt: f32) -> f32 {
        let dt = if raw_dt.is_finite() && raw_dt > 0.0 {
            raw_dt.min(max_dt)
        } else {
            0.0
        };
        self.frame += 1;
        self.elapsed += f64::from(dt);
        dt
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
