//! Scripted observer that walks a straight line at constant speed.

use glam::{DVec2, DVec3};
use loam_stream::ObserverProvider;

/// Observer moving from `start` along a fixed heading.
#[derive(Debug, Clone)]
pub struct ScriptedObserver {
    start: DVec2,
    velocity: DVec2,
    time: f64,
}

impl ScriptedObserver {
    /// Starts at `start`, moving at `speed` grid units per second along
    /// `heading_deg` (counter-clockwise from +X).
    pub fn new(start: DVec2, heading_deg: f64, speed: f64) -> Self {
        let heading = heading_deg.to_radians();
        Self {
            start,
            velocity: DVec2::new(heading.cos(), heading.sin()) * speed,
            time: 0.0,
        }
    }

    /// Move forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.time += dt;
    }

    /// Current position on the ground plane.
    pub fn position(&self) -> DVec2 {
        self.start + self.velocity * self.time
    }
}

impl ObserverProvider for ScriptedObserver {
    fn observer_position(&self) -> Option<DVec3> {
        Some(self.position().extend(0.0))
    }
}
