//! Fixed-timestep loop in the "Fix Your Timestep" style.
//!
//! Wall-clock frame times feed an accumulator that is drained in fixed
//! [`FIXED_DT`] steps, so the simulation advances at the same rate however
//! long each frame takes.

use std::time::Instant;

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time accepted before clamping (4 FPS).
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-timestep loop state.
pub struct GameLoop {
    previous_time: Option<Instant>,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    /// Creates a loop with no time accumulated.
    pub fn new() -> Self {
        Self {
            previous_time: None,
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Runs one frame measured against the wall clock. The first call only
    /// starts the clock.
    ///
    /// Returns the number of simulation steps run.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64)) -> u32 {
        let now = Instant::now();
        let frame_time = self
            .previous_time
            .map_or(0.0, |prev| now.duration_since(prev).as_secs_f64());
        self.previous_time = Some(now);
        self.advance(frame_time, update_fn)
    }

    /// Runs one frame of `frame_time` seconds.
    ///
    /// `update_fn(fixed_dt, total_sim_time)` is called zero or more times,
    /// with `total_sim_time` measured before the step. Returns the number of
    /// steps run.
    pub fn advance(&mut self, frame_time: f64, mut update_fn: impl FnMut(f64, f64)) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
            steps += 1;
        }

        self.frame_count += 1;
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    /// Seconds until the next step is due.
    pub fn time_to_next_step(&self) -> f64 {
        (FIXED_DT - self.accumulator).max(0.0)
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Simulation steps run so far.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds elapsed.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
