//! Headless streaming run: config in, totals out.

use std::time::{Duration, Instant};

use glam::DVec2;
use loam_config::{Config, NoiseKindConfig};
use loam_stream::{
    ChunkCoord, MaterialRef, MemorySink, StepOutcome, StreamError, StreamingConfig,
    StreamingController,
};
use loam_terrain::{NoiseKind, NoiseParams};
use tracing::{debug, info};

use crate::game_loop::GameLoop;
use crate::observer::ScriptedObserver;

/// Errors that stop a run before it starts.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The streaming controller rejected the configuration.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Totals from a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Simulation steps taken.
    pub steps: u64,
    /// Loop frames run.
    pub frames: u64,
    /// Steps on which the observer entered a new chunk.
    pub reconciles: u64,
    /// Chunks made resident.
    pub created: u64,
    /// Chunks evicted, including the final shutdown.
    pub removed: u64,
    /// Chunk creations that failed.
    pub failed: u64,
    /// Largest number of chunks resident at once.
    pub peak_resident: usize,
    /// Largest sink footprint in bytes.
    pub peak_bytes: usize,
    /// Chunk the observer ended in.
    pub final_chunk: Option<ChunkCoord>,
    /// Meshes still alive in the sink after shutdown.
    pub leaked_meshes: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Streaming parameters from the `stream` and `mesh` sections.
pub fn streaming_config(config: &Config) -> StreamingConfig {
    StreamingConfig {
        chunk_size: config.stream.chunk_size,
        render_distance: config.stream.render_distance,
        scale: config.mesh.scale,
        uv_scale: config.mesh.uv_scale,
        z_multiplier: config.mesh.z_multiplier,
        material: MaterialRef::new(config.stream.material.as_str()),
    }
}

/// Noise parameters from the `noise` section.
pub fn noise_params(config: &Config) -> NoiseParams {
    let noise = &config.noise;
    NoiseParams {
        seed: noise.seed,
        kind: match noise.kind {
            NoiseKindConfig::Perlin => NoiseKind::Perlin,
            NoiseKindConfig::Simplex => NoiseKind::Simplex,
        },
        frequency: noise.frequency,
        offset: noise.offset,
        octaves: noise.octaves,
        lacunarity: noise.lacunarity,
        persistence: noise.persistence,
    }
}

/// Stream terrain around a scripted observer for `config.driver.steps`
/// steps, then shut down.
pub fn run(config: &Config) -> Result<RunReport, DriverError> {
    let driver = &config.driver;
    let sink = match driver.sink_budget_bytes {
        Some(bytes) => MemorySink::with_budget(bytes),
        None => MemorySink::new(),
    };
    let mut controller =
        StreamingController::with_noise(streaming_config(config), noise_params(config), sink)?;
    let mut observer = ScriptedObserver::new(
        DVec2::new(driver.start.0, driver.start.1),
        driver.heading_deg,
        driver.speed,
    );

    info!(
        "running {} steps at {} units/s, heading {} deg",
        driver.steps, driver.speed, driver.heading_deg
    );

    let started = Instant::now();
    let mut game_loop = GameLoop::new();
    let mut report = RunReport::default();

    while controller.stats().steps < driver.steps {
        let mut update = |dt: f64, sim_time: f64| {
            if controller.stats().steps >= driver.steps {
                return;
            }
            if let StepOutcome::Reconciled(step) = controller.step_with(&observer) {
                debug!(
                    "t={:.2}s: +{} -{} !{}",
                    sim_time,
                    step.created.len(),
                    step.removed.len(),
                    step.failed.len()
                );
                report.peak_resident = report.peak_resident.max(controller.registry().len());
                report.peak_bytes = report.peak_bytes.max(controller.sink().bytes_in_use());
            }
            observer.advance(dt);
        };

        if driver.realtime {
            game_loop.tick(&mut update);
            std::thread::sleep(Duration::from_secs_f64(game_loop.time_to_next_step()));
        } else {
            game_loop.advance(crate::game_loop::FIXED_DT, &mut update);
        }
    }

    let stats = controller.stats();
    report.steps = stats.steps;
    report.frames = game_loop.frame_count();
    report.reconciles = stats.reconciles;
    report.final_chunk = controller.observer_chunk();

    let sink = controller.shutdown();
    report.created = stats.created;
    report.removed = sink.stats().destroyed;
    report.failed = stats.failed;
    report.leaked_meshes = sink.live_count();
    report.elapsed = started.elapsed();

    info!(
        "done in {:.2?}: {} steps, {} reconciles, {} chunks built, {} failed, peak {} resident ({} KiB)",
        report.elapsed,
        report.steps,
        report.reconciles,
        report.created,
        report.failed,
        report.peak_resident,
        report.peak_bytes / 1024
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.stream.chunk_size = 8;
        config.stream.render_distance = 1;
        config.mesh.scale = 1.0;
        config.driver.steps = 120;
        // 2 seconds at 20 units/s: 40 units, five chunk widths.
        config.driver.speed = 20.0;
        config
    }

    #[test]
    fn test_config_mapping() {
        let config = Config::default();
        let stream = streaming_config(&config);
        assert_eq!(stream, StreamingConfig::default());
        assert_eq!(noise_params(&config), NoiseParams::default());
    }

    #[test]
    fn test_run_walks_and_cleans_up() {
        let report = run(&small_config()).unwrap();
        assert_eq!(report.steps, 120);
        assert_eq!(report.frames, 120);
        assert_eq!(report.failed, 0);
        assert_eq!(report.peak_resident, 9);
        assert_eq!(report.leaked_meshes, 0);
        assert_eq!(report.created, report.removed);
        // Last step samples the observer at t = 119/60 s, x = 39.67.
        assert_eq!(report.final_chunk, Some(ChunkCoord::new(4, 0)));
        // Start chunk plus one reconcile per chunk crossed.
        assert_eq!(report.reconciles, 5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.stream.chunk_size = 0;
        assert!(matches!(run(&config), Err(DriverError::Stream(_))));
    }

    #[test]
    fn test_budgeted_run_reports_failures() {
        let mut config = small_config();
        // Room for two 8x8 chunks: 81 * 48 + 384 * 4 bytes each.
        config.driver.sink_budget_bytes = Some(2 * (81 * 48 + 384 * 4));
        let report = run(&config).unwrap();
        assert!(report.failed > 0);
        assert_eq!(report.peak_resident, 2);
        assert_eq!(report.leaked_meshes, 0);
    }
}
