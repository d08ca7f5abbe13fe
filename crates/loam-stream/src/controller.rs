//! Streaming controller: turns observer movement into registry changes.
//!
//! Call [`StreamingController::step`] once per simulation step with the
//! observer position. Work happens only when the observer crosses into a
//! different chunk; the desired window is then recomputed around the new
//! chunk and the registry is reconciled against it.

use glam::DVec3;
use loam_mesh::MAX_INDEXED_CHUNK_SIZE;
use loam_terrain::{
    ChunkBuilder, ChunkCoord, HeightSource, HeightfieldParams, NoiseField, NoiseParams,
    world_to_chunk,
};
use tracing::{info, trace, warn};

use crate::error::{ChunkError, StreamError};
use crate::registry::{Chunk, ChunkFactory, ChunkRegistry, ReconcileReport};
use crate::sink::{MaterialRef, MeshSink};
use crate::window::DesiredWindow;

/// Largest accepted render distance, in chunks.
pub const MAX_RENDER_DISTANCE: u32 = 1024;

/// Largest accepted chunk size, in grid cells per side.
///
/// The builder's index pattern for this size takes about 100 MB.
pub const MAX_CHUNK_SIZE: u32 = 2048;

const _: () = assert!(MAX_CHUNK_SIZE <= MAX_INDEXED_CHUNK_SIZE);

/// Fixed parameters of a streaming session.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamingConfig {
    /// Grid cells per chunk side.
    pub chunk_size: u32,
    /// Chebyshev radius of the resident window, in chunks.
    pub render_distance: u32,
    /// Local distance between neighbouring vertices.
    pub scale: f32,
    /// UV distance between neighbouring vertices.
    pub uv_scale: f32,
    /// Multiplier applied to every height sample.
    pub z_multiplier: f32,
    /// Material bound to every chunk mesh.
    pub material: MaterialRef,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        let mesh = HeightfieldParams::default();
        Self {
            chunk_size: mesh.chunk_size,
            render_distance: 3,
            scale: mesh.scale,
            uv_scale: mesh.uv_scale,
            z_multiplier: mesh.z_multiplier,
            material: MaterialRef::default(),
        }
    }
}

impl StreamingConfig {
    /// Geometry parameters handed to the chunk builder.
    pub fn heightfield_params(&self) -> HeightfieldParams {
        HeightfieldParams {
            chunk_size: self.chunk_size,
            scale: self.scale,
            uv_scale: self.uv_scale,
            z_multiplier: self.z_multiplier,
        }
    }

    /// Check that this configuration can produce valid chunks.
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size must be at least 1"));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(invalid(format!(
                "chunk_size {} exceeds {MAX_CHUNK_SIZE}",
                self.chunk_size
            )));
        }
        if self.render_distance > MAX_RENDER_DISTANCE {
            return Err(invalid(format!(
                "render_distance {} exceeds {MAX_RENDER_DISTANCE}",
                self.render_distance
            )));
        }
        for (name, value) in [
            ("scale", self.scale),
            ("uv_scale", self.uv_scale),
            ("z_multiplier", self.z_multiplier),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        Ok(())
    }
}

/// Check noise parameters for use by a streaming session.
pub fn validate_noise(params: &NoiseParams) -> Result<(), StreamError> {
    if !(params.frequency.is_finite() && params.frequency > 0.0) {
        return Err(invalid(format!(
            "noise frequency must be positive, got {}",
            params.frequency
        )));
    }
    for (name, value) in [
        ("offset", params.offset),
        ("lacunarity", params.lacunarity),
        ("persistence", params.persistence),
    ] {
        if !value.is_finite() {
            return Err(invalid(format!("noise {name} must be finite, got {value}")));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> StreamError {
    StreamError::InvalidConfig(message.into())
}

/// Supplies the observer position each step.
pub trait ObserverProvider {
    /// Current observer position in heightfield grid units, if any.
    fn observer_position(&self) -> Option<DVec3>;
}

impl<F> ObserverProvider for F
where
    F: Fn() -> Option<DVec3>,
{
    fn observer_position(&self) -> Option<DVec3> {
        self()
    }
}

/// What a single [`StreamingController::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// No usable observer position; nothing changed.
    NoObserver,
    /// The observer stayed in the same chunk.
    Unchanged,
    /// The observer entered a new chunk and the registry was reconciled.
    Reconciled(ReconcileReport),
}

impl StepOutcome {
    /// The reconcile report, if this step reconciled.
    pub fn report(&self) -> Option<&ReconcileReport> {
        match self {
            Self::Reconciled(report) => Some(report),
            _ => None,
        }
    }
}

/// Lifetime counters for a controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Steps taken.
    pub steps: u64,
    /// Steps that reconciled.
    pub reconciles: u64,
    /// Chunks made resident.
    pub created: u64,
    /// Chunks evicted.
    pub removed: u64,
    /// Chunk creations that failed.
    pub failed: u64,
}

impl StreamStats {
    fn record(&mut self, report: &ReconcileReport) {
        self.created += report.created.len() as u64;
        self.removed += report.removed.len() as u64;
        self.failed += report.failed.len() as u64;
    }
}

/// Keeps the resident chunk set converged on the window around the observer.
pub struct StreamingController<S, H = NoiseField> {
    config: StreamingConfig,
    registry: ChunkRegistry,
    builder: ChunkBuilder,
    source: H,
    sink: S,
    observer_chunk: Option<ChunkCoord>,
    stats: StreamStats,
}

impl<S: MeshSink> StreamingController<S, NoiseField> {
    /// Creates a controller sampling fBm noise built from `noise`.
    pub fn with_noise(
        config: StreamingConfig,
        noise: NoiseParams,
        sink: S,
    ) -> Result<Self, StreamError> {
        validate_noise(&noise)?;
        Self::new(config, NoiseField::new(noise), sink)
    }
}

impl<S: MeshSink, H: HeightSource> StreamingController<S, H> {
    /// Creates a controller sampling heights from `source` and handing meshes
    /// to `sink`.
    pub fn new(config: StreamingConfig, source: H, sink: S) -> Result<Self, StreamError> {
        config.validate()?;
        let builder = ChunkBuilder::new(config.heightfield_params());
        info!(
            "streaming {}x{} cell chunks, render distance {}",
            config.chunk_size, config.chunk_size, config.render_distance
        );
        Ok(Self {
            config,
            registry: ChunkRegistry::new(),
            builder,
            source,
            sink,
            observer_chunk: None,
            stats: StreamStats::default(),
        })
    }

    /// Session parameters.
    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Resident chunks.
    pub fn registry(&self) -> &ChunkRegistry {
        &self.registry
    }

    /// The mesh sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The height source.
    pub fn source(&self) -> &H {
        &self.source
    }

    /// Chunk the observer was last seen in.
    pub fn observer_chunk(&self) -> Option<ChunkCoord> {
        self.observer_chunk
    }

    /// Lifetime counters.
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Advance one simulation step with the observer at `observer`.
    pub fn step(&mut self, observer: Option<DVec3>) -> StepOutcome {
        self.stats.steps += 1;

        let Some(position) = observer else {
            trace!("no observer this step");
            return StepOutcome::NoObserver;
        };
        if !position.is_finite() {
            warn!("ignoring non-finite observer position {position}");
            return StepOutcome::NoObserver;
        }

        let chunk = self.window_center(position);
        if self.observer_chunk == Some(chunk) {
            return StepOutcome::Unchanged;
        }
        self.observer_chunk = Some(chunk);

        let window = DesiredWindow::around(chunk, self.config.render_distance);
        let report = self.reconcile(&window);
        self.stats.reconciles += 1;
        info!(
            "observer entered chunk {}: {} created, {} removed, {} failed, {} resident",
            chunk,
            report.created.len(),
            report.removed.len(),
            report.failed.len(),
            self.registry.len()
        );
        StepOutcome::Reconciled(report)
    }

    /// Advance one step, asking `provider` for the observer position.
    pub fn step_with<P>(&mut self, provider: &P) -> StepOutcome
    where
        P: ObserverProvider + ?Sized,
    {
        self.step(provider.observer_position())
    }

    /// Evict every chunk and forget the observer chunk, so the next step
    /// with an observer rebuilds the window.
    pub fn reset(&mut self) -> ReconcileReport {
        self.observer_chunk = None;
        let report = self.reconcile(&DesiredWindow::empty());
        info!("reset: evicted {} chunks", report.removed.len());
        report
    }

    /// Evict every chunk and hand back the sink.
    pub fn shutdown(mut self) -> S {
        let report = self.reconcile(&DesiredWindow::empty());
        info!(
            "shutdown: evicted {} chunks after {} steps",
            report.removed.len(),
            self.stats.steps
        );
        self.sink
    }

    fn reconcile(&mut self, window: &DesiredWindow) -> ReconcileReport {
        let mut pipeline = Pipeline {
            builder: &mut self.builder,
            source: &self.source,
            sink: &mut self.sink,
            material: &self.config.material,
            chunk_size: self.config.chunk_size,
            scale: f64::from(self.config.scale),
        };
        let report = self.registry.reconcile(window, &mut pipeline);
        self.stats.record(&report);
        report
    }

    /// Chunk containing `position`, pulled in from the edges of the
    /// coordinate range so the whole window stays representable.
    fn window_center(&self, position: DVec3) -> ChunkCoord {
        let chunk = world_to_chunk(position.x, position.y, self.config.chunk_size);
        let r = self.config.render_distance as i32;
        ChunkCoord::new(
            chunk.x.clamp(i32::MIN + r, i32::MAX - r),
            chunk.y.clamp(i32::MIN + r, i32::MAX - r),
        )
    }
}

/// Builder, height source and sink wired together for one reconcile pass.
struct Pipeline<'a, S, H> {
    builder: &'a mut ChunkBuilder,
    source: &'a H,
    sink: &'a mut S,
    material: &'a MaterialRef,
    chunk_size: u32,
    scale: f64,
}

impl<S: MeshSink, H: HeightSource> ChunkFactory for Pipeline<'_, S, H> {
    fn create(&mut self, coord: ChunkCoord) -> Result<Chunk, ChunkError> {
        let section = self.builder.build(coord, self.source)?;
        let handle = self.sink.create(&section, self.material)?;
        Ok(Chunk::new(
            coord,
            handle,
            coord.world_offset(self.chunk_size, self.scale),
        ))
    }

    fn destroy(&mut self, chunk: Chunk) {
        if !self.sink.destroy(chunk.handle()) {
            warn!(
                "sink did not know {} for chunk {}",
                chunk.handle(),
                chunk.coord()
            );
        }
    }
}
