//! Registry of resident chunks, keyed by [`ChunkCoord`].
//!
//! The [`ChunkRegistry`] is the single authority for which chunks are
//! resident. Every key maps to exactly one live mesh handle; a chunk whose
//! build or upload failed never gets a key.

use glam::DVec3;
use loam_terrain::ChunkCoord;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::error::ChunkError;
use crate::sink::MeshHandle;
use crate::window::DesiredWindow;

/// One resident terrain tile.
///
/// Immutable once created; regeneration is destroy then recreate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chunk {
    coord: ChunkCoord,
    handle: MeshHandle,
    offset: DVec3,
}

impl Chunk {
    /// Creates a resident chunk record.
    pub fn new(coord: ChunkCoord, handle: MeshHandle, offset: DVec3) -> Self {
        Self {
            coord,
            handle,
            offset,
        }
    }

    /// Grid coordinate of this chunk.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Sink handle of the chunk's mesh.
    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    /// World-space placement of the mesh origin.
    pub fn offset(&self) -> DVec3 {
        self.offset
    }
}

/// Creates and destroys the resources behind chunks.
///
/// [`ChunkRegistry::reconcile`] decides *which* chunks change; the factory
/// does the work.
pub trait ChunkFactory {
    /// Build and upload the chunk at `coord`.
    fn create(&mut self, coord: ChunkCoord) -> Result<Chunk, ChunkError>;

    /// Release the resources held by `chunk`.
    fn destroy(&mut self, chunk: Chunk);
}

/// What a reconcile pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// Coordinates that became resident.
    pub created: Vec<ChunkCoord>,
    /// Coordinates that were evicted.
    pub removed: Vec<ChunkCoord>,
    /// Coordinates whose creation failed, with the reason.
    pub failed: Vec<(ChunkCoord, ChunkError)>,
}

impl ReconcileReport {
    /// Returns true if the pass touched nothing.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty() && self.failed.is_empty()
    }
}

/// Owns all resident chunks.
#[derive(Debug, Default)]
pub struct ChunkRegistry {
    chunks: FxHashMap<ChunkCoord, Chunk>,
}

impl ChunkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if no chunk is resident.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns true if `coord` is resident.
    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    /// The resident chunk at `coord`.
    pub fn get(&self, coord: &ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(coord)
    }

    /// Iterates over resident coordinates in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Iterates over resident chunks in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Converge the resident set onto `desired`.
    ///
    /// Stale chunks are chosen from the registry's own keys before anything
    /// is created, then destroyed; missing chunks are created in the
    /// window's priority order. A failed creation is logged and reported but
    /// leaves no key, so the same coordinate is retried on the next pass.
    pub fn reconcile<F>(&mut self, desired: &DesiredWindow, factory: &mut F) -> ReconcileReport
    where
        F: ChunkFactory + ?Sized,
    {
        let mut report = ReconcileReport::default();

        let mut stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|coord| !desired.contains(coord))
            .copied()
            .collect();
        stale.sort_unstable();

        for coord in stale {
            if let Some(chunk) = self.chunks.remove(&coord) {
                debug!("evicting chunk {} ({})", coord, chunk.handle());
                factory.destroy(chunk);
                report.removed.push(coord);
            }
        }

        for coord in desired.iter() {
            if self.chunks.contains_key(&coord) {
                continue;
            }
            match factory.create(coord) {
                Ok(chunk) => {
                    debug!("chunk {} resident as {}", coord, chunk.handle());
                    self.chunks.insert(coord, chunk);
                    report.created.push(coord);
                }
                Err(err) => {
                    warn!("failed to create chunk {}: {}", coord, err);
                    report.failed.push((coord, err));
                }
            }
        }

        report
    }

    /// Destroy every resident chunk.
    pub fn evict_all<F>(&mut self, factory: &mut F) -> ReconcileReport
    where
        F: ChunkFactory + ?Sized,
    {
        self.reconcile(&DesiredWindow::empty(), factory)
    }
}
