//! Reusable chunk mesh builder.
//!
//! Owns the scratch buffers for one chunk build at a time: positions, UVs,
//! normals and tangents sized once to `(N + 1)^2`, and the index pattern
//! built once for `N`. Each build refills them in place and hands out a
//! borrowed [`MeshSection`]; nothing is retained per chunk.
//!
//! A builder is not shareable across concurrent builds. Parallel generation
//! needs one builder per worker.

use glam::{Vec2, Vec3};
use loam_mesh::{
    MAX_INDEXED_CHUNK_SIZE, MeshSection, TangentBuffers, build_indices,
    compute_normals_and_tangents, vertex_count,
};
use tracing::trace;

use crate::coord::ChunkCoord;
use crate::error::BuildError;
use crate::heightfield::{HeightfieldParams, build_vertices};
use crate::noise_cache::{CacheStats, NoiseCache};
use crate::noise_field::HeightSource;

/// Builds chunk meshes into reused scratch buffers.
pub struct ChunkBuilder {
    params: HeightfieldParams,
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    tangents: TangentBuffers,
    cache: NoiseCache,
    last_stats: CacheStats,
}

impl ChunkBuilder {
    /// Allocate buffers for chunks described by `params`.
    ///
    /// The index pattern is built here, so memory grows with the square of
    /// `params.chunk_size`. Callers bound the size before constructing.
    ///
    /// # Panics
    ///
    /// In debug builds, if `params.chunk_size` exceeds [`MAX_INDEXED_CHUNK_SIZE`].
    pub fn new(params: HeightfieldParams) -> Self {
        debug_assert!(
            params.chunk_size <= MAX_INDEXED_CHUNK_SIZE,
            "chunk_size {} overflows u32 indices",
            params.chunk_size
        );
        let count = vertex_count(params.chunk_size);
        Self {
            params,
            positions: Vec::with_capacity(count),
            uvs: Vec::with_capacity(count),
            indices: build_indices(params.chunk_size),
            tangents: TangentBuffers::with_capacity(count),
            cache: NoiseCache::with_capacity(count),
            last_stats: CacheStats::default(),
        }
    }

    /// Geometry parameters shared by every chunk this builder produces.
    pub fn params(&self) -> &HeightfieldParams {
        &self.params
    }

    /// The index pattern reused verbatim for every chunk.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Noise cache counters from the most recent build.
    pub fn last_cache_stats(&self) -> CacheStats {
        self.last_stats
    }

    /// Generate the mesh for `coord`.
    ///
    /// The noise cache is cleared when the build ends, successfully or not.
    pub fn build<S>(&mut self, coord: ChunkCoord, source: &S) -> Result<MeshSection<'_>, BuildError>
    where
        S: HeightSource + ?Sized,
    {
        let result = build_vertices(
            coord,
            &self.params,
            source,
            &mut self.cache,
            &mut self.positions,
            &mut self.uvs,
        );
        self.last_stats = self.cache.stats();
        self.cache.clear();
        self.cache.reset_stats();
        result?;

        compute_normals_and_tangents(&self.positions, &self.indices, &self.uvs, &mut self.tangents);
        trace!(
            "built chunk {} ({} vertices, {} cache misses)",
            coord,
            self.positions.len(),
            self.last_stats.misses
        );

        Ok(MeshSection {
            positions: &self.positions,
            indices: &self.indices,
            normals: &self.tangents.normals,
            uvs: &self.uvs,
            tangents: &self.tangents.tangents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_field::{NoiseField, NoiseParams};

    fn small_params() -> HeightfieldParams {
        HeightfieldParams {
            chunk_size: 2,
            scale: 1.0,
            uv_scale: 1.0,
            z_multiplier: 1.0,
        }
    }

    #[test]
    fn test_size_two_section() {
        let field = NoiseField::new(NoiseParams::default());
        let mut builder = ChunkBuilder::new(small_params());
        let section = builder.build(ChunkCoord::ORIGIN, &field).unwrap();

        assert_eq!(section.vertex_count(), 9);
        assert_eq!(section.indices.len(), 24);
        assert_eq!(section.validate(), Ok(()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overflows u32 indices")]
    fn test_oversized_chunk_is_caught() {
        let _ = ChunkBuilder::new(HeightfieldParams {
            chunk_size: u32::MAX,
            ..small_params()
        });
    }

    #[test]
    fn test_flat_source_yields_upward_normals() {
        let flat = |_: f64, _: f64| 0.0;
        let mut builder = ChunkBuilder::new(small_params());
        let section = builder.build(ChunkCoord::new(4, -2), &flat).unwrap();
        for n in section.normals {
            assert!((*n - Vec3::Z).length() < 1e-6, "normal {n} should be +Z");
        }
    }

    #[test]
    fn test_buffers_reused_between_builds() {
        let field = NoiseField::new(NoiseParams::default());
        let mut builder = ChunkBuilder::new(HeightfieldParams {
            chunk_size: 16,
            ..small_params()
        });

        let first_ptr = builder
            .build(ChunkCoord::ORIGIN, &field)
            .unwrap()
            .positions
            .as_ptr();
        let second_ptr = builder
            .build(ChunkCoord::new(1, 1), &field)
            .unwrap()
            .positions
            .as_ptr();
        assert_eq!(first_ptr, second_ptr);
    }

    #[test]
    fn test_cache_cleared_after_build() {
        let field = NoiseField::new(NoiseParams::default());
        let mut builder = ChunkBuilder::new(small_params());
        builder.build(ChunkCoord::ORIGIN, &field).unwrap();

        assert!(builder.cache.is_empty());
        assert_eq!(builder.last_cache_stats().misses, 9);
        assert_eq!(builder.cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_failed_build_clears_cache() {
        let source = |x: f64, _: f64| if x > 0.0 { f64::INFINITY } else { 0.0 };
        let mut builder = ChunkBuilder::new(small_params());
        assert!(builder.build(ChunkCoord::ORIGIN, &source).is_err());
        assert!(builder.cache.is_empty());
    }

    #[test]
    fn test_same_coord_builds_identically() {
        let field = NoiseField::new(NoiseParams::default());
        let mut builder = ChunkBuilder::new(HeightfieldParams {
            chunk_size: 6,
            ..small_params()
        });
        let first: Vec<Vec3> = builder
            .build(ChunkCoord::new(2, 3), &field)
            .unwrap()
            .positions
            .to_vec();
        builder.build(ChunkCoord::new(-8, 1), &field).unwrap();
        let again = builder.build(ChunkCoord::new(2, 3), &field).unwrap();
        assert_eq!(again.positions, first.as_slice());
    }
}
