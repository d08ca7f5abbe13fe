//! Chunk vertex generation from a height source.
//!
//! A chunk of size `N` owns the `(N + 1) × (N + 1)` vertices with local cell
//! `0 <= x, y <= N`. The last row and column coincide with the first row and
//! column of the neighbouring chunks, so seams line up exactly.
//!
//! Vertices are visited in `TILE_SIZE × TILE_SIZE` tiles for locality, but
//! each one is written by storage index `x + y * (N + 1)`, so the result does
//! not depend on visiting order.

use glam::{Vec2, Vec3};
use loam_mesh::{MAX_INDEXED_CHUNK_SIZE, vertex_count, vertex_index};

use crate::coord::ChunkCoord;
use crate::error::BuildError;
use crate::noise_cache::NoiseCache;
use crate::noise_field::HeightSource;

/// Side length of a traversal tile, in vertices.
pub const TILE_SIZE: u32 = 4;

/// Per-chunk geometry parameters.
///
/// `chunk_size` must lie in `1..=MAX_INDEXED_CHUNK_SIZE`; builders assume it
/// and only check it in debug builds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightfieldParams {
    /// Grid cells per chunk side. Vertices per side is one more.
    pub chunk_size: u32,
    /// Local distance between neighbouring vertices.
    pub scale: f32,
    /// UV distance between neighbouring vertices.
    pub uv_scale: f32,
    /// Multiplier applied to every height sample.
    pub z_multiplier: f32,
}

impl Default for HeightfieldParams {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            scale: 100.0,
            uv_scale: 1.0,
            z_multiplier: 1000.0,
        }
    }
}

/// Fill `positions` and `uvs` with the vertices of the chunk at `coord`.
///
/// Samples go through `cache`; the caller decides when to clear it. Both
/// buffers are resized to exactly `(N + 1)^2` entries, reusing their
/// allocations.
///
/// # Panics
///
/// In debug builds, if `params.chunk_size` exceeds [`MAX_INDEXED_CHUNK_SIZE`].
pub fn build_vertices<S>(
    coord: ChunkCoord,
    params: &HeightfieldParams,
    source: &S,
    cache: &mut NoiseCache,
    positions: &mut Vec<Vec3>,
    uvs: &mut Vec<Vec2>,
) -> Result<(), BuildError>
where
    S: HeightSource + ?Sized,
{
    let n = params.chunk_size;
    debug_assert!(
        n <= MAX_INDEXED_CHUNK_SIZE,
        "chunk_size {n} overflows u32 indices"
    );
    let count = vertex_count(n);
    positions.clear();
    positions.resize(count, Vec3::ZERO);
    uvs.clear();
    uvs.resize(count, Vec2::ZERO);

    let (origin_x, origin_y) = coord.grid_origin(n);

    for tile_y in (0..=n).step_by(TILE_SIZE as usize) {
        for tile_x in (0..=n).step_by(TILE_SIZE as usize) {
            let end_y = (tile_y + TILE_SIZE).min(n + 1);
            let end_x = (tile_x + TILE_SIZE).min(n + 1);

            for y in tile_y..end_y {
                for x in tile_x..end_x {
                    let world_x = origin_x + i64::from(x);
                    let world_y = origin_y + i64::from(y);

                    let height =
                        cache.get_or_sample(source, world_x, world_y) as f32 * params.z_multiplier;
                    if !height.is_finite() {
                        return Err(BuildError::NonFiniteHeight {
                            x: world_x,
                            y: world_y,
                            value: height,
                        });
                    }

                    let index = vertex_index(x, y, n) as usize;
                    let (fx, fy) = (x as f32, y as f32);
                    positions[index] = Vec3::new(fx * params.scale, fy * params.scale, height);
                    uvs[index] = Vec2::new(fx * params.uv_scale, fy * params.uv_scale);
                }
            }
        }
    }

    Ok(())
}

/// Allocating convenience over [`build_vertices`] with a private cache.
pub fn heightfield<S>(
    coord: ChunkCoord,
    params: &HeightfieldParams,
    source: &S,
) -> Result<(Vec<Vec3>, Vec<Vec2>), BuildError>
where
    S: HeightSource + ?Sized,
{
    debug_assert!(
        params.chunk_size <= MAX_INDEXED_CHUNK_SIZE,
        "chunk_size {} overflows u32 indices",
        params.chunk_size
    );
    let count = vertex_count(params.chunk_size);
    let mut cache = NoiseCache::with_capacity(count);
    let mut positions = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);
    build_vertices(coord, params, source, &mut cache, &mut positions, &mut uvs)?;
    Ok((positions, uvs))
}
