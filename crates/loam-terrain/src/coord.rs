//! Integer chunk grid addressing.

use std::fmt;

use glam::DVec3;

/// Identifies a chunk on the integer chunk grid.
///
/// Units are chunks, not world units. Ordering is lexicographic by `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Y coordinate.
    pub y: i32,
}

impl ChunkCoord {
    /// The chunk at the world origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate offset by `(dx, dy)` chunks.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Chebyshev (chessboard) distance to `other`, in chunks.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).unsigned_abs();
        dx.max(dy) as u32
    }

    /// World grid coordinate of this chunk's `(0, 0)` vertex.
    pub fn grid_origin(self, chunk_size: u32) -> (i64, i64) {
        let n = i64::from(chunk_size);
        (i64::from(self.x) * n, i64::from(self.y) * n)
    }

    /// World-space placement of this chunk's mesh: `coord * chunk_size * scale`.
    pub fn world_offset(self, chunk_size: u32, scale: f64) -> DVec3 {
        let extent = f64::from(chunk_size) * scale;
        DVec3::new(f64::from(self.x) * extent, f64::from(self.y) * extent, 0.0)
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Map a world grid position to the chunk containing it.
///
/// Uses mathematical floor, so `-1` lands in chunk `-1`, not `0`.
pub fn world_to_chunk(x: f64, y: f64, chunk_size: u32) -> ChunkCoord {
    let size = f64::from(chunk_size);
    ChunkCoord::new((x / size).floor() as i32, (y / size).floor() as i32)
}
