//! Triangle index pattern for a square heightfield grid.
//!
//! A chunk of size `N` has `(N + 1) × (N + 1)` vertices stored row-major:
//! the vertex at local cell `(x, y)` lives at `x + y * (N + 1)`. Every cell
//! `(x, y)` with `x, y < N` is covered by two triangles that share the
//! diagonal `(v + 1, v + N + 1)`.
//!
//! The pattern depends only on `N`, so it is built once and reused for every
//! chunk of that size.

/// Largest chunk size whose vertex indices all fit in a `u32`.
///
/// The last vertex of a `65_535` chunk sits at `65_536^2 - 1 = u32::MAX`.
pub const MAX_INDEXED_CHUNK_SIZE: u32 = 65_535;

/// Number of vertices in a chunk grid of the given size.
#[must_use]
pub fn vertex_count(chunk_size: u32) -> usize {
    let side = chunk_size as usize + 1;
    side * side
}

/// Number of triangle indices in a chunk grid of the given size.
#[must_use]
pub fn index_count(chunk_size: u32) -> usize {
    let n = chunk_size as usize;
    n * n * 6
}

/// Storage index of the vertex at local grid cell `(x, y)`.
#[inline]
#[must_use]
pub fn vertex_index(x: u32, y: u32, chunk_size: u32) -> u32 {
    x + y * (chunk_size + 1)
}

/// Build the index buffer for a chunk grid of the given size.
#[must_use]
pub fn build_indices(chunk_size: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(index_count(chunk_size));
    fill_indices(chunk_size, &mut indices);
    indices
}

/// Refill `out` with the index pattern, reusing its allocation.
///
/// `chunk_size` must not exceed [`MAX_INDEXED_CHUNK_SIZE`].
pub fn fill_indices(chunk_size: u32, out: &mut Vec<u32>) {
    debug_assert!(
        chunk_size <= MAX_INDEXED_CHUNK_SIZE,
        "chunk_size {chunk_size} overflows u32 indices"
    );
    out.clear();
    out.reserve(index_count(chunk_size));

    let row = chunk_size + 1;
    for y in 0..chunk_size {
        for x in 0..chunk_size {
            let v = vertex_index(x, y, chunk_size);

            out.extend_from_slice(&[v, v + row, v + 1]);
            out.extend_from_slice(&[v + 1, v + row, v + row + 1]);
        }
    }
}
