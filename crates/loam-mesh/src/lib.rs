//! Heightfield mesh primitives: grid index pattern, smooth normals and tangents,
//! and the borrowed mesh section handed to mesh sinks.

pub mod indices;
pub mod packed;
pub mod section;
pub mod tangents;

pub use indices::{
    MAX_INDEXED_CHUNK_SIZE, build_indices, fill_indices, index_count, vertex_count, vertex_index,
};
pub use packed::{TerrainVertex, interleave};
pub use section::{MeshSection, SectionError};
pub use tangents::{TangentBuffers, compute_normals_and_tangents};
