//! Streaming error types.

use loam_terrain::BuildError;

use crate::sink::SinkError;

/// Errors raised when constructing a streaming controller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// The configuration cannot produce valid chunks.
    #[error("invalid streaming configuration: {0}")]
    InvalidConfig(String),
}

/// Why a single chunk could not be made resident.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChunkError {
    /// Mesh generation failed.
    #[error("build failed: {0}")]
    Build(#[from] BuildError),
    /// The sink refused the mesh.
    #[error("sink rejected mesh: {0}")]
    Sink(#[from] SinkError),
}
