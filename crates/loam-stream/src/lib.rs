//! Chunk lifecycle management: the desired window around the observer, the
//! registry of resident chunks, and the streaming controller that keeps the
//! two converged.

pub mod controller;
pub mod error;
pub mod registry;
pub mod sink;
pub mod window;

pub use controller::{
    MAX_CHUNK_SIZE, MAX_RENDER_DISTANCE, ObserverProvider, StepOutcome, StreamStats, StreamingConfig,
    StreamingController, validate_noise,
};
pub use error::{ChunkError, StreamError};
pub use loam_terrain::{ChunkCoord, world_to_chunk};
pub use registry::{Chunk, ChunkFactory, ChunkRegistry, ReconcileReport};
pub use sink::{MaterialRef, MemorySink, MeshHandle, MeshSink, SinkError, SinkStats, StoredMesh};
pub use window::DesiredWindow;
