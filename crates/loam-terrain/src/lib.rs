//! Procedural heightfield generation: fBm noise, per-build noise memoization,
//! chunk vertex generation, and the reusable chunk mesh builder.

mod builder;
mod coord;
mod error;
mod heightfield;
mod noise_cache;
mod noise_field;

pub use builder::ChunkBuilder;
pub use coord::{ChunkCoord, world_to_chunk};
pub use error::BuildError;
pub use heightfield::{HeightfieldParams, TILE_SIZE, build_vertices, heightfield};
pub use noise_cache::{CacheStats, NoiseCache};
pub use noise_field::{HeightSource, NoiseField, NoiseKind, NoiseParams};
