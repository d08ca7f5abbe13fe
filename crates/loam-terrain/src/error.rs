//! Chunk generation error types.

/// Errors that abort a single chunk build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The height source produced NaN or infinity.
    #[error("non-finite height {value} at world grid ({x}, {y})")]
    NonFiniteHeight {
        /// World grid X of the offending sample.
        x: i64,
        /// World grid Y of the offending sample.
        y: i64,
        /// The sampled value after the height multiplier.
        value: f32,
    },
}
