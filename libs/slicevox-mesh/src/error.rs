//! # Mesh Errors
//!
//! Error types for mesh construction, queries and isosurface extraction.

use thiserror::Error;

/// Errors that can occur while building or meshing geometry.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Degenerate input geometry
    #[error("Degenerate geometry: {message}")]
    Degenerate { message: String },

    /// Grid spacing is zero, negative or not finite
    #[error("Invalid grid resolution: {delta}")]
    InvalidResolution { delta: f64 },

    /// Solid bounds are empty or not finite
    #[error("Solid has unusable bounds")]
    InvalidBounds,

    /// Extraction grid would be too large
    #[error("Too many grid samples: {count} (max: {max})")]
    TooManyCells { count: usize, max: usize },
}

impl MeshError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate {
            message: message.into(),
        }
    }
}

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
