//! # Slice Errors
//!
//! Error types for the slicer, frames and the reconstructor.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors raised by the conversion engines.
#[derive(Debug, Error)]
pub enum SliceError {
    /// Frame index outside `[0, frames)`
    #[error("Frame index {index} out of range (frames: {frames})")]
    IndexOutOfRange { index: usize, frames: usize },

    /// Quantization delta is zero, negative or not finite
    #[error("Invalid delta: {0}")]
    InvalidDelta(f64),

    /// Z stride below one
    #[error("Invalid z stride: {0}")]
    InvalidStride(usize),

    /// Nothing to slice
    #[error("Mesh is empty")]
    EmptyMesh,

    /// Pixel buffer does not match the frame dimensions
    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    /// Rejected configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl SliceError {
    /// Creates an invalid frame error.
    pub fn invalid_frame(message: impl Into<String>) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }
}

/// Result type alias for engine operations.
pub type SliceResult<T> = Result<T, SliceError>;
