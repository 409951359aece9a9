//! Error types for mesh and frame-stack I/O.

use slicevox_core::SliceError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing meshes and stacks.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// A frame whose size differs from the first frame of its stack.
    #[error("frame {path} is {got:?}, expected {expected:?}")]
    FrameSizeMismatch {
        /// Offending frame.
        path: PathBuf,
        /// Width and height of the first frame.
        expected: (usize, usize),
        /// Width and height of this frame.
        got: (usize, usize),
    },

    /// Directory without any frame images.
    #[error("no frames found in {path}")]
    EmptyStack {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding or decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Stack sidecar (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded pixels rejected by the frame type.
    #[error("frame error: {0}")]
    Frame(#[from] SliceError),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Maps a failed open to `FileNotFound` when the path does not exist.
    pub(crate) fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
