//! The `stack.json` sidecar.
//!
//! Records how a stack was sliced so that reconstruction can reuse the same
//! quantization and put the result back where the source mesh was.

use std::path::Path;

use config::constants::STACK_INFO_FILE;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{IoError, IoResult};

/// Slicing parameters of a frame stack.
///
/// # Example
///
/// ```rust
/// use slicevox_io::StackInfo;
/// use glam::DVec3;
///
/// let info = StackInfo::new(0.1, 2, 40, 30, 12, DVec3::new(-1.0, -1.5, 0.0));
/// assert!((info.layer_spacing() - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackInfo {
    /// World size of one pixel.
    pub delta: f64,
    /// Source frames advanced per stored frame.
    pub z_stride: usize,
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Number of stored frames.
    pub frames: usize,
    /// World position of pixel corner `(0, 0)` in the first frame's plane.
    pub origin: DVec3,
}

impl StackInfo {
    pub fn new(
        delta: f64,
        z_stride: usize,
        width: usize,
        height: usize,
        frames: usize,
        origin: DVec3,
    ) -> Self {
        Self {
            delta,
            z_stride,
            width,
            height,
            frames,
            origin,
        }
    }

    /// Distance between stored frames.
    pub fn layer_spacing(&self) -> f64 {
        self.delta * self.z_stride as f64
    }

    /// Writes `stack.json` into `dir`.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> IoResult<()> {
        let path = dir.as_ref().join(STACK_INFO_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Reads `stack.json` from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> IoResult<Self> {
        let path = dir.as_ref().join(STACK_INFO_FILE);
        let text = std::fs::read_to_string(&path).map_err(|e| IoError::from_open(e, &path))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reads `stack.json` from `dir` if there is one.
    pub fn load_optional<P: AsRef<Path>>(dir: P) -> IoResult<Option<Self>> {
        match Self::load(dir) {
            Ok(info) => Ok(Some(info)),
            Err(IoError::FileNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
