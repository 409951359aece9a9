//! # Configuration Constants
//!
//! Centralized constants for the slicevox pipeline. Quantization defaults,
//! frame intensity conventions and algorithm tuning values live here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Quantization**: Default spatial delta, Z stride, smoothing
//! - **Frames**: Intensity conventions and on-disk naming
//! - **Tuning**: Parallelism and grid limits

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Direction of the parity ray used by point-in-mesh tests.
///
/// Deliberately not axis aligned so that rays through pixel centers of an
/// axis-aligned grid do not graze mesh edges or vertices. Normalized by the
/// consumer.
pub const RAY_DIRECTION: [f64; 3] = [0.5224892708603626, 0.10494477243214506, 0.8463238051092232];

// =============================================================================
// QUANTIZATION CONSTANTS
// =============================================================================

/// Default world-space edge length of one pixel.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_DELTA;
///
/// // A 2-unit wide model spans about 50 pixels.
/// let width = (2.0 / DEFAULT_DELTA).round() as usize;
/// assert_eq!(width, 50);
/// ```
pub const DEFAULT_DELTA: f64 = 0.04;

/// Default number of frames advanced per written layer.
pub const DEFAULT_Z_STRIDE: usize = 1;

/// Default number of outline smoothing iterations applied per frame.
pub const DEFAULT_SMOOTH_ITERS: usize = 20;

/// Default number of bisection steps used to place isosurface vertices.
pub const DEFAULT_SEARCH_DEPTH: usize = 8;

/// Fraction of the way each outline vertex moves toward the midpoint of its
/// neighbours per smoothing iteration.
///
/// # Example
///
/// ```rust
/// use config::constants::SMOOTHING_STEP;
/// assert!(SMOOTHING_STEP > 0.0 && SMOOTHING_STEP < 1.0);
/// ```
pub const SMOOTHING_STEP: f64 = 0.2;

// =============================================================================
// FRAME CONSTANTS
// =============================================================================

/// Intensity written for pixels inside the solid (black).
pub const INSIDE_INTENSITY: u8 = 0;

/// Intensity written for pixels outside the solid (white).
pub const OUTSIDE_INTENSITY: u8 = 255;

/// Pixels with an intensity strictly below this value are inside.
///
/// Half of the maximum representable intensity, so anything darker than the
/// midpoint counts as solid.
///
/// # Example
///
/// ```rust
/// use config::constants::INSIDE_THRESHOLD;
///
/// assert!(127 < INSIDE_THRESHOLD);
/// assert!(!(128 < INSIDE_THRESHOLD));
/// ```
pub const INSIDE_THRESHOLD: u8 = 128;

/// File name prefix of frames written to a stack directory.
///
/// # Example
///
/// ```rust
/// use config::constants::{frame_file_name, FRAME_FILE_PREFIX};
///
/// assert!(frame_file_name(7).starts_with(FRAME_FILE_PREFIX));
/// assert_eq!(frame_file_name(7), "frame_00007.png");
/// ```
pub const FRAME_FILE_PREFIX: &str = "frame_";

/// File extension of frames written to a stack directory.
pub const FRAME_FILE_EXTENSION: &str = "png";

/// Name of the JSON sidecar describing a frame stack.
pub const STACK_INFO_FILE: &str = "stack.json";

// =============================================================================
// TUNING CONSTANTS
// =============================================================================

/// Regions with at least this many pixels split their quadrants across
/// rayon tasks. Smaller regions recurse on the calling thread.
pub const PARALLEL_MIN_PIXELS: usize = 64 * 64;

/// Target number of outline segments per distance-grid cell.
pub const OUTLINE_SEGMENTS_PER_CELL: f64 = 4.0;

/// Maximum number of lattice samples the isosurface extractor will allocate.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_GRID_SAMPLES;
/// assert!(MAX_GRID_SAMPLES >= 256 * 256 * 256);
/// ```
pub const MAX_GRID_SAMPLES: usize = 1 << 27;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Builds the file name of the frame at `index` inside a stack directory.
pub fn frame_file_name(index: usize) -> String {
    format!("{FRAME_FILE_PREFIX}{index:05}.{FRAME_FILE_EXTENSION}")
}

/// Returns true when `delta` is usable as a quantization step.
///
/// # Example
///
/// ```rust
/// use config::constants::is_valid_delta;
///
/// assert!(is_valid_delta(0.5));
/// assert!(!is_valid_delta(0.0));
/// assert!(!is_valid_delta(f64::NAN));
/// ```
#[inline]
pub fn is_valid_delta(delta: f64) -> bool {
    delta.is_finite() && delta > 0.0
}

// =============================================================================
// CONVERSION CONFIG
// =============================================================================

/// Validated parameters for one slice or reconstruction run.
///
/// # Examples
/// ```
/// use config::constants::ConversionConfig;
///
/// let cfg = ConversionConfig::new(0.1, 2, 10, None, 8).expect("valid config");
/// assert_eq!(cfg.z_stride, 2);
/// assert_eq!(cfg.mc_delta(), 0.1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionConfig {
    /// World-space edge length of one pixel.
    pub delta: f64,
    /// Frames advanced per layer along Z.
    pub z_stride: usize,
    /// Outline smoothing iterations per frame.
    pub smooth_iters: usize,
    /// Grid spacing for isosurface extraction; `None` reuses `delta`.
    pub mc_delta: Option<f64>,
    /// Bisection steps used to place isosurface vertices.
    pub search_depth: usize,
}

impl ConversionConfig {
    /// Builds a configuration, rejecting unusable deltas and strides.
    pub fn new(
        delta: f64,
        z_stride: usize,
        smooth_iters: usize,
        mc_delta: Option<f64>,
        search_depth: usize,
    ) -> Result<Self, ConfigError> {
        if !is_valid_delta(delta) {
            return Err(ConfigError::InvalidDelta(delta));
        }
        if let Some(mc) = mc_delta {
            if !is_valid_delta(mc) {
                return Err(ConfigError::InvalidDelta(mc));
            }
        }
        if z_stride == 0 {
            return Err(ConfigError::InvalidStride(z_stride));
        }
        if search_depth == 0 {
            return Err(ConfigError::InvalidSearchDepth(search_depth));
        }
        Ok(Self {
            delta,
            z_stride,
            smooth_iters,
            mc_delta,
            search_depth,
        })
    }

    /// Grid spacing used for isosurface extraction.
    #[inline]
    pub fn mc_delta(&self) -> f64 {
        self.mc_delta.unwrap_or(self.delta)
    }

    /// World-space distance between two consecutive layers.
    #[inline]
    pub fn layer_spacing(&self) -> f64 {
        self.delta * self.z_stride as f64
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            z_stride: DEFAULT_Z_STRIDE,
            smooth_iters: DEFAULT_SMOOTH_ITERS,
            mc_delta: None,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

/// Errors raised while validating a [`ConversionConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when a spatial delta is zero, negative or not finite.
    InvalidDelta(f64),
    /// Raised when the Z stride is zero.
    InvalidStride(usize),
    /// Raised when the isosurface search depth is zero.
    InvalidSearchDepth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDelta(value) => {
                write!(f, "delta must be finite and positive: {value}")
            }
            ConfigError::InvalidStride(value) => write!(f, "z stride must be >= 1: {value}"),
            ConfigError::InvalidSearchDepth(value) => {
                write!(f, "search depth must be >= 1: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
