//! # Config Crate
//!
//! Centralized configuration constants for the slicevox pipeline.
//! Quantization defaults, frame intensity conventions and tuning knobs for
//! the rasterizer, reconstructor and isosurface extractor are defined here so
//! every crate agrees on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ConversionConfig, DEFAULT_DELTA, INSIDE_THRESHOLD};
//!
//! let cfg = ConversionConfig::default();
//! assert_eq!(cfg.delta, DEFAULT_DELTA);
//! assert_eq!(cfg.mc_delta(), DEFAULT_DELTA);
//!
//! // Darker than the midpoint counts as inside.
//! assert!(0u8 < INSIDE_THRESHOLD);
//! assert!(255u8 >= INSIDE_THRESHOLD);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Dependency Free**: Pure values and validation, no I/O
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
