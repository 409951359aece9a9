//! # slicevox Core
//!
//! Conversion between triangle meshes and stacks of binary cross-sections.
//!
//! ## Architecture
//!
//! ```text
//! Mesh ──▶ SliceEngine ──▶ Frame, Frame, ...
//!                                 │
//!                                 ▼
//!          VolumeReconstructor (Solid) ──▶ extract_isosurface ──▶ Mesh
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use slicevox_core::{SliceEngine, VolumeReconstructor};
//! use slicevox_mesh::{primitives::create_cube, Solid};
//! use glam::DVec3;
//!
//! let cube = create_cube(DVec3::ZERO, DVec3::splat(2.0)).unwrap();
//! let engine = SliceEngine::new(&cube, 0.25).unwrap();
//!
//! let mut recon = VolumeReconstructor::new(engine.delta(), 1, 0).unwrap();
//! for i in 0..engine.num_frames() {
//!     recon.add_frame(&engine.slice(i).unwrap());
//! }
//! assert!(recon.contains(DVec3::new(1.0, 1.0, 1.0)));
//! ```

pub mod error;
pub mod frame;
pub mod outline;
pub mod reconstructor;
pub mod slicer;

pub use error::{SliceError, SliceResult};
pub use frame::Frame;
pub use outline::{Outline, OutlineSdf};
pub use reconstructor::{SurfaceLayer, VolumeReconstructor};
pub use slicer::SliceEngine;
