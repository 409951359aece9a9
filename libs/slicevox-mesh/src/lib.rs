//! # slicevox Mesh
//!
//! Triangle meshes and the geometric queries built on them.
//!
//! ## Architecture
//!
//! ```text
//! Mesh → TriangleIndex → MeshCollider (box overlap)
//!                      → MeshSolid    (point containment)
//! Solid → extract_isosurface → Mesh
//! ```
//!
//! ## Algorithms
//!
//! - **Spatial hashing**: Uniform grid over triangle bounding boxes
//! - **Box overlap**: Separating-axis triangle/box test
//! - **Containment**: Ray parity with a fixed skewed direction
//! - **Isosurface**: Marching tetrahedra with bisection refinement
//!
//! ## Usage
//!
//! ```rust
//! use slicevox_mesh::{extract_isosurface, primitives::create_sphere, MeshSolid, Solid};
//! use glam::DVec3;
//!
//! let sphere = create_sphere(DVec3::ZERO, 1.0, 24).unwrap();
//! let solid = MeshSolid::new(&sphere);
//! assert!(solid.contains(DVec3::ZERO));
//!
//! let remeshed = extract_isosurface(&solid, 0.2, 6).unwrap();
//! assert!(remeshed.signed_volume() > 3.0);
//! ```

pub mod bounds;
pub mod collider;
pub mod error;
pub mod isosurface;
pub mod mesh;
pub mod primitives;
pub mod solid;
pub mod spatial_index;

pub use bounds::BoundingBox;
pub use collider::{Collider, ExhaustiveCollider, MeshCollider};
pub use error::{MeshError, MeshResult};
pub use isosurface::extract_isosurface;
pub use mesh::Mesh;
pub use solid::{MeshSolid, Solid};
pub use spatial_index::TriangleIndex;
