//! # Primitives
//!
//! Closed test solids (box, UV sphere) used by tests and demos.

pub mod cube;
pub mod sphere;

pub use cube::create_cube;
pub use sphere::create_sphere;
