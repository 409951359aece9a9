//! # Box Colliders
//!
//! Answers "does this axis-aligned box touch the surface?". The slicer uses
//! a negative answer to prove a whole pixel region uniform.
//!
//! Two implementations:
//!
//! - [`MeshCollider`]: spatial hash candidates + exact triangle/box
//!   separating-axis test
//! - [`ExhaustiveCollider`]: always reports contact, which degrades the
//!   adaptive rasterizer into a per-pixel reference

use crate::bounds::BoundingBox;
use crate::mesh::Mesh;
use crate::spatial_index::TriangleIndex;
use config::constants::EPSILON;
use glam::DVec3;
use std::sync::Arc;

/// Bounding-volume query against a boundary surface.
pub trait Collider: Send + Sync {
    /// Returns true if the closed box may touch the surface.
    ///
    /// False positives are allowed; false negatives are not.
    fn intersects_box(&self, bbox: &BoundingBox) -> bool;
}

/// Collider over the triangles of a mesh.
#[derive(Debug, Clone)]
pub struct MeshCollider {
    index: Arc<TriangleIndex>,
}

impl MeshCollider {
    /// Indexes `mesh` and wraps it as a collider.
    pub fn new(mesh: &Mesh) -> Self {
        Self::from_index(Arc::new(TriangleIndex::from_mesh(mesh)))
    }

    /// Wraps an existing index, sharing it with other queries.
    pub fn from_index(index: Arc<TriangleIndex>) -> Self {
        Self { index }
    }
}

impl Collider for MeshCollider {
    fn intersects_box(&self, bbox: &BoundingBox) -> bool {
        self.index
            .any_in_box(bbox, |id| triangle_intersects_box(self.index.triangle(id), bbox))
    }
}

/// Collider that reports contact for every box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveCollider;

impl Collider for ExhaustiveCollider {
    #[inline]
    fn intersects_box(&self, _bbox: &BoundingBox) -> bool {
        true
    }
}

/// Exact triangle/box overlap test (separating axis theorem).
///
/// Tests the three box axes, the triangle normal and the nine edge cross
/// products. The box is grown by a tiny margin so that touching counts as
/// overlap.
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::{collider::triangle_intersects_box, BoundingBox};
/// use glam::DVec3;
///
/// let tri = [
///     DVec3::new(-1.0, -1.0, 0.5),
///     DVec3::new(2.0, -1.0, 0.5),
///     DVec3::new(-1.0, 2.0, 0.5),
/// ];
/// assert!(triangle_intersects_box(&tri, &BoundingBox::new(DVec3::ZERO, DVec3::ONE)));
/// let above = BoundingBox::new(DVec3::new(0.0, 0.0, 0.6), DVec3::ONE);
/// assert!(!triangle_intersects_box(&tri, &above));
/// ```
pub fn triangle_intersects_box(tri: &[DVec3; 3], bbox: &BoundingBox) -> bool {
    let center = bbox.center();
    let scale = bbox.extent().max_element().max(1.0);
    let half = (bbox.max - bbox.min) * 0.5 + DVec3::splat(EPSILON * scale);

    let v0 = tri[0] - center;
    let v1 = tri[1] - center;
    let v2 = tri[2] - center;

    // Box face normals
    let tri_min = v0.min(v1).min(v2);
    let tri_max = v0.max(v1).max(v2);
    if tri_min.cmpgt(half).any() || tri_max.cmplt(-half).any() {
        return false;
    }

    let e0 = v1 - v0;
    let e1 = v2 - v1;
    let e2 = v0 - v2;

    // Edge cross products
    for edge in [e0, e1, e2] {
        for unit in [DVec3::X, DVec3::Y, DVec3::Z] {
            let axis = unit.cross(edge);
            if axis.length_squared() < EPSILON * EPSILON {
                continue;
            }
            if separated_on(axis, v0, v1, v2, half) {
                return false;
            }
        }
    }

    // Triangle plane
    let normal = e0.cross(e1);
    if normal.length_squared() > 0.0 {
        let radius = half.dot(normal.abs());
        let distance = normal.dot(v0);
        if distance.abs() > radius {
            return false;
        }
    }

    true
}

fn separated_on(axis: DVec3, v0: DVec3, v1: DVec3, v2: DVec3, half: DVec3) -> bool {
    let p0 = axis.dot(v0);
    let p1 = axis.dot(v1);
    let p2 = axis.dot(v2);
    let radius = half.dot(axis.abs());
    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}
