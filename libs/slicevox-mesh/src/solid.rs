//! # Solids
//!
//! An implicit solid answers point containment and reports the box outside
//! of which nothing is contained. The slicer samples a mesh-backed solid;
//! the reconstructor is itself a solid; the isosurface extractor meshes any
//! solid.

use crate::bounds::BoundingBox;
use crate::mesh::Mesh;
use crate::spatial_index::TriangleIndex;
use config::constants::{EPSILON, RAY_DIRECTION};
use glam::DVec3;
use std::sync::Arc;

/// Point-containment capability.
pub trait Solid: Send + Sync {
    /// Returns true if `point` is inside the solid.
    fn contains(&self, point: DVec3) -> bool;

    /// Box enclosing every contained point.
    fn bounds(&self) -> BoundingBox;
}

/// Solid bounded by a closed triangle mesh.
///
/// Containment is decided by the parity of surface crossings along a ray
/// in [`RAY_DIRECTION`]; points outside the mesh bounds are rejected
/// without casting.
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::{primitives::create_cube, MeshSolid, Solid};
/// use glam::DVec3;
///
/// let solid = MeshSolid::new(&create_cube(DVec3::ZERO, DVec3::ONE).unwrap());
/// assert!(solid.contains(DVec3::splat(0.5)));
/// assert!(!solid.contains(DVec3::splat(1.5)));
/// ```
#[derive(Debug, Clone)]
pub struct MeshSolid {
    index: Arc<TriangleIndex>,
    direction: DVec3,
}

impl MeshSolid {
    /// Indexes `mesh` and wraps it as a solid.
    pub fn new(mesh: &Mesh) -> Self {
        Self::from_index(Arc::new(TriangleIndex::from_mesh(mesh)))
    }

    /// Wraps an existing index, sharing it with other queries.
    pub fn from_index(index: Arc<TriangleIndex>) -> Self {
        Self {
            index,
            direction: DVec3::from_array(RAY_DIRECTION).normalize(),
        }
    }

    /// Number of distinct triangles crossed by the parity ray from `point`.
    pub fn crossings(&self, point: DVec3) -> usize {
        let mut hits = Vec::new();
        self.index.walk_ray(point, self.direction, |ids, _, _| {
            hits.extend(ids.iter().copied().filter(|&id| {
                ray_triangle(point, self.direction, self.index.triangle(id)).is_some()
            }));
        });
        hits.sort_unstable();
        hits.dedup();
        hits.len()
    }
}

impl Solid for MeshSolid {
    fn contains(&self, point: DVec3) -> bool {
        if !self.index.bounds().contains_point(point) {
            return false;
        }
        self.crossings(point) % 2 == 1
    }

    fn bounds(&self) -> BoundingBox {
        self.index.bounds()
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the ray parameter of a hit strictly in front of the origin.
fn ray_triangle(origin: DVec3, direction: DVec3, tri: &[DVec3; 3]) -> Option<f64> {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let p = direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON * EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{create_cube, create_sphere};

    #[test]
    fn test_cube_containment() {
        let cube = create_cube(DVec3::ZERO, DVec3::new(1.0, 1.0, 2.0)).unwrap();
        let solid = MeshSolid::new(&cube);
        assert!(solid.contains(DVec3::new(0.25, 0.75, 1.9)));
        assert!(solid.contains(DVec3::new(0.99, 0.01, 0.01)));
        assert!(!solid.contains(DVec3::new(1.01, 0.5, 0.5)));
        assert!(!solid.contains(DVec3::new(0.5, 0.5, -0.01)));
    }

    #[test]
    fn test_sphere_containment_matches_radius() {
        let center = DVec3::new(0.5, 0.5, 1.0);
        let solid = MeshSolid::new(&create_sphere(center, 0.4, 48).unwrap());
        for i in 0..20 {
            for j in 0..20 {
                let p = DVec3::new(i as f64 * 0.05 + 0.025, j as f64 * 0.05 + 0.025, 1.05);
                let r = (p - center).length();
                if r < 0.38 {
                    assert!(solid.contains(p), "{p:?} should be inside");
                } else if r > 0.41 {
                    assert!(!solid.contains(p), "{p:?} should be outside");
                }
            }
        }
    }

    #[test]
    fn test_crossings_parity_from_center() {
        let solid = MeshSolid::new(&create_cube(DVec3::ZERO, DVec3::ONE).unwrap());
        assert_eq!(solid.crossings(DVec3::splat(0.5)), 1);
    }

    #[test]
    fn test_ray_triangle_hit_and_miss() {
        let tri = [
            DVec3::new(-1.0, -1.0, 1.0),
            DVec3::new(1.0, -1.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        ];
        let t = ray_triangle(DVec3::ZERO, DVec3::Z, &tri).unwrap();
        assert!((t - 1.0).abs() < 1e-12);
        assert_eq!(ray_triangle(DVec3::ZERO, -DVec3::Z, &tri), None);
        assert_eq!(ray_triangle(DVec3::new(5.0, 0.0, 0.0), DVec3::Z, &tri), None);
    }

    /// Box [0, 2]³ with five small voids near the floor: 64 triangles, which
    /// puts the outer faces exactly on cell boundaries.
    fn box_with_voids() -> Mesh {
        let mut mesh = create_cube(DVec3::ZERO, DVec3::splat(2.0)).unwrap();
        for corner in [
            DVec3::new(0.1, 0.1, 0.1),
            DVec3::new(1.7, 0.1, 0.1),
            DVec3::new(0.1, 1.7, 0.1),
            DVec3::new(1.7, 1.7, 0.1),
        ] {
            mesh.merge(&create_cube(corner, corner + DVec3::splat(0.2)).unwrap());
        }
        let a = DVec3::new(0.9, 0.9, 0.1);
        let b = DVec3::new(1.1, 0.9, 0.1);
        let c = DVec3::new(1.0, 1.1, 0.1);
        let d = DVec3::new(1.0, 1.0, 0.3);
        mesh.merge(&Mesh::from_triangles([[a, c, b], [a, b, d], [b, c, d], [c, a, d]]));
        mesh
    }

    #[test]
    fn test_faces_on_cell_boundaries_are_counted() {
        let mesh = box_with_voids();
        assert_eq!(mesh.triangle_count(), 64);
        let solid = MeshSolid::new(&mesh);
        assert!((solid.index.cell_size() - 1.0).abs() < 1e-12);

        let mut wrong = Vec::new();
        for i in 0..40 {
            for j in 0..40 {
                let p = DVec3::new(
                    0.025 + 0.049 * i as f64,
                    1.001 + 0.0245 * j as f64,
                    1.05 + 0.0217 * ((i + j) % 40) as f64,
                );
                if !solid.contains(p) {
                    wrong.push(p);
                }
            }
        }
        assert!(
            wrong.is_empty(),
            "{} interior points reported outside, e.g. {:?}",
            wrong.len(),
            wrong.first()
        );
        assert!(solid.contains(DVec3::new(1.5935, 1.001, 1.3)));
    }

    #[test]
    fn test_voids_are_outside() {
        let solid = MeshSolid::new(&box_with_voids());
        assert!(!solid.contains(DVec3::splat(0.2)));
        assert!(!solid.contains(DVec3::new(1.8, 1.8, 0.2)));
        assert!(!solid.contains(DVec3::new(1.0, 0.98, 0.15)));
        assert!(solid.contains(DVec3::new(1.0, 1.0, 0.6)));
    }

    #[test]
    fn test_solid_bounds() {
        let solid = MeshSolid::new(&create_cube(DVec3::splat(-1.0), DVec3::ONE).unwrap());
        assert_eq!(solid.bounds().min, DVec3::splat(-1.0));
        assert_eq!(solid.bounds().max, DVec3::ONE);
    }
}
