//! # Cube Primitive
//!
//! Generates an axis-aligned box between two corners.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;

/// Creates an axis-aligned box mesh spanning `min` to `max`.
///
/// # Arguments
///
/// * `min` - Minimum corner
/// * `max` - Maximum corner, strictly greater than `min` on every axis
///
/// # Returns
///
/// A mesh with 8 vertices and 12 outward-facing triangles.
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let mesh = create_cube(DVec3::ZERO, DVec3::new(1.0, 1.0, 2.0)).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn create_cube(min: DVec3, max: DVec3) -> Result<Mesh, MeshError> {
    let size = max - min;
    if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
        return Err(MeshError::degenerate(format!(
            "Box size must be positive: {:?}",
            size
        )));
    }

    let mut mesh = Mesh::with_capacity(8, 12);

    // Bottom face (z = min.z)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z));
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z));
    let v2 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z));
    let v3 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z));

    // Top face (z = max.z)
    let v4 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z));
    let v5 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z));
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z));

    // Counter-clockwise seen from outside
    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);

    mesh.add_triangle(v4, v5, v6);
    mesh.add_triangle(v4, v6, v7);

    mesh.add_triangle(v0, v1, v5);
    mesh.add_triangle(v0, v5, v4);

    mesh.add_triangle(v2, v3, v7);
    mesh.add_triangle(v2, v7, v6);

    mesh.add_triangle(v3, v0, v4);
    mesh.add_triangle(v3, v4, v7);

    mesh.add_triangle(v1, v2, v6);
    mesh.add_triangle(v1, v6, v5);

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let mesh = create_cube(DVec3::ZERO, DVec3::splat(10.0)).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate());
    }

    #[test]
    fn test_cube_bounds() {
        let mesh = create_cube(DVec3::splat(-5.0), DVec3::new(5.0, 10.0, 20.0)).unwrap();
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, DVec3::splat(-5.0));
        assert_eq!(bbox.max, DVec3::new(5.0, 10.0, 20.0));
    }

    #[test]
    fn test_cube_outward_normals() {
        let mesh = create_cube(DVec3::ZERO, DVec3::ONE).unwrap();
        let center = DVec3::splat(0.5);
        for i in 0..mesh.triangle_count() {
            let [a, _, _] = mesh.triangle_corners(i);
            assert!(mesh.face_normal(i).dot(a - center) > 0.0);
        }
    }

    #[test]
    fn test_cube_invalid_size() {
        assert!(create_cube(DVec3::ZERO, DVec3::new(0.0, 1.0, 1.0)).is_err());
        assert!(create_cube(DVec3::ONE, DVec3::ZERO).is_err());
    }
}
