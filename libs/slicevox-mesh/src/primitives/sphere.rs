//! # Sphere Primitive
//!
//! Generates a closed sphere using latitude/longitude tessellation.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::PI;

/// Creates a sphere mesh using latitude/longitude tessellation.
///
/// # Arguments
///
/// * `center` - Center of the sphere
/// * `radius` - The radius of the sphere
/// * `segments` - Number of segments around the circumference
///
/// # Algorithm
///
/// - `num_rings = (segments + 1) / 2`
/// - Ring `i` sits at polar angle `phi = PI * (i + 0.5) / num_rings`
/// - No pole vertices; the first and last rings are closed by fans
///
/// Every vertex lies exactly on the sphere, so the mesh is inscribed.
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::primitives::create_sphere;
/// use glam::DVec3;
///
/// let mesh = create_sphere(DVec3::ZERO, 5.0, 32).unwrap();
/// assert!(mesh.vertex_count() > 0);
/// ```
pub fn create_sphere(center: DVec3, radius: f64, segments: u32) -> Result<Mesh, MeshError> {
    if !(radius > 0.0) {
        return Err(MeshError::degenerate(format!(
            "Sphere radius must be positive: {}",
            radius
        )));
    }

    if segments < 3 {
        return Err(MeshError::degenerate(format!(
            "Sphere segments must be at least 3: {}",
            segments
        )));
    }

    let num_rings = (segments + 1) / 2;
    let mut mesh = Mesh::new();
    let mut rings: Vec<Vec<u32>> = Vec::with_capacity(num_rings as usize);

    for i in 0..num_rings {
        // Polar angle (0 = top, PI = bottom)
        let phi = PI * (i as f64 + 0.5) / num_rings as f64;
        let ring_radius = radius * phi.sin();
        let z = radius * phi.cos();

        let ring = (0..segments)
            .map(|j| {
                let theta = 2.0 * PI * j as f64 / segments as f64;
                let offset = DVec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z);
                mesh.add_vertex(center + offset)
            })
            .collect();
        rings.push(ring);
    }

    let first_ring = &rings[0];
    for j in 1..segments as usize - 1 {
        mesh.add_triangle(first_ring[0], first_ring[j], first_ring[j + 1]);
    }

    for pair in rings.windows(2) {
        let (ring_a, ring_b) = (&pair[0], &pair[1]);
        for j in 0..segments as usize {
            let j_next = (j + 1) % segments as usize;
            mesh.add_triangle(ring_a[j], ring_b[j], ring_b[j_next]);
            mesh.add_triangle(ring_a[j], ring_b[j_next], ring_a[j_next]);
        }
    }

    let last_ring = &rings[rings.len() - 1];
    for j in 1..segments as usize - 1 {
        mesh.add_triangle(last_ring[0], last_ring[j + 1], last_ring[j]);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_validates() {
        let mesh = create_sphere(DVec3::ZERO, 5.0, 16).unwrap();
        assert!(mesh.triangle_count() > 0);
        assert!(mesh.validate());
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let center = DVec3::new(0.5, 0.5, 1.0);
        let mesh = create_sphere(center, 0.4, 24).unwrap();
        for v in mesh.vertices() {
            assert!(((*v - center).length() - 0.4).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sphere_volume_close_to_analytic() {
        let mesh = create_sphere(DVec3::ZERO, 1.0, 64).unwrap();
        let analytic = 4.0 / 3.0 * PI;
        let volume = mesh.signed_volume();
        assert!(volume > 0.0, "triangles should face outward");
        assert!((volume - analytic).abs() / analytic < 0.02);
    }

    #[test]
    fn test_sphere_invalid_parameters() {
        assert!(create_sphere(DVec3::ZERO, 0.0, 16).is_err());
        assert!(create_sphere(DVec3::ZERO, -5.0, 16).is_err());
        assert!(create_sphere(DVec3::ZERO, 5.0, 2).is_err());
    }
}
