//! # Mesh Data Structure
//!
//! Indexed triangle mesh consumed by the slicer and produced by isosurface
//! extraction.

use crate::bounds::BoundingBox;
use config::constants::EPSILON;
use glam::DVec3;

/// A triangle mesh with vertices and indices.
///
/// Triangles are wound counter-clockwise when seen from outside. Nothing in
/// the slicer depends on the winding, but exported STL normals and
/// [`Mesh::signed_volume`] do.
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Builds a mesh from loose triangles, one vertex per corner.
    ///
    /// This is the shape STL files arrive in; shared corners are not merged.
    pub fn from_triangles<I: IntoIterator<Item = [DVec3; 3]>>(triangles: I) -> Self {
        let mut mesh = Mesh::new();
        for [a, b, c] in triangles {
            let i = mesh.add_vertex(a);
            let j = mesh.add_vertex(b);
            let k = mesh.add_vertex(c);
            mesh.add_triangle(i, j, k);
        }
        mesh
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the three corner positions of a triangle.
    #[inline]
    pub fn triangle_corners(&self, index: usize) -> [DVec3; 3] {
        let [a, b, c] = self.triangles[index];
        [self.vertex(a), self.vertex(b), self.vertex(c)]
    }

    /// Iterates over the corner positions of every triangle.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        (0..self.triangles.len()).map(move |i| self.triangle_corners(i))
    }

    /// Unit normal of a triangle, or zero for a degenerate one.
    pub fn face_normal(&self, index: usize) -> DVec3 {
        let [a, b, c] = self.triangle_corners(index);
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Computes the axis-aligned bounding box of all referenced and
    /// unreferenced vertices. Empty for a mesh without vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().copied())
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|tri| [tri[0] + offset, tri[1] + offset, tri[2] + offset]),
        );
    }

    /// Signed enclosed volume (positive for outward-facing triangles).
    ///
    /// Only meaningful for closed meshes.
    pub fn signed_volume(&self) -> f64 {
        self.iter_triangles()
            .map(|[a, b, c]| a.dot(b.cross(c)))
            .sum::<f64>()
            / 6.0
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No triangle repeats a vertex index
    /// - No zero-area triangles
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        self.triangles.iter().all(|tri| {
            if tri.iter().any(|&i| i >= vertex_count) {
                return false;
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            (v1 - v0).cross(v2 - v0).length() > EPSILON
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_new() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.bounding_box().is_empty());
    }

    #[test]
    fn test_mesh_from_triangles() {
        let mesh = Mesh::from_triangles([[DVec3::ZERO, DVec3::X, DVec3::Y]]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle_corners(0), [DVec3::ZERO, DVec3::X, DVec3::Y]);
        assert_eq!(mesh.face_normal(0), DVec3::Z);
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-1.0, -2.0, -3.0));
        mesh.add_vertex(DVec3::new(4.0, 5.0, 6.0));
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(bbox.max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_mesh_translate() {
        let mut mesh = create_cube(DVec3::ZERO, DVec3::ONE).unwrap();
        mesh.translate(DVec3::new(10.0, 0.0, 0.0));
        let bbox = mesh.bounding_box();
        assert_eq!(bbox.min, DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(bbox.max, DVec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_mesh_validate_invalid_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_mesh_merge_offsets_indices() {
        let mut a = Mesh::from_triangles([[DVec3::ZERO, DVec3::X, DVec3::Y]]);
        let b = Mesh::from_triangles([[
            DVec3::Z,
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        ]]);
        a.merge(&b);
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.triangles()[1], [3, 4, 5]);
    }

    #[test]
    fn test_cube_signed_volume() {
        let mesh = create_cube(DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-12);
    }
}
