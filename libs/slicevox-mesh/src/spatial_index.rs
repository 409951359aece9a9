//! # Spatial Index for Fast Triangle Queries
//!
//! Uses spatial hashing for O(1) average-case triangle lookups. Both the
//! box collider and the ray-parity containment test walk this grid instead
//! of scanning every triangle.
//!
//! ## Features
//!
//! - **Spatial hashing**: Grid-based acceleration structure
//! - **Box queries**: Visit triangles registered in cells overlapping a box
//! - **Ray walks**: Visit cells along a ray in order, with the ray-parameter
//!   interval spent in each cell
//!
//! ## Example
//!
//! ```rust
//! use slicevox_mesh::{primitives::create_cube, BoundingBox, TriangleIndex};
//! use glam::DVec3;
//!
//! let mesh = create_cube(DVec3::ZERO, DVec3::ONE).unwrap();
//! let index = TriangleIndex::from_mesh(&mesh);
//! let query = BoundingBox::new(DVec3::splat(-0.1), DVec3::splat(0.1));
//! assert!(index.any_in_box(&query, |_| true));
//! ```

use crate::bounds::BoundingBox;
use crate::mesh::Mesh;
use glam::DVec3;
use std::collections::HashMap;

/// Cell size multiplier for spatial hashing.
/// Larger values = fewer cells but more triangles per cell.
const CELL_SIZE_FACTOR: f64 = 2.0;

/// Smallest cell size as a fraction of the mean mesh extent.
const MIN_CELL_FRACTION: f64 = 1e-3;

/// Triangle boxes are grown by this fraction of the cell size before
/// registration, so geometry lying on a cell boundary lands in both cells.
const REGISTRATION_MARGIN: f64 = 1e-6;

/// 3D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i32,
    y: i32,
    z: i32,
}

impl CellCoord {
    /// Creates a cell coordinate from a 3D position.
    fn from_position(pos: DVec3, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i32,
            y: (pos.y / cell_size).floor() as i32,
            z: (pos.z / cell_size).floor() as i32,
        }
    }

    fn clamp(self, lo: CellCoord, hi: CellCoord) -> Self {
        Self {
            x: self.x.clamp(lo.x, hi.x),
            y: self.y.clamp(lo.y, hi.y),
            z: self.z.clamp(lo.z, hi.z),
        }
    }

    fn within(self, lo: CellCoord, hi: CellCoord) -> bool {
        (lo.x..=hi.x).contains(&self.x)
            && (lo.y..=hi.y).contains(&self.y)
            && (lo.z..=hi.z).contains(&self.z)
    }
}

/// Spatial index over the triangles of one mesh.
///
/// Owns a copy of every triangle's corners so queries never touch the
/// source mesh again.
#[derive(Debug)]
pub struct TriangleIndex {
    /// Triangle corners, indexed by triangle id
    triangles: Vec<[DVec3; 3]>,
    /// Hash grid: cell -> triangle ids
    grid: HashMap<CellCoord, Vec<usize>>,
    /// Cell edge length
    cell_size: f64,
    /// Bounds of all indexed triangles
    bounds: BoundingBox,
    /// Cell range covered by `bounds`
    cell_min: CellCoord,
    cell_max: CellCoord,
}

impl TriangleIndex {
    /// Creates a spatial index from a mesh.
    ///
    /// Cell size is derived from the mesh extent and triangle count so that
    /// each cell holds a handful of triangles on average.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let triangles: Vec<[DVec3; 3]> = mesh.iter_triangles().collect();
        let bounds = BoundingBox::from_points(triangles.iter().flatten().copied());

        let extent = bounds.extent();
        let avg_extent = (extent.x + extent.y + extent.z) / 3.0;
        let count = triangles.len().max(1) as f64;
        let mut cell_size =
            (avg_extent / count.cbrt() * CELL_SIZE_FACTOR).max(avg_extent * MIN_CELL_FRACTION);
        if !(cell_size.is_finite() && cell_size > 0.0) {
            cell_size = 1.0;
        }

        let margin = DVec3::splat(cell_size * REGISTRATION_MARGIN);
        let mut grid: HashMap<CellCoord, Vec<usize>> = HashMap::new();
        for (i, [v0, v1, v2]) in triangles.iter().enumerate() {
            let tri_min = v0.min(*v1).min(*v2) - margin;
            let tri_max = v0.max(*v1).max(*v2) + margin;

            let cell_min = CellCoord::from_position(tri_min, cell_size);
            let cell_max = CellCoord::from_position(tri_max, cell_size);

            for cx in cell_min.x..=cell_max.x {
                for cy in cell_min.y..=cell_max.y {
                    for cz in cell_min.z..=cell_max.z {
                        grid.entry(CellCoord { x: cx, y: cy, z: cz })
                            .or_default()
                            .push(i);
                    }
                }
            }
        }

        let (cell_min, cell_max) = if bounds.is_empty() {
            (CellCoord { x: 0, y: 0, z: 0 }, CellCoord { x: -1, y: -1, z: -1 })
        } else {
            (
                CellCoord::from_position(bounds.min - margin, cell_size),
                CellCoord::from_position(bounds.max + margin, cell_size),
            )
        };

        log::debug!(
            "indexed {} triangles into {} cells (cell size {:.4})",
            triangles.len(),
            grid.len(),
            cell_size
        );

        Self {
            triangles,
            grid,
            cell_size,
            bounds,
            cell_min,
            cell_max,
        }
    }

    /// Corners of the triangle with the given id.
    #[inline]
    pub fn triangle(&self, id: usize) -> &[DVec3; 3] {
        &self.triangles[id]
    }

    /// Number of indexed triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounds of all indexed triangles.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Returns the number of non-empty cells in the index.
    pub fn cell_count(&self) -> usize {
        self.grid.len()
    }

    /// Returns the cell size used for hashing.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Calls `test` for triangles registered in cells overlapping `query`
    /// until it returns true.
    ///
    /// A triangle spanning several cells may be offered more than once.
    /// Returns false without visiting anything when the query misses the
    /// mesh bounds.
    pub fn any_in_box<F>(&self, query: &BoundingBox, mut test: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        if self.bounds.is_empty() || !self.bounds.intersects(query) {
            return false;
        }
        let lo = CellCoord::from_position(query.min, self.cell_size)
            .clamp(self.cell_min, self.cell_max);
        let hi = CellCoord::from_position(query.max, self.cell_size)
            .clamp(self.cell_min, self.cell_max);

        for cx in lo.x..=hi.x {
            for cy in lo.y..=hi.y {
                for cz in lo.z..=hi.z {
                    let Some(tris) = self.grid.get(&CellCoord { x: cx, y: cy, z: cz }) else {
                        continue;
                    };
                    if tris.iter().any(|&id| test(id)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Walks the cells pierced by the ray `origin + t * direction` for
    /// `t >= 0`, in order of increasing `t`.
    ///
    /// `visit` receives the triangle ids of each non-empty cell together with
    /// the parameter interval `[t_enter, t_exit)` the ray spends in that
    /// cell. A triangle spanning several cells is offered once per cell, so
    /// callers counting hits must deduplicate by id.
    ///
    /// The walk stops once the ray leaves the indexed bounds.
    pub fn walk_ray<F>(&self, origin: DVec3, direction: DVec3, mut visit: F)
    where
        F: FnMut(&[usize], f64, f64),
    {
        if self.bounds.is_empty() {
            return;
        }
        let cs = self.cell_size;
        let mut current = CellCoord::from_position(origin, cs);

        let axis = |o: f64, d: f64, cell: i32| -> (f64, f64, i32) {
            if d > 0.0 {
                (((cell + 1) as f64 * cs - o) / d, cs / d, 1)
            } else if d < 0.0 {
                ((cell as f64 * cs - o) / d, -cs / d, -1)
            } else {
                (f64::INFINITY, f64::INFINITY, 0)
            }
        };
        let (mut tx, dx, sx) = axis(origin.x, direction.x, current.x);
        let (mut ty, dy, sy) = axis(origin.y, direction.y, current.y);
        let (mut tz, dz, sz) = axis(origin.z, direction.z, current.z);

        let mut t_enter = 0.0;
        loop {
            let t_exit = tx.min(ty).min(tz);
            if current.within(self.cell_min, self.cell_max) {
                if let Some(tris) = self.grid.get(&current) {
                    visit(tris, t_enter, t_exit);
                }
            } else if self.leaving(current, sx, sy, sz) {
                break;
            }
            if !t_exit.is_finite() {
                break;
            }

            if tx <= ty && tx <= tz {
                current.x += sx;
                tx += dx;
            } else if ty <= tz {
                current.y += sy;
                ty += dy;
            } else {
                current.z += sz;
                tz += dz;
            }
            t_enter = t_exit;
        }
    }

    /// True when `cell` is outside the indexed range on an axis along which
    /// the ray only moves further away.
    fn leaving(&self, cell: CellCoord, sx: i32, sy: i32, sz: i32) -> bool {
        let past = |c: i32, lo: i32, hi: i32, s: i32| (c > hi && s >= 0) || (c < lo && s <= 0);
        past(cell.x, self.cell_min.x, self.cell_max.x, sx)
            || past(cell.y, self.cell_min.y, self.cell_max.y, sy)
            || past(cell.z, self.cell_min.z, self.cell_max.z, sz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::create_cube;

    fn create_test_mesh() -> Mesh {
        create_cube(DVec3::ZERO, DVec3::ONE).unwrap()
    }

    #[test]
    fn test_spatial_index_creation() {
        let index = TriangleIndex::from_mesh(&create_test_mesh());
        assert_eq!(index.triangle_count(), 12);
        assert!(index.cell_count() > 0);
        assert!(index.cell_size() > 0.0);
    }

    #[test]
    fn test_box_query_hits_corner() {
        let index = TriangleIndex::from_mesh(&create_test_mesh());
        let mut seen = Vec::new();
        index.any_in_box(
            &BoundingBox::new(DVec3::splat(-0.1), DVec3::splat(0.1)),
            |id| {
                seen.push(id);
                false
            },
        );
        assert!(!seen.is_empty());
    }

    #[test]
    fn test_box_query_misses_far_box() {
        let index = TriangleIndex::from_mesh(&create_test_mesh());
        let far = BoundingBox::new(DVec3::splat(10.0), DVec3::splat(11.0));
        assert!(!index.any_in_box(&far, |_| true));
    }

    #[test]
    fn test_ray_walk_visits_in_order() {
        let index = TriangleIndex::from_mesh(&create_test_mesh());
        let mut intervals = Vec::new();
        index.walk_ray(DVec3::splat(0.5), DVec3::new(0.3, 0.2, 0.9).normalize(), |_, a, b| {
            intervals.push((a, b));
        });
        assert!(!intervals.is_empty());
        for pair in intervals.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
        for (a, b) in intervals {
            assert!(a <= b);
        }
    }

    #[test]
    fn test_empty_mesh_index() {
        let index = TriangleIndex::from_mesh(&Mesh::new());
        assert_eq!(index.triangle_count(), 0);
        assert!(!index.any_in_box(&BoundingBox::new(DVec3::ZERO, DVec3::ONE), |_| true));
        let mut visited = false;
        index.walk_ray(DVec3::ZERO, DVec3::X, |_, _, _| visited = true);
        assert!(!visited);
    }
}
