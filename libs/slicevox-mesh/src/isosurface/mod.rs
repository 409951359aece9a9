//! # Isosurface Extraction
//!
//! Converts any [`Solid`] into a closed triangle mesh.
//!
//! ## Algorithm Overview
//!
//! Marching tetrahedra over a regular lattice:
//! 1. Sample containment at every lattice point of the solid's bounds grown
//!    by one cell (in parallel). Points outside the bounds count as outside,
//!    so the surface always closes.
//! 2. Split every lattice cube into six tetrahedra around its main diagonal.
//!    All cubes use the same diagonal, so neighbouring tetrahedra share faces
//!    and the result is watertight.
//! 3. Every lattice edge with one inside and one outside end gets one vertex,
//!    placed by bisecting the containment function `search_depth` times.
//! 4. Triangles are oriented so their normals point away from the inside
//!    corners of their tetrahedron.

#[cfg(test)]
mod tests;

use crate::bounds::BoundingBox;
use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::solid::Solid;
use config::constants::{is_valid_delta, MAX_GRID_SAMPLES};
use glam::DVec3;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Cube corner offsets, indexed 0..8.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [1, 1, 1],
    [0, 1, 1],
];

/// Six tetrahedra sharing the 0-6 diagonal.
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
    [0, 5, 1, 6],
];

/// Regular sampling lattice covering a solid.
struct Lattice {
    origin: DVec3,
    delta: f64,
    dims: [usize; 3],
}

impl Lattice {
    fn covering(bounds: &BoundingBox, delta: f64) -> MeshResult<Self> {
        let origin = bounds.min - DVec3::splat(delta);
        let extent = bounds.extent();
        let axis = |e: f64| (e / delta).ceil() as usize + 3;
        let dims = [axis(extent.x), axis(extent.y), axis(extent.z)];
        let count = dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .unwrap_or(usize::MAX);
        if count > MAX_GRID_SAMPLES {
            return Err(MeshError::TooManyCells {
                count,
                max: MAX_GRID_SAMPLES,
            });
        }
        Ok(Self {
            origin,
            delta,
            dims,
        })
    }

    #[inline]
    fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    #[inline]
    fn id(&self, i: usize, j: usize, k: usize) -> usize {
        i + self.dims[0] * (j + self.dims[1] * k)
    }

    #[inline]
    fn point(&self, id: usize) -> DVec3 {
        let i = id % self.dims[0];
        let j = (id / self.dims[0]) % self.dims[1];
        let k = id / (self.dims[0] * self.dims[1]);
        self.origin + DVec3::new(i as f64, j as f64, k as f64) * self.delta
    }
}

/// Triangle awaiting vertex positions: edge keys plus the centroid of the
/// inside corners of its tetrahedron.
struct PendingTriangle {
    edges: [(usize, usize); 3],
    inside: DVec3,
}

/// Extracts the boundary of `solid` as a triangle mesh.
///
/// # Arguments
///
/// * `solid` - The solid to mesh; only its bounds and containment are used
/// * `delta` - Lattice spacing
/// * `search_depth` - Bisection steps per surface vertex
///
/// # Errors
///
/// Fails on an unusable `delta`, on empty or infinite bounds, and when the
/// lattice would exceed [`MAX_GRID_SAMPLES`].
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::{extract_isosurface, primitives::create_cube, MeshSolid};
/// use glam::DVec3;
///
/// let solid = MeshSolid::new(&create_cube(DVec3::ZERO, DVec3::ONE).unwrap());
/// let mesh = extract_isosurface(&solid, 0.25, 6).unwrap();
/// assert!(mesh.triangle_count() > 0);
/// ```
pub fn extract_isosurface<S>(solid: &S, delta: f64, search_depth: usize) -> MeshResult<Mesh>
where
    S: Solid + ?Sized,
{
    if !is_valid_delta(delta) {
        return Err(MeshError::InvalidResolution { delta });
    }
    let bounds = solid.bounds();
    if bounds.is_empty() || !bounds.min.is_finite() || !bounds.max.is_finite() {
        return Err(MeshError::InvalidBounds);
    }

    let inside = |p: DVec3| bounds.contains_point(p) && solid.contains(p);

    let lattice = Lattice::covering(&bounds, delta)?;
    log::debug!(
        "extracting isosurface on a {}x{}x{} lattice (delta {})",
        lattice.dims[0],
        lattice.dims[1],
        lattice.dims[2],
        delta
    );

    let samples: Vec<bool> = (0..lattice.len())
        .into_par_iter()
        .map(|id| inside(lattice.point(id)))
        .collect();

    let (pending, edges) = march(&lattice, &samples);

    let positions: Vec<DVec3> = edges
        .par_iter()
        .map(|&(a, b)| bisect(&inside, lattice.point(a), lattice.point(b), search_depth))
        .collect();

    let edge_ids: HashMap<(usize, usize), u32> = edges
        .iter()
        .enumerate()
        .map(|(i, key)| (*key, i as u32))
        .collect();

    let mut mesh = Mesh::with_capacity(positions.len(), pending.len());
    for p in &positions {
        mesh.add_vertex(*p);
    }
    for tri in &pending {
        let [a, b, c] = tri.edges.map(|key| edge_ids[&key]);
        let (pa, pb, pc) = (positions[a as usize], positions[b as usize], positions[c as usize]);
        let normal = (pb - pa).cross(pc - pa);
        let centroid = (pa + pb + pc) / 3.0;
        if normal.dot(centroid - tri.inside) >= 0.0 {
            mesh.add_triangle(a, b, c);
        } else {
            mesh.add_triangle(a, c, b);
        }
    }

    log::debug!(
        "isosurface has {} vertices and {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Walks every tetrahedron and emits triangles keyed by crossing edges.
///
/// Returns the triangles and the list of distinct crossing edges, each as
/// `(inside_id, outside_id)`.
fn march(lattice: &Lattice, samples: &[bool]) -> (Vec<PendingTriangle>, Vec<(usize, usize)>) {
    let [nx, ny, nz] = lattice.dims;
    let mut pending = Vec::new();
    let mut edges = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    let mut edge = |a: usize, b: usize| {
        let key = if samples[a] { (a, b) } else { (b, a) };
        if seen.insert(key) {
            edges.push(key);
        }
        key
    };

    for k in 0..nz - 1 {
        for j in 0..ny - 1 {
            for i in 0..nx - 1 {
                let corner_ids =
                    CORNERS.map(|[di, dj, dk]| lattice.id(i + di, j + dj, k + dk));
                for tet in TETRAHEDRA {
                    let ids = tet.map(|c| corner_ids[c]);
                    let (ins, outs): (Vec<usize>, Vec<usize>) =
                        ids.iter().partition(|&&id| samples[id]);
                    if ins.is_empty() || outs.is_empty() {
                        continue;
                    }
                    let inside = ins.iter().map(|&id| lattice.point(id)).sum::<DVec3>()
                        / ins.len() as f64;

                    match (ins.as_slice(), outs.as_slice()) {
                        ([a], [b, c, d]) | ([b, c, d], [a]) => {
                            let keys = [edge(*a, *b), edge(*a, *c), edge(*a, *d)];
                            pending.push(PendingTriangle {
                                edges: keys,
                                inside,
                            });
                        }
                        ([a, b], [c, d]) => {
                            let ac = edge(*a, *c);
                            let ad = edge(*a, *d);
                            let bd = edge(*b, *d);
                            let bc = edge(*b, *c);
                            pending.push(PendingTriangle {
                                edges: [ac, ad, bd],
                                inside,
                            });
                            pending.push(PendingTriangle {
                                edges: [ac, bd, bc],
                                inside,
                            });
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    (pending, edges)
}

/// Bisects between an inside and an outside point.
fn bisect<F>(inside: &F, mut lo: DVec3, mut hi: DVec3, depth: usize) -> DVec3
where
    F: Fn(DVec3) -> bool,
{
    for _ in 0..depth {
        let mid = (lo + hi) * 0.5;
        if inside(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) * 0.5
}
