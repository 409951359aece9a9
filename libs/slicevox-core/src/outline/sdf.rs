//! # Outline Signed Distance
//!
//! Signed distance to an [`Outline`]: positive inside, negative outside,
//! magnitude equal to the distance to the nearest segment.
//!
//! ## Acceleration
//!
//! Segments are bucketed twice over a uniform grid:
//! - per cell, for the nearest-segment search (rings of cells around the
//!   query, stopping once no unvisited cell can be closer)
//! - per row, for the winding number (only segments spanning the query's
//!   row can cross the horizontal line through it)
//!
//! The winding test uses exact orientation predicates from `robust`.

use super::Outline;
use config::constants::OUTLINE_SEGMENTS_PER_CELL;
use glam::DVec2;
use robust::{orient2d, Coord};

/// Upper bound on grid cells along either axis.
const MAX_GRID_DIM: usize = 1024;

/// Signed distance field of a closed outline.
///
/// An empty outline is outside everywhere and evaluates to `-f64::MAX`.
///
/// # Example
///
/// ```rust
/// use slicevox_core::{Outline, OutlineSdf};
/// use glam::DVec2;
///
/// let square = Outline::from_loops(vec![vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(2.0, 0.0),
///     DVec2::new(2.0, 2.0),
///     DVec2::new(0.0, 2.0),
/// ]]);
/// let sdf = OutlineSdf::new(&square);
/// assert_eq!(sdf.evaluate(DVec2::new(1.0, 1.0)), 1.0);
/// assert_eq!(sdf.evaluate(DVec2::new(3.0, 1.0)), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct OutlineSdf {
    segments: Vec<[DVec2; 2]>,
    origin: DVec2,
    cell: f64,
    cols: usize,
    rows: usize,
    /// Segment ids per cell, row-major
    cells: Vec<Vec<u32>>,
    /// Segment ids per row
    row_segments: Vec<Vec<u32>>,
}

impl OutlineSdf {
    /// Builds the field for `outline`.
    pub fn new(outline: &Outline) -> Self {
        let segments: Vec<[DVec2; 2]> = outline
            .segments()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| [a, b])
            .collect();

        let Some((lo, hi)) = outline.bounds() else {
            return Self {
                segments,
                origin: DVec2::ZERO,
                cell: 1.0,
                cols: 0,
                rows: 0,
                cells: Vec::new(),
                row_segments: Vec::new(),
            };
        };

        let extent = (hi - lo).max(DVec2::splat(f64::EPSILON));
        let per_cell = OUTLINE_SEGMENTS_PER_CELL.max(1.0);
        let mut cell = (extent.x * extent.y * per_cell / segments.len().max(1) as f64).sqrt();
        let limit = extent.max_element() / MAX_GRID_DIM as f64;
        if !(cell.is_finite() && cell > limit) {
            cell = limit.max(f64::EPSILON);
        }
        let cols = ((extent.x / cell).floor() as usize + 1).min(MAX_GRID_DIM);
        let rows = ((extent.y / cell).floor() as usize + 1).min(MAX_GRID_DIM);

        let mut sdf = Self {
            segments,
            origin: lo,
            cell,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            row_segments: vec![Vec::new(); rows],
        };
        for (id, [a, b]) in sdf.segments.iter().enumerate() {
            let (c0, r0) = sdf.cell_of(a.min(*b));
            let (c1, r1) = sdf.cell_of(a.max(*b));
            for r in r0..=r1 {
                sdf.row_segments[r].push(id as u32);
                for c in c0..=c1 {
                    sdf.cells[r * cols + c].push(id as u32);
                }
            }
        }
        sdf
    }

    /// Number of non-degenerate segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Signed distance at `point`.
    pub fn evaluate(&self, point: DVec2) -> f64 {
        if self.segments.is_empty() {
            return -f64::MAX;
        }
        let distance = self.nearest_distance(point);
        if self.winding(point) != 0 {
            distance
        } else {
            -distance
        }
    }

    /// Grid cell containing `p`, clamped into the grid.
    fn cell_of(&self, p: DVec2) -> (usize, usize) {
        let rel = (p - self.origin) / self.cell;
        let clamp = |v: f64, n: usize| {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                (v.floor() as usize).min(n - 1)
            }
        };
        (clamp(rel.x, self.cols), clamp(rel.y, self.rows))
    }

    /// Distance to the nearest segment, by rings of cells around `point`.
    fn nearest_distance(&self, point: DVec2) -> f64 {
        let (pc, pr) = self.cell_of(point);
        let max_ring = self.cols.max(self.rows);
        let mut best_sq = f64::INFINITY;

        for ring in 0..=max_ring {
            let c0 = pc.saturating_sub(ring);
            let r0 = pr.saturating_sub(ring);
            let c1 = (pc + ring).min(self.cols - 1);
            let r1 = (pr + ring).min(self.rows - 1);
            for r in r0..=r1 {
                for c in c0..=c1 {
                    let on_ring = r.abs_diff(pr) == ring || c.abs_diff(pc) == ring;
                    if !on_ring {
                        continue;
                    }
                    for &id in &self.cells[r * self.cols + c] {
                        let [a, b] = self.segments[id as usize];
                        best_sq = best_sq.min(point_segment_distance_sq(point, a, b));
                    }
                }
            }
            // Unvisited cells are at least `ring` whole cells away.
            let reach = ring as f64 * self.cell;
            if best_sq.is_finite() && best_sq <= reach * reach {
                break;
            }
        }
        best_sq.sqrt()
    }

    /// Winding number of the outline around `point`.
    fn winding(&self, point: DVec2) -> i32 {
        let lo = self.origin;
        let hi = self.origin + DVec2::new(self.cols as f64, self.rows as f64) * self.cell;
        if point.y < lo.y || point.y > hi.y {
            return 0;
        }
        let (_, row) = self.cell_of(point);
        let p = coord(point);
        let mut winding = 0;
        for &id in &self.row_segments[row] {
            let [a, b] = self.segments[id as usize];
            if a.y <= point.y {
                if b.y > point.y && orient2d(coord(a), coord(b), p) > 0.0 {
                    winding += 1;
                }
            } else if b.y <= point.y && orient2d(coord(a), coord(b), p) < 0.0 {
                winding -= 1;
            }
        }
        winding
    }
}

#[inline]
fn coord(p: DVec2) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

fn point_segment_distance_sq(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    (a + ab * t).distance_squared(p)
}
