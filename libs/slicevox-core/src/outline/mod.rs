//! # Outlines
//!
//! Closed polygonal boundaries of the inside region of a [`Frame`].
//!
//! Loops run along pixel edges, in pixel units, with the inside on the left
//! (counter-clockwise around solid areas, clockwise around holes). Pixel
//! `(x, y)` covers `[x, x + 1] × [y, y + 1]`.

pub mod sdf;

pub use sdf::OutlineSdf;

use crate::frame::Frame;
use glam::DVec2;
use std::collections::HashMap;

/// Set of closed loops.
///
/// # Example
///
/// ```rust
/// use slicevox_core::{Frame, Outline};
///
/// let mut frame = Frame::new(4, 4);
/// frame.fill_rect(1, 1, 2, 2, 0);
/// let outline = Outline::from_mask(&frame, 128);
/// assert_eq!(outline.loops().len(), 1);
/// assert_eq!(outline.loops()[0].len(), 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    loops: Vec<Vec<DVec2>>,
}

type Corner = (i64, i64);

impl Outline {
    /// Wraps existing loops. Each loop is implicitly closed.
    pub fn from_loops(loops: Vec<Vec<DVec2>>) -> Self {
        Self { loops }
    }

    /// Traces the boundary of the pixels darker than `threshold`.
    ///
    /// Pixels beyond the frame border count as outside. Where two inside
    /// pixels touch only at a corner, their loops stay separate.
    pub fn from_mask(frame: &Frame, threshold: u8) -> Self {
        let (w, h) = (frame.width(), frame.height());
        let inside = |x: i64, y: i64| {
            x >= 0
                && y >= 0
                && (x as usize) < w
                && (y as usize) < h
                && frame.get(x as usize, y as usize) < threshold
        };

        // Directed unit edges, inside on the left.
        let mut edges: Vec<(Corner, Corner)> = Vec::new();
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                if !inside(x, y) {
                    continue;
                }
                if !inside(x, y - 1) {
                    edges.push(((x, y), (x + 1, y)));
                }
                if !inside(x + 1, y) {
                    edges.push(((x + 1, y), (x + 1, y + 1)));
                }
                if !inside(x, y + 1) {
                    edges.push(((x + 1, y + 1), (x, y + 1)));
                }
                if !inside(x - 1, y) {
                    edges.push(((x, y + 1), (x, y)));
                }
            }
        }

        let mut outgoing: HashMap<Corner, Vec<usize>> = HashMap::new();
        for (i, (start, _)) in edges.iter().enumerate() {
            outgoing.entry(*start).or_default().push(i);
        }

        let mut used = vec![false; edges.len()];
        let mut loops = Vec::new();
        for first in 0..edges.len() {
            if used[first] {
                continue;
            }
            let mut ring = Vec::new();
            let mut current = first;
            while !used[current] {
                used[current] = true;
                let (start, end) = edges[current];
                ring.push(DVec2::new(start.0 as f64, start.1 as f64));
                match next_edge(&edges, &outgoing, start, end) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            loops.push(ring);
        }

        log::trace!(
            "traced {} loops from {} boundary edges",
            loops.len(),
            edges.len()
        );
        Self { loops }
    }

    /// Loops as vertex lists.
    #[inline]
    pub fn loops(&self) -> &[Vec<DVec2>] {
        &self.loops
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Total number of vertices (and segments).
    pub fn vertex_count(&self) -> usize {
        self.loops.iter().map(Vec::len).sum()
    }

    /// Iterates over every closed-loop segment.
    pub fn segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.loops.iter().flat_map(|ring| {
            ring.iter()
                .enumerate()
                .map(move |(i, &a)| (a, ring[(i + 1) % ring.len()]))
        })
    }

    /// Laplacian smoothing: every iteration moves each vertex
    /// [`SMOOTHING_STEP`](config::constants::SMOOTHING_STEP) of the way
    /// toward the midpoint of its two neighbours.
    pub fn smooth(mut self, iterations: usize) -> Self {
        let step = config::constants::SMOOTHING_STEP;
        for _ in 0..iterations {
            for ring in &mut self.loops {
                let n = ring.len();
                if n < 3 {
                    continue;
                }
                let moved: Vec<DVec2> = (0..n)
                    .map(|i| {
                        let prev = ring[(i + n - 1) % n];
                        let next = ring[(i + 1) % n];
                        let p = ring[i];
                        p + ((prev + next) * 0.5 - p) * step
                    })
                    .collect();
                *ring = moved;
            }
        }
        self
    }

    /// Multiplies every coordinate by `factor`.
    pub fn scale(mut self, factor: f64) -> Self {
        for p in self.loops.iter_mut().flatten() {
            *p *= factor;
        }
        self
    }

    /// Smallest and largest corner over all vertices, or `None` when empty.
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let mut points = self.loops.iter().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
    }
}

/// Picks the edge that continues a loop arriving at `end`.
///
/// A corner shared by two diagonal inside pixels has two outgoing edges;
/// taking the left turn keeps each pixel's loop separate. Every other
/// corner has exactly one.
fn next_edge(
    edges: &[(Corner, Corner)],
    outgoing: &HashMap<Corner, Vec<usize>>,
    start: Corner,
    end: Corner,
) -> Option<usize> {
    let candidates = outgoing.get(&end)?;
    let left = (start.1 - end.1, end.0 - start.0);
    candidates
        .iter()
        .copied()
        .find(|&id| {
            let (s, e) = edges[id];
            (e.0 - s.0, e.1 - s.1) == left
        })
        .or_else(|| candidates.first().copied())
}
