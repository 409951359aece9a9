//! # Slice Engine
//!
//! Rasterizes horizontal cross-sections of a solid into [`Frame`]s.
//!
//! ## Algorithm Overview
//!
//! Each frame is produced by recursive quadrant subdivision of the pixel
//! rectangle. A region whose slab-thick box does not touch the surface is
//! uniformly inside or outside, so one containment test fills all of it.
//! Regions that touch the surface split into four quadrants until they
//! shrink to single pixels, which are sampled at their centres.
//!
//! ```text
//! region ──collider miss──▶ fill(region, contains(center))
//!    │
//!    └──collider hit──▶ 4 quadrants ──▶ ... ──▶ 1 pixel ──▶ contains(center)
//! ```
//!
//! Large regions recurse through `rayon::join`. Every branch returns the
//! rectangles it decided are inside; they are painted after the join.

#[cfg(test)]
mod tests;

use crate::error::{SliceError, SliceResult};
use crate::frame::Frame;
use config::constants::{is_valid_delta, INSIDE_INTENSITY, PARALLEL_MIN_PIXELS};
use glam::DVec3;
use slicevox_mesh::{BoundingBox, Collider, Mesh, MeshCollider, MeshSolid, Solid, TriangleIndex};
use std::sync::Arc;

/// Half-open pixel rectangle `[x, x + w) × [y, y + h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

impl Region {
    #[inline]
    fn area(&self) -> usize {
        self.w * self.h
    }

    fn quadrants(&self) -> [Region; 4] {
        let (w0, h0) = (self.w / 2, self.h / 2);
        let (w1, h1) = (self.w - w0, self.h - h0);
        let region = |x, y, w, h| Region { x, y, w, h };
        [
            region(self.x, self.y, w0, h0),
            region(self.x + w0, self.y, w1, h0),
            region(self.x, self.y + h0, w0, h1),
            region(self.x + w0, self.y + h0, w1, h1),
        ]
    }
}

/// Produces even-sized cross-section frames of a solid along Z.
///
/// The default parameters slice a triangle mesh. Any [`Solid`] and
/// [`Collider`] pair can be plugged in through [`SliceEngine::with_parts`];
/// pairing a solid with [`ExhaustiveCollider`](slicevox_mesh::ExhaustiveCollider)
/// gives the per-pixel reference rasterizer.
///
/// # Example
///
/// ```rust
/// use slicevox_core::SliceEngine;
/// use slicevox_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let cube = create_cube(DVec3::ZERO, DVec3::new(1.0, 1.0, 2.0)).unwrap();
/// let engine = SliceEngine::new(&cube, 0.5).unwrap();
/// assert_eq!((engine.width(), engine.height(), engine.num_frames()), (2, 2, 4));
///
/// let frame = engine.slice(0).unwrap();
/// assert_eq!(frame.inside_count(), 4);
/// ```
pub struct SliceEngine<S = MeshSolid, C = MeshCollider> {
    solid: S,
    collider: C,
    bounds: BoundingBox,
    delta: f64,
    width: usize,
    height: usize,
    frames: usize,
}

impl SliceEngine {
    /// Builds an engine over a closed mesh.
    ///
    /// The mesh is indexed once; containment and box queries share the
    /// index.
    ///
    /// # Errors
    ///
    /// [`SliceError::EmptyMesh`] for a mesh without triangles and
    /// [`SliceError::InvalidDelta`] for an unusable `delta`.
    pub fn new(mesh: &Mesh, delta: f64) -> SliceResult<Self> {
        if mesh.is_empty() {
            return Err(SliceError::EmptyMesh);
        }
        if !is_valid_delta(delta) {
            return Err(SliceError::InvalidDelta(delta));
        }
        let index = Arc::new(TriangleIndex::from_mesh(mesh));
        let bounds = index.bounds();
        Self::with_parts(
            MeshSolid::from_index(Arc::clone(&index)),
            MeshCollider::from_index(index),
            bounds,
            delta,
        )
    }
}

impl<S: Solid, C: Collider> SliceEngine<S, C> {
    /// Builds an engine from explicit parts.
    ///
    /// `bounds` is the region to rasterize. Width and height are
    /// `ceil(extent / delta)`, bumped to the next even number with the
    /// bounds padded by `delta / 2` on both sides of that axis.
    pub fn with_parts(
        solid: S,
        collider: C,
        bounds: BoundingBox,
        delta: f64,
    ) -> SliceResult<Self> {
        if !is_valid_delta(delta) {
            return Err(SliceError::InvalidDelta(delta));
        }
        if bounds.is_empty() {
            return Err(SliceError::EmptyMesh);
        }

        let mut bounds = bounds;
        let extent = bounds.extent();
        let mut width = (extent.x / delta).ceil() as usize;
        let mut height = (extent.y / delta).ceil() as usize;
        let frames = (extent.z / delta).ceil() as usize;

        if width % 2 == 1 {
            width += 1;
            bounds.min.x -= delta / 2.0;
            bounds.max.x += delta / 2.0;
            log::debug!("padded x bounds to reach even width {width}");
        }
        if height % 2 == 1 {
            height += 1;
            bounds.min.y -= delta / 2.0;
            bounds.max.y += delta / 2.0;
            log::debug!("padded y bounds to reach even height {height}");
        }

        log::debug!("slice engine: {width}x{height} pixels, {frames} frames, delta {delta}");

        Ok(Self {
            solid,
            collider,
            bounds,
            delta,
            width,
            height,
            frames,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames along Z.
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Rasterized bounds, including any parity padding.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Z coordinate sampled by frame `index` (the centre of its slab).
    #[inline]
    pub fn frame_z(&self, index: usize) -> f64 {
        self.bounds.min.z + (index as f64 + 0.5) * self.delta
    }

    /// Renders frame `index`.
    ///
    /// # Errors
    ///
    /// [`SliceError::IndexOutOfRange`] unless `index < num_frames()`.
    pub fn slice(&self, index: usize) -> SliceResult<Frame> {
        if index >= self.frames {
            return Err(SliceError::IndexOutOfRange {
                index,
                frames: self.frames,
            });
        }
        let z = self.frame_z(index);
        let mut inside = Vec::new();
        self.rasterize(
            z,
            Region {
                x: 0,
                y: 0,
                w: self.width,
                h: self.height,
            },
            &mut inside,
        );

        let mut frame = Frame::new(self.width, self.height);
        for r in &inside {
            frame.fill_rect(r.x, r.y, r.w, r.h, INSIDE_INTENSITY);
        }
        log::trace!("frame {index} at z {z}: {} inside regions", inside.len());
        Ok(frame)
    }

    /// Appends to `inside` every sub-region of `region` found to be inside.
    fn rasterize(&self, z: f64, region: Region, inside: &mut Vec<Region>) {
        if region.area() == 0 {
            return;
        }
        if region.area() == 1 {
            if self.contains_at(z, region.x as f64 + 0.5, region.y as f64 + 0.5) {
                inside.push(region);
            }
            return;
        }

        if !self.collider.intersects_box(&self.region_box(z, region)) {
            let cx = region.x as f64 + region.w as f64 / 2.0;
            let cy = region.y as f64 + region.h as f64 / 2.0;
            if self.contains_at(z, cx, cy) {
                inside.push(region);
            }
            return;
        }

        let [q0, q1, q2, q3] = region.quadrants();
        if region.area() >= PARALLEL_MIN_PIXELS {
            let ((mut a, b), (c, d)) = rayon::join(
                || rayon::join(|| self.collect(z, q0), || self.collect(z, q1)),
                || rayon::join(|| self.collect(z, q2), || self.collect(z, q3)),
            );
            a.extend(b);
            a.extend(c);
            a.extend(d);
            inside.append(&mut a);
        } else {
            for q in [q0, q1, q2, q3] {
                self.rasterize(z, q, inside);
            }
        }
    }

    fn collect(&self, z: f64, region: Region) -> Vec<Region> {
        let mut inside = Vec::new();
        self.rasterize(z, region, &mut inside);
        inside
    }

    /// Containment at fractional pixel coordinates.
    #[inline]
    fn contains_at(&self, z: f64, px: f64, py: f64) -> bool {
        let min = self.bounds.min;
        self.solid.contains(DVec3::new(
            min.x + px * self.delta,
            min.y + py * self.delta,
            z,
        ))
    }

    /// World box covered by `region` within the slab around `z`.
    fn region_box(&self, z: f64, region: Region) -> BoundingBox {
        let min = self.bounds.min;
        let d = self.delta;
        BoundingBox::new(
            DVec3::new(
                min.x + region.x as f64 * d,
                min.y + region.y as f64 * d,
                z - d / 2.0,
            ),
            DVec3::new(
                min.x + (region.x + region.w) as f64 * d,
                min.y + (region.y + region.h) as f64 * d,
                z + d / 2.0,
            ),
        )
    }
}
