//! # Volume Reconstructor
//!
//! Rebuilds a solid from an ordered stack of frames.
//!
//! ## Algorithm Overview
//!
//! Every frame becomes a [`SurfaceLayer`]: the outline of its inside pixels,
//! smoothed, scaled to world units and turned into a 2D signed distance
//! field. Layer `k` sits at height `k · delta · stride`. Between two layers
//! the signed distances are blended linearly, and a point is inside when the
//! blend is positive. Below the first layer and above the last, the nearest
//! layer is used alone.
//!
//! ```text
//! z ▲   layer k+1  ── sdf₁(x, y)
//!   │      ·  point: (1 - f)·sdf₀ + f·sdf₁ > 0 ?
//!   │   layer k    ── sdf₀(x, y)
//! ```


use crate::error::{SliceError, SliceResult};
use crate::frame::Frame;
use crate::outline::{Outline, OutlineSdf};
use config::constants::{is_valid_delta, ConversionConfig, INSIDE_THRESHOLD};
use glam::{DVec2, DVec3};
use slicevox_mesh::{BoundingBox, Solid};

/// One frame's contribution to the reconstructed volume.
#[derive(Debug, Clone)]
pub struct SurfaceLayer {
    sdf: OutlineSdf,
    bounds: Option<(DVec2, DVec2)>,
}

impl SurfaceLayer {
    /// Builds the layer for `frame`: threshold, trace, smooth, scale.
    pub fn from_frame(frame: &Frame, delta: f64, smooth_iters: usize) -> Self {
        let outline = Outline::from_mask(frame, INSIDE_THRESHOLD)
            .smooth(smooth_iters)
            .scale(delta);
        Self {
            sdf: OutlineSdf::new(&outline),
            bounds: outline.bounds(),
        }
    }

    /// Signed distance at `point` (positive inside).
    #[inline]
    pub fn signed_distance(&self, point: DVec2) -> f64 {
        self.sdf.evaluate(point)
    }

    /// Extent of the layer's outline, or `None` for an empty frame.
    #[inline]
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        self.bounds
    }
}

/// Solid interpolated between frame outlines.
///
/// Frames are appended bottom to top with [`add_frame`](Self::add_frame);
/// the reconstructor answers containment queries at any time and is
/// shareable across threads while no frame is being added.
///
/// # Example
///
/// ```rust
/// use slicevox_core::{Frame, VolumeReconstructor};
/// use slicevox_mesh::Solid;
/// use glam::DVec3;
///
/// let mut recon = VolumeReconstructor::new(1.0, 1, 0).unwrap();
/// let mut frame = Frame::new(8, 8);
/// frame.fill_rect(2, 2, 4, 4, 0);
/// recon.add_frame(&frame);
/// recon.add_frame(&frame);
///
/// assert_eq!(recon.layer_count(), 2);
/// assert!(recon.contains(DVec3::new(4.0, 4.0, 0.5)));
/// assert!(!recon.contains(DVec3::new(1.0, 4.0, 0.5)));
/// ```
#[derive(Debug, Clone)]
pub struct VolumeReconstructor {
    delta: f64,
    stride: usize,
    smooth_iters: usize,
    layers: Vec<SurfaceLayer>,
    min: DVec3,
    max: DVec3,
}

impl VolumeReconstructor {
    /// Creates an empty reconstructor.
    ///
    /// # Errors
    ///
    /// [`SliceError::InvalidDelta`] for an unusable `delta` and
    /// [`SliceError::InvalidStride`] for a zero `stride`.
    pub fn new(delta: f64, stride: usize, smooth_iters: usize) -> SliceResult<Self> {
        if !is_valid_delta(delta) {
            return Err(SliceError::InvalidDelta(delta));
        }
        if stride == 0 {
            return Err(SliceError::InvalidStride(stride));
        }
        Ok(Self {
            delta,
            stride,
            smooth_iters,
            layers: Vec::new(),
            min: DVec3::ZERO,
            max: DVec3::ZERO,
        })
    }

    /// Creates an empty reconstructor from a validated configuration.
    pub fn from_config(config: &ConversionConfig) -> SliceResult<Self> {
        Self::new(config.delta, config.z_stride, config.smooth_iters)
    }

    /// Appends `frame` as the next layer up.
    pub fn add_frame(&mut self, frame: &Frame) {
        let layer = SurfaceLayer::from_frame(frame, self.delta, self.smooth_iters);
        if let Some((lo, hi)) = layer.bounds() {
            self.min.x = self.min.x.min(lo.x);
            self.min.y = self.min.y.min(lo.y);
            self.max.x = self.max.x.max(hi.x);
            self.max.y = self.max.y.max(hi.y);
        }
        self.layers.push(layer);
        self.max.z = (self.layers.len() - 1) as f64 * self.layer_spacing();
        log::trace!(
            "added layer {} ({} inside pixels)",
            self.layers.len() - 1,
            frame.inside_count()
        );
    }

    /// Interpolated signed distance at `point`, or `None` without layers.
    ///
    /// Positive values are inside.
    pub fn distance(&self, point: DVec3) -> Option<f64> {
        let last = self.layers.len().checked_sub(1)? as f64;
        let spacing = self.layer_spacing();
        let scaled = point.z / spacing;
        let index = scaled.floor();
        if !index.is_finite() {
            return None;
        }
        let lower = index.clamp(0.0, last) as usize;
        let upper = (index + 1.0).clamp(0.0, last) as usize;
        let fraction = scaled - index;

        let xy = point.truncate();
        let below = self.layers[lower].signed_distance(xy);
        let above = self.layers[upper].signed_distance(xy);
        Some(below * (1.0 - fraction) + above * fraction)
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layers(&self) -> &[SurfaceLayer] {
        &self.layers
    }

    /// Smallest corner covered so far. Starts at the origin.
    #[inline]
    pub fn min(&self) -> DVec3 {
        self.min
    }

    /// Largest corner covered so far. Starts at the origin.
    #[inline]
    pub fn max(&self) -> DVec3 {
        self.max
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Distance between consecutive layers.
    #[inline]
    pub fn layer_spacing(&self) -> f64 {
        self.delta * self.stride as f64
    }
}

impl Solid for VolumeReconstructor {
    fn contains(&self, point: DVec3) -> bool {
        self.distance(point).is_some_and(|d| d > 0.0)
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }
}
