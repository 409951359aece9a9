//! # Bounding Boxes
//!
//! Axis-aligned boxes shared by meshes, colliders and solids.

use glam::DVec3;

/// An axis-aligned bounding box.
///
/// An empty box has `min = +inf` and `max = -inf`, so including the first
/// point makes it degenerate at that point and every later point can only
/// grow it.
///
/// # Example
///
/// ```rust
/// use slicevox_mesh::BoundingBox;
/// use glam::DVec3;
///
/// let mut bbox = BoundingBox::empty();
/// bbox.include(DVec3::new(1.0, 2.0, 3.0));
/// bbox.include(DVec3::new(-1.0, 0.0, 5.0));
/// assert_eq!(bbox.min, DVec3::new(-1.0, 0.0, 3.0));
/// assert_eq!(bbox.max, DVec3::new(1.0, 2.0, 5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates a box from two corners. The corners are not reordered.
    #[inline]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates a box that contains nothing.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Creates the smallest box containing every point.
    pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.include(p);
        }
        bbox
    }

    /// Returns true if no point has been included yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows the box to contain `point`.
    #[inline]
    pub fn include(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns the smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Size along each axis. Zero for an empty box.
    pub fn extent(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the box grown by `amount` on every side of every axis.
    pub fn expanded(&self, amount: DVec3) -> BoundingBox {
        BoundingBox {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// Returns true if `point` lies inside or on the boundary.
    #[inline]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Returns true if the two closed boxes share at least one point.
    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}
