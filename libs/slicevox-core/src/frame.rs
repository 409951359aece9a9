//! # Frames
//!
//! One cross-section image: a row-major grid of 8-bit intensities.

use crate::error::{SliceError, SliceResult};
use config::constants::{INSIDE_THRESHOLD, OUTSIDE_INTENSITY};

/// Grayscale cross-section image.
///
/// Pixel `(x, y)` lives at `pixels[y * width + x]`. The slicer only writes
/// [`INSIDE_INTENSITY`](config::constants::INSIDE_INTENSITY) and
/// [`OUTSIDE_INTENSITY`]; frames read back from disk may hold anything, and
/// [`Frame::is_inside`] thresholds them.
///
/// # Example
///
/// ```rust
/// use slicevox_core::Frame;
///
/// let mut frame = Frame::new(4, 2);
/// frame.fill_rect(1, 0, 2, 2, 0);
/// assert!(frame.is_inside(1, 1));
/// assert!(!frame.is_inside(3, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Creates a frame with every pixel outside.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, OUTSIDE_INTENSITY)
    }

    /// Creates a frame with every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`SliceError::InvalidFrame`] when `pixels.len() != width * height`.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> SliceResult<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| SliceError::invalid_frame(format!("{width}x{height} overflows")))?;
        if pixels.len() != expected {
            return Err(SliceError::invalid_frame(format!(
                "{width}x{height} frame needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
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

    /// Row-major pixel buffer.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Intensity at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the frame.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[self.offset(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        let offset = self.offset(x, y);
        self.pixels[offset] = value;
    }

    /// Sets the half-open rectangle `[x, x + w) × [y, y + h)`, clipped to
    /// the frame.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, value: u8) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end {
            return;
        }
        for row in y..y_end {
            let start = row * self.width;
            self.pixels[start + x..start + x_end].fill(value);
        }
    }

    /// True when the pixel is darker than [`INSIDE_THRESHOLD`].
    #[inline]
    pub fn is_inside(&self, x: usize, y: usize) -> bool {
        self.get(x, y) < INSIDE_THRESHOLD
    }

    /// Number of inside pixels.
    pub fn inside_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p < INSIDE_THRESHOLD).count()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} frame",
            self.width,
            self.height
        );
        y * self.width + x
    }
}
