//! Affine pixel/world coordinate mapping.
//!
//! A dataset's pixel coordinate system has its origin at the upper left:
//! column index increases to the right, row index increases downward. The
//! mapping to world coordinates is a 6-coefficient affine transform, using
//! the GDAL coefficient order:
//!
//! ```text
//! x = a * col + b * row + c
//! y = d * col + e * row + f
//! ```
//!
//! For a north-up grid, `b` and `d` are zero and `e` is negative (y
//! decreases as the row index grows).

use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::bbox::BoundingBox;
use crate::error::{Result, SdmError};

/// A 6-coefficient 2D affine transform between (col, row) and (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    /// Create a transform from explicit coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// A pure translation by (tx, ty).
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, tx, 0.0, 1.0, ty)
    }

    /// A pure scale by (sx, sy).
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// North-up transform for a grid covering `bounds` at `pixel_size`
    /// degrees per cell: translation to the upper-left corner composed
    /// with a (pixel_size, -pixel_size) scale.
    pub fn from_bounds(bounds: &BoundingBox, pixel_size: f64) -> Self {
        Self::translation(bounds.min_x, bounds.max_y) * Self::scale(pixel_size, -pixel_size)
    }

    /// Deduce the transform of a whole-globe grid from its shape alone.
    ///
    /// Fails if the implied pixel is not square, since the global bounds
    /// are fixed and there is no further degree of freedom.
    pub fn deduce_global(width: usize, height: usize) -> Result<Self> {
        let bounds = BoundingBox::global();
        if width == 0 || height == 0 {
            return Err(SdmError::configuration(
                "cannot deduce a transform for an empty grid",
            ));
        }
        let pixel_size = bounds.width() / width as f64;
        if (pixel_size - bounds.height() / height as f64).abs() > f64::EPSILON {
            return Err(SdmError::configuration(format!(
                "cannot deduce a global transform for a {}x{} grid: pixel is not square",
                width, height
            )));
        }
        Ok(Self::from_bounds(&bounds, pixel_size))
    }

    /// Map a (col, row) pixel corner to world coordinates.
    pub fn forward(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Map a (col, row) pixel to the world coordinates of its center.
    ///
    /// The convention is to reference the pixel corner; shifting by half a
    /// pixel in each axis references the center instead.
    pub fn forward_centered(&self, col: f64, row: f64) -> (f64, f64) {
        self.forward(col + 0.5, row + 0.5)
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// Map world coordinates back to fractional (col, row) indices.
    ///
    /// Fails on a degenerate (non-invertible) transform.
    pub fn invert(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let det = self.determinant();
        if det == 0.0 {
            return Err(SdmError::configuration(
                "affine transform is not invertible (zero determinant)",
            ));
        }
        let dx = x - self.c;
        let dy = y - self.f;
        Ok((
            (self.e * dx - self.b * dy) / det,
            (self.a * dy - self.d * dx) / det,
        ))
    }

    /// Pixel size along x and y implied by this transform.
    pub fn pixel_size(&self) -> (f64, f64) {
        (self.a.abs(), self.e.abs())
    }
}

impl Mul for AffineTransform {
    type Output = AffineTransform;

    /// Composition: `(t1 * t2).forward(p) == t1.forward(t2.forward(p))`.
    fn mul(self, rhs: AffineTransform) -> AffineTransform {
        AffineTransform {
            a: self.a * rhs.a + self.b * rhs.d,
            b: self.a * rhs.b + self.b * rhs.e,
            c: self.a * rhs.c + self.b * rhs.f + self.c,
            d: self.d * rhs.a + self.e * rhs.d,
            e: self.d * rhs.b + self.e * rhs.e,
            f: self.d * rhs.c + self.e * rhs.f + self.f,
        }
    }
}
