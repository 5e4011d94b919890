//! Raw 2D cell arrays and the elementwise algebra built on them.
//!
//! A [`Band`] is a bare row-major grid of `f64` cell values with no
//! georeferencing attached. Georeferenced grids ([`crate::RasterGrid`])
//! wrap a Band together with a transform, CRS and nodata sentinel.
//! Bands can represent whole-planet rasters, so operations avoid hidden
//! copies; callers drop intermediates as soon as they are superseded.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdmError};

/// A 2D array of cell values in row-major order, top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Band {
    /// Create a band from row-major data.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> Result<Self> {
        if data.len() != width * height {
            return Err(SdmError::validation(format!(
                "band data length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Create a band filled with a constant value.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Create an all-zero band.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Create an all-zero band with the same shape as another.
    pub fn zeros_like(other: &Band) -> Self {
        Self::zeros(other.width, other.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as (width, height).
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Value at (col, row); panics on out-of-bounds in debug builds.
    #[inline]
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: f64) {
        self.data[row * self.width + col] = value;
    }

    /// Value at a flat row-major index.
    #[inline]
    pub fn get_flat(&self, index: usize) -> f64 {
        self.data[index]
    }

    #[inline]
    pub fn set_flat(&mut self, index: usize, value: f64) {
        self.data[index] = value;
    }

    /// Convert a flat index to (col, row).
    #[inline]
    pub fn unravel(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    fn ensure_same_shape(&self, other: &Band) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(SdmError::shape_mismatch(self.shape(), other.shape()));
        }
        Ok(())
    }

    /// Elementwise product of two same-shaped bands.
    pub fn multiply(&self, other: &Band) -> Result<Band> {
        self.ensure_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a * b)
            .collect();
        Ok(Band {
            data,
            width: self.width,
            height: self.height,
        })
    }

    /// Elementwise difference of two same-shaped bands.
    pub fn subtract(&self, other: &Band) -> Result<Band> {
        self.ensure_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Band {
            data,
            width: self.width,
            height: self.height,
        })
    }

    /// In-place elementwise difference.
    pub fn subtract_in_place(&mut self, other: &Band) -> Result<()> {
        self.ensure_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a -= b;
        }
        Ok(())
    }

    /// In-place elementwise product.
    pub fn multiply_in_place(&mut self, other: &Band) -> Result<()> {
        self.ensure_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a *= b;
        }
        Ok(())
    }

    /// Replace every cell equal to `from` with `to`, in place.
    ///
    /// Used to normalize nodata sentinels to 0 before overlay arithmetic.
    pub fn replace(&mut self, from: f64, to: f64) {
        for v in &mut self.data {
            if *v == from {
                *v = to;
            }
        }
    }

    /// Distinct nonzero values, ascending.
    pub fn unique_nonzero(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.data.iter().copied().filter(|v| *v != 0.0).collect();
        values.sort_by(|a, b| a.partial_cmp(b).expect("NaN cell value"));
        values.dedup();
        values
    }

    /// Flat indices of cells satisfying the predicate, in row-major order.
    pub fn positions_where<F: Fn(f64) -> bool>(&self, pred: F) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| pred(**v))
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of nonzero cells.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|v| **v != 0.0).count()
    }

    /// Sum of all cell values.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Check whether the distinct cell values are exactly the given set:
    /// every cell is one of `expected` and every expected value occurs.
    /// Used to validate binary presence masks.
    pub fn values_are_exactly(&self, expected: &[f64]) -> bool {
        let mut seen = vec![false; expected.len()];
        for v in &self.data {
            match expected.iter().position(|e| e == v) {
                Some(i) => seen[i] = true,
                None => return false,
            }
        }
        seen.iter().all(|s| *s)
    }
}
