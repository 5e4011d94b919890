//! Test data generators for synthetic presence/region/bias layers.
//!
//! These generators create predictable, verifiable data patterns shared
//! across the test suite.

use sdm_common::{
    AffineTransform, Band, BoundingBox, Crs, Feature, Geometry, Polygon, RasterGrid,
    VectorGeometrySet,
};

/// Presence mask with 1s in the bottom half of rows and 0s in the top
/// half. Guarantees both values are present, so strict binary validation
/// passes.
pub fn bottom_half_presence(width: usize, height: usize) -> Band {
    let mut band = Band::zeros(width, height);
    for row in height / 2..height {
        for col in 0..width {
            band.set(col, row, 1.0);
        }
    }
    band
}

/// Presence mask that is all ones except a single zero cell at (col, row).
pub fn presence_except_one(width: usize, height: usize, col: usize, row: usize) -> Band {
    let mut band = Band::filled(width, height, 1.0);
    band.set(col, row, 0.0);
    band
}

/// Region grid split into `codes.len()` vertical strips, one code per
/// strip, left to right.
pub fn striped_regions(width: usize, height: usize, codes: &[f64]) -> Band {
    let mut band = Band::zeros(width, height);
    let strip = (width / codes.len()).max(1);
    for row in 0..height {
        for col in 0..width {
            let code = codes[(col / strip).min(codes.len() - 1)];
            band.set(col, row, code);
        }
    }
    band
}

/// Binary habitat mask covering only the left `eligible_cols` columns.
pub fn left_columns_habitat(width: usize, height: usize, eligible_cols: usize) -> Band {
    let mut band = Band::zeros(width, height);
    for row in 0..height {
        for col in 0..eligible_cols.min(width) {
            band.set(col, row, 1.0);
        }
    }
    band
}

/// Bias grid with the given (col, row, weight) cells set and zeros
/// everywhere else.
pub fn sparse_bias(width: usize, height: usize, weights: &[(usize, usize, f64)]) -> Band {
    let mut band = Band::zeros(width, height);
    for &(col, row, weight) in weights {
        band.set(col, row, weight);
    }
    band
}

/// A 1-degree whole-globe grid around the given band.
pub fn global_grid(band: Band, nodata: f64) -> RasterGrid {
    let transform = AffineTransform::from_bounds(&BoundingBox::global(), 1.0);
    RasterGrid::new(band, nodata, transform, Crs::WGS84)
}

/// An axis-aligned square polygon feature with lower-left corner at
/// (x0, y0).
pub fn square_feature(x0: f64, y0: f64, size: f64) -> Feature {
    Feature::new(Geometry::Polygon(Polygon::new(vec![
        (x0, y0),
        (x0 + size, y0),
        (x0 + size, y0 + size),
        (x0, y0 + size),
    ])))
}

/// A geometry set containing a single square polygon.
pub fn square_set(x0: f64, y0: f64, size: f64) -> VectorGeometrySet {
    VectorGeometrySet::new(vec![square_feature(x0, y0, size)], Crs::WGS84)
}
