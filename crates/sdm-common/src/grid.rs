//! Georeferenced raster grids.

use serde::{Deserialize, Serialize};

use crate::band::Band;
use crate::bbox::BoundingBox;
use crate::crs::Crs;
use crate::error::{Result, SdmError};
use crate::transform::AffineTransform;

/// A single-band raster: cell values plus georeferencing metadata.
///
/// The grid exclusively owns its cell data. Nodata normalization and
/// masking mutate it in place; everything else produces a new grid.
/// Whole-planet grids can exceed working memory, so callers are expected
/// to drop a grid as soon as it is superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterGrid {
    band: Band,
    nodata: f64,
    transform: AffineTransform,
    crs: Crs,
}

impl RasterGrid {
    pub fn new(band: Band, nodata: f64, transform: AffineTransform, crs: Crs) -> Self {
        Self {
            band,
            nodata,
            transform,
            crs,
        }
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    pub fn band_mut(&mut self) -> &mut Band {
        &mut self.band
    }

    /// Give up georeferencing and take ownership of the raw band.
    pub fn into_band(self) -> Band {
        self.band
    }

    pub fn width(&self) -> usize {
        self.band.width()
    }

    pub fn height(&self) -> usize {
        self.band.height()
    }

    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// World-coordinate bounds of the full grid extent.
    pub fn bounds(&self) -> BoundingBox {
        let (x0, y0) = self.transform.forward(0.0, 0.0);
        let (x1, y1) = self
            .transform
            .forward(self.width() as f64, self.height() as f64);
        BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Set every nodata cell to 0, in place.
    pub fn normalize_nodata(&mut self) {
        self.band.replace(self.nodata, 0.0);
    }
}

/// Multi-band output of classified rasterization: one band per category,
/// sharing a single transform, CRS and nodata sentinel.
///
/// Bands are ordered by first appearance of their category value in the
/// source geometry set, and the whole stack is written in one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterStack {
    bands: Vec<Band>,
    categories: Vec<String>,
    nodata: f64,
    transform: AffineTransform,
    crs: Crs,
}

impl RasterStack {
    pub fn new(
        bands: Vec<Band>,
        categories: Vec<String>,
        nodata: f64,
        transform: AffineTransform,
        crs: Crs,
    ) -> Result<Self> {
        if bands.len() != categories.len() {
            return Err(SdmError::validation(format!(
                "{} bands but {} category labels",
                bands.len(),
                categories.len()
            )));
        }
        if let Some(first) = bands.first() {
            for band in &bands[1..] {
                if band.shape() != first.shape() {
                    return Err(SdmError::shape_mismatch(first.shape(), band.shape()));
                }
            }
        }
        Ok(Self {
            bands,
            categories,
            nodata,
            transform,
            crs,
        })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn nodata(&self) -> f64 {
        self.nodata
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Band for a given category label, if present.
    pub fn band_for(&self, category: &str) -> Option<&Band> {
        self.categories
            .iter()
            .position(|c| c == category)
            .map(|i| &self.bands[i])
    }
}
