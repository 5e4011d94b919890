//! Reprojection orchestration.
//!
//! The engine owns no resampling numerics. A [`Warper`] collaborator
//! derives the destination georeferencing and resamples each band; this
//! module only wires source metadata, per-band loops, and defaults
//! together.

use serde::{Deserialize, Serialize};

use sdm_common::{AffineTransform, Band, BoundingBox, Crs, RasterGrid, RasterStack, Result};

/// Resampling method requested from the warping collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResamplingMethod {
    #[default]
    Nearest,
    Bilinear,
    Cubic,
    CubicSpline,
    Lanczos,
    Average,
    Mode,
}

/// Source georeferencing handed to the warper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceGeoref {
    pub transform: AffineTransform,
    pub crs: Crs,
    pub width: usize,
    pub height: usize,
    pub bounds: BoundingBox,
    pub nodata: f64,
}

impl SourceGeoref {
    pub fn of(grid: &RasterGrid) -> Self {
        Self {
            transform: *grid.transform(),
            crs: grid.crs(),
            width: grid.width(),
            height: grid.height(),
            bounds: grid.bounds(),
            nodata: grid.nodata(),
        }
    }
}

/// Destination georeferencing derived by the warper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DestGeoref {
    pub transform: AffineTransform,
    pub crs: Crs,
    pub width: usize,
    pub height: usize,
}

/// Requested destination parameters; anything unspecified defaults to
/// the source's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct WarpParams {
    pub dst_crs: Option<Crs>,
    /// Destination pixel size (x, y) in destination CRS units.
    pub dst_resolution: Option<(f64, f64)>,
    /// Override of the destination extent.
    pub bounds: Option<BoundingBox>,
}

/// External raster-warping collaborator.
pub trait Warper {
    /// Compute the destination transform and dimensions for a source
    /// grid and fully-resolved destination parameters.
    fn derive_transform(
        &self,
        src: &SourceGeoref,
        dst_crs: Crs,
        dst_resolution: (f64, f64),
        bounds: BoundingBox,
    ) -> Result<DestGeoref>;

    /// Resample one band from the source georeferencing into the
    /// destination georeferencing.
    fn warp_band(
        &self,
        source: &Band,
        src: &SourceGeoref,
        dst: &DestGeoref,
        method: ResamplingMethod,
    ) -> Result<Band>;
}

/// Resample a grid into a new CRS/resolution/extent.
///
/// Unspecified destination parameters default to the source's. The whole
/// operation is delegated to the warper; the returned grid carries the
/// destination transform, CRS and dimensions with the source's nodata.
pub fn reproject(
    grid: &RasterGrid,
    warper: &dyn Warper,
    params: &WarpParams,
    method: ResamplingMethod,
) -> Result<RasterGrid> {
    let src = SourceGeoref::of(grid);
    let dst = derive(warper, &src, params)?;
    tracing::debug!(
        src_crs = %src.crs,
        dst_crs = %dst.crs,
        dst_width = dst.width,
        dst_height = dst.height,
        ?method,
        "reprojecting grid"
    );
    let band = warper.warp_band(grid.band(), &src, &dst, method)?;
    Ok(RasterGrid::new(band, src.nodata, dst.transform, dst.crs))
}

/// Resample every band of a stack, preserving category labels.
pub fn reproject_stack(
    stack: &RasterStack,
    warper: &dyn Warper,
    params: &WarpParams,
    method: ResamplingMethod,
) -> Result<RasterStack> {
    let first = match stack.bands().first() {
        Some(b) => b,
        None => return RasterStack::new(Vec::new(), Vec::new(), stack.nodata(), *stack.transform(), stack.crs()),
    };
    let src = SourceGeoref {
        transform: *stack.transform(),
        crs: stack.crs(),
        width: first.width(),
        height: first.height(),
        bounds: bounds_of(stack.transform(), first.width(), first.height()),
        nodata: stack.nodata(),
    };
    let dst = derive(warper, &src, params)?;
    let mut bands = Vec::with_capacity(stack.band_count());
    for band in stack.bands() {
        bands.push(warper.warp_band(band, &src, &dst, method)?);
    }
    RasterStack::new(
        bands,
        stack.categories().to_vec(),
        stack.nodata(),
        dst.transform,
        dst.crs,
    )
}

fn derive(warper: &dyn Warper, src: &SourceGeoref, params: &WarpParams) -> Result<DestGeoref> {
    let dst_crs = params.dst_crs.unwrap_or(src.crs);
    let dst_resolution = params
        .dst_resolution
        .unwrap_or_else(|| src.transform.pixel_size());
    let bounds = params.bounds.unwrap_or(src.bounds);
    warper.derive_transform(src, dst_crs, dst_resolution, bounds)
}

fn bounds_of(transform: &AffineTransform, width: usize, height: usize) -> BoundingBox {
    let (x0, y0) = transform.forward(0.0, 0.0);
    let (x1, y1) = transform.forward(width as f64, height as f64);
    BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}
