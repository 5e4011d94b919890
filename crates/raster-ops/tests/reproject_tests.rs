//! Reprojection orchestration against a simple nearest-neighbor warper.

use raster_ops::{
    reproject, reproject_stack, DestGeoref, ResamplingMethod, SourceGeoref, WarpParams, Warper,
};
use sdm_common::{
    AffineTransform, Band, BoundingBox, Crs, RasterGrid, RasterStack, Result, SdmError,
};

/// Minimal same-CRS warper: derives a north-up destination transform and
/// resamples by nearest neighbor. Stands in for the real warping
/// collaborator, which owns all resampling numerics in production.
struct NearestWarper;

impl Warper for NearestWarper {
    fn derive_transform(
        &self,
        src: &SourceGeoref,
        dst_crs: Crs,
        dst_resolution: (f64, f64),
        bounds: BoundingBox,
    ) -> Result<DestGeoref> {
        if dst_crs != src.crs {
            return Err(SdmError::warp("CRS change not supported by this warper"));
        }
        let width = (bounds.width() / dst_resolution.0) as usize;
        let height = (bounds.height() / dst_resolution.1) as usize;
        let transform = AffineTransform::translation(bounds.min_x, bounds.max_y)
            * AffineTransform::scale(dst_resolution.0, -dst_resolution.1);
        Ok(DestGeoref {
            transform,
            crs: dst_crs,
            width,
            height,
        })
    }

    fn warp_band(
        &self,
        source: &Band,
        src: &SourceGeoref,
        dst: &DestGeoref,
        _method: ResamplingMethod,
    ) -> Result<Band> {
        let mut out = Band::filled(dst.width, dst.height, src.nodata);
        for row in 0..dst.height {
            for col in 0..dst.width {
                let (x, y) = dst.transform.forward_centered(col as f64, row as f64);
                let (src_col, src_row) = src.transform.invert(x, y)?;
                let (src_col, src_row) = (src_col.floor(), src_row.floor());
                if src_col >= 0.0
                    && src_row >= 0.0
                    && (src_col as usize) < src.width
                    && (src_row as usize) < src.height
                {
                    out.set(col, row, source.get(src_col as usize, src_row as usize));
                }
            }
        }
        Ok(out)
    }
}

fn source_grid() -> RasterGrid {
    let band = Band::new(
        (0..16).map(|i| i as f64).collect(),
        4,
        4,
    )
    .unwrap();
    let transform = AffineTransform::from_bounds(&BoundingBox::new(0.0, 0.0, 4.0, 4.0), 1.0);
    RasterGrid::new(band, -1.0, transform, Crs::WGS84)
}

#[test]
fn defaults_reproduce_source_georeferencing() {
    let grid = source_grid();
    let out = reproject(
        &grid,
        &NearestWarper,
        &WarpParams::default(),
        ResamplingMethod::Nearest,
    )
    .unwrap();
    assert_eq!(out.width(), 4);
    assert_eq!(out.height(), 4);
    assert_eq!(out.crs(), grid.crs());
    assert_eq!(out.transform(), grid.transform());
    assert_eq!(out.band().values(), grid.band().values());
    assert_eq!(out.nodata(), grid.nodata());
}

#[test]
fn coarser_resolution_halves_dimensions() {
    let grid = source_grid();
    let params = WarpParams {
        dst_resolution: Some((2.0, 2.0)),
        ..Default::default()
    };
    let out = reproject(&grid, &NearestWarper, &params, ResamplingMethod::Nearest).unwrap();
    assert_eq!(out.width(), 2);
    assert_eq!(out.height(), 2);
    // Each destination center falls in the lower-right source cell of
    // its 2x2 block under nearest lookup at cell centers.
    assert_eq!(out.band().get(0, 0), grid.band().get(1, 1));
}

#[test]
fn crs_change_is_rejected_by_this_warper() {
    let grid = source_grid();
    let params = WarpParams {
        dst_crs: Some(Crs(3857)),
        ..Default::default()
    };
    let err = reproject(&grid, &NearestWarper, &params, ResamplingMethod::Bilinear);
    assert!(matches!(err, Err(SdmError::Warp(_))));
}

#[test]
fn stack_reprojects_every_band() {
    let grid = source_grid();
    let stack = RasterStack::new(
        vec![grid.band().clone(), Band::filled(4, 4, 7.0)],
        vec!["a".into(), "b".into()],
        -1.0,
        *grid.transform(),
        grid.crs(),
    )
    .unwrap();
    let params = WarpParams {
        dst_resolution: Some((2.0, 2.0)),
        ..Default::default()
    };
    let out = reproject_stack(&stack, &NearestWarper, &params, ResamplingMethod::Nearest).unwrap();
    assert_eq!(out.band_count(), 2);
    assert_eq!(out.categories(), stack.categories());
    assert_eq!(out.bands()[0].shape(), (2, 2));
    assert_eq!(out.bands()[1].values(), &[7.0; 4]);
}
