//! Pixel-to-world coordinate mapping.

use sdm_common::{AffineTransform, Band, RasterGrid, Result};

/// Map every retained cell of a band to the world coordinates of its
/// pixel center.
///
/// If `transform` is absent, a whole-globe equirectangular transform is
/// deduced from the band shape; that deduction fails if the implied pixel
/// is not square. With `filter_nodata` set, cells equal to `nodata` are
/// excluded from the output; otherwise every cell is mapped.
///
/// Returns two parallel vectors (x values, y values) in row-major cell
/// order. Filtered output length equals the count of retained cells;
/// unfiltered output length equals width * height.
pub fn pixel_to_world_coordinates(
    band: &Band,
    transform: Option<&AffineTransform>,
    filter_nodata: bool,
    nodata: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let transform = match transform {
        Some(t) => *t,
        None => {
            tracing::debug!(
                width = band.width(),
                height = band.height(),
                "no transform given, deducing a global one from the band shape"
            );
            AffineTransform::deduce_global(band.width(), band.height())?
        }
    };

    let capacity = if filter_nodata {
        band.values().iter().filter(|v| **v != nodata).count()
    } else {
        band.len()
    };
    let mut xs = Vec::with_capacity(capacity);
    let mut ys = Vec::with_capacity(capacity);

    for row in 0..band.height() {
        for col in 0..band.width() {
            if filter_nodata && band.get(col, row) == nodata {
                continue;
            }
            let (x, y) = transform.forward_centered(col as f64, row as f64);
            xs.push(x);
            ys.push(y);
        }
    }
    Ok((xs, ys))
}

/// [`pixel_to_world_coordinates`] for a georeferenced grid, using the
/// grid's own transform and nodata sentinel.
pub fn grid_to_world_coordinates(
    grid: &RasterGrid,
    filter_nodata: bool,
) -> Result<(Vec<f64>, Vec<f64>)> {
    pixel_to_world_coordinates(
        grid.band(),
        Some(grid.transform()),
        filter_nodata,
        grid.nodata(),
    )
}
