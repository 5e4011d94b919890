//! Burning vector geometries into raster grids.

use serde::{Deserialize, Serialize};

use sdm_common::{
    AffineTransform, Band, BoundingBox, Geometry, Polygon, RasterGrid, RasterStack, Result,
    SdmError, VectorGeometrySet,
};

/// How the output extent is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BoundsMode {
    /// Fixed whole-globe bounds (-180, -90, 180, 90).
    #[default]
    Global,
    /// Total bounding box of the geometry set.
    Cropped,
}

/// Rasterization parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterizeOptions {
    /// Cell size in CRS units (degrees for geographic layers).
    pub pixel_size: f64,
    pub bounds: BoundsMode,
    /// Burn every cell touched by a geometry boundary, not only cells
    /// whose center is covered.
    pub all_touched: bool,
    /// Value of cells that are not burned.
    pub nodata_value: f64,
    /// Value burned into covered cells.
    pub default_value: f64,
}

impl RasterizeOptions {
    pub fn new(pixel_size: f64) -> Self {
        Self {
            pixel_size,
            bounds: BoundsMode::Global,
            all_touched: false,
            nodata_value: 0.0,
            default_value: 1.0,
        }
    }

    pub fn cropped(mut self) -> Self {
        self.bounds = BoundsMode::Cropped;
        self
    }

    pub fn all_touched(mut self, yes: bool) -> Self {
        self.all_touched = yes;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.pixel_size > 0.0) {
            return Err(SdmError::configuration(format!(
                "pixel_size must be positive, got {}",
                self.pixel_size
            )));
        }
        Ok(())
    }
}

/// Burn all geometries of a set into a single band.
///
/// Background cells hold `nodata_value`, burned cells `default_value`.
/// The output transform is translation(x_min, y_max) composed with a
/// (pixel_size, -pixel_size) scale; resolution comes from truncating
/// integer division, so the grid extent may undershoot the requested
/// bounds by a fraction of a pixel.
pub fn rasterize(set: &VectorGeometrySet, options: &RasterizeOptions) -> Result<RasterGrid> {
    options.validate()?;
    let (bounds, transform, width, height) = output_geometry(set, options)?;
    tracing::debug!(
        %width,
        %height,
        all_touched = options.all_touched,
        "rasterizing {} geometries into {:?}",
        set.len(),
        bounds
    );

    let mut band = Band::filled(width, height, options.nodata_value);
    for feature in set.features() {
        burn_geometry(&mut band, &feature.geometry, &transform, options)?;
    }
    Ok(RasterGrid::new(
        band,
        options.nodata_value,
        transform,
        set.crs(),
    ))
}

/// Classified rasterization: one band per distinct non-null value of
/// `classifier_attribute`, in first-seen order, burning only the
/// geometries carrying that value. All bands share one transform and are
/// assembled into a single multi-band stack.
pub fn rasterize_classified(
    set: &VectorGeometrySet,
    classifier_attribute: &str,
    options: &RasterizeOptions,
) -> Result<RasterStack> {
    options.validate()?;
    let categories = set.categories_of(classifier_attribute);
    if categories.is_empty() {
        return Err(SdmError::validation(format!(
            "no non-null values of classifier attribute '{}' to rasterize",
            classifier_attribute
        )));
    }
    let (_, transform, width, height) = output_geometry(set, options)?;

    let mut bands = Vec::with_capacity(categories.len());
    let mut labels = Vec::with_capacity(categories.len());
    for category in &categories {
        tracing::debug!("rasterizing category {}", category.as_label());
        let mut band = Band::filled(width, height, options.nodata_value);
        for feature in set.features() {
            if feature.attribute(classifier_attribute) == Some(category) {
                burn_geometry(&mut band, &feature.geometry, &transform, options)?;
            }
        }
        bands.push(band);
        labels.push(category.as_label());
    }
    RasterStack::new(bands, labels, options.nodata_value, transform, set.crs())
}

/// Resolve bounds, transform, and output shape for a geometry set.
fn output_geometry(
    set: &VectorGeometrySet,
    options: &RasterizeOptions,
) -> Result<(BoundingBox, AffineTransform, usize, usize)> {
    let bounds = match options.bounds {
        BoundsMode::Global => BoundingBox::global(),
        BoundsMode::Cropped => set.total_bounds().ok_or_else(|| {
            SdmError::validation("cannot derive cropped bounds from an empty geometry set")
        })?,
    };
    // Truncating division: the grid may not exactly reconstruct the bounds.
    let width = (bounds.width() / options.pixel_size) as usize;
    let height = (bounds.height() / options.pixel_size) as usize;
    if width == 0 || height == 0 {
        return Err(SdmError::configuration(format!(
            "pixel_size {} exceeds the extent {:?}",
            options.pixel_size, bounds
        )));
    }
    let transform = AffineTransform::translation(bounds.min_x, bounds.max_y)
        * AffineTransform::scale(options.pixel_size, -options.pixel_size);
    Ok((bounds, transform, width, height))
}

fn burn_geometry(
    band: &mut Band,
    geometry: &Geometry,
    transform: &AffineTransform,
    options: &RasterizeOptions,
) -> Result<()> {
    match geometry {
        Geometry::Point { x, y } => {
            burn_point(band, *x, *y, transform, options.default_value)?;
        }
        Geometry::Polygon(polygon) => {
            burn_polygon(band, polygon, transform, options)?;
        }
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                burn_polygon(band, polygon, transform, options)?;
            }
        }
    }
    Ok(())
}

/// Burn the single cell containing a point, if it lies inside the grid.
fn burn_point(
    band: &mut Band,
    x: f64,
    y: f64,
    transform: &AffineTransform,
    value: f64,
) -> Result<()> {
    let (col, row) = transform.invert(x, y)?;
    let (col, row) = (col.floor(), row.floor());
    if col >= 0.0 && row >= 0.0 && (col as usize) < band.width() && (row as usize) < band.height() {
        band.set(col as usize, row as usize, value);
    }
    Ok(())
}

fn burn_polygon(
    band: &mut Band,
    polygon: &Polygon,
    transform: &AffineTransform,
    options: &RasterizeOptions,
) -> Result<()> {
    scanline_fill(band, polygon, transform, options.default_value)?;
    if options.all_touched {
        for ring in polygon.rings() {
            burn_ring_outline(band, ring, transform, options.default_value)?;
        }
    }
    Ok(())
}

/// Even-odd scanline fill: a cell is burned when its center lies inside
/// the polygon (holes included via their ring edges).
fn scanline_fill(
    band: &mut Band,
    polygon: &Polygon,
    transform: &AffineTransform,
    value: f64,
) -> Result<()> {
    // Restrict scanning to the rows the polygon can reach.
    let bounds = match polygon.bounds() {
        Some(b) => b,
        None => return Ok(()),
    };
    let (_, top_row) = transform.invert(bounds.min_x, bounds.max_y)?;
    let (_, bottom_row) = transform.invert(bounds.max_x, bounds.min_y)?;
    let row_start = top_row.floor().max(0.0) as usize;
    let row_end = (bottom_row.ceil().min(band.height() as f64)) as usize;

    let mut crossings: Vec<f64> = Vec::new();
    for row in row_start..row_end {
        let (_, y) = transform.forward_centered(0.0, row as f64);
        crossings.clear();
        for ring in polygon.rings() {
            collect_crossings(ring, y, &mut crossings);
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).expect("NaN crossing"));
        for pair in crossings.chunks_exact(2) {
            let (x_enter, x_exit) = (pair[0], pair[1]);
            let (col_enter, _) = transform.invert(x_enter, y)?;
            let (col_exit, _) = transform.invert(x_exit, y)?;
            // Cell centers sit at col + 0.5 in pixel space.
            let first = (col_enter - 0.5).ceil().max(0.0) as usize;
            let last = (col_exit - 0.5).floor().min(band.width() as f64 - 1.0);
            if last < 0.0 {
                continue;
            }
            for col in first..=last as usize {
                band.set(col, row, value);
            }
        }
    }
    Ok(())
}

/// X coordinates where a ring crosses the horizontal line at `y`.
///
/// Half-open rule (y1 <= y < y2) so shared vertices count once.
fn collect_crossings(ring: &[(f64, f64)], y: f64, out: &mut Vec<f64>) {
    if ring.len() < 3 {
        return;
    }
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        if (y1 <= y && y < y2) || (y2 <= y && y < y1) {
            out.push(x1 + (y - y1) / (y2 - y1) * (x2 - x1));
        }
    }
}

/// Burn every cell a ring's segments pass through (supercover traversal
/// in pixel space). This is the extra coverage all_touched adds on top
/// of center inclusion.
fn burn_ring_outline(
    band: &mut Band,
    ring: &[(f64, f64)],
    transform: &AffineTransform,
    value: f64,
) -> Result<()> {
    if ring.len() < 2 {
        return Ok(());
    }
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        let (c1, r1) = transform.invert(x1, y1)?;
        let (c2, r2) = transform.invert(x2, y2)?;
        burn_segment(band, c1, r1, c2, r2, value);
    }
    Ok(())
}

/// Walk a segment through the pixel grid, burning each crossed cell.
fn burn_segment(band: &mut Band, c1: f64, r1: f64, c2: f64, r2: f64, value: f64) {
    let dc = c2 - c1;
    let dr = r2 - r1;
    // Step finely enough that no crossed cell is skipped.
    let steps = (dc.abs().max(dr.abs()).ceil() as usize).max(1) * 2;
    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        let col = (c1 + t * dc).floor();
        let row = (r1 + t * dr).floor();
        if col >= 0.0
            && row >= 0.0
            && (col as usize) < band.width()
            && (row as usize) < band.height()
        {
            band.set(col as usize, row as usize, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdm_common::{AttrValue, Crs, Feature};

    fn square_set(x0: f64, y0: f64, size: f64) -> VectorGeometrySet {
        let polygon = Polygon::new(vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ]);
        VectorGeometrySet::new(
            vec![Feature::new(Geometry::Polygon(polygon))],
            Crs::WGS84,
        )
    }

    #[test]
    fn test_global_bounds_resolution() {
        let set = square_set(0.0, 0.0, 10.0);
        let grid = rasterize(&set, &RasterizeOptions::new(1.0)).unwrap();
        assert_eq!(grid.width(), 360);
        assert_eq!(grid.height(), 180);
        // Upper-left pixel corner is the globe's upper-left.
        assert_eq!(grid.transform().forward(0.0, 0.0), (-180.0, 90.0));
    }

    #[test]
    fn test_cropped_bounds_fill() {
        let set = square_set(0.0, 0.0, 10.0);
        let grid = rasterize(&set, &RasterizeOptions::new(1.0).cropped()).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 10);
        // Entire cropped extent is inside the square.
        assert_eq!(grid.band().count_nonzero(), 100);
        for v in grid.band().values() {
            assert!(*v == 0.0 || *v == 1.0);
        }
    }

    #[test]
    fn test_center_inclusion_vs_all_touched() {
        // A 1.5-degree square starting at the origin of a 1-degree grid:
        // centers of the second column/row of cells sit at 1.5, outside.
        let set = square_set(0.0, 0.0, 1.5);
        let options = RasterizeOptions::new(1.0);

        let centered = rasterize(&set, &options).unwrap();
        let touched = rasterize(&set, &options.all_touched(true)).unwrap();
        assert!(touched.band().count_nonzero() > centered.band().count_nonzero());
    }

    #[test]
    fn test_point_burn() {
        let mut set = VectorGeometrySet::empty(Crs::WGS84);
        set.push(Feature::new(Geometry::point(0.5, 0.5)));
        let grid = rasterize(&set, &RasterizeOptions::new(1.0)).unwrap();
        assert_eq!(grid.band().count_nonzero(), 1);
        // (0.5, 0.5) lands in column 180, row 89 of the 1-degree globe.
        assert_eq!(grid.band().get(180, 89), 1.0);
    }

    #[test]
    fn test_hole_is_not_filled() {
        let outer = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let inner = vec![(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)];
        let set = VectorGeometrySet::new(
            vec![Feature::new(Geometry::Polygon(Polygon::with_holes(
                outer,
                vec![inner],
            )))],
            Crs::WGS84,
        );
        let grid = rasterize(&set, &RasterizeOptions::new(1.0).cropped()).unwrap();
        assert_eq!(grid.band().count_nonzero(), 100 - 16);
        // A cell inside the hole stays at nodata.
        assert_eq!(grid.band().get(5, 5), 0.0);
    }

    #[test]
    fn test_empty_set_cropped_fails_global_succeeds() {
        let empty = VectorGeometrySet::empty(Crs::WGS84);
        assert!(rasterize(&empty, &RasterizeOptions::new(1.0).cropped()).is_err());
        let grid = rasterize(&empty, &RasterizeOptions::new(1.0)).unwrap();
        assert_eq!(grid.band().count_nonzero(), 0);
    }

    #[test]
    fn test_invalid_pixel_size() {
        let set = square_set(0.0, 0.0, 10.0);
        assert!(rasterize(&set, &RasterizeOptions::new(0.0)).is_err());
        assert!(rasterize(&set, &RasterizeOptions::new(-1.0)).is_err());
    }

    #[test]
    fn test_classified_band_order_and_selection() {
        let mut set = VectorGeometrySet::empty(Crs::WGS84);
        for (name, x) in [("forest", 0.0), ("steppe", 20.0), ("forest", 40.0)] {
            let polygon = Polygon::new(vec![
                (x, 0.0),
                (x + 10.0, 0.0),
                (x + 10.0, 10.0),
                (x, 10.0),
            ]);
            set.push(
                Feature::new(Geometry::Polygon(polygon))
                    .with_attribute("biome", AttrValue::Text(name.into())),
            );
        }
        let stack =
            rasterize_classified(&set, "biome", &RasterizeOptions::new(1.0).cropped()).unwrap();
        assert_eq!(stack.categories(), &["forest".to_string(), "steppe".to_string()]);
        // The forest band covers two squares, steppe one.
        assert_eq!(
            stack.band_for("forest").unwrap().count_nonzero(),
            2 * stack.band_for("steppe").unwrap().count_nonzero()
        );
    }

    #[test]
    fn test_classified_requires_categories() {
        let set = square_set(0.0, 0.0, 10.0);
        assert!(rasterize_classified(&set, "biome", &RasterizeOptions::new(1.0)).is_err());
    }
}
