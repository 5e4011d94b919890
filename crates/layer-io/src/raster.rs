//! Raster dataset storage seam.
//!
//! File formats (GeoTIFF and friends) live outside the engine; the core
//! only needs `open → read bands → close` with georeferencing metadata,
//! and explicit handle lifecycle: reading a closed handle is an error,
//! never silently stale data.

use std::collections::HashMap;
use std::sync::Arc;

use sdm_common::{
    AffineTransform, Band, BoundingBox, Crs, RasterGrid, RasterStack, Result, SdmError,
};

/// Georeferencing metadata of an opened raster dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub nodata: f64,
    pub crs: Crs,
    pub transform: AffineTransform,
    pub bounds: BoundingBox,
}

/// An open raster dataset. Bands are 1-indexed, following the GDAL
/// convention the rest of the geospatial world uses.
pub trait RasterHandle {
    fn metadata(&self) -> &RasterMetadata;

    /// Read one band. Fails with a resource error once the handle is
    /// closed or when the band index is out of range.
    fn read(&self, band: usize) -> Result<Band>;

    /// Read band 1 together with its georeferencing.
    fn read_grid(&self) -> Result<RasterGrid> {
        let meta = self.metadata().clone();
        Ok(RasterGrid::new(
            self.read(1)?,
            meta.nodata,
            meta.transform,
            meta.crs,
        ))
    }

    /// Release the dataset. Idempotent.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Raster dataset store collaborator.
pub trait RasterStore {
    type Handle: RasterHandle;

    fn open(&self, path: &str) -> Result<Self::Handle>;

    /// Persist a single-band grid with its georeferencing.
    fn write(&mut self, path: &str, grid: &RasterGrid) -> Result<()>;

    /// Persist a classified multi-band stack in one pass.
    fn write_stack(&mut self, path: &str, stack: &RasterStack) -> Result<()>;
}

#[derive(Debug, Clone)]
struct StoredRaster {
    bands: Arc<Vec<Band>>,
    metadata: RasterMetadata,
}

/// Path-keyed in-memory raster store, used by tests and by callers that
/// stage intermediate grids in RAM.
#[derive(Debug, Default, Clone)]
pub struct MemoryRasterStore {
    datasets: HashMap<String, StoredRaster>,
}

impl MemoryRasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.datasets.contains_key(path)
    }
}

impl RasterStore for MemoryRasterStore {
    type Handle = MemoryRasterHandle;

    fn open(&self, path: &str) -> Result<MemoryRasterHandle> {
        let stored = self
            .datasets
            .get(path)
            .ok_or_else(|| SdmError::not_found(path))?;
        tracing::debug!(path, bands = stored.metadata.band_count, "opened raster dataset");
        Ok(MemoryRasterHandle {
            path: path.to_string(),
            bands: Arc::clone(&stored.bands),
            metadata: stored.metadata.clone(),
            closed: false,
        })
    }

    fn write(&mut self, path: &str, grid: &RasterGrid) -> Result<()> {
        let metadata = RasterMetadata {
            width: grid.width(),
            height: grid.height(),
            band_count: 1,
            nodata: grid.nodata(),
            crs: grid.crs(),
            transform: *grid.transform(),
            bounds: grid.bounds(),
        };
        self.datasets.insert(
            path.to_string(),
            StoredRaster {
                bands: Arc::new(vec![grid.band().clone()]),
                metadata,
            },
        );
        Ok(())
    }

    fn write_stack(&mut self, path: &str, stack: &RasterStack) -> Result<()> {
        let (width, height) = match stack.bands().first() {
            Some(band) => band.shape(),
            None => return Err(SdmError::validation("cannot write an empty raster stack")),
        };
        let transform = *stack.transform();
        let metadata = RasterMetadata {
            width,
            height,
            band_count: stack.band_count(),
            nodata: stack.nodata(),
            crs: stack.crs(),
            transform,
            bounds: {
                let (x0, y0) = transform.forward(0.0, 0.0);
                let (x1, y1) = transform.forward(width as f64, height as f64);
                BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
            },
        };
        self.datasets.insert(
            path.to_string(),
            StoredRaster {
                bands: Arc::new(stack.bands().to_vec()),
                metadata,
            },
        );
        Ok(())
    }
}

/// Handle onto a dataset in a [`MemoryRasterStore`].
#[derive(Debug, Clone)]
pub struct MemoryRasterHandle {
    path: String,
    bands: Arc<Vec<Band>>,
    metadata: RasterMetadata,
    closed: bool,
}

impl RasterHandle for MemoryRasterHandle {
    fn metadata(&self) -> &RasterMetadata {
        &self.metadata
    }

    fn read(&self, band: usize) -> Result<Band> {
        if self.closed {
            return Err(SdmError::resource(format!(
                "dataset {} is closed; open it again before reading",
                self.path
            )));
        }
        if band == 0 || band > self.bands.len() {
            return Err(SdmError::resource(format!(
                "band {} out of range 1..={} in {}",
                band,
                self.bands.len(),
                self.path
            )));
        }
        Ok(self.bands[band - 1].clone())
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            tracing::debug!(path = %self.path, "closed raster dataset");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> RasterGrid {
        let band = Band::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
        let transform = AffineTransform::from_bounds(&BoundingBox::new(0.0, 0.0, 2.0, 2.0), 1.0);
        RasterGrid::new(band, 0.0, transform, Crs::WGS84)
    }

    #[test]
    fn test_write_open_read_roundtrip() {
        let mut store = MemoryRasterStore::new();
        let grid = sample_grid();
        store.write("layers/regions.tif", &grid).unwrap();

        let handle = store.open("layers/regions.tif").unwrap();
        assert_eq!(handle.metadata().width, 2);
        assert_eq!(handle.metadata().band_count, 1);
        let band = handle.read(1).unwrap();
        assert_eq!(band.values(), grid.band().values());
    }

    #[test]
    fn test_open_missing_path() {
        let store = MemoryRasterStore::new();
        assert!(matches!(
            store.open("nowhere.tif"),
            Err(SdmError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_after_close_fails() {
        let mut store = MemoryRasterStore::new();
        store.write("a.tif", &sample_grid()).unwrap();
        let mut handle = store.open("a.tif").unwrap();
        handle.close();
        assert!(handle.is_closed());
        assert!(matches!(handle.read(1), Err(SdmError::Resource(_))));
        // Closing twice is harmless.
        handle.close();
    }

    #[test]
    fn test_band_index_is_one_based() {
        let mut store = MemoryRasterStore::new();
        store.write("a.tif", &sample_grid()).unwrap();
        let handle = store.open("a.tif").unwrap();
        assert!(handle.read(0).is_err());
        assert!(handle.read(1).is_ok());
        assert!(handle.read(2).is_err());
    }

    #[test]
    fn test_stack_written_in_one_pass() {
        let bands = vec![Band::zeros(2, 2), Band::filled(2, 2, 1.0)];
        let stack = RasterStack::new(
            bands,
            vec!["forest".into(), "steppe".into()],
            0.0,
            AffineTransform::from_bounds(&BoundingBox::new(0.0, 0.0, 2.0, 2.0), 1.0),
            Crs::WGS84,
        )
        .unwrap();
        let mut store = MemoryRasterStore::new();
        store.write_stack("biomes.tif", &stack).unwrap();
        let handle = store.open("biomes.tif").unwrap();
        assert_eq!(handle.metadata().band_count, 2);
        assert_eq!(handle.read(2).unwrap().values(), &[1.0, 1.0, 1.0, 1.0]);
    }
}
