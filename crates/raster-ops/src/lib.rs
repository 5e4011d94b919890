//! Raster/vector transformations for the SDM layer engine.
//!
//! - [`coords`]: affine pixel-to-world coordinate mapping with nodata
//!   filtering.
//! - [`rasterize`]: burning vector geometries into grids, single-band or
//!   classified multi-band.
//! - [`polygonize`]: the inverse, extracting polygons from contiguous
//!   same-valued grid regions.
//! - [`reproject`]: orchestration of resampling through an external
//!   [`Warper`] collaborator.

pub mod coords;
pub mod polygonize;
pub mod rasterize;
pub mod reproject;

// Re-export commonly used items at crate root
pub use coords::{grid_to_world_coordinates, pixel_to_world_coordinates};
pub use polygonize::{polygonize, polygonize_band};
pub use rasterize::{rasterize, rasterize_classified, BoundsMode, RasterizeOptions};
pub use reproject::{
    reproject, reproject_stack, DestGeoref, ResamplingMethod, SourceGeoref, WarpParams, Warper,
};
