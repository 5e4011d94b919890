//! Shared types for the SDM layer engine.
//!
//! This crate holds the value types every other crate in the workspace
//! builds on: bounding boxes, CRS identifiers, affine transforms, raw
//! [`Band`] arrays, georeferenced [`RasterGrid`]s, vector feature sets,
//! the layer capability surface, and the common error taxonomy.

pub mod band;
pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod layer;
pub mod transform;
pub mod vector;

// Re-export commonly used types at crate root
pub use band::Band;
pub use bbox::BoundingBox;
pub use crs::Crs;
pub use error::{Result, SdmError};
pub use grid::{RasterGrid, RasterStack};
pub use layer::{Layer, LayerKind, RasterLayer, Source, VectorLayer};
pub use transform::AffineTransform;
pub use vector::{AttrValue, Feature, Geometry, Polygon, VectorGeometrySet};
