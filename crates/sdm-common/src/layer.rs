//! Layer capability surface.
//!
//! Environmental data arrives either as a raster grid or as a vector
//! feature set. Instead of a subclass tower, a layer is one of two value
//! types tagged with a [`LayerKind`] describing what the data represents
//! and a [`Source`] recording where it came from.

use serde::{Deserialize, Serialize};

use crate::crs::Crs;
use crate::grid::RasterGrid;
use crate::vector::VectorGeometrySet;

/// What a layer's data represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Climate,
    Dem,
    LandCover,
    /// Biogeographic realms / ecoregions used as sampling regions.
    Realms,
    Habitat,
    Bias,
    #[default]
    Other,
}

/// Provenance of a global environmental dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    WorldClim,
    Globe,
    Tnc,
    ArcGis,
    Wwl,
    #[default]
    Unknown,
}

/// Common capabilities shared by raster and vector layers.
pub trait Layer {
    fn kind(&self) -> LayerKind;
    fn source(&self) -> Source;
    fn crs(&self) -> Crs;
    fn name(&self) -> &str;
}

/// A named, tagged raster layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterLayer {
    pub name: String,
    pub kind: LayerKind,
    pub source: Source,
    pub grid: RasterGrid,
}

impl RasterLayer {
    pub fn new(name: impl Into<String>, kind: LayerKind, source: Source, grid: RasterGrid) -> Self {
        Self {
            name: name.into(),
            kind,
            source,
            grid,
        }
    }

    /// Release the layer wrapper and keep only the grid.
    pub fn into_grid(self) -> RasterGrid {
        self.grid
    }
}

impl Layer for RasterLayer {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn source(&self) -> Source {
        self.source
    }

    fn crs(&self) -> Crs {
        self.grid.crs()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A named, tagged vector layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorLayer {
    pub name: String,
    pub kind: LayerKind,
    pub source: Source,
    pub geometries: VectorGeometrySet,
}

impl VectorLayer {
    pub fn new(
        name: impl Into<String>,
        kind: LayerKind,
        source: Source,
        geometries: VectorGeometrySet,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            source,
            geometries,
        }
    }

    pub fn into_geometries(self) -> VectorGeometrySet {
        self.geometries
    }
}

impl Layer for VectorLayer {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn source(&self) -> Source {
        self.source
    }

    fn crs(&self) -> Crs {
        self.geometries.crs()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::Band;
    use crate::transform::AffineTransform;

    #[test]
    fn test_layer_capabilities() {
        let grid = RasterGrid::new(
            Band::zeros(4, 4),
            0.0,
            AffineTransform::identity(),
            Crs::WGS84,
        );
        let layer = RasterLayer::new("realms", LayerKind::Realms, Source::Tnc, grid);
        assert_eq!(layer.kind(), LayerKind::Realms);
        assert_eq!(layer.source(), Source::Tnc);
        assert_eq!(layer.crs(), Crs::WGS84);
        assert_eq!(layer.name(), "realms");
    }
}
