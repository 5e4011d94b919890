//! Vector geometries and attributed feature sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bbox::BoundingBox;
use crate::crs::Crs;

/// A closed ring of (x, y) vertices. The last vertex is implicitly
/// connected back to the first; it need not be repeated.
pub type Ring = Vec<(f64, f64)>;

/// A polygon with an exterior ring and zero or more interior rings (holes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }

    pub fn with_holes(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// All rings: exterior first, then interiors.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        bounds_of(&self.exterior)
    }
}

/// Geometry variants supported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point { x: f64, y: f64 },
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Geometry {
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { x, y }
    }

    /// Bounding box of the geometry, None for degenerate empty polygons.
    pub fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Geometry::Point { x, y } => Some(BoundingBox::new(*x, *y, *x, *y)),
            Geometry::Polygon(p) => p.bounds(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .filter_map(Polygon::bounds)
                .reduce(|a, b| a.union(&b)),
        }
    }
}

fn bounds_of(ring: &Ring) -> Option<BoundingBox> {
    let first = ring.first()?;
    let mut bbox = BoundingBox::new(first.0, first.1, first.0, first.1);
    for &(x, y) in &ring[1..] {
        bbox.min_x = bbox.min_x.min(x);
        bbox.min_y = bbox.min_y.min(y);
        bbox.max_x = bbox.max_x.max(x);
        bbox.max_y = bbox.max_y.max(y);
    }
    Some(bbox)
}

/// A typed attribute value from a feature's attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Stable textual form used for category labels.
    pub fn as_label(&self) -> String {
        match self {
            AttrValue::Null => String::new(),
            AttrValue::Int(v) => v.to_string(),
            AttrValue::Float(v) => v.to_string(),
            AttrValue::Text(v) => v.clone(),
        }
    }
}

/// One geometry with its attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }
}

/// An ordered collection of features sharing a coordinate reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorGeometrySet {
    features: Vec<Feature>,
    crs: Crs,
}

impl VectorGeometrySet {
    pub fn new(features: Vec<Feature>, crs: Crs) -> Self {
        Self { features, crs }
    }

    pub fn empty(crs: Crs) -> Self {
        Self::new(Vec::new(), crs)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut Vec<Feature> {
        &mut self.features
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Bounding box covering every feature, None if the set is empty.
    pub fn total_bounds(&self) -> Option<BoundingBox> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Distinct non-null values of an attribute, in first-seen order.
    ///
    /// This is the band ordering used by classified rasterization.
    pub fn categories_of(&self, attribute: &str) -> Vec<AttrValue> {
        let mut seen = Vec::new();
        for feature in &self.features {
            if let Some(value) = feature.attribute(attribute) {
                if !value.is_null() && !seen.contains(value) {
                    seen.push(value.clone());
                }
            }
        }
        seen
    }

    /// Lower-case every attribute name, in place.
    ///
    /// Shapefile-style sources are inconsistent about attribute casing;
    /// loaders normalize so downstream classifier lookups are stable.
    pub fn normalize_attribute_names(&mut self) {
        for feature in &mut self.features {
            let normalized: BTreeMap<String, AttrValue> = std::mem::take(&mut feature.attributes)
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect();
            feature.attributes = normalized;
        }
    }
}
