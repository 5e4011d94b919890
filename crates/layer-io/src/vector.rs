//! Vector dataset storage seam.

use std::collections::HashMap;

use sdm_common::{Result, SdmError, VectorGeometrySet};

/// Vector dataset store collaborator (shapefile-equivalent).
pub trait VectorStore {
    /// Load a geometry set. Attribute names are lower-cased on load so
    /// classifier lookups do not depend on source casing.
    fn load(&self, path: &str) -> Result<VectorGeometrySet>;

    fn save(&mut self, set: &VectorGeometrySet, path: &str) -> Result<()>;
}

/// Path-keyed in-memory vector store.
#[derive(Debug, Default, Clone)]
pub struct MemoryVectorStore {
    datasets: HashMap<String, VectorGeometrySet>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.datasets.contains_key(path)
    }
}

impl VectorStore for MemoryVectorStore {
    fn load(&self, path: &str) -> Result<VectorGeometrySet> {
        let mut set = self
            .datasets
            .get(path)
            .cloned()
            .ok_or_else(|| SdmError::not_found(path))?;
        set.normalize_attribute_names();
        tracing::debug!(path, features = set.len(), "loaded vector dataset");
        Ok(set)
    }

    fn save(&mut self, set: &VectorGeometrySet, path: &str) -> Result<()> {
        self.datasets.insert(path.to_string(), set.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdm_common::{AttrValue, Crs, Feature, Geometry};

    #[test]
    fn test_save_load_normalizes_attributes() {
        let mut set = VectorGeometrySet::empty(Crs::WGS84);
        set.push(
            Feature::new(Geometry::point(1.0, 2.0))
                .with_attribute("ECO_NAME", AttrValue::Text("taiga".into())),
        );
        let mut store = MemoryVectorStore::new();
        store.save(&set, "ranges.shp").unwrap();

        let loaded = store.load("ranges.shp").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.features()[0].attribute("eco_name"),
            Some(&AttrValue::Text("taiga".into()))
        );
    }

    #[test]
    fn test_load_missing_path() {
        let store = MemoryVectorStore::new();
        assert!(matches!(
            store.load("missing.shp"),
            Err(SdmError::NotFound(_))
        ));
    }
}
