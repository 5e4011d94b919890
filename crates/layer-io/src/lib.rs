//! Storage collaborator seams for the SDM layer engine.
//!
//! File-format byte layout is out of scope for the core; these traits
//! define what the engine needs from raster and vector storage, and the
//! in-memory implementations back tests and RAM-staged pipelines.

pub mod raster;
pub mod vector;

// Re-export commonly used items at crate root
pub use raster::{
    MemoryRasterHandle, MemoryRasterStore, RasterHandle, RasterMetadata, RasterStore,
};
pub use vector::{MemoryVectorStore, VectorStore};
