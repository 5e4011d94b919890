//! Error types for the SDM layer engine.

use thiserror::Error;

/// Result type alias using SdmError.
pub type Result<T> = std::result::Result<T, SdmError>;

/// Primary error type for layer operations.
///
/// Configuration and validation errors are raised before any heavy
/// computation starts. Under-supplied sampling is *not* an error; it is
/// reported through diagnostics on the result.
#[derive(Debug, Error)]
pub enum SdmError {
    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    // === Validation Errors ===
    #[error("validation error: {0}")]
    Validation(String),

    #[error("grid shapes do not match: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    // === Resource Errors ===
    #[error("resource error: {0}")]
    Resource(String),

    #[error("dataset not found: {0}")]
    NotFound(String),

    // === Collaborator Errors ===
    #[error("warp error: {0}")]
    Warp(String),
}

impl SdmError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a MissingParameter error.
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    /// Create a Validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a ShapeMismatch error from two (width, height) pairs.
    pub fn shape_mismatch(left: (usize, usize), right: (usize, usize)) -> Self {
        Self::ShapeMismatch { left, right }
    }

    /// Create a Resource error.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Create a NotFound error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a Warp error.
    pub fn warp(msg: impl Into<String>) -> Self {
        Self::Warp(msg.into())
    }
}

impl From<std::io::Error> for SdmError {
    fn from(err: std::io::Error) -> Self {
        Self::Resource(err.to_string())
    }
}

impl From<serde_json::Error> for SdmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(format!("JSON error: {}", err))
    }
}
