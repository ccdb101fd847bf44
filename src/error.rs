//! Error taxonomy for store, loader and upload operations

use thiserror::Error;

use crate::model_id::ModelId;

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Failures surfaced at the operation boundary.
///
/// None of these are fatal: callers log them and the viewer stays interactive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Model store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Model not found: {0}")]
    NotFound(ModelId),

    #[error("Scene parse failed: {0}")]
    ParseFailed(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl From<reqwest::Error> for ViewerError {
    fn from(err: reqwest::Error) -> Self {
        ViewerError::StoreUnavailable(err.to_string())
    }
}

impl From<gltf::Error> for ViewerError {
    fn from(err: gltf::Error) -> Self {
        ViewerError::ParseFailed(err.to_string())
    }
}
