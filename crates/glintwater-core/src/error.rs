//! Error types for glintwater.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for glintwater operations.
#[derive(Error, Debug)]
pub enum GlintwaterError {
    /// An image asset (environment map or normal map) could not be loaded.
    #[error("failed to load asset '{path}': {reason}")]
    AssetLoad { path: PathBuf, reason: String },

    /// A buffer was requested with unusable dimensions.
    #[error("invalid buffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for glintwater operations.
pub type Result<T> = std::result::Result<T, GlintwaterError>;

/// Rejects zero-sized buffers.
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(GlintwaterError::InvalidDimensions { width, height });
    }
    Ok(())
}
