//! Error types for pixel fields.
//!
//! Every failure in this crate is an asset or configuration problem. None of
//! them is fatal to a host page: callers are expected to fall back to an
//! empty (inert) field when construction fails.

use thiserror::Error;

/// Errors that can occur while building a particle field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Failed to decode a raster image.
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// Failed to read an asset from disk.
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a font or configuration document.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A mesh with no triangle area was handed to the surface sampler.
    #[error("mesh has no surface area to sample")]
    EmptyMesh,

    /// Two buffers that must stay index-aligned have different lengths.
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the reference buffer.
        expected: usize,
        /// Length of the offending buffer.
        actual: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FieldError>;
