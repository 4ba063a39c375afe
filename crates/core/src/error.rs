//! Error types for the picview-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// Errors that can occur within the picview-core library.
///
/// The engine variants ([`InvalidCropRegion`](AppError::InvalidCropRegion),
/// [`NoValidTiling`](AppError::NoValidTiling),
/// [`IndexOutOfRange`](AppError::IndexOutOfRange)) are returned to the
/// surrounding application, which decides how to surface them; nothing in
/// the library panics across its boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// The committed crop rectangle maps to a degenerate region.
    #[error("Invalid crop region: {width}x{height}")]
    InvalidCropRegion {
        /// Computed width in original-image pixels.
        width: i64,
        /// Computed height in original-image pixels.
        height: i64,
    },

    /// The photo cell exceeds the paper in both orientations.
    #[error(
        "No valid tiling: {cell_width}x{cell_height} cell does not fit \
         {paper_width}x{paper_height} paper in either orientation"
    )]
    NoValidTiling {
        paper_width: u32,
        paper_height: u32,
        cell_width: u32,
        cell_height: u32,
    },

    /// A cell index outside the current grid.
    #[error("Cell index {index} out of range (grid has {count} cells)")]
    IndexOutOfRange { index: usize, count: usize },

    /// Configuration-related errors (missing directories, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Directory navigation failed (missing file, no image siblings).
    #[error("Browse error: {0}")]
    Browse(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a browse error with the given message.
    pub fn browse(msg: impl Into<String>) -> Self {
        Self::Browse(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
