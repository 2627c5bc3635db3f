use thiserror::Error;

use crate::layout::LengthMismatch;

/// Failure to obtain a byte buffer from source text.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("array '{0}' not found")]
    ArrayNotFound(String),

    #[error("array '{0}' has no closing brace")]
    Unterminated(String),

    #[error("array '{0}' contains no hex byte literals")]
    NoBytes(String),

    #[error("invalid hex literal '{literal}' in array '{name}'")]
    InvalidLiteral { name: String, literal: String },

    #[error("array '{name}' declares {declared} bytes but holds {found}")]
    DeclaredLength {
        name: String,
        declared: usize,
        found: usize,
    },

    #[error("reading source: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to place indices into a grid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("image dimensions {width}x{height} must both be non-zero")]
    ZeroDimension { width: usize, height: usize },

    #[error("{width}x{height} pixels do not fill whole bytes of 4 pixels")]
    NotPixelAligned { width: usize, height: usize },

    #[error("{0}")]
    LengthMismatch(LengthMismatch),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Parse(String),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("pad index {0} is not a 2-bit color index")]
    PadIndex(u8),

    #[error("display size {width}x{height} must both be non-zero")]
    DisplaySize { width: usize, height: usize },
}
