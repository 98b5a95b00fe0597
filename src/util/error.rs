//! Error types for edgematch.

use thiserror::Error;

/// Result alias for edgematch operations.
pub type EdgeMatchResult<T> = std::result::Result<T, EdgeMatchError>;

/// Errors that can occur when validating inputs to edgematch kernels.
///
/// All variants are construction-time: once a view or model type has been
/// built, the hot paths run without further fallible checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeMatchError {
    /// Width or height is outside the supported range.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("stride {stride} smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// A backing buffer is too small for the described raster.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Parallel slices that must agree in length do not.
    #[error("length mismatch for {context}: expected {expected}, got {got}")]
    LengthMismatch {
        expected: usize,
        got: usize,
        context: &'static str,
    },
    /// The orientation-bin CSR table is malformed.
    #[error("invalid orientation bin table: {reason}")]
    InvalidBinTable { reason: &'static str },
    /// The angle sweep window or vote parameters are malformed.
    #[error("invalid sweep: {reason}")]
    InvalidSweep { reason: &'static str },
}
