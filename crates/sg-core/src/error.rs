use thiserror::Error;

/// Errors raised at the boundary of the core, before a scan runs.
///
/// The scan itself never fails; these guard the inputs handed to it.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// Width or height is zero.
    #[error("invalid dimensions: {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel data length does not match `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes required by the dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// Sampling stride must be at least 1.
    #[error("invalid stride: {0}")]
    InvalidStride(u32),
}
