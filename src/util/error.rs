//! Error types for looksame.

use thiserror::Error;

/// Result alias for looksame operations.
pub type LooksSameResult<T> = std::result::Result<T, LooksSameError>;

/// Errors that can occur before or while setting up a comparison.
///
/// Every variant is raised before the first pixel is visited; a scan that
/// has started always runs to completion.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LooksSameError {
    /// `strict` and an explicit `tolerance` were requested together.
    #[error("unable to use \"strict\" and \"tolerance\" options together")]
    StrictWithTolerance,
    /// An option value is outside of its accepted range.
    #[error("invalid option \"{name}\": {reason}")]
    InvalidOption {
        name: &'static str,
        reason: &'static str,
    },
    /// The bounding box coordinates are not ordered.
    #[error("invalid bounding box: {reason}")]
    InvalidBoundingBox { reason: &'static str },
    /// The bounding box does not fit into the source image.
    #[error(
        "bounding box ({left}, {top})..=({right}, {bottom}) exceeds image bounds ({img_width}x{img_height})"
    )]
    BoundingBoxOutOfBounds {
        left: usize,
        top: usize,
        right: usize,
        bottom: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Only interleaved RGB and RGBA buffers are accepted.
    #[error("unsupported channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// The pixel buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A color string could not be parsed.
    #[error("invalid color: {input:?}")]
    InvalidColor { input: String },
    /// Image decoding, encoding or file access failed.
    #[error("image i/o error: {reason}")]
    ImageIo { reason: String },
}
