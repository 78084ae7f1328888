//! Error types returned by the extraction entry points.

use thiserror::Error;

/// A failure reported by the collaborator that turns a native image into a [`PixelBuffer`].
///
/// The extractors never produce this error themselves. It is carried through
/// [`ExtractError::Boundary`] so that callers can tell a decoding problem apart
/// from a problem with the pixels or the configuration.
///
/// [`PixelBuffer`]: crate::PixelBuffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The raw pixels could not be obtained from the native image handle.
    #[error("could not obtain raw pixels from native image: {0}")]
    PixelAccess(String),
    /// The native image uses a pixel layout that cannot be expressed as 8-bit RGBA.
    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),
}

/// The error type for every extraction entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// The pixel buffer has zero width or zero height.
    #[error("image has zero area ({width}x{height})")]
    ZeroArea {
        /// Width of the rejected buffer.
        width: u32,
        /// Height of the rejected buffer.
        height: u32,
    },
    /// The number of bytes does not match `width * height * 4`.
    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA pixels")]
    MalformedBuffer {
        /// Width of the rejected buffer.
        width: u32,
        /// Height of the rejected buffer.
        height: u32,
        /// Length of the byte slice that was supplied.
        len: usize,
    },
    /// No samples were left to work with, e.g., every pixel matched an exclusion.
    #[error("no samples survived sampling and filtering")]
    EmptyInput,
    /// An option was outside of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// The image-decoding collaborator failed before extraction could start.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

impl ExtractError {
    /// Whether this error describes an unusable image (zero area or malformed buffer).
    #[must_use]
    pub const fn is_invalid_image(&self) -> bool {
        matches!(self, Self::ZeroArea { .. } | Self::MalformedBuffer { .. })
    }
}
