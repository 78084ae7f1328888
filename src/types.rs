//! Contains various types needed across the crate.

use crate::{ExtractError, MAX_PIXELS};
use palette::{
    cast::{self, ComponentsAs},
    Srgb, Srgba,
};
use std::fmt::Display;

/// An immutable, borrowed view over an 8-bit RGBA image.
///
/// This is the contract with whatever decodes the source image:
/// - pixels are stored row-major, top row first, with no padding between rows
/// - each pixel is four bytes in `R, G, B, A` order
/// - color channels are sRGB encoded and *not* premultiplied by alpha
///
/// # Examples
/// ```
/// # use dominant::{PixelBuffer, ExtractError};
/// # fn main() -> Result<(), ExtractError> {
/// let bytes = [255, 0, 0, 255, 0, 0, 255, 255];
/// let buffer = PixelBuffer::new(2, 1, &bytes)?;
/// assert_eq!(buffer.num_pixels(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBuffer<'a> {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Exactly `width * height` pixels.
    pixels: &'a [Srgba<u8>],
}

impl<'a> PixelBuffer<'a> {
    /// Creates a [`PixelBuffer`] over raw RGBA bytes.
    ///
    /// # Errors
    /// Returns [`ExtractError::ZeroArea`] if either dimension is zero and
    /// [`ExtractError::MalformedBuffer`] if `bytes` does not hold exactly
    /// `width * height` RGBA pixels (or more than [`MAX_PIXELS`] pixels).
    pub fn new(width: u32, height: u32, bytes: &'a [u8]) -> Result<Self, ExtractError> {
        let num_pixels = Self::checked_num_pixels(width, height, bytes.len())?;
        if num_pixels.checked_mul(4) == Some(bytes.len()) {
            Ok(Self { width, height, pixels: bytes.components_as() })
        } else {
            Err(ExtractError::MalformedBuffer { width, height, len: bytes.len() })
        }
    }

    /// Creates a [`PixelBuffer`] over an already typed pixel slice.
    ///
    /// # Errors
    /// Same conditions as [`PixelBuffer::new`], where the length is counted in pixels.
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: &'a [Srgba<u8>],
    ) -> Result<Self, ExtractError> {
        let num_pixels = Self::checked_num_pixels(width, height, pixels.len() * 4)?;
        if num_pixels == pixels.len() {
            Ok(Self { width, height, pixels })
        } else {
            Err(ExtractError::MalformedBuffer { width, height, len: pixels.len() * 4 })
        }
    }

    fn checked_num_pixels(width: u32, height: u32, len: usize) -> Result<usize, ExtractError> {
        if width == 0 || height == 0 {
            return Err(ExtractError::ZeroArea { width, height });
        }

        let pixels = u64::from(width) * u64::from(height);
        if pixels > u64::from(MAX_PIXELS) {
            return Err(ExtractError::MalformedBuffer { width, height, len });
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            Ok(pixels as usize)
        }
    }

    /// The width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The total number of pixels as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_pixels(&self) -> u32 {
        self.pixels.len() as u32
    }

    /// The pixels in raster order.
    #[must_use]
    pub const fn pixels(&self) -> &'a [Srgba<u8>] {
        self.pixels
    }
}

/// Controls how many pixels are sampled from the image.
///
/// Higher qualities look at more pixels, which gives more accurate results but takes longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Quality {
    /// Samples about 1 000 pixels.
    Low,
    /// Samples about 10 000 pixels.
    #[default]
    Fair,
    /// Samples about 100 000 pixels.
    High,
    /// Samples every pixel.
    Highest,
}

impl Quality {
    /// The maximum number of pixels that will be sampled for this quality.
    #[must_use]
    pub const fn max_samples(self) -> u32 {
        match self {
            Self::Low => 1_000,
            Self::Fair => 10_000,
            Self::High => 100_000,
            Self::Highest => MAX_PIXELS,
        }
    }
}

/// A color paired with the number of samples it stands for.
///
/// For the frequency strategy the count is the number of merged samples,
/// for k-means it is the number of cluster members,
/// and for area averages it is the number of samples in the region.
/// The count is always at least `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFrequency {
    /// The representative color.
    pub color: Srgb<u8>,
    /// The number of samples represented by `color`.
    pub count: u32,
}

impl ColorFrequency {
    /// Creates a new [`ColorFrequency`].
    #[must_use]
    pub const fn new(color: Srgb<u8>, count: u32) -> Self {
        Self { color, count }
    }

    /// The count as a fraction of `total` samples.
    ///
    /// Returns `0.0` if `total` is `0`.
    #[must_use]
    pub fn proportion(&self, total: u32) -> f64 {
        if total == 0 {
            0.0
        } else {
            f64::from(self.count) / f64::from(total)
        }
    }
}

impl Display for ColorFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [red, green, blue] = cast::into_array(self.color);
        write!(f, "#{red:02x}{green:02x}{blue:02x} x{}", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_is_rejected() {
        assert_eq!(
            PixelBuffer::new(0, 4, &[]),
            Err(ExtractError::ZeroArea { width: 0, height: 4 })
        );
        assert_eq!(
            PixelBuffer::new(4, 0, &[]),
            Err(ExtractError::ZeroArea { width: 4, height: 0 })
        );
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let bytes = [0; 15];
        let err = PixelBuffer::new(2, 2, &bytes).unwrap_err();
        assert!(err.is_invalid_image());
        assert_eq!(err, ExtractError::MalformedBuffer { width: 2, height: 2, len: 15 });
    }

    #[test]
    fn pixels_are_read_as_rgba() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        let buffer = PixelBuffer::new(1, 2, &bytes).unwrap();
        assert_eq!(buffer.pixels(), &[Srgba::new(1, 2, 3, 4), Srgba::new(5, 6, 7, 8)]);
    }

    #[test]
    fn proportion_of_total() {
        let freq = ColorFrequency::new(Srgb::new(0, 0, 0), 3);
        assert!((freq.proportion(4) - 0.75).abs() < f64::EPSILON);
        assert!(freq.proportion(0).abs() < f64::EPSILON);
        assert_eq!(freq.to_string(), "#000000 x3");
    }
}
