//! Narrow conversion traits for the boundary with native image and color types.
//!
//! The extractors only ever see a [`PixelBuffer`] and return [`ColorFrequency`]s.
//! Integrations with a particular image library implement these traits,
//! so that decoding failures surface as [`ExtractError::Boundary`]
//! and result colors can be turned into the library's own color type.
//!
//! With the `image` feature enabled, both traits are implemented for the [`image`] crate.

use crate::{ColorFrequency, ExtractError, PixelBuffer};
use palette::Srgb;

#[cfg(feature = "image")]
use {
    crate::BoundaryError,
    image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage},
    palette::cast,
};

/// Types that can expose their pixels as an 8-bit RGBA [`PixelBuffer`].
pub trait DecodeToPixelBuffer {
    /// Borrows the pixels of `self` as a [`PixelBuffer`].
    ///
    /// # Errors
    /// Returns [`ExtractError::Boundary`] if the pixels cannot be accessed as 8-bit RGBA,
    /// or any of the [`PixelBuffer::new`] errors.
    fn decode_to_pixel_buffer(&self) -> Result<PixelBuffer<'_>, ExtractError>;
}

/// Conversion of a result color into a native color type.
pub trait ToNativeColor<Native> {
    /// Converts `self` into the native color.
    fn to_native_color(&self) -> Native;
}

impl<Native> ToNativeColor<Native> for ColorFrequency
where
    Srgb<u8>: ToNativeColor<Native>,
{
    fn to_native_color(&self) -> Native {
        self.color.to_native_color()
    }
}

#[cfg(feature = "image")]
impl DecodeToPixelBuffer for RgbaImage {
    fn decode_to_pixel_buffer(&self) -> Result<PixelBuffer<'_>, ExtractError> {
        PixelBuffer::new(self.width(), self.height(), self.as_raw())
    }
}

#[cfg(feature = "image")]
impl DecodeToPixelBuffer for DynamicImage {
    fn decode_to_pixel_buffer(&self) -> Result<PixelBuffer<'_>, ExtractError> {
        match self.as_rgba8() {
            Some(image) => image.decode_to_pixel_buffer(),
            None => Err(BoundaryError::UnsupportedLayout(format!(
                "expected 8-bit RGBA pixels, found {:?}",
                self.color()
            ))
            .into()),
        }
    }
}

#[cfg(feature = "image")]
impl ToNativeColor<Rgb<u8>> for Srgb<u8> {
    fn to_native_color(&self) -> Rgb<u8> {
        Rgb(cast::into_array(*self))
    }
}

#[cfg(feature = "image")]
impl ToNativeColor<Rgba<u8>> for Srgb<u8> {
    fn to_native_color(&self) -> Rgba<u8> {
        let [r, g, b] = cast::into_array(*self);
        Rgba([r, g, b, u8::MAX])
    }
}

/// Collects the result colors as an [`RgbImage`] swatch strip, one pixel per color.
///
/// # Errors
/// Returns [`ExtractError::EmptyInput`] if `colors` is empty.
#[cfg(feature = "image")]
pub fn swatch_image(colors: &[ColorFrequency]) -> Result<RgbImage, ExtractError> {
    #[allow(clippy::cast_possible_truncation)]
    let width = colors.len() as u32;
    if width == 0 {
        return Err(ExtractError::EmptyInput);
    }
    Ok(RgbImage::from_fn(width, 1, |x, _| colors[x as usize].to_native_color()))
}
