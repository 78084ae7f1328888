//! A library for finding the dominant colors of an image.
//!
//! `dominant` offers three extraction strategies over an 8-bit RGBA [`PixelBuffer`]:
//! - [`extract_by_frequency`]: counts the exact colors and merges colors that are
//!   perceptually similar according to a [`DistanceFormula`] and threshold.
//! - [`extract_by_kmeans`]: clusters the colors in CIELAB space with k-means.
//! - [`extract_by_area_average`]: splits the image into strips and averages each one.
//!
//! Each entry point returns a list of [`ColorFrequency`]s, sorted by a [`SortMode`].
//!
//! # Features
//! To reduce dependencies and compile times, `dominant` has several `cargo` features
//! that can be turned off or on:
//! - `kmeans`: adds the k-means strategy.
//! - `threads`: exposes parallel versions of the entry points via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # Examples
//! ```
//! # use dominant::{PixelBuffer, FrequencyOptions, ExclusionOption, extract_by_frequency};
//! # fn main() -> Result<(), dominant::ExtractError> {
//! let bytes = [
//!     255, 0, 0, 255, 255, 0, 0, 255,
//!     255, 0, 0, 255, 0, 0, 255, 255,
//! ];
//! let buffer = PixelBuffer::new(2, 2, &bytes)?;
//!
//! let options = FrequencyOptions::new()
//!     .max_count(4)
//!     .exclude(ExclusionOption::ExcludeWhite);
//!
//! let colors = extract_by_frequency(buffer, options)?;
//! assert_eq!(colors.len(), 2);
//! assert_eq!(colors[0].count, 3);
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the functions above require certain features to be enabled.

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod color_counts;
mod delta_e;
mod error;
mod sample;
mod traits;
mod types;

pub mod average;
pub mod colorspace;
pub mod filter;
pub mod frequency;
pub mod sort;

#[cfg(feature = "kmeans")]
pub mod kmeans;

pub use api::*;
pub use color_counts::*;
pub use delta_e::*;
pub use error::*;
pub use filter::{ExclusionOption, Exclusions};
pub use sample::*;
pub use sort::{PaletteEntry, SortMode};
pub use traits::*;
pub use types::*;

/// The maximum supported number of pixels in a [`PixelBuffer`].
pub const MAX_PIXELS: u32 = u32::MAX;

#[cfg(test)]
pub(crate) mod tests {
    use crate::PixelBuffer;
    use palette::{Srgb, Srgba};

    pub const RED: Srgba<u8> = opaque(255, 0, 0);
    pub const BLUE: Srgba<u8> = opaque(0, 0, 255);
    pub const BLACK: Srgba<u8> = opaque(0, 0, 0);
    pub const WHITE: Srgba<u8> = opaque(255, 255, 255);

    const fn opaque(red: u8, green: u8, blue: u8) -> Srgba<u8> {
        Srgba {
            color: Srgb::new(red, green, blue),
            alpha: u8::MAX,
        }
    }

    pub fn flat_pixels(width: u32, height: u32, color: Srgba<u8>) -> Vec<Srgba<u8>> {
        vec![color; (width * height) as usize]
    }

    pub fn buffer_of(width: u32, height: u32, pixels: &[Srgba<u8>]) -> PixelBuffer<'_> {
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    /// Smoothly varying colors with a repeating blue ramp, so that
    /// many colors are unique but neighbors are close together.
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient_pixels(width: u32, height: u32) -> Vec<Srgba<u8>> {
        (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| {
                    opaque(
                        (x * 255 / width) as u8,
                        (y * 255 / height) as u8,
                        ((x + y) * 16 % 256) as u8,
                    )
                })
            })
            .collect()
    }
}
