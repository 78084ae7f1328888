//! Average colors of rectangular regions.
//!
//! The image is split into `count` strips of equal size along its longer side,
//! and the samples falling into each strip are averaged in linear light.
//! This is a single pass over the samples, so it is fast but not perceptually aware.
//!
//! The samples should come from [`Sampler::grid_samples`](crate::Sampler::grid_samples)
//! limited by [`strip_steps`]. A raster stride can alias with the image width
//! and leave whole strips without samples.

use crate::{
    colorspace::{from_linear, to_lab, to_linear},
    PaletteEntry, Sample,
};
use palette::LinSrgb;

#[derive(Debug, Clone, Copy, Default)]
struct Region {
    sum: [f64; 3],
    count: u32,
}

/// The largest sampling steps along x and y that still put samples in every strip.
///
/// Strips narrower than one pixel (more strips than pixels along the longer side)
/// stay empty regardless.
#[must_use]
pub fn strip_steps(width: u32, height: u32, count: usize) -> (u32, u32) {
    let count = u32::try_from(count).unwrap_or(u32::MAX).max(1);
    if width >= height {
        ((width / count).max(1), u32::MAX)
    } else {
        (u32::MAX, (height / count).max(1))
    }
}

/// Averages `samples` into at most `count` strip regions of an image with the given dimensions.
///
/// Strips are ordered left to right (or top to bottom for portrait images).
/// Strips without any samples are left out.
#[must_use]
pub fn average(
    samples: impl IntoIterator<Item = Sample>,
    width: u32,
    height: u32,
    count: usize,
) -> Vec<PaletteEntry> {
    if count == 0 || width == 0 || height == 0 {
        return Vec::new();
    }

    let horizontal = width >= height;
    let extent = u64::from(if horizontal { width } else { height });
    let n = count as u64;

    let mut regions = vec![Region::default(); count];
    for Sample { x, y, color } in samples {
        let position = u64::from(if horizontal { x } else { y });
        #[allow(clippy::cast_possible_truncation)]
        let region = &mut regions[(position * n / extent) as usize];

        let linear = to_linear(color.color);
        region.sum[0] += f64::from(linear.red);
        region.sum[1] += f64::from(linear.green);
        region.sum[2] += f64::from(linear.blue);
        region.count += 1;
    }

    regions
        .into_iter()
        .zip(0..)
        .filter(|(region, _)| region.count > 0)
        .map(|(Region { sum, count }, strip)| {
            let n = f64::from(count);
            #[allow(clippy::cast_possible_truncation)]
            let mean = LinSrgb::new(
                (sum[0] / n) as f32,
                (sum[1] / n) as f32,
                (sum[2] / n) as f32,
            );
            let color = from_linear(mean);
            // strips are first reached in strip order, in raster order
            PaletteEntry::new(color, to_lab(color), count).first_seen(strip)
        })
        .collect()
}
