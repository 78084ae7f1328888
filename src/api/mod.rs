//! Contains the extraction entry points, one per strategy.
//!
//! Each entry point validates its options once, samples the [`PixelBuffer`],
//! runs the chosen strategy, and sorts the result.
//! Nothing is shared between calls, and no partial results are returned on failure.

mod diagnostics;
mod options;

pub use options::*;

use diagnostics::Diagnostics;

use crate::{
    average,
    colorspace::convert_samples,
    filter::filter_samples,
    frequency,
    sort::sort,
    ColorCounts, ColorFrequency, DistanceFormula, ExtractError, PaletteEntry, PixelBuffer, Sampler,
};

#[cfg(feature = "threads")]
use crate::colorspace::convert_samples_par;

#[cfg(feature = "kmeans")]
use crate::{
    colorspace::{from_lab, to_lab},
    kmeans::{self, Cluster},
};

use palette::{Lab, Srgba};

/// The distance formula used to sort the k-means and area average results.
const SORT_FORMULA: DistanceFormula = DistanceFormula::Cie94;

/// The stages of the frequency strategy which have serial and parallel implementations.
struct FrequencyStages {
    convert: fn(&[Srgba<u8>]) -> Vec<(Srgba<u8>, Lab)>,
    count: fn(&[(Srgba<u8>, Lab)]) -> ColorCounts,
    group: fn(&ColorCounts, DistanceFormula, f32, usize) -> Vec<PaletteEntry>,
}

fn frequency_pipeline(
    buffer: PixelBuffer,
    options: FrequencyOptions,
    stages: &FrequencyStages,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    options.validate()?;

    let FrequencyOptions {
        quality,
        formula,
        max_count,
        exclusions,
        sort: sort_mode,
        threshold,
        result_log,
        time_log,
    } = options;

    let mut diagnostics = Diagnostics::new("frequency", result_log, time_log);

    let samples = Sampler::new(buffer, quality).colors();
    diagnostics.stage("sampling");

    let samples = (stages.convert)(&samples);
    diagnostics.stage("conversion");

    let samples = filter_samples(samples, exclusions);
    diagnostics.stage("filtering");
    if samples.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    let counts = (stages.count)(&samples);
    diagnostics.stage("counting");

    let entries = (stages.group)(&counts, formula, threshold, max_count);
    diagnostics.stage("merging");

    let colors = sort(entries, sort_mode, formula);
    diagnostics.stage("sorting");

    diagnostics.finish(colors.len(), counts.total_count());
    Ok(colors)
}

/// Extracts up to `max_count` dominant colors by counting and merging similar colors.
///
/// Sampled pixels are converted to CIELAB, filtered by the exclusions,
/// and counted. Colors are then merged from most to least frequent:
/// a color closer than the threshold to a more frequent representative
/// adds its count to that representative.
/// See the [`frequency`](crate::frequency) module for more details.
///
/// # Errors
/// - [`ExtractError::InvalidConfiguration`] if the options are invalid
/// - [`ExtractError::EmptyInput`] if every sample was excluded
///
/// # Examples
/// ```
/// # use dominant::{extract_by_frequency, FrequencyOptions, PixelBuffer};
/// # use palette::Srgb;
/// # fn main() -> Result<(), dominant::ExtractError> {
/// let red = [255, 0, 0, 255];
/// let blue = [0, 0, 255, 255];
/// let bytes = [red, red, red, blue].concat();
/// let buffer = PixelBuffer::new(2, 2, &bytes)?;
///
/// let colors = extract_by_frequency(buffer, FrequencyOptions::new().max_count(2))?;
/// assert_eq!(colors[0].color, Srgb::new(255, 0, 0));
/// assert_eq!(colors[0].count, 3);
/// # Ok(())
/// # }
/// ```
pub fn extract_by_frequency(
    buffer: PixelBuffer,
    options: FrequencyOptions,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    frequency_pipeline(
        buffer,
        options,
        &FrequencyStages {
            convert: convert_samples,
            count: ColorCounts::new,
            group: frequency::group,
        },
    )
}

/// Extracts dominant colors like [`extract_by_frequency`], but in parallel.
///
/// The output is identical to [`extract_by_frequency`].
///
/// # Errors
/// Same as [`extract_by_frequency`].
#[cfg(feature = "threads")]
pub fn extract_by_frequency_par(
    buffer: PixelBuffer,
    options: FrequencyOptions,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    frequency_pipeline(
        buffer,
        options,
        &FrequencyStages {
            convert: convert_samples_par,
            count: ColorCounts::new_par,
            group: frequency::group_par,
        },
    )
}

#[cfg(feature = "kmeans")]
type ClusterFn = fn(&[Lab], usize, u32, u64) -> Result<Vec<Cluster>, ExtractError>;

#[cfg(feature = "kmeans")]
fn kmeans_pipeline(
    buffer: PixelBuffer,
    options: KmeansOptions,
    cluster: ClusterFn,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    options.validate()?;

    let KmeansOptions {
        quality,
        count,
        sort: sort_mode,
        seed,
        max_iterations,
        result_log,
        time_log,
    } = options;

    let mut diagnostics = Diagnostics::new("kmeans", result_log, time_log);

    let sampler = Sampler::new(buffer, quality);
    let samples = sampler.colors();
    diagnostics.stage("sampling");

    let samples = samples.into_iter().map(|c| to_lab(c.color)).collect::<Vec<_>>();
    diagnostics.stage("conversion");

    let clusters = cluster(&samples, count, max_iterations, seed)?;
    diagnostics.stage("clustering");

    let entries = clusters
        .iter()
        .map(|cluster| {
            let centroid = cluster.centroid();
            let first_seen = cluster.members().first().copied().unwrap_or(0);
            PaletteEntry::new(from_lab(centroid), centroid, cluster.len()).first_seen(first_seen)
        })
        .collect();

    let colors = sort(entries, sort_mode, SORT_FORMULA);
    diagnostics.stage("sorting");

    diagnostics.finish(colors.len(), sampler.num_samples());
    Ok(colors)
}

/// Extracts up to `count` dominant colors with k-means clustering.
///
/// Each returned color is the (CIELAB) mean of a cluster of samples,
/// and its count is the number of samples in the cluster.
/// The result only depends on the pixels and the options, including the seed.
/// See the [`kmeans`](crate::kmeans) module for more details.
///
/// # Errors
/// - [`ExtractError::EmptyInput`] if the count is `0`
/// - [`ExtractError::InvalidConfiguration`] if the maximum number of iterations is `0`
#[cfg(feature = "kmeans")]
pub fn extract_by_kmeans(
    buffer: PixelBuffer,
    options: KmeansOptions,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    kmeans_pipeline(buffer, options, kmeans::cluster)
}

/// Extracts dominant colors like [`extract_by_kmeans`], but in parallel.
///
/// The result is deterministic for a given seed,
/// but may differ slightly from [`extract_by_kmeans`] due to floating point summation order.
///
/// # Errors
/// Same as [`extract_by_kmeans`].
#[cfg(all(feature = "kmeans", feature = "threads"))]
pub fn extract_by_kmeans_par(
    buffer: PixelBuffer,
    options: KmeansOptions,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    kmeans_pipeline(buffer, options, kmeans::cluster_par)
}

/// Extracts `count` colors by averaging equally sized strips of the image.
///
/// This is the fastest strategy, but it does not consider how similar colors are.
/// See the [`average`](crate::average) module for more details.
///
/// # Errors
/// Returns [`ExtractError::EmptyInput`] if the count is `0`.
pub fn extract_by_area_average(
    buffer: PixelBuffer,
    options: AverageOptions,
) -> Result<Vec<ColorFrequency>, ExtractError> {
    options.validate()?;

    let AverageOptions {
        quality,
        count,
        sort: sort_mode,
        result_log,
        time_log,
    } = options;

    let mut diagnostics = Diagnostics::new("average", result_log, time_log);

    let (width, height) = (buffer.width(), buffer.height());
    let (max_step_x, max_step_y) = average::strip_steps(width, height, count);
    let samples = Sampler::new(buffer, quality).grid_samples(max_step_x, max_step_y);
    #[allow(clippy::cast_possible_truncation)]
    let num_samples = samples.len() as u32;

    let entries = average::average(samples, width, height, count);
    diagnostics.stage("averaging");

    let colors = sort(entries, sort_mode, SORT_FORMULA);
    diagnostics.stage("sorting");

    diagnostics.finish(colors.len(), num_samples);
    Ok(colors)
}
