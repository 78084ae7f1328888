//! Contains the builder structs for the supported extraction strategies.

use crate::{
    DistanceFormula, ExclusionOption, Exclusions, ExtractError, Quality, SortMode,
    DEFAULT_THRESHOLD,
};

/// The default (maximum) number of colors returned.
pub const DEFAULT_COUNT: usize = 8;

/// A builder struct to specify the parameters for [`extract_by_frequency`](crate::extract_by_frequency).
///
/// # Examples
/// ```
/// # use dominant::{FrequencyOptions, DistanceFormula, ExclusionOption, Quality, JND_THRESHOLD};
/// let options = FrequencyOptions::new()
///     .quality(Quality::High)
///     .formula(DistanceFormula::Ciede2000)
///     .threshold(JND_THRESHOLD)
///     .exclude(ExclusionOption::ExcludeWhite)
///     .max_count(5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyOptions {
    pub(crate) quality: Quality,
    pub(crate) formula: DistanceFormula,
    pub(crate) max_count: usize,
    pub(crate) exclusions: Exclusions,
    pub(crate) sort: SortMode,
    pub(crate) threshold: f32,
    pub(crate) result_log: bool,
    pub(crate) time_log: bool,
}

impl Default for FrequencyOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyOptions {
    /// Creates a new [`FrequencyOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quality: Quality::Fair,
            formula: DistanceFormula::Cie94,
            max_count: DEFAULT_COUNT,
            exclusions: Exclusions::new(),
            sort: SortMode::Frequency,
            threshold: DEFAULT_THRESHOLD,
            result_log: false,
            time_log: false,
        }
    }

    /// Sets how many pixels are sampled. The default is [`Quality::Fair`].
    #[must_use]
    pub const fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the formula used to compare colors. The default is [`DistanceFormula::Cie94`].
    #[must_use]
    pub const fn formula(mut self, formula: DistanceFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Sets the maximum number of colors to return. The default is `8`.
    #[must_use]
    pub const fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    /// Replaces the set of exclusions. The default is the empty set.
    #[must_use]
    pub const fn exclusions(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Adds one exclusion to the set.
    #[must_use]
    pub const fn exclude(mut self, option: ExclusionOption) -> Self {
        self.exclusions = self.exclusions.with(option);
        self
    }

    /// Sets the order of the returned colors. The default is [`SortMode::Frequency`].
    #[must_use]
    pub const fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the distance below which two colors are merged.
    ///
    /// The default is [`DEFAULT_THRESHOLD`] (`10.0`), which merges similar shades.
    /// A threshold of [`JND_THRESHOLD`](crate::JND_THRESHOLD) (`2.3`) only merges colors
    /// that are practically indistinguishable.
    #[must_use]
    pub const fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Whether to log a summary of each call at the `info` level. The default is `false`.
    #[must_use]
    pub const fn result_log(mut self, result_log: bool) -> Self {
        self.result_log = result_log;
        self
    }

    /// Whether to log the time of each stage at the `debug` level. The default is `false`.
    #[must_use]
    pub const fn time_log(mut self, time_log: bool) -> Self {
        self.time_log = time_log;
        self
    }

    /// Checks that the options are within their valid ranges.
    ///
    /// # Errors
    /// Returns [`ExtractError::InvalidConfiguration`] if the threshold is negative or not finite,
    /// or if the maximum count is `0`.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            Err(ExtractError::InvalidConfiguration(
                "threshold must be a finite, non-negative number",
            ))
        } else if self.max_count == 0 {
            Err(ExtractError::InvalidConfiguration("max_count must be at least 1"))
        } else {
            Ok(())
        }
    }
}

/// A builder struct to specify the parameters for [`extract_by_kmeans`](crate::extract_by_kmeans).
///
/// # Examples
/// ```
/// # use dominant::{KmeansOptions, Quality};
/// let options = KmeansOptions::new()
///     .quality(Quality::Low)
///     .count(4)
///     .seed(42);
/// ```
#[cfg(feature = "kmeans")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOptions {
    pub(crate) quality: Quality,
    pub(crate) count: usize,
    pub(crate) sort: SortMode,
    pub(crate) seed: u64,
    pub(crate) max_iterations: u32,
    pub(crate) result_log: bool,
    pub(crate) time_log: bool,
}

#[cfg(feature = "kmeans")]
impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "kmeans")]
impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quality: Quality::Fair,
            count: DEFAULT_COUNT,
            sort: SortMode::Frequency,
            seed: 0,
            max_iterations: crate::kmeans::DEFAULT_MAX_ITERATIONS,
            result_log: false,
            time_log: false,
        }
    }

    /// Sets how many pixels are sampled. The default is [`Quality::Fair`].
    #[must_use]
    pub const fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the number of clusters. The default is `8`.
    ///
    /// Fewer colors are returned if the samples have fewer unique colors.
    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the order of the returned colors. The default is [`SortMode::Frequency`].
    #[must_use]
    pub const fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the seed value for the random number generator used to pick the initial centroids.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the maximum number of iterations. The default is `50`.
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Whether to log a summary of each call at the `info` level. The default is `false`.
    #[must_use]
    pub const fn result_log(mut self, result_log: bool) -> Self {
        self.result_log = result_log;
        self
    }

    /// Whether to log the time of each stage at the `debug` level. The default is `false`.
    #[must_use]
    pub const fn time_log(mut self, time_log: bool) -> Self {
        self.time_log = time_log;
        self
    }

    /// Checks that the options are within their valid ranges.
    ///
    /// # Errors
    /// Returns [`ExtractError::EmptyInput`] if the count is `0`
    /// and [`ExtractError::InvalidConfiguration`] if the maximum number of iterations is `0`.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.count == 0 {
            Err(ExtractError::EmptyInput)
        } else if self.max_iterations == 0 {
            Err(ExtractError::InvalidConfiguration("max_iterations must be at least 1"))
        } else {
            Ok(())
        }
    }
}

/// A builder struct to specify the parameters for [`extract_by_area_average`](crate::extract_by_area_average).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AverageOptions {
    pub(crate) quality: Quality,
    pub(crate) count: usize,
    pub(crate) sort: SortMode,
    pub(crate) result_log: bool,
    pub(crate) time_log: bool,
}

impl Default for AverageOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AverageOptions {
    /// Creates a new [`AverageOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            quality: Quality::Highest,
            count: DEFAULT_COUNT,
            sort: SortMode::Frequency,
            result_log: false,
            time_log: false,
        }
    }

    /// Sets how many pixels are sampled. The default is [`Quality::Highest`], i.e., every pixel.
    #[must_use]
    pub const fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the number of regions. The default is `8`.
    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the order of the returned colors. The default is [`SortMode::Frequency`].
    #[must_use]
    pub const fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Whether to log a summary of each call at the `info` level. The default is `false`.
    #[must_use]
    pub const fn result_log(mut self, result_log: bool) -> Self {
        self.result_log = result_log;
        self
    }

    /// Whether to log the time of each stage at the `debug` level. The default is `false`.
    #[must_use]
    pub const fn time_log(mut self, time_log: bool) -> Self {
        self.time_log = time_log;
        self
    }

    /// Checks that the options are within their valid ranges.
    ///
    /// # Errors
    /// Returns [`ExtractError::EmptyInput`] if the count is `0`.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.count == 0 {
            Err(ExtractError::EmptyInput)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FrequencyOptions::default();
        assert_eq!(options.quality, Quality::Fair);
        assert_eq!(options.formula, DistanceFormula::Cie94);
        assert_eq!(options.max_count, 8);
        assert!(options.exclusions.is_empty());
        assert_eq!(options.sort, SortMode::Frequency);
        assert!((options.threshold - 10.0).abs() < f32::EPSILON);
        assert!(options.validate().is_ok());
        assert!(AverageOptions::default().validate().is_ok());
    }

    #[test]
    fn invalid_frequency_options() {
        for threshold in [-1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                FrequencyOptions::new().threshold(threshold).validate(),
                Err(ExtractError::InvalidConfiguration(_))
            ));
        }
        assert!(matches!(
            FrequencyOptions::new().max_count(0).validate(),
            Err(ExtractError::InvalidConfiguration(_))
        ));
        assert!(FrequencyOptions::new().threshold(0.0).validate().is_ok());
    }

    #[test]
    fn zero_counts_are_empty_input() {
        assert_eq!(AverageOptions::new().count(0).validate(), Err(ExtractError::EmptyInput));

        #[cfg(feature = "kmeans")]
        {
            assert_eq!(KmeansOptions::new().count(0).validate(), Err(ExtractError::EmptyInput));
            assert!(matches!(
                KmeansOptions::new().max_iterations(0).validate(),
                Err(ExtractError::InvalidConfiguration(_))
            ));
        }
    }
}
