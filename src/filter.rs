//! Exclusion of unwanted samples (e.g., near black or transparent pixels) before counting.

use palette::{Lab, Srgba};
use std::ops::{BitOr, BitOrAssign};

/// Samples with a lightness below this are considered black.
pub const BLACK_MAX_LIGHTNESS: f32 = 10.0;

/// Samples with a lightness above this are considered white.
pub const WHITE_MIN_LIGHTNESS: f32 = 95.0;

/// Samples with a chroma below this are considered gray.
pub const GRAY_MAX_CHROMA: f32 = 5.0;

/// Samples with an alpha below this are considered transparent.
pub const TRANSPARENT_MAX_ALPHA: u8 = 128;

/// A rule that removes matching samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExclusionOption {
    /// Removes near black samples.
    ExcludeBlack = 1,
    /// Removes near white samples.
    ExcludeWhite = 1 << 1,
    /// Removes samples with (almost) no chroma, including black and white.
    ExcludeGray = 1 << 2,
    /// Removes mostly transparent samples.
    ExcludeTransparent = 1 << 3,
}

impl ExclusionOption {
    /// Every exclusion option.
    pub const ALL: [Self; 4] = [
        Self::ExcludeBlack,
        Self::ExcludeWhite,
        Self::ExcludeGray,
        Self::ExcludeTransparent,
    ];

    /// Whether a sample matches this rule.
    #[must_use]
    pub fn matches(self, color: Srgba<u8>, lab: Lab) -> bool {
        match self {
            Self::ExcludeBlack => lab.l < BLACK_MAX_LIGHTNESS,
            Self::ExcludeWhite => lab.l > WHITE_MIN_LIGHTNESS,
            Self::ExcludeGray => lab.a.hypot(lab.b) < GRAY_MAX_CHROMA,
            Self::ExcludeTransparent => color.alpha < TRANSPARENT_MAX_ALPHA,
        }
    }
}

/// A set of [`ExclusionOption`]s. The default set is empty.
///
/// # Examples
/// ```
/// # use dominant::{Exclusions, ExclusionOption};
/// let exclusions = Exclusions::new()
///     .with(ExclusionOption::ExcludeBlack)
///     .with(ExclusionOption::ExcludeWhite);
///
/// assert!(exclusions.contains(ExclusionOption::ExcludeBlack));
/// assert!(!exclusions.contains(ExclusionOption::ExcludeGray));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Exclusions(u8);

impl Exclusions {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Returns this set with `option` added.
    #[must_use]
    pub const fn with(self, option: ExclusionOption) -> Self {
        Self(self.0 | option as u8)
    }

    /// Adds `option` to the set.
    pub fn insert(&mut self, option: ExclusionOption) {
        *self = self.with(option);
    }

    /// Whether `option` is part of the set.
    #[must_use]
    pub const fn contains(self, option: ExclusionOption) -> bool {
        self.0 & option as u8 != 0
    }

    /// Whether the set has no options.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the options in the set.
    pub fn iter(self) -> impl Iterator<Item = ExclusionOption> {
        ExclusionOption::ALL.into_iter().filter(move |&option| self.contains(option))
    }

    /// Whether a sample should be kept, i.e., it matches none of the options.
    #[must_use]
    pub fn keeps(self, color: Srgba<u8>, lab: Lab) -> bool {
        !self.iter().any(|option| option.matches(color, lab))
    }
}

impl From<ExclusionOption> for Exclusions {
    fn from(option: ExclusionOption) -> Self {
        Self::new().with(option)
    }
}

impl BitOr<ExclusionOption> for Exclusions {
    type Output = Self;

    fn bitor(self, rhs: ExclusionOption) -> Self::Output {
        self.with(rhs)
    }
}

impl BitOrAssign<ExclusionOption> for Exclusions {
    fn bitor_assign(&mut self, rhs: ExclusionOption) {
        self.insert(rhs);
    }
}

impl FromIterator<ExclusionOption> for Exclusions {
    fn from_iter<T: IntoIterator<Item = ExclusionOption>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Removes the samples that match any of the `exclusions`, preserving the order of the rest.
pub fn filter_samples(
    samples: Vec<(Srgba<u8>, Lab)>,
    exclusions: Exclusions,
) -> Vec<(Srgba<u8>, Lab)> {
    if exclusions.is_empty() {
        samples
    } else {
        let mut samples = samples;
        samples.retain(|&(color, lab)| exclusions.keeps(color, lab));
        samples
    }
}
