//! Ordering of the final colors.

use crate::{colorspace::to_lab, ColorFrequency, DistanceFormula};
use ordered_float::OrderedFloat;
use palette::{Lab, Srgb};

/// A color produced by one of the extraction strategies, before sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    /// The representative color.
    pub color: Srgb<u8>,
    /// The CIELAB value used for distance based ordering.
    pub lab: Lab,
    /// The frequency or cluster size of the color.
    pub count: u32,
    /// The position of the earliest sample this color stands for, in sampling order.
    ///
    /// Breaks ties between equal counts under [`SortMode::Frequency`].
    pub first_seen: u32,
}

impl PaletteEntry {
    /// Creates a new [`PaletteEntry`] with a `first_seen` of `0`.
    #[must_use]
    pub const fn new(color: Srgb<u8>, lab: Lab, count: u32) -> Self {
        Self { color, lab, count, first_seen: 0 }
    }

    /// Sets the position of the earliest sample this color stands for.
    #[must_use]
    pub const fn first_seen(mut self, first_seen: u32) -> Self {
        self.first_seen = first_seen;
        self
    }
}

impl From<PaletteEntry> for ColorFrequency {
    fn from(entry: PaletteEntry) -> Self {
        Self::new(entry.color, entry.count)
    }
}

/// The order in which colors are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Most frequent first. Equal counts are ordered by [`PaletteEntry::first_seen`].
    #[default]
    Frequency,
    /// Closest to the given color first, measured with the extraction's [`DistanceFormula`].
    Distance(Srgb<u8>),
    /// Darkest (lowest CIELAB lightness) first.
    Darkness,
    /// Lightest (highest CIELAB lightness) first.
    Lightness,
    /// The order in which the strategy produced the colors.
    Explicit,
}

/// Sorts `entries` according to `mode`.
///
/// Frequency ties are broken by [`PaletteEntry::first_seen`].
/// All other sorts are stable, so ties keep the order in which the strategy produced them.
#[must_use]
pub fn sort(
    mut entries: Vec<PaletteEntry>,
    mode: SortMode,
    formula: DistanceFormula,
) -> Vec<ColorFrequency> {
    match mode {
        SortMode::Frequency => {
            entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
        }
        SortMode::Distance(reference) => {
            let reference = to_lab(reference);
            entries.sort_by_cached_key(|e| OrderedFloat(formula.distance(reference, e.lab)));
        }
        SortMode::Darkness => entries.sort_by_key(|e| OrderedFloat(e.lab.l)),
        SortMode::Lightness => {
            entries.sort_by_key(|e| std::cmp::Reverse(OrderedFloat(e.lab.l)));
        }
        SortMode::Explicit => (),
    }

    entries.into_iter().map(ColorFrequency::from).collect()
}
