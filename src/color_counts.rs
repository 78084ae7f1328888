//! Contains the code for counting exact duplicate colors.

use palette::{cast, Lab, Srgb, Srgba};
use std::collections::HashMap;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The unique colors of a set of samples and the number of times each appears.
///
/// Colors are compared by exact RGB byte equality, alpha is ignored.
/// Unique colors are stored in the order in which they were first seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorCounts {
    /// The unique colors.
    colors: Vec<Srgb<u8>>,
    /// The CIELAB value of each unique color.
    labs: Vec<Lab>,
    /// The number of times each color appeared, each count is nonzero.
    counts: Vec<u32>,
    /// The total number of samples, which is the sum of `counts`.
    total_count: u32,
}

impl ColorCounts {
    /// Counts the unique colors among `samples`, which are paired with their CIELAB values.
    #[must_use]
    pub fn new(samples: &[(Srgba<u8>, Lab)]) -> Self {
        let mut index = HashMap::new();
        let mut counts = Self::default();

        for &(color, lab) in samples {
            let color = color.color;
            let i = *index.entry(cast::into_array(color)).or_insert_with(|| {
                counts.colors.push(color);
                counts.labs.push(lab);
                counts.counts.push(0);
                counts.colors.len() - 1
            });
            counts.counts[i] += 1;
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            counts.total_count = samples.len() as u32;
        }

        counts
    }

    /// Counts the unique colors among `samples` in parallel.
    ///
    /// Each thread counts a contiguous chunk of `samples`,
    /// and the partial counts are merged afterwards.
    /// The position of the first occurrence of every color is tracked,
    /// so the output is identical to [`ColorCounts::new`].
    #[cfg(feature = "threads")]
    #[must_use]
    pub fn new_par(samples: &[(Srgba<u8>, Lab)]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let chunk_size = samples.len().div_ceil(rayon::current_num_threads());

        let partials = samples
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk_i, chunk)| {
                let offset = chunk_i * chunk_size;
                let mut local = HashMap::<[u8; 3], (usize, Lab, u32)>::new();
                for (i, &(color, lab)) in chunk.iter().enumerate() {
                    local
                        .entry(cast::into_array(color.color))
                        .or_insert((offset + i, lab, 0))
                        .2 += 1;
                }
                local
            })
            .collect::<Vec<_>>();

        let mut merged = HashMap::<[u8; 3], (usize, Lab, u32)>::new();
        for partial in partials {
            for (color, (first, lab, count)) in partial {
                merged
                    .entry(color)
                    .and_modify(|entry| {
                        if first < entry.0 {
                            entry.0 = first;
                            entry.1 = lab;
                        }
                        entry.2 += count;
                    })
                    .or_insert((first, lab, count));
            }
        }

        let mut entries = merged.into_iter().collect::<Vec<_>>();
        entries.sort_unstable_by_key(|&(_, (first, ..))| first);

        let mut counts = Self {
            colors: Vec::with_capacity(entries.len()),
            labs: Vec::with_capacity(entries.len()),
            counts: Vec::with_capacity(entries.len()),
            #[allow(clippy::cast_possible_truncation)]
            total_count: samples.len() as u32,
        };

        for (color, (_, lab, count)) in entries {
            counts.colors.push(cast::from_array(color));
            counts.labs.push(lab);
            counts.counts.push(count);
        }

        counts
    }

    /// The unique colors in order of first appearance.
    #[must_use]
    pub fn colors(&self) -> &[Srgb<u8>] {
        &self.colors
    }

    /// The CIELAB value of each color in `colors`.
    #[must_use]
    pub fn labs(&self) -> &[Lab] {
        &self.labs
    }

    /// The number of samples for each color in `colors`.
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The total number of samples that were counted.
    #[must_use]
    pub const fn total_count(&self) -> u32 {
        self.total_count
    }

    /// The number of unique colors.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_colors(&self) -> u32 {
        self.colors.len() as u32
    }

    /// Whether no samples were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
