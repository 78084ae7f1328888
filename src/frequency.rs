//! Frequency-based grouping of similar colors.
//!
//! Exact duplicates are counted first (see [`ColorCounts`]).
//! The unique colors are then visited from most to least frequent,
//! and each one is either merged into an already accepted representative
//! that is closer than the threshold, or becomes a new representative itself.
//! A representative keeps its color when others are merged into it,
//! so the most frequent shade of a group is the one reported.
//!
//! Closeness is measured with [`DistanceFormula::separation`], the smaller of the distances
//! in both directions, so that asymmetric formulas like CIE94 still keep every pair of
//! representatives at least the threshold apart, whichever color is taken as the reference.
//!
//! When a color is within the threshold of several representatives,
//! it is merged into the nearest one, and ties go to the earliest accepted representative.

use crate::{ColorCounts, DistanceFormula, PaletteEntry};
use palette::Lab;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Unique color indices ordered by descending count, ties in first-seen order.
fn merge_order(counts: &ColorCounts) -> Vec<usize> {
    let counts = counts.counts();
    let mut order = (0..counts.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));
    order
}

fn nearest(
    representatives: &[PaletteEntry],
    lab: Lab,
    formula: DistanceFormula,
    threshold: f32,
) -> Option<usize> {
    representatives
        .iter()
        .enumerate()
        .map(|(i, rep)| (i, formula.separation(rep.lab, lab)))
        .filter(|&(_, d)| d < threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(feature = "threads")]
fn nearest_par(
    representatives: &[PaletteEntry],
    lab: Lab,
    formula: DistanceFormula,
    threshold: f32,
) -> Option<usize> {
    // the cost of splitting outweighs the distance computations for small palettes
    const MIN_PAR_LEN: usize = 512;

    if representatives.len() < MIN_PAR_LEN {
        nearest(representatives, lab, formula, threshold)
    } else {
        representatives
            .par_iter()
            .enumerate()
            .map(|(i, rep)| (i, formula.separation(rep.lab, lab)))
            .filter(|&(_, d)| d < threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(i, _)| i)
    }
}

fn merge(
    counts: &ColorCounts,
    threshold: f32,
    mut find: impl FnMut(&[PaletteEntry], Lab) -> Option<usize>,
) -> Vec<PaletteEntry> {
    let colors = counts.colors();
    let labs = counts.labs();
    let freqs = counts.counts();

    let mut representatives = Vec::<PaletteEntry>::new();
    for i in merge_order(counts) {
        // unique colors are stored in first-seen order
        #[allow(clippy::cast_possible_truncation)]
        let first_seen = i as u32;
        match find(&representatives, labs[i]) {
            Some(j) => {
                let rep = &mut representatives[j];
                rep.count += freqs[i];
                rep.first_seen = rep.first_seen.min(first_seen);
            }
            None => representatives
                .push(PaletteEntry::new(colors[i], labs[i], freqs[i]).first_seen(first_seen)),
        }
    }

    log::trace!(
        "merged {} unique colors into {} representatives (threshold {threshold})",
        colors.len(),
        representatives.len(),
    );

    representatives
}

/// Keeps the `max_count` representatives with the highest counts, in their acceptance order.
///
/// Equal counts prefer the representative seen first.
fn truncate(mut representatives: Vec<PaletteEntry>, max_count: usize) -> Vec<PaletteEntry> {
    if representatives.len() > max_count {
        let mut order = (0..representatives.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            let (a, b) = (&representatives[a], &representatives[b]);
            b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen))
        });
        let mut keep = vec![false; representatives.len()];
        for &i in &order[..max_count] {
            keep[i] = true;
        }

        let mut keep = keep.into_iter();
        representatives.retain(|_| keep.next().unwrap_or(false));
    }
    representatives
}

/// Groups the counted colors into at most `max_count` representatives.
///
/// The returned entries are in the order the representatives were accepted,
/// which is also descending count order before any merging took place.
/// Any two returned colors `a` and `b` satisfy both
/// `formula.distance(a, b) >= threshold` and `formula.distance(b, a) >= threshold`.
#[must_use]
pub fn group(
    counts: &ColorCounts,
    formula: DistanceFormula,
    threshold: f32,
    max_count: usize,
) -> Vec<PaletteEntry> {
    let representatives =
        merge(counts, threshold, |reps, lab| nearest(reps, lab, formula, threshold));
    truncate(representatives, max_count)
}

/// Groups the counted colors in parallel. The result is identical to [`group`].
#[cfg(feature = "threads")]
#[must_use]
pub fn group_par(
    counts: &ColorCounts,
    formula: DistanceFormula,
    threshold: f32,
    max_count: usize,
) -> Vec<PaletteEntry> {
    let representatives =
        merge(counts, threshold, |reps, lab| nearest_par(reps, lab, formula, threshold));
    truncate(representatives, max_count)
}
