//! Lloyd's k-means clustering in CIELAB.
//!
//! Initial centroids are chosen with k-means++ using a seeded random number generator,
//! so the output only depends on the input samples, `k`, the iteration cap, and the seed.
//! Samples are then repeatedly assigned to their nearest centroid (Euclidean distance),
//! and each centroid is moved to the mean of its members,
//! until no assignment changes or the iteration cap is reached.
//!
//! If a cluster ends up with no members, its centroid is moved onto the sample
//! that is farthest from every current centroid.
//!
//! If there are fewer unique samples than `k`, fewer clusters are returned.

use crate::ExtractError;
use palette::Lab;
use rand::{distributions::WeightedIndex, prelude::Distribution, SeedableRng};
use rand_distr::Uniform;
use rand_xoshiro::Xoroshiro128PlusPlus;
use wide::{f32x8, CmpLt};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The default maximum number of iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// The number of samples handled by each parallel task.
///
/// This is a constant rather than a function of the thread count,
/// so that floating point sums are always reduced in the same order.
#[cfg(feature = "threads")]
const PAR_CHUNK: usize = 4096;

/// A k-means cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// The mean of the members.
    centroid: Lab,
    /// Indices into the samples slice.
    members: Vec<u32>,
    /// Running sum of the members' components.
    sum: [f64; 3],
}

impl Cluster {
    fn new(centroid: Lab) -> Self {
        Self { centroid, members: Vec::new(), sum: [0.0; 3] }
    }

    fn clear(&mut self) {
        self.members.clear();
        self.sum = [0.0; 3];
    }

    fn add(&mut self, index: u32, sample: Lab) {
        self.members.push(index);
        self.sum[0] += f64::from(sample.l);
        self.sum[1] += f64::from(sample.a);
        self.sum[2] += f64::from(sample.b);
    }

    /// Moves the centroid to the mean of the members. Returns `false` if there are no members.
    fn update_centroid(&mut self) -> bool {
        if self.members.is_empty() {
            false
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = self.members.len() as f64;
            #[allow(clippy::cast_possible_truncation)]
            {
                self.centroid = Lab::new(
                    (self.sum[0] / n) as f32,
                    (self.sum[1] / n) as f32,
                    (self.sum[2] / n) as f32,
                );
            }
            true
        }
    }

    /// The mean color of the members.
    #[must_use]
    pub const fn centroid(&self) -> Lab {
        self.centroid
    }

    /// The indices of the samples that belong to this cluster, in ascending order.
    #[must_use]
    pub fn members(&self) -> &[u32] {
        &self.members
    }

    /// The number of members.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn len(&self) -> u32 {
        self.members.len() as u32
    }

    /// Whether the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn components(lab: Lab) -> [f32; 3] {
    [lab.l, lab.a, lab.b]
}

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
}

/// Lays out the centroids in SIMD lanes, 8 at a time, padding unused lanes with infinity.
fn simd_points(centroids: impl ExactSizeIterator<Item = Lab>) -> Vec<[f32x8; 3]> {
    let mut points = Vec::with_capacity(centroids.len().div_ceil(8));
    let mut lanes = [[f32::INFINITY; 8]; 3];
    let mut lane = 0;
    for centroid in centroids {
        for (c, v) in components(centroid).into_iter().enumerate() {
            lanes[c][lane] = v;
        }
        lane += 1;
        if lane == 8 {
            points.push(lanes.map(f32x8::new));
            lanes = [[f32::INFINITY; 8]; 3];
            lane = 0;
        }
    }
    if lane > 0 {
        points.push(lanes.map(f32x8::new));
    }
    points
}

/// Returns the index of the nearest point and the squared distance to it.
///
/// Ties go to the lowest index.
#[inline]
fn simd_nearest(points: &[[f32x8; 3]], query: [f32; 3]) -> (usize, f32) {
    let incr = f32x8::splat(1.0);
    let mut cur_chunk = f32x8::splat(0.0);
    let mut min_chunk = cur_chunk;
    let mut min_distance = f32x8::splat(f32::INFINITY);

    let query = query.map(f32x8::splat);

    for chunk in points {
        let distance = (0..3)
            .map(|i| {
                let diff = query[i] - chunk[i];
                diff * diff
            })
            .fold(f32x8::splat(0.0), |a, b| a + b);

        let mask = distance.cmp_lt(min_distance);
        min_chunk = mask.blend(cur_chunk, min_chunk);
        min_distance = min_distance.fast_min(distance);
        cur_chunk += incr;
    }

    let mut min_index = usize::MAX;
    let mut min_dist = f32::INFINITY;
    for (lane, (&d, &chunk)) in min_distance
        .as_array_ref()
        .iter()
        .zip(min_chunk.as_array_ref())
        .enumerate()
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = chunk as usize * 8 + lane;
        if d < min_dist || (d == min_dist && index < min_index) {
            min_dist = d;
            min_index = index;
        }
    }

    (min_index, min_dist)
}

/// Picks up to `k` initial centroids with k-means++.
///
/// Stops early once every sample coincides with a chosen centroid.
fn initial_centroids(samples: &[Lab], k: usize, rng: &mut Xoroshiro128PlusPlus) -> Vec<Lab> {
    let first = samples[Uniform::new(0, samples.len()).sample(rng)];
    let mut centroids = vec![first];

    let mut distances = samples
        .iter()
        .map(|&s| squared_distance(components(s), components(first)))
        .collect::<Vec<_>>();

    while centroids.len() < k {
        // fails once all weights are zero, i.e., there are no more unique samples
        let Ok(weights) = WeightedIndex::new(&distances) else {
            break;
        };

        let next = samples[weights.sample(rng)];
        centroids.push(next);

        for (d, &s) in distances.iter_mut().zip(samples) {
            *d = d.min(squared_distance(components(s), components(next)));
        }
    }

    centroids
}

struct State<'a> {
    samples: &'a [Lab],
    clusters: Vec<Cluster>,
    assignments: Vec<u32>,
}

impl<'a> State<'a> {
    fn new(samples: &'a [Lab], k: usize, seed: u64) -> Self {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
        let clusters = initial_centroids(samples, k, rng)
            .into_iter()
            .map(Cluster::new)
            .collect();

        Self {
            samples,
            clusters,
            assignments: vec![u32::MAX; samples.len()],
        }
    }

    fn points(&self) -> Vec<[f32x8; 3]> {
        simd_points(self.clusters.iter().map(Cluster::centroid))
    }

    /// Reassigns every sample, returning the number of samples whose cluster changed.
    fn assign(&mut self) -> usize {
        let points = self.points();
        let mut changed = 0;
        for (assignment, &sample) in self.assignments.iter_mut().zip(self.samples) {
            #[allow(clippy::cast_possible_truncation)]
            let nearest = simd_nearest(&points, components(sample)).0 as u32;
            if *assignment != nearest {
                *assignment = nearest;
                changed += 1;
            }
        }
        changed
    }

    fn accumulate(&mut self) {
        for cluster in &mut self.clusters {
            cluster.clear();
        }
        for (i, (&assignment, &sample)) in self.assignments.iter().zip(self.samples).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            self.clusters[assignment as usize].add(i as u32, sample);
        }
    }

    /// Moves each centroid to the mean of its members, re-seeding empty clusters.
    ///
    /// Returns `true` if any cluster was re-seeded.
    fn update(&mut self) -> bool {
        let mut empty = Vec::new();
        for (i, cluster) in self.clusters.iter_mut().enumerate() {
            if !cluster.update_centroid() {
                empty.push(i);
            }
        }

        let mut reseeded = false;
        for i in empty {
            let points = self.points();
            let farthest = self
                .samples
                .iter()
                .map(|&s| simd_nearest(&points, components(s)).1)
                .enumerate()
                .fold((0, 0.0), |max, (j, d)| if d > max.1 { (j, d) } else { max });

            if farthest.1 > 0.0 {
                self.clusters[i].centroid = self.samples[farthest.0];
                reseeded = true;
            }
        }

        reseeded
    }

    fn run(&mut self, max_iterations: u32) {
        for iteration in 0..max_iterations {
            let changed = self.assign();
            self.accumulate();
            let reseeded = self.update();
            log::trace!("k-means iteration {iteration}: {changed} reassigned");
            if changed == 0 && !reseeded {
                break;
            }
        }
    }

    fn into_clusters(self) -> Vec<Cluster> {
        let mut clusters = self.clusters;
        clusters.retain(|cluster| !cluster.is_empty());
        clusters
    }
}

#[cfg(feature = "threads")]
impl<'a> State<'a> {
    fn assign_par(&mut self) -> usize {
        let points = self.points();
        self.assignments
            .par_chunks_mut(PAR_CHUNK)
            .zip(self.samples.par_chunks(PAR_CHUNK))
            .map(|(assignments, samples)| {
                let mut changed = 0;
                for (assignment, &sample) in assignments.iter_mut().zip(samples) {
                    #[allow(clippy::cast_possible_truncation)]
                    let nearest = simd_nearest(&points, components(sample)).0 as u32;
                    if *assignment != nearest {
                        *assignment = nearest;
                        changed += 1;
                    }
                }
                changed
            })
            .sum()
    }

    fn accumulate_par(&mut self) {
        let k = self.clusters.len();

        let partials = self
            .assignments
            .par_chunks(PAR_CHUNK)
            .zip(self.samples.par_chunks(PAR_CHUNK))
            .map(|(assignments, samples)| {
                let mut sums = vec![[0.0; 3]; k];
                for (&assignment, &sample) in assignments.iter().zip(samples) {
                    let sum: &mut [f64; 3] = &mut sums[assignment as usize];
                    for (s, c) in sum.iter_mut().zip(components(sample)) {
                        *s += f64::from(c);
                    }
                }
                sums
            })
            .collect::<Vec<_>>();

        for cluster in &mut self.clusters {
            cluster.clear();
        }
        for (i, &assignment) in self.assignments.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            self.clusters[assignment as usize].members.push(i as u32);
        }
        for sums in partials {
            for (cluster, sum) in self.clusters.iter_mut().zip(sums) {
                for (s, v) in cluster.sum.iter_mut().zip(sum) {
                    *s += v;
                }
            }
        }
    }

    fn run_par(&mut self, max_iterations: u32) {
        for iteration in 0..max_iterations {
            let changed = self.assign_par();
            self.accumulate_par();
            let reseeded = self.update();
            log::trace!("k-means iteration {iteration}: {changed} reassigned");
            if changed == 0 && !reseeded {
                break;
            }
        }
    }
}

fn validate(samples: &[Lab], k: usize) -> Result<(), ExtractError> {
    if samples.is_empty() || k == 0 {
        Err(ExtractError::EmptyInput)
    } else {
        Ok(())
    }
}

/// Partitions `samples` into at most `k` clusters.
///
/// Every sample is a member of exactly one of the returned clusters,
/// and no returned cluster is empty.
///
/// # Errors
/// Returns [`ExtractError::EmptyInput`] if `samples` is empty or `k` is `0`.
///
/// # Examples
/// ```
/// # use dominant::kmeans;
/// # use palette::Lab;
/// # fn main() -> Result<(), dominant::ExtractError> {
/// let samples = [Lab::new(10.0, 0.0, 0.0), Lab::new(12.0, 0.0, 0.0), Lab::new(90.0, 0.0, 0.0)];
/// let clusters = kmeans::cluster(&samples, 2, kmeans::DEFAULT_MAX_ITERATIONS, 0)?;
/// assert_eq!(clusters.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn cluster(
    samples: &[Lab],
    k: usize,
    max_iterations: u32,
    seed: u64,
) -> Result<Vec<Cluster>, ExtractError> {
    validate(samples, k)?;
    let mut state = State::new(samples, k, seed);
    state.run(max_iterations);
    Ok(state.into_clusters())
}

/// Partitions `samples` into at most `k` clusters in parallel.
///
/// The assignment step is split across threads,
/// and the centroid sums are reduced from fixed size chunks,
/// so the output is deterministic for a given seed.
///
/// # Errors
/// Returns [`ExtractError::EmptyInput`] if `samples` is empty or `k` is `0`.
#[cfg(feature = "threads")]
pub fn cluster_par(
    samples: &[Lab],
    k: usize,
    max_iterations: u32,
    seed: u64,
) -> Result<Vec<Cluster>, ExtractError> {
    validate(samples, k)?;
    let mut state = State::new(samples, k, seed);
    state.run_par(max_iterations);
    Ok(state.into_clusters())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{colorspace::to_lab, tests::*};

    fn gradient_labs(width: u32, height: u32) -> Vec<Lab> {
        gradient_pixels(width, height).into_iter().map(|c| to_lab(c.color)).collect()
    }

    fn assert_partition(clusters: &[Cluster], num_samples: usize) {
        let mut seen = vec![0; num_samples];
        for cluster in clusters {
            assert!(!cluster.is_empty());
            for &i in cluster.members() {
                seen[i as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
        assert_eq!(clusters.iter().map(Cluster::len).sum::<u32>() as usize, num_samples);
    }

    #[test]
    fn empty_input() {
        assert_eq!(cluster(&[], 4, 50, 0), Err(ExtractError::EmptyInput));
        assert_eq!(cluster(&[Lab::new(0.0, 0.0, 0.0)], 0, 50, 0), Err(ExtractError::EmptyInput));
    }

    #[test]
    fn nearest_prefers_lowest_index_on_ties() {
        let centroids =
            (0..12).map(|i| Lab::new(if i == 3 || i == 9 { 50.0 } else { 0.0 }, 0.0, 0.0));
        let points = simd_points(centroids);
        assert_eq!(points.len(), 2);
        assert_eq!(simd_nearest(&points, [49.0, 0.0, 0.0]), (3, 1.0));
    }

    #[test]
    fn two_groups() {
        let mut samples = vec![Lab::new(20.0, 10.0, 10.0); 30];
        samples.extend(vec![Lab::new(80.0, -10.0, 0.0); 10]);
        let clusters = cluster(&samples, 2, 50, 7).unwrap();

        assert_partition(&clusters, samples.len());
        let mut lens = clusters.iter().map(Cluster::len).collect::<Vec<_>>();
        lens.sort_unstable();
        assert_eq!(lens, vec![10, 30]);
    }

    #[test]
    fn fewer_unique_samples_than_k() {
        let samples = vec![Lab::new(50.0, 0.0, 0.0); 5];
        let clusters = cluster(&samples, 4, 50, 0).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 5);
        assert_eq!(clusters[0].centroid(), Lab::new(50.0, 0.0, 0.0));
    }

    #[test]
    fn partition_and_centroids() {
        let samples = gradient_labs(40, 30);
        let clusters = cluster(&samples, 8, DEFAULT_MAX_ITERATIONS, 1).unwrap();
        assert!(clusters.len() <= 8);
        assert_partition(&clusters, samples.len());

        for c in &clusters {
            #[allow(clippy::cast_precision_loss)]
            let n = c.members().len() as f32;
            let mean_l = c.members().iter().map(|&i| samples[i as usize].l).sum::<f32>() / n;
            assert!((mean_l - c.centroid().l).abs() < 1e-2);
        }
    }

    #[test]
    fn deterministic_with_seed() {
        let samples = gradient_labs(50, 50);
        let a = cluster(&samples, 6, DEFAULT_MAX_ITERATIONS, 42).unwrap();
        let b = cluster(&samples, 6, DEFAULT_MAX_ITERATIONS, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_cluster_is_reseeded() {
        let samples = [Lab::new(0.0, 0.0, 0.0), Lab::new(1.0, 0.0, 0.0), Lab::new(100.0, 0.0, 0.0)];
        let mut state = State {
            samples: &samples,
            clusters: vec![
                Cluster::new(Lab::new(0.5, 0.0, 0.0)),
                Cluster::new(Lab::new(-500.0, 0.0, 0.0)),
            ],
            assignments: vec![u32::MAX; samples.len()],
        };

        state.assign();
        state.accumulate();
        assert!(state.clusters[1].is_empty());
        assert!(state.update());
        assert_eq!(state.clusters[1].centroid(), samples[2]);

        state.run(DEFAULT_MAX_ITERATIONS);
        let clusters = state.into_clusters();
        assert_eq!(clusters.len(), 2);
        assert_partition(&clusters, samples.len());
    }

    #[cfg(feature = "threads")]
    #[test]
    fn parallel_partition_and_determinism() {
        let samples = gradient_labs(120, 80);
        let a = cluster_par(&samples, 8, DEFAULT_MAX_ITERATIONS, 3).unwrap();
        let b = cluster_par(&samples, 8, DEFAULT_MAX_ITERATIONS, 3).unwrap();
        assert_partition(&a, samples.len());
        assert_eq!(a, b);
    }
}
