//! Population initialization.
use crate::dataset::{ClusterIdx, Dataset};
use crate::feature::Feature;
use crate::matrix::{MatrixRow, ResizableMatrix};
use fixedbitset::FixedBitSet;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use rand::Rng;

/// Every gene independently uniform in `[0, K)`.
pub fn random_labels<R: Rng>(
    num_points: usize,
    num_clusters: usize,
    rng: &mut R,
) -> Vec<ClusterIdx> {
    let sampler = Uniform::from(0..num_clusters as ClusterIdx);
    (0..num_points).map(|_| sampler.sample(rng)).collect()
}

/// `count` distinct point indices by rejection sampling without
/// replacement.
pub fn distinct_point_indices<R: Rng>(
    num_points: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= num_points);
    let sampler = Uniform::from(0..num_points);
    let mut taken = vec![false; num_points];
    let mut indices = Vec::with_capacity(count);
    while indices.len() < count {
        let candidate = sampler.sample(rng);
        if !taken[candidate] {
            taken[candidate] = true;
            indices.push(candidate);
        }
    }
    indices
}

/// Seeds a K x d centroid matrix from chosen dataset points.
pub fn centroids_from_points<F: Feature>(
    dataset: &Dataset<F>,
    indices: &[usize],
) -> MatrixRow<F> {
    let mut centroids = MatrixRow::new(indices.len(), dataset.num_dimensions());
    for (row, &index) in indices.iter().enumerate() {
        centroids.copy_row(row, dataset.point(index));
    }
    centroids
}

/// Seeds a resizable codebook from chosen dataset points, with room to
/// grow up to `max_rows`.
pub fn codebook_from_points<F: Feature>(
    dataset: &Dataset<F>,
    indices: &[usize],
    max_rows: usize,
) -> ResizableMatrix<F> {
    let mut centroids = ResizableMatrix::with_capacity(max_rows, dataset.num_dimensions());
    for &index in indices {
        centroids.push_row(dataset.point(index));
    }
    centroids
}

/// Each bit independently Bernoulli(p); the medoid drivers default p to
/// K / N.
pub fn random_bitmask<R: Rng>(num_points: usize, prob_init: f64, rng: &mut R) -> FixedBitSet {
    let sampler = Bernoulli::new(prob_init).expect("probability out of range");
    let mut bits = FixedBitSet::with_capacity(num_points);
    for point in 0..num_points {
        if sampler.sample(rng) {
            bits.insert(point);
        }
    }
    bits
}
