//! Medoid bitmask encoding: bit p marks point p as a prototype.
use crate::dataset::Dataset;
use crate::distance::DistanceKind;
use crate::feature::Feature;
use crate::matrix::TriangularMatrix;
use fixedbitset::FixedBitSet;

/// Point-pair dissimilarities, computed once per run; the evaluation of
/// every bitmask is then table lookups only.
pub fn dissimilarity_table<F: Feature>(
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) -> TriangularMatrix<f64> {
    let n = dataset.num_points();
    let mut table = TriangularMatrix::new(n);
    for i in 0..n {
        for j in 0..i {
            table.set(i, j, dist.dist(dataset.point(i), dataset.point(j)));
        }
    }
    table
}

pub fn medoid_indices(bits: &FixedBitSet) -> Vec<usize> {
    bits.ones().collect()
}

/// Objective of a prototype set: the weighted sum of each point's distance
/// to its closest chosen medoid, plus the cardinality penalty
/// `alpha * (popcount - K)^2`. A mask choosing fewer than two prototypes
/// is not evaluable and reports invalid.
pub fn evaluate<F: Feature>(
    bits: &FixedBitSet,
    dataset: &Dataset<F>,
    table: &TriangularMatrix<f64>,
    num_clusters: usize,
    alpha: f64,
) -> (f64, bool) {
    let medoids = medoid_indices(bits);
    if medoids.len() < 2 {
        return (f64::INFINITY, false);
    }
    let mut objective = 0.0;
    for point in 0..dataset.num_points() {
        let mut nearest = f64::INFINITY;
        for &medoid in &medoids {
            let d = table.get(point, medoid);
            if d < nearest {
                nearest = d;
            }
        }
        objective += dataset.frequency(point) as f64 * nearest;
    }
    let excess = medoids.len() as f64 - num_clusters as f64;
    objective += alpha * excess * excess;
    (objective, true)
}
