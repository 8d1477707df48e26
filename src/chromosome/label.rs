//! Label encoding: gene p is the cluster of point p.
use crate::dataset::{ClusterIdx, Dataset};
use crate::distance::DistanceKind;
use crate::feature::Feature;
use crate::matrix::MatrixRow;
use crate::partition::PartitionLinkedStats;

/// Builds the linked partition with statistics from a gene vector.
/// Negative genes stay unassigned.
pub fn decode<F: Feature>(
    labels: &[ClusterIdx],
    num_clusters: usize,
    dataset: &Dataset<F>,
) -> PartitionLinkedStats<F> {
    let mut partition =
        PartitionLinkedStats::new(dataset.num_points(), num_clusters, dataset.num_dimensions());
    for (point, &label) in labels.iter().enumerate() {
        if label >= 0 {
            partition.add(
                label as usize,
                point,
                dataset.point(point),
                dataset.frequency(point),
            );
        }
    }
    partition
}

/// The inverse of [decode]; round-trips the gene vector exactly.
pub fn encode<F: Feature>(partition: &PartitionLinkedStats<F>) -> Vec<ClusterIdx> {
    partition.members().to_vec()
}

/// A label string is valid when every cluster in `0..num_clusters` owns at
/// least one point.
pub fn covers_all_clusters(labels: &[ClusterIdx], num_clusters: usize) -> bool {
    let mut seen = vec![false; num_clusters];
    for &label in labels {
        if (0..num_clusters as ClusterIdx).contains(&label) {
            seen[label as usize] = true;
        }
    }
    seen.into_iter().all(|present| present)
}

/// Full evaluation of a label string: partition, centroids, SSE. Returns
/// the objective and whether the string left no cluster empty.
pub fn evaluate<F: Feature>(
    labels: &[ClusterIdx],
    num_clusters: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) -> (f64, bool) {
    let partition = decode(labels, num_clusters, dataset);
    let mut centroids: MatrixRow<F> = MatrixRow::new(num_clusters, dataset.num_dimensions());
    let empty = partition.mean_centroids(&mut centroids);
    if empty > 0 {
        return (f64::INFINITY, false);
    }
    let mut objective = 0.0;
    for (point, &label) in labels.iter().enumerate() {
        objective += dataset.frequency(point) as f64
            * dist.squared(dataset.point(point), centroids.row(label as usize));
    }
    (objective, true)
}
