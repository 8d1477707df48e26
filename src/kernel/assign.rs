//! Point-to-centroid assignment and centroid maintenance.
use crate::dataset::{ClusterIdx, Dataset, MEMBER_UNKNOWN};
use crate::distance::DistanceKind;
use crate::feature::Feature;
use crate::matrix::RowStore;
use crate::partition::PartitionLinkedStats;

/// Argmin over centroid rows; ties keep the lowest cluster index, null
/// (hard-deleted) rows are skipped. Returns `(MEMBER_UNKNOWN, +inf)` when
/// every row is null.
pub fn nearest_centroid<F: Feature, C: RowStore<F>>(
    point: &[F],
    centroids: &C,
    dist: &DistanceKind,
) -> (ClusterIdx, f64) {
    let mut nearest = MEMBER_UNKNOWN;
    let mut nearest_dist = f64::INFINITY;
    for cluster in 0..centroids.num_rows() {
        if centroids.row_is_null(cluster) {
            continue;
        }
        let d = dist.dist(point, centroids.row(cluster));
        if d < nearest_dist {
            nearest = cluster as ClusterIdx;
            nearest_dist = d;
        }
    }
    (nearest, nearest_dist)
}

/// Assigns every point to its nearest centroid, building the linked
/// partition with statistics. Theta(N * K * d).
pub fn assign_all<F: Feature, C: RowStore<F>>(
    centroids: &C,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) -> PartitionLinkedStats<F> {
    let mut partition = PartitionLinkedStats::new(
        dataset.num_points(),
        centroids.num_rows(),
        dataset.num_dimensions(),
    );
    for point in 0..dataset.num_points() {
        let (cluster, _) = nearest_centroid(dataset.point(point), centroids, dist);
        if cluster >= 0 {
            partition.add(
                cluster as usize,
                point,
                dataset.point(point),
                dataset.frequency(point),
            );
        }
    }
    partition
}

/// Reassigns each point of an existing partition to its nearest centroid
/// in place. Returns how many points moved and the mean squared
/// distortion of the new assignment.
pub fn reassign<F: Feature, C: RowStore<F>>(
    partition: &mut PartitionLinkedStats<F>,
    centroids: &C,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) -> (usize, f64) {
    let mut changed = 0;
    let mut squared_total = 0.0;
    for point in 0..dataset.num_points() {
        let features = dataset.point(point);
        let (cluster, _) = nearest_centroid(features, centroids, dist);
        if cluster < 0 {
            continue;
        }
        if cluster != partition.member(point) {
            partition.change_member(
                cluster as usize,
                point,
                features,
                dataset.frequency(point),
            );
            changed += 1;
        }
        squared_total +=
            dataset.frequency(point) as f64 * dist.squared(features, centroids.row(cluster as usize));
    }
    (changed, squared_total / dataset.total_frequency() as f64)
}

/// Rowwise mean of the partition statistics; empty clusters keep their
/// previous row. Returns the empty-cluster count.
pub fn recompute_centroids<F: Feature, C: RowStore<F>>(
    centroids: &mut C,
    partition: &PartitionLinkedStats<F>,
) -> usize {
    partition.mean_centroids(centroids)
}

/// Weighted sum of squared point-to-centroid dissimilarities, the
/// minimization objective of most drivers.
pub fn sse<F: Feature, C: RowStore<F>>(
    partition: &PartitionLinkedStats<F>,
    centroids: &C,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) -> f64 {
    let mut objective = 0.0;
    for point in 0..dataset.num_points() {
        let member = partition.member(point);
        if member < 0 || centroids.row_is_null(member as usize) {
            continue;
        }
        objective += dataset.frequency(point) as f64
            * dist.squared(dataset.point(point), centroids.row(member as usize));
    }
    objective
}

/// Repairs empty clusters: each one receives the assigned point farthest
/// from its own centroid (a snapshot taken before any move; point-index
/// ties keep the lowest), becoming a singleton whose donor centroid is
/// recomputed.
pub fn fill_empty<F: Feature, C: RowStore<F>>(
    partition: &mut PartitionLinkedStats<F>,
    centroids: &mut C,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) {
    let num_points = dataset.num_points();
    let mut snapshot = vec![f64::NEG_INFINITY; num_points];
    for point in 0..num_points {
        let member = partition.member(point);
        if member >= 0 && !centroids.row_is_null(member as usize) {
            snapshot[point] = dist.dist(dataset.point(point), centroids.row(member as usize));
        }
    }

    for cluster in 0..partition.num_clusters() {
        if partition.count(cluster) > 0 {
            continue;
        }
        let mut donor_point = usize::MAX;
        let mut donor_dist = f64::NEG_INFINITY;
        for point in 0..num_points {
            let member = partition.member(point);
            if member < 0 || partition.count(member as usize) <= 1 {
                continue;
            }
            if snapshot[point] > donor_dist {
                donor_dist = snapshot[point];
                donor_point = point;
            }
        }
        if donor_point == usize::MAX {
            break;
        }
        let donor_cluster = partition.member(donor_point) as usize;
        partition.change_member(
            cluster,
            donor_point,
            dataset.point(donor_point),
            dataset.frequency(donor_point),
        );
        snapshot[donor_point] = f64::NEG_INFINITY;
        centroids
            .row_mut(cluster)
            .copy_from_slice(dataset.point(donor_point));
        let count = partition.count(donor_cluster);
        debug_assert!(count > 0);
        let sums = partition.sum_row(donor_cluster).to_vec();
        for (value, sum) in centroids.row_mut(donor_cluster).iter_mut().zip(sums) {
            *value = F::mean(sum, count);
        }
    }
}

/// Lloyd refinement: alternate reassignment and centroid recomputation
/// until no point moves or the iteration budget runs out. Returns the
/// final partition.
pub fn kmeans<F: Feature, C: RowStore<F>>(
    centroids: &mut C,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
    max_iterations: usize,
) -> PartitionLinkedStats<F> {
    let mut partition = assign_all(centroids, dataset, dist);
    for _ in 0..max_iterations {
        recompute_centroids(centroids, &partition);
        let (changed, _) = reassign(&mut partition, centroids, dataset, dist);
        if changed == 0 {
            break;
        }
    }
    partition
}
