//! Pairwise-nearest-neighbor merge engine with a lazily recomputed
//! nearest-cluster cache.
use crate::distance::DistanceKind;
use crate::feature::Feature;
use crate::matrix::ResizableMatrix;
use crate::partition::PartitionLinkedStats;

/// Weighted distortion increase of merging clusters i and j:
/// `n_i * n_j / (n_i + n_j) * ||M_i - M_j||^2`.
pub fn merge_cost<F: Feature>(
    count_i: i64,
    count_j: i64,
    centroid_i: &[F],
    centroid_j: &[F],
    dist: &DistanceKind,
) -> f64 {
    let weight = (count_i as f64 * count_j as f64) / (count_i + count_j) as f64;
    weight * dist.squared(centroid_i, centroid_j)
}

/// Per-cluster cache entry: the cheapest merge partner and its cost. An
/// entry goes stale when the partner (or the owner) was touched by a
/// merge.
#[derive(Clone, Debug)]
struct NearestCluster {
    target: usize,
    delta: f64,
    stale: bool,
}

fn scan_nearest<F: Feature>(
    cluster: usize,
    partition: &PartitionLinkedStats<F>,
    centroids: &ResizableMatrix<F>,
    dist: &DistanceKind,
) -> NearestCluster {
    let mut target = usize::MAX;
    let mut delta = f64::INFINITY;
    for other in 0..centroids.num_rows() {
        if other == cluster {
            continue;
        }
        let cost = merge_cost(
            partition.count(cluster),
            partition.count(other),
            centroids.row(cluster),
            centroids.row(other),
            dist,
        );
        if cost < delta {
            delta = cost;
            target = other;
        }
    }
    NearestCluster {
        target,
        delta,
        stale: false,
    }
}

/// Joins every empty cluster away (the last cluster takes its slot) while
/// more than `k_min` clusters remain.
pub fn remove_empty_clusters<F: Feature>(
    partition: &mut PartitionLinkedStats<F>,
    centroids: &mut ResizableMatrix<F>,
    k_min: usize,
) {
    let mut cluster = 0;
    while cluster < partition.num_clusters() {
        if partition.count(cluster) == 0 && partition.num_clusters() > k_min {
            let last = partition.num_clusters() - 1;
            if cluster == last {
                partition.resize(last);
                centroids.pop_row();
            } else {
                partition.join(last, cluster);
                centroids.remove_row(cluster);
            }
            // re-examine the slot that just received the former last cluster
        } else {
            cluster += 1;
        }
    }
}

/// Greedily merges the cheapest cluster pair until `k_target` clusters
/// remain. After each merge only cache entries referencing the merged
/// pair (or renamed by the swap-with-last removal) are recomputed:
/// O(K^2 d) to build, O(K d) per merge.
pub fn pnn_merge<F: Feature>(
    partition: &mut PartitionLinkedStats<F>,
    centroids: &mut ResizableMatrix<F>,
    k_target: usize,
    dist: &DistanceKind,
) {
    let mut cache: Vec<NearestCluster> = (0..centroids.num_rows())
        .map(|cluster| scan_nearest(cluster, partition, centroids, dist))
        .collect();

    while centroids.num_rows() > k_target {
        // cheapest pair, smallest (i, j) on cost ties
        let mut best: Option<(f64, usize, usize)> = None;
        for (cluster, entry) in cache.iter().enumerate() {
            let (i, j) = if entry.target < cluster {
                (entry.target, cluster)
            } else {
                (cluster, entry.target)
            };
            let candidate = (entry.delta, i, j);
            match best {
                Some(incumbent)
                    if (candidate.0, candidate.1, candidate.2)
                        >= (incumbent.0, incumbent.1, incumbent.2) => {}
                _ => best = Some(candidate),
            }
        }
        let (_, keep, remove) = best.expect("pnn merge on an empty cache");

        for entry in cache.iter_mut() {
            if entry.target == keep || entry.target == remove {
                entry.stale = true;
            }
        }
        cache[keep].stale = true;

        let count_keep = partition.count(keep);
        let count_remove = partition.count(remove);
        centroids.merge_two_rows(keep, remove, count_keep, count_remove);
        partition.join(remove, keep);
        centroids.remove_row(remove);

        cache.swap_remove(remove);
        let renamed = cache.len();
        if remove < renamed {
            for entry in cache.iter_mut() {
                if entry.target == renamed {
                    entry.target = remove;
                }
            }
        }

        for cluster in 0..cache.len() {
            if cache[cluster].stale {
                cache[cluster] = scan_nearest(cluster, partition, centroids, dist);
            }
        }
    }
}

/// The common wrapper: drop empty clusters first, merge down to
/// `k_target`, then trim both containers to exactly `k_target` slots.
pub fn pnn_fast<F: Feature>(
    partition: &mut PartitionLinkedStats<F>,
    centroids: &mut ResizableMatrix<F>,
    k_target: usize,
    dist: &DistanceKind,
) {
    remove_empty_clusters(partition, centroids, k_target);
    if centroids.num_rows() > k_target {
        pnn_merge(partition, centroids, k_target, dist);
    }
    partition.resize(k_target);
    centroids.resize(k_target);
}
