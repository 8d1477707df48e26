use crate::support::*;
use approx::assert_relative_eq;
use genetic_clustering::kernel;
use genetic_clustering::matrix::{MatrixRow, ResizableMatrix};
use genetic_clustering::partition::PartitionLinkedStats;

#[test]
fn nearest_centroid_breaks_ties_low() {
    let centroids = MatrixRow::from_vec(3, 1, vec![0.0, 4.0, 4.0]);
    let (cluster, d) = kernel::nearest_centroid(&[4.0], &centroids, &DistanceKind::Euclidean);
    assert_eq!(cluster, 1);
    assert_relative_eq!(d, 0.0);
}

#[test]
fn lloyd_fixed_point_after_convergence() {
    let dataset = blob_dataset(3, 20, 2, 10.0, 1.0, 5);
    let mut centroids = MatrixRow::from_vec(3, 2, vec![0.0, 0.0, 10.0, 10.0, 20.0, 20.0]);
    let dist = DistanceKind::Euclidean;
    let partition = kernel::kmeans(&mut centroids, &dataset, &dist, 100);

    // converged: one more full round moves nothing
    let before = centroids.clone();
    let rebuilt = kernel::assign_all(&centroids, &dataset, &dist);
    let empty = kernel::recompute_centroids(&mut centroids, &rebuilt);
    assert_eq!(empty, 0);
    for cluster in 0..3 {
        for dim in 0..2 {
            assert_relative_eq!(
                centroids.row(cluster)[dim],
                before.row(cluster)[dim],
                epsilon = 1e-9
            );
        }
    }
    assert_eq!(rebuilt.members(), partition.members());
}

#[test]
fn reassign_reports_moves_and_distortion() {
    let dataset = line_dataset();
    let centroids = MatrixRow::from_vec(2, 1, vec![2.0, 11.0]);
    let dist = DistanceKind::Euclidean;
    let mut partition = kernel::assign_all(&centroids, &dataset, &dist);
    let (moved, distortion) = kernel::reassign(&mut partition, &centroids, &dataset, &dist);
    assert_eq!(moved, 0);
    // each group contributes 1 + 0 + 1 squared units over 6 points
    assert_relative_eq!(distortion, 4.0 / 6.0, epsilon = 1e-12);
}

#[test]
fn fill_empty_moves_farthest_point_as_singleton() {
    let dataset = line_dataset();
    let dist = DistanceKind::Euclidean;
    // everything in cluster 0; cluster 1 empty
    let mut partition: PartitionLinkedStats<f64> = PartitionLinkedStats::new(6, 2, 1);
    for point in 0..6 {
        partition.add(0, point, dataset.point(point), 1);
    }
    let mut centroids = MatrixRow::new(2, 1);
    let empty = kernel::recompute_centroids(&mut centroids, &partition);
    assert_eq!(empty, 1);

    kernel::fill_empty(&mut partition, &mut centroids, &dataset, &dist);
    // mean is 6.5; the point at 12 is farthest and becomes the singleton
    assert_eq!(partition.count(1), 1);
    assert_eq!(partition.member(5), 1);
    assert_relative_eq!(centroids.row(1)[0], 12.0);
    // donor centroid recomputed over the remaining five points
    assert_relative_eq!(centroids.row(0)[0], (1.0 + 2.0 + 3.0 + 10.0 + 11.0) / 5.0);
}

#[test]
fn pnn_reduces_line_of_singletons_to_three_adjacent_groups() {
    let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![x as f64]).collect();
    let dataset = Dataset::from_rows(&rows).unwrap();
    let dist = DistanceKind::Euclidean;

    let mut centroids: ResizableMatrix<f64> = ResizableMatrix::with_capacity(10, 1);
    let mut partition: PartitionLinkedStats<f64> = PartitionLinkedStats::new(10, 10, 1);
    for point in 0..10 {
        centroids.push_row(dataset.point(point));
        partition.add(point, point, dataset.point(point), 1);
    }

    kernel::pnn_fast(&mut partition, &mut centroids, 3, &dist);

    assert_eq!(centroids.num_rows(), 3);
    assert_eq!(partition.num_clusters(), 3);
    let non_empty = (0..3).filter(|&cluster| partition.count(cluster) > 0).count();
    assert_eq!(non_empty, 3);

    // every greedy merge joins neighbors, so clusters cover contiguous
    // ranges of the line
    for cluster in 0..3 {
        let mut members: Vec<usize> = partition.iter_cluster(cluster).collect();
        members.sort_unstable();
        for pair in members.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
    }

    // deterministic outcome under the smallest-(i, j) tie-break
    let mut finals: Vec<f64> = (0..3).map(|cluster| centroids.row(cluster)[0]).collect();
    finals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_relative_eq!(finals[0], 1.5, epsilon = 1e-12);
    assert_relative_eq!(finals[1], 4.5, epsilon = 1e-12);
    assert_relative_eq!(finals[2], 7.5, epsilon = 1e-12);

    // total weight survived the merges
    let total: i64 = partition.counts().iter().sum();
    assert_eq!(total, 10);
}

#[test]
fn remove_empty_clusters_compacts_and_respects_floor() {
    let dataset = line_dataset();
    let mut partition: PartitionLinkedStats<f64> = PartitionLinkedStats::new(6, 4, 1);
    for point in 0..3 {
        partition.add(0, point, dataset.point(point), 1);
    }
    for point in 3..6 {
        partition.add(3, point, dataset.point(point), 1);
    }
    let mut centroids: ResizableMatrix<f64> = ResizableMatrix::with_capacity(4, 1);
    centroids.resize(4);
    partition.mean_centroids(&mut centroids);

    kernel::remove_empty_clusters(&mut partition, &mut centroids, 2);
    assert_eq!(partition.num_clusters(), 2);
    assert_eq!(centroids.num_rows(), 2);
    assert!(partition.count(0) > 0 && partition.count(1) > 0);
}
