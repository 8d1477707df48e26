use crate::support::*;
use approx::assert_relative_eq;
use genetic_clustering::chromosome::IgkaChromosome;
use genetic_clustering::operators::init;

/// Staged mutations committed by one incremental update must match a
/// from-scratch evaluation of the same label string exactly.
#[test]
fn incremental_update_matches_scratch_evaluation() {
    let dataset = blob_dataset(3, 12, 3, 8.0, 1.5, 61);
    let dist = DistanceKind::Euclidean;
    let num_clusters = 4;
    let num_points = dataset.num_points();
    let mut rng = SmallRng::seed_from_u64(62);

    for round in 0..10 {
        let labels = init::random_labels(num_points, num_clusters, &mut rng);
        let mut incremental = IgkaChromosome::new(labels, num_clusters, &dataset, &dist);

        // stage a burst of random single-gene moves, then commit once
        for _ in 0..25 {
            let point = rng.gen_range(0..num_points);
            let target = rng.gen_range(0..num_clusters as ClusterIdx);
            incremental.accumulate_update(point, target, &dataset);
        }
        incremental.incremental_update(&dataset, &dist);

        let scratch = IgkaChromosome::new(
            incremental.labels().to_vec(),
            num_clusters,
            &dataset,
            &dist,
        );

        for cluster in 0..num_clusters {
            assert_eq!(
                incremental.count(cluster),
                scratch.count(cluster),
                "round {} cluster {}",
                round,
                cluster
            );
            for dim in 0..dataset.num_dimensions() {
                assert_relative_eq!(
                    incremental.sum_row(cluster)[dim],
                    scratch.sum_row(cluster)[dim],
                    max_relative = 1e-9,
                    epsilon = 1e-9
                );
            }
            match (
                incremental.centroids().try_row(cluster),
                scratch.centroids().try_row(cluster),
            ) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    for dim in 0..dataset.num_dimensions() {
                        assert_relative_eq!(a[dim], b[dim], max_relative = 1e-9, epsilon = 1e-9);
                    }
                }
                (a, b) => panic!("null-row mismatch: {:?} vs {:?}", a, b),
            }
            assert_relative_eq!(
                incremental.wcv()[cluster],
                scratch.wcv()[cluster],
                max_relative = 1e-9,
                epsilon = 1e-9
            );
        }
        assert_relative_eq!(
            incremental.twcv(),
            scratch.twcv(),
            max_relative = 1e-9,
            epsilon = 1e-9
        );
        assert_eq!(incremental.is_valid(), scratch.is_valid());
    }
}

/// Two staged bursts with commits in between stay exact, and the cached
/// per-point extrema agree with a direct scan.
#[test]
fn distance_cache_tracks_changed_clusters() {
    let dataset = blob_dataset(2, 10, 2, 6.0, 1.0, 63);
    let dist = DistanceKind::Euclidean;
    let num_clusters = 3;
    let mut rng = SmallRng::seed_from_u64(64);

    let labels = init::random_labels(dataset.num_points(), num_clusters, &mut rng);
    let mut chromosome = IgkaChromosome::new(labels, num_clusters, &dataset, &dist);

    for _ in 0..3 {
        for _ in 0..8 {
            let point = rng.gen_range(0..dataset.num_points());
            let target = rng.gen_range(0..num_clusters as ClusterIdx);
            chromosome.accumulate_update(point, target, &dataset);
        }
        chromosome.incremental_update(&dataset, &dist);
    }

    for point in 0..dataset.num_points() {
        let mut nearest = f64::INFINITY;
        let mut farthest = f64::NEG_INFINITY;
        for cluster in 0..num_clusters {
            if let Some(centroid) = chromosome.centroids().try_row(cluster) {
                let d = dist.dist(dataset.point(point), centroid);
                nearest = nearest.min(d);
                farthest = farthest.max(d);
            }
        }
        assert_relative_eq!(chromosome.nearest_dist(point), nearest, epsilon = 1e-9);
        assert_relative_eq!(chromosome.farthest_dist(point), farthest, epsilon = 1e-9);
    }
}
