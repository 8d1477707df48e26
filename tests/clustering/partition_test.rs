use crate::support::*;
use genetic_clustering::chromosome::label;
use genetic_clustering::partition::PartitionLinkedStats;

/// Recomputes counts and sums naively from the member array and compares
/// them against the running statistics and the linked-list traversal.
fn assert_consistent(partition: &PartitionLinkedStats<f64>, dataset: &Dataset<f64>) {
    for cluster in 0..partition.num_clusters() {
        let mut count = 0i64;
        let mut sums = vec![0.0; dataset.num_dimensions()];
        for (point, &member) in partition.members().iter().enumerate() {
            if member == cluster as ClusterIdx {
                count += dataset.frequency(point);
                for (sum, &value) in sums.iter_mut().zip(dataset.point(point)) {
                    *sum += dataset.frequency(point) as f64 * value;
                }
            }
        }
        assert_eq!(partition.count(cluster), count, "cluster {}", cluster);
        for (dim, &sum) in sums.iter().enumerate() {
            approx::assert_relative_eq!(
                partition.sum_row(cluster)[dim],
                sum,
                epsilon = 1e-9,
                max_relative = 1e-9
            );
        }
        // traversal agrees with the member array
        let visited: Vec<usize> = partition.iter_cluster(cluster).collect();
        assert_eq!(visited.len() as i64, {
            partition
                .members()
                .iter()
                .filter(|&&m| m == cluster as ClusterIdx)
                .count() as i64
        });
        for point in visited {
            assert_eq!(partition.member(point), cluster as ClusterIdx);
        }
    }
}

#[test]
fn random_operation_sequences_keep_invariants() {
    let dataset = blob_dataset(3, 10, 2, 10.0, 1.0, 7);
    let num_points = dataset.num_points();
    let num_clusters = 4;
    let mut partition = PartitionLinkedStats::new(num_points, num_clusters, 2);
    let mut rng = SmallRng::seed_from_u64(99);

    for step in 0..500 {
        let point = rng.gen_range(0..num_points);
        let features = dataset.point(point);
        let frequency = dataset.frequency(point);
        match rng.gen_range(0..3) {
            0 => {
                if partition.member(point) == MEMBER_UNKNOWN {
                    partition.add(rng.gen_range(0..num_clusters), point, features, frequency);
                }
            }
            1 => partition.sub(point, features, frequency),
            _ => {
                partition.change_member(rng.gen_range(0..num_clusters), point, features, frequency)
            }
        }
        if step % 50 == 0 {
            assert_consistent(&partition, &dataset);
        }
    }
    assert_consistent(&partition, &dataset);
}

#[test]
fn label_round_trip_is_identity() {
    let dataset = line_dataset();
    let labels: Vec<ClusterIdx> = vec![0, 1, 0, 1, 1, 0];
    let partition = label::decode(&labels, 2, &dataset);
    assert_eq!(label::encode(&partition), labels);
}

#[test]
fn join_keeps_weighted_totals() {
    let dataset = blob_dataset(2, 8, 2, 5.0, 0.5, 11);
    let labels: Vec<ClusterIdx> = (0..16).map(|p| (p % 4) as ClusterIdx).collect();
    let mut partition = label::decode(&labels, 4, &dataset);
    let total_before: i64 = partition.counts().iter().sum();

    partition.join(1, 2);
    assert_eq!(partition.num_clusters(), 3);
    let total_after: i64 = partition.counts().iter().sum();
    assert_eq!(total_before, total_after);
    assert_consistent(&partition, &dataset);
}
