use crate::support::*;
use approx::assert_relative_eq;
use genetic_clustering::chromosome::medoid;
use genetic_clustering::kernel;
use genetic_clustering::matrix::MatrixRow;

fn base_config(population_size: usize, max_generations: usize, seed: &str) -> GaConfig {
    GaConfig::builder()
        .with_population_size(population_size)
        .with_max_generations(max_generations)
        .with_prob_crossover(0.8)
        .with_prob_mutation(0.1)
        .with_random_seed(seed)
        .build()
        .unwrap()
}

#[test]
fn label_ga_solves_the_toy_line() {
    let dataset = line_dataset();
    let config = base_config(20, 200, "e1-label");
    let report = label_ga(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();

    assert!(report.best.valid);
    assert_relative_eq!(report.objective, 4.0, epsilon = 1e-9);
    let genes = &report.best.genes;
    assert_eq!(genes[0], genes[1]);
    assert_eq!(genes[1], genes[2]);
    assert_eq!(genes[3], genes[4]);
    assert_eq!(genes[4], genes[5]);
    assert_ne!(genes[0], genes[3]);
    assert_eq!(report.num_generations, 200);
    assert_eq!(report.ending, EndingCondition::MaxGenerations);
}

#[test]
fn label_ga_is_deterministic_under_a_seed() {
    let dataset = blob_dataset(3, 10, 2, 8.0, 1.0, 71);
    let config = base_config(12, 40, "determinism");
    let first = label_ga(&dataset, 3, &DistanceKind::Euclidean, &config).unwrap();
    let second = label_ga(&dataset, 3, &DistanceKind::Euclidean, &config).unwrap();

    assert_eq!(first.best.genes, second.best.genes);
    assert_eq!(first.objective.to_bits(), second.objective.to_bits());
    assert_eq!(first.best_generation, second.best_generation);
    assert_eq!(first.invalid_offspring, second.invalid_offspring);
}

#[test]
fn kga_matches_the_lloyd_baseline_on_separated_blobs() {
    // the shape of the classic 150 x 4 benchmark, made separable
    let dataset = blob_dataset(3, 50, 4, 10.0, 1.0, 72);
    let dist = DistanceKind::Euclidean;

    let mut baseline_centroids = MatrixRow::from_vec(
        3,
        4,
        vec![
            0.0, 0.0, 0.0, 0.0, //
            10.0, 10.0, 10.0, 10.0, //
            20.0, 20.0, 20.0, 20.0,
        ],
    );
    let baseline_partition = kernel::kmeans(&mut baseline_centroids, &dataset, &dist, 100);
    let baseline_sse = kernel::sse(&baseline_partition, &baseline_centroids, &dataset, &dist);

    let config = base_config(50, 200, "e2-kga");
    let report = kga(&dataset, 3, &dist, &config).unwrap();

    assert!(report.best.valid);
    assert!(
        report.objective <= baseline_sse + 0.5,
        "evolved {} vs baseline {}",
        report.objective,
        baseline_sse
    );
}

#[test]
fn medoid_ga_picks_one_prototype_per_tight_blob() {
    // three tight blobs far apart; with alpha = 0.1 a fourth prototype
    // never pays for its cardinality penalty
    let dataset = blob_dataset(3, 7, 2, 1.0, 0.005, 73);
    let dist = DistanceKind::Euclidean;
    let config = GaConfig::builder()
        .with_population_size(30)
        .with_max_generations(100)
        .with_prob_crossover(0.5)
        .with_prob_mutation(0.05)
        .with_alpha(0.1)
        .with_random_seed("e3-medoid")
        .build()
        .unwrap();

    let report = medoid_ga(&dataset, 3, &dist, &config).unwrap();
    let medoids = medoid::medoid_indices(&report.best.genes);
    assert_eq!(medoids.len(), 3, "popcount != K: {:?}", medoids);
    assert!(report.best.valid);

    let mut blobs: Vec<usize> = medoids.iter().map(|&m| blob_of(m, 7)).collect();
    blobs.sort_unstable();
    assert_eq!(blobs, vec![0, 1, 2]);

    // the reported objective is exactly the summed nearest-prototype
    // distance (the penalty term vanishes at popcount = K)
    let table = medoid::dissimilarity_table(&dataset, &dist);
    let mut expected = 0.0;
    for point in 0..dataset.num_points() {
        expected += medoids
            .iter()
            .map(|&m| table.get(point, m))
            .fold(f64::INFINITY, f64::min);
    }
    assert_relative_eq!(report.objective, expected, epsilon = 1e-9);
}

#[test]
fn crisp_ga_returns_a_crisp_valid_partition() {
    let dataset = blob_dataset(2, 20, 2, 8.0, 1.0, 74);
    let config = base_config(20, 60, "crisp");
    let report = crisp_ga(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();

    assert!(report.best.valid);
    assert!(report.best.genes.all_rows_occupied());
    let members = report.best.genes.to_members();
    assert_eq!(members.len(), dataset.num_points());
    assert!(report.objective.is_finite());
}

#[test]
fn codebook_ga_keeps_k_inside_the_band() {
    let dataset = blob_dataset(3, 15, 2, 12.0, 1.0, 75);
    let config = base_config(16, 60, "codebook");
    let report = codebook_ga(&dataset, 2, 6, &DistanceKind::Euclidean, &config).unwrap();

    assert!(report.best.valid);
    let k = report.num_clusters;
    assert!((2..=6).contains(&k), "k = {}", k);
    for cluster in 0..k {
        assert!(report.best.genes.partition.count(cluster) > 0);
    }
    assert!(matches!(
        report.ending,
        EndingCondition::MaxGenerations | EndingCondition::ConvergedK
    ));
}

#[test]
fn igka_driver_improves_and_stays_consistent() {
    let dataset = blob_dataset(3, 10, 2, 9.0, 1.0, 76);
    let config = base_config(10, 40, "igka");
    let report = igka(&dataset, 3, &DistanceKind::Euclidean, &config).unwrap();

    assert!(report.best.is_valid());
    assert!(report.objective.is_finite());
    // the K-means operator alone should reach a near-partitioned state on
    // well-separated blobs
    let baseline = {
        let mut centroids = MatrixRow::from_vec(3, 2, vec![0.0, 0.0, 9.0, 9.0, 18.0, 18.0]);
        let partition = kernel::kmeans(&mut centroids, &dataset, &DistanceKind::Euclidean, 100);
        kernel::sse(&partition, &centroids, &dataset, &DistanceKind::Euclidean)
    };
    assert!(
        report.objective <= baseline + 1.0,
        "evolved {} vs baseline {}",
        report.objective,
        baseline
    );
}

#[test]
fn elitism_keeps_best_objective_monotone() {
    let dataset = blob_dataset(2, 12, 2, 6.0, 1.0, 77);
    let mut config = base_config(10, 50, "monotone");
    let plot = std::env::temp_dir().join("genetic_clustering_monotone_plot.txt");
    config.plot_objective = Some(plot.clone());

    let report = label_ga(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();
    assert!(report.best.valid);

    let contents = std::fs::read_to_string(&plot).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next().unwrap(), "generation best mean stdev min max");
    let mut previous_best = f64::INFINITY;
    let mut rows = 0;
    for line in lines {
        let columns: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(columns.len(), 6);
        let best: f64 = columns[1].parse().unwrap();
        assert!(best <= previous_best, "best objective increased");
        previous_best = best;
        rows += 1;
    }
    // one record at initialization plus one per generation
    assert_eq!(rows, 51);
    std::fs::remove_file(&plot).ok();
}

#[test]
fn invalid_parameters_are_rejected_up_front() {
    let dataset = line_dataset();
    let config = base_config(10, 20, "errors");

    assert!(matches!(
        label_ga(&dataset, 1, &DistanceKind::Euclidean, &config),
        Err(Error::InvalidParameter(_))
    ));
    assert_eq!(
        label_ga(&dataset, 7, &DistanceKind::Euclidean, &config).unwrap_err(),
        Error::InsufficientData {
            num_points: 6,
            num_clusters: 7
        }
    );
    assert!(matches!(
        codebook_ga(&dataset, 4, 3, &DistanceKind::Euclidean, &config),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        GaConfig::builder()
            .with_population_size(1)
            .with_max_generations(5)
            .build(),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        GaConfig::builder()
            .with_population_size(10)
            .with_max_generations(5)
            .with_prob_mutation(1.5)
            .build(),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn timeout_is_reported_not_raised() {
    let dataset = blob_dataset(3, 40, 4, 8.0, 1.0, 78);
    let config = GaConfig::builder()
        .with_population_size(40)
        .with_max_generations(1_000_000)
        .with_max_exec_time_seconds(0.05)
        .with_random_seed("timeout")
        .build()
        .unwrap();

    let report = label_ga(&dataset, 3, &DistanceKind::Euclidean, &config).unwrap();
    assert_eq!(report.ending, EndingCondition::Timeout);
    assert!(report.num_generations < 1_000_000);
    assert!(report.seconds_total >= 0.05);
}

/// A numeric-layer breakdown mid-run is not a panic and not an `Err`:
/// the driver aborts with `EndingCondition::Error` and still hands back
/// the best-so-far chromosome. Coordinates at infinity make every
/// centroid coordinate infinite, so each squared difference degenerates
/// to NaN at the first evaluation.
#[test]
fn numeric_breakdown_aborts_with_error_ending() {
    let rows = vec![
        vec![f64::INFINITY, 0.0],
        vec![f64::INFINITY, 1.0],
        vec![f64::INFINITY, 2.0],
        vec![f64::INFINITY, 3.0],
    ];
    let dataset = Dataset::from_rows(&rows).unwrap();
    let config = base_config(6, 30, "numeric-error");

    let report = label_ga(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();
    assert_eq!(report.ending, EndingCondition::Error);
    assert!(report.num_generations < 30);
    assert_eq!(report.best.genes.len(), dataset.num_points());

    let report = igka(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();
    assert_eq!(report.ending, EndingCondition::Error);
    assert!(report.num_generations < 30);
}

/// Parity between a float dataset and the same coordinates as integers:
/// integer centroids round, so the SSE differs, but both runs complete
/// with valid chromosomes.
#[test]
fn integer_features_round_their_centroids() {
    let rows: Vec<Vec<i32>> = vec![
        vec![1, 1],
        vec![2, 2],
        vec![3, 3],
        vec![20, 20],
        vec![21, 21],
        vec![23, 23],
    ];
    let dataset = Dataset::from_rows(&rows).unwrap();
    let config = base_config(10, 50, "integers");
    let report = label_ga(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();
    assert!(report.best.valid);
    assert!(report.objective.is_finite());
}
