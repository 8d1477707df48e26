use crate::support::*;
use approx::assert_relative_eq;
use genetic_clustering::chromosome::{label, Chromosome};
use genetic_clustering::matrix::CrispMatrix;
use genetic_clustering::operators::select::{tournament, RouletteWheel};
use genetic_clustering::operators::{crossover, init, mutate};

fn scored(objective: f64, valid: bool) -> Chromosome<()> {
    let mut chromosome = Chromosome::new(());
    if valid {
        chromosome.set_evaluation(objective, true);
    }
    chromosome
}

#[test]
fn roulette_never_draws_invalid_chromosomes() {
    let population = Population::new(vec![
        scored(2.0, true),
        scored(0.0, false),
        scored(4.0, true),
        scored(0.0, false),
    ]);
    let wheel = RouletteWheel::from_population(&population);
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..2000 {
        let drawn = wheel.spin(&mut rng);
        assert!(drawn == 0 || drawn == 2);
    }
}

#[test]
fn roulette_prefers_fitter_chromosomes() {
    // objectives 1 and 9 give fitness 1.0 and 0.111..
    let population = Population::new(vec![scored(1.0, true), scored(9.0, true)]);
    let wheel = RouletteWheel::from_population(&population);
    let mut rng = SmallRng::seed_from_u64(17);
    let favored = (0..5000).filter(|_| wheel.spin(&mut rng) == 0).count();
    assert!(favored > 4000, "favored only {} of 5000", favored);
}

#[test]
fn tournament_returns_fittest_of_draws() {
    let population = Population::new(vec![scored(5.0, true), scored(1.0, true), scored(3.0, true)]);
    let mut rng = SmallRng::seed_from_u64(4);
    // with k = population size the best is found often; never an invalid pick
    for _ in 0..100 {
        let winner = tournament(&population, 3, &mut rng);
        assert!(winner < 3);
    }
}

#[test]
fn adaptive_schedule_ends_at_one_over_length() {
    let num_points = 60;
    let max_generations = 1000;
    let initial = 0.05;
    let final_prob =
        mutate::adaptive_mutation_probability(initial, max_generations, max_generations, num_points);
    assert_relative_eq!(final_prob, 1.0 / num_points as f64, epsilon = 1e-15);

    let start_prob = mutate::adaptive_mutation_probability(initial, 0, max_generations, num_points);
    assert_relative_eq!(start_prob, initial);

    // monotone toward 1/N
    let mid = mutate::adaptive_mutation_probability(initial, 500, max_generations, num_points);
    assert!(mid < initial && mid > 1.0 / num_points as f64);
}

#[test]
fn label_crossover_repair_keeps_children_valid() {
    let mut rng = SmallRng::seed_from_u64(8);
    let num_clusters = 3;
    for _ in 0..50 {
        let parent1 = init::random_labels(12, num_clusters, &mut rng);
        let parent2 = init::random_labels(12, num_clusters, &mut rng);
        if !label::covers_all_clusters(&parent1, num_clusters)
            || !label::covers_all_clusters(&parent2, num_clusters)
        {
            continue;
        }
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        crossover::label_one_point_repaired(
            &parent1,
            &parent2,
            &mut child1,
            &mut child2,
            num_clusters,
            &mut rng,
        );
        assert!(label::covers_all_clusters(&child1, num_clusters));
        assert!(label::covers_all_clusters(&child2, num_clusters));
    }
}

#[test]
fn single_gene_mutation_never_empties_a_cluster() {
    let mut rng = SmallRng::seed_from_u64(21);
    let num_clusters = 4;
    let mut labels: Vec<ClusterIdx> = vec![0, 0, 1, 1, 2, 2, 3, 3];
    for _ in 0..500 {
        let (applied, _) = mutate::label_single_gene(&mut labels, num_clusters, &mut rng);
        assert!(label::covers_all_clusters(&labels, num_clusters));
        if let Some((gene, old, new)) = applied {
            assert_ne!(old, new);
            assert_eq!(labels[gene], new);
        }
    }
}

#[test]
fn bi_direction_h_respects_bounds_and_skips_the_worst() {
    let mut rng = SmallRng::seed_from_u64(12);
    let lower = vec![0.0, -1.0];
    let upper = vec![10.0, 1.0];

    let mut genes = vec![5.0, 0.0, 2.0, 0.5];
    mutate::bi_direction_h(&mut genes, 3.0, 1.0, 9.0, &lower, &upper, &mut rng);
    for (index, &gene) in genes.iter().enumerate() {
        let dim = index % 2;
        assert!(gene >= lower[dim] && gene <= upper[dim]);
    }

    // the worst chromosome has rank 1, so delta is exactly zero
    let mut untouched = vec![5.0, 0.0];
    mutate::bi_direction_h(&mut untouched, 9.0, 1.0, 9.0, &lower, &upper, &mut rng);
    assert_eq!(untouched, vec![5.0, 0.0]);
}

#[test]
fn bitmask_initialization_matches_expected_density() {
    let mut rng = SmallRng::seed_from_u64(30);
    let bits = init::random_bitmask(10_000, 0.3, &mut rng);
    let ones = bits.count_ones(..);
    assert!((2_700..3_300).contains(&ones), "{} ones", ones);
}

#[test]
fn crisp_two_point_crossover_keeps_columns_crisp() {
    let mut rng = SmallRng::seed_from_u64(40);
    let columns = 200;
    let members_a: Vec<usize> = (0..columns).map(|_| rng.gen_range(0..3)).collect();
    let members_b: Vec<usize> = (0..columns).map(|_| rng.gen_range(0..3)).collect();
    let mut a = CrispMatrix::from_members(3, &members_a);
    let mut b = CrispMatrix::from_members(3, &members_b);

    crossover::two_point_columns_aligned(&mut a, &mut b, &mut rng);

    for column in 0..columns {
        // member() panics unless exactly one bit is set in the column
        let from_a = a.member(column);
        let from_b = b.member(column);
        assert!(from_a < 3 && from_b < 3);
        // columns were exchanged wholesale or kept
        assert!(
            (from_a == members_a[column] && from_b == members_b[column])
                || (from_a == members_b[column] && from_b == members_a[column])
        );
    }
}

#[test]
fn distinct_point_indices_are_distinct() {
    let mut rng = SmallRng::seed_from_u64(50);
    let mut indices = init::distinct_point_indices(20, 20, &mut rng);
    indices.sort_unstable();
    assert_eq!(indices, (0..20).collect::<Vec<_>>());
}
