//! Fixed-K genetic algorithm over the centroid encoding (KGA), after
//! Bandyopadhyay & Maulik: chromosomes are K x d centroid matrices seeded
//! from distinct dataset points, evaluation embeds one Lloyd step
//! (assignment plus centroid write-back), crossover cuts at an arbitrary
//! gene position (mid-centroid cuts are kept, matching the source paper),
//! and mutation is the bi-directional H operator.
use super::{
    check_numeric, log_generation, replace_worst_with_elite, validate_fixed_k, write_plot,
    EliteTracker,
};
use crate::chromosome::Chromosome;
use crate::config::{EndingCondition, GaConfig, RunReport};
use crate::dataset::Dataset;
use crate::distance::DistanceKind;
use crate::error::Error;
use crate::feature::Feature;
use crate::kernel;
use crate::matrix::MatrixRow;
use crate::operators::select::RouletteWheel;
use crate::operators::{crossover, init, mutate};
use crate::population::Population;
use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
use rand::Rng;

/// Assignment, centroid write-back, SSE. Invalid when some cluster
/// received no point.
fn evaluate<F: Feature>(
    chromosome: &mut Chromosome<MatrixRow<F>>,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) {
    let partition = kernel::assign_all(&chromosome.genes, dataset, dist);
    let empty = kernel::recompute_centroids(&mut chromosome.genes, &partition);
    if empty > 0 {
        chromosome.invalidate();
        return;
    }
    let objective = kernel::sse(&partition, &chromosome.genes, dataset, dist);
    chromosome.set_evaluation(objective, true);
}

pub fn kga<F: Feature>(
    dataset: &Dataset<F>,
    num_clusters: usize,
    dist: &DistanceKind,
    config: &GaConfig,
) -> Result<RunReport<Chromosome<MatrixRow<F>>>, Error> {
    validate_fixed_k(dataset, num_clusters)?;

    let mut rng = rng_from_seed(&config.random_seed);
    let timer = RunTimer::new(config.max_exec_time_seconds);
    let mut history = GenerationHistory::new();
    let mut invalid_offspring: u64 = 0;
    let mut ending = EndingCondition::MaxGenerations;
    let (lower_bounds, upper_bounds) = dataset.feature_bounds();

    let mut population: Population<Chromosome<MatrixRow<F>>> = Population::new(
        (0..config.population_size)
            .map(|_| {
                let seeds =
                    init::distinct_point_indices(dataset.num_points(), num_clusters, &mut rng);
                let mut chromosome =
                    Chromosome::new(init::centroids_from_points(dataset, &seeds));
                evaluate(&mut chromosome, dataset, dist);
                if !chromosome.valid {
                    invalid_offspring += 1;
                }
                chromosome
            })
            .collect(),
    );

    let best = population.best_index().expect("population is never empty");
    let mut elite = EliteTracker::new(population.chromosomes[best].clone(), &timer);
    history.record(elite.chromosome.objective, &population);
    if let Err(error) = check_numeric(&population.chromosomes) {
        log::error!("kga: aborting, {}", error);
        ending = EndingCondition::Error;
    }

    let genes_size = num_clusters * dataset.num_dimensions();

    while ending != EndingCondition::Error && history.generation() < config.max_generations {
        if timer.expired() {
            ending = EndingCondition::Timeout;
            break;
        }
        let generation = history.advance();

        // selection
        let wheel = RouletteWheel::from_population(&population);
        let parents: Vec<Chromosome<MatrixRow<F>>> = (0..config.population_size)
            .map(|_| population.chromosomes[wheel.spin(&mut rng)].clone())
            .collect();

        // crossover; the cut may fall inside a centroid row
        let mut offspring = parents.clone();
        for pair in (0..config.population_size).step_by(2) {
            if pair + 1 >= config.population_size {
                break;
            }
            if rng.gen::<f64>() < config.prob_crossover {
                let cut = rng.gen_range(1..genes_size);
                let (left, right) = offspring.split_at_mut(pair + 1);
                crossover::one_point(
                    parents[pair].genes.as_slice(),
                    parents[pair + 1].genes.as_slice(),
                    cut,
                    left[pair].genes.as_mut_slice(),
                    right[0].genes.as_mut_slice(),
                );
            }
        }

        // evaluation before mutation: the H operator ranks each
        // chromosome's objective within the current offspring
        for chromosome in offspring.iter_mut() {
            evaluate(chromosome, dataset, dist);
            if !chromosome.valid {
                invalid_offspring += 1;
            }
        }
        let finite: Vec<f64> = offspring
            .iter()
            .map(|c| c.objective)
            .filter(|objective| objective.is_finite())
            .collect();
        let min_objective = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max_objective = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // mutation
        let mut mutated = vec![false; offspring.len()];
        for (index, chromosome) in offspring.iter_mut().enumerate() {
            if rng.gen::<f64>() < config.prob_mutation {
                mutate::bi_direction_h(
                    chromosome.genes.as_mut_slice(),
                    chromosome.objective,
                    min_objective,
                    max_objective,
                    &lower_bounds,
                    &upper_bounds,
                    &mut rng,
                );
                mutated[index] = true;
            }
        }
        for (index, chromosome) in offspring.iter_mut().enumerate() {
            if mutated[index] {
                evaluate(chromosome, dataset, dist);
                if !chromosome.valid {
                    invalid_offspring += 1;
                }
            }
        }
        population = Population::new(offspring);
        if let Err(error) = check_numeric(&population.chromosomes) {
            log::error!("kga: aborting at generation {}, {}", generation, error);
            ending = EndingCondition::Error;
            break;
        }

        replace_worst_with_elite(&mut population, &elite.chromosome);
        let best = population.best_index().expect("population is never empty");
        elite.challenge(&population.chromosomes[best], generation, &timer);

        history.record(elite.chromosome.objective, &population);
        log_generation("kga", generation, elite.chromosome.objective, &population);
    }

    write_plot(config, &history);
    Ok(RunReport {
        num_clusters,
        objective: elite.chromosome.objective,
        fitness: elite.chromosome.fitness,
        num_generations: history.generation(),
        best_generation: elite.generation,
        seconds_to_best: elite.seconds,
        seconds_total: timer.elapsed_seconds(),
        invalid_offspring,
        ending,
        best: elite.chromosome,
    })
}
