//! Fixed-K genetic algorithm over the medoid bitmask (GA-Prototypes),
//! after Kuncheva & Bezdek: Bernoulli-initialized prototype masks,
//! uniform disagreement crossover, per-bit flip mutation, and an
//! objective of summed nearest-prototype distances plus the cardinality
//! penalty `alpha * (popcount - K)^2` over a precomputed dissimilarity
//! table.
use super::{
    check_numeric, log_generation, replace_worst_with_elite, validate_fixed_k, write_plot,
    EliteTracker,
};
use crate::chromosome::{medoid, Chromosome};
use crate::config::{EndingCondition, GaConfig, RunReport};
use crate::dataset::Dataset;
use crate::distance::DistanceKind;
use crate::error::Error;
use crate::feature::Feature;
use crate::matrix::TriangularMatrix;
use crate::operators::select::RouletteWheel;
use crate::operators::{crossover, init, mutate};
use crate::population::Population;
use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
use fixedbitset::FixedBitSet;

fn evaluate<F: Feature>(
    chromosome: &mut Chromosome<FixedBitSet>,
    dataset: &Dataset<F>,
    table: &TriangularMatrix<f64>,
    num_clusters: usize,
    alpha: f64,
    invalid_offspring: &mut u64,
) {
    let popcount = chromosome.genes.count_ones(..);
    if popcount != num_clusters {
        *invalid_offspring += 1;
    }
    let (objective, evaluable) =
        medoid::evaluate(&chromosome.genes, dataset, table, num_clusters, alpha);
    if evaluable {
        // a wrong prototype count is penalized, not discarded
        chromosome.set_penalized_evaluation(objective, popcount == num_clusters);
    } else {
        chromosome.invalidate();
    }
}

pub fn medoid_ga<F: Feature>(
    dataset: &Dataset<F>,
    num_clusters: usize,
    dist: &DistanceKind,
    config: &GaConfig,
) -> Result<RunReport<Chromosome<FixedBitSet>>, Error> {
    validate_fixed_k(dataset, num_clusters)?;

    let num_points = dataset.num_points();
    let mut rng = rng_from_seed(&config.random_seed);
    let timer = RunTimer::new(config.max_exec_time_seconds);
    let mut history = GenerationHistory::new();
    let mut invalid_offspring: u64 = 0;
    let mut ending = EndingCondition::MaxGenerations;

    let table = medoid::dissimilarity_table(dataset, dist);
    let prob_init = config
        .prob_init
        .unwrap_or(num_clusters as f64 / num_points as f64);

    let mut population: Population<Chromosome<FixedBitSet>> = Population::new(
        (0..config.population_size)
            .map(|_| {
                let mut chromosome =
                    Chromosome::new(init::random_bitmask(num_points, prob_init, &mut rng));
                evaluate(
                    &mut chromosome,
                    dataset,
                    &table,
                    num_clusters,
                    config.alpha,
                    &mut invalid_offspring,
                );
                chromosome
            })
            .collect(),
    );

    let best = population.best_index().expect("population is never empty");
    let mut elite = EliteTracker::new(population.chromosomes[best].clone(), &timer);
    history.record(elite.chromosome.objective, &population);
    if let Err(error) = check_numeric(&population.chromosomes) {
        log::error!("medoid_ga: aborting, {}", error);
        ending = EndingCondition::Error;
    }

    while ending != EndingCondition::Error && history.generation() < config.max_generations {
        if timer.expired() {
            ending = EndingCondition::Timeout;
            break;
        }
        let generation = history.advance();

        // selection
        let wheel = RouletteWheel::from_population(&population);
        let parents: Vec<Chromosome<FixedBitSet>> = (0..config.population_size)
            .map(|_| population.chromosomes[wheel.spin(&mut rng)].clone())
            .collect();

        // uniform crossover on disagreeing bits
        let mut offspring = parents;
        for pair in (0..config.population_size).step_by(2) {
            if pair + 1 >= config.population_size {
                break;
            }
            let (left, right) = offspring.split_at_mut(pair + 1);
            crossover::uniform_bits(
                &mut left[pair].genes,
                &mut right[0].genes,
                config.prob_crossover,
                &mut rng,
            );
        }

        // per-bit flip mutation
        for chromosome in offspring.iter_mut() {
            mutate::bit_flip(&mut chromosome.genes, config.prob_mutation, &mut rng);
        }

        // evaluation
        for chromosome in offspring.iter_mut() {
            evaluate(
                chromosome,
                dataset,
                &table,
                num_clusters,
                config.alpha,
                &mut invalid_offspring,
            );
        }
        population = Population::new(offspring);
        if let Err(error) = check_numeric(&population.chromosomes) {
            log::error!("medoid_ga: aborting at generation {}, {}", generation, error);
            ending = EndingCondition::Error;
            break;
        }

        replace_worst_with_elite(&mut population, &elite.chromosome);
        let best = population.best_index().expect("population is never empty");
        elite.challenge(&population.chromosomes[best], generation, &timer);

        history.record(elite.chromosome.objective, &population);
        log_generation(
            "medoid_ga",
            generation,
            elite.chromosome.objective,
            &population,
        );
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
