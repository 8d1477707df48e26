//! Fixed-K genetic algorithm over the label encoding, after Murthy &
//! Chowdhury: roulette selection, one-point crossover with validity
//! repair, and single-gene mutation under the adaptive probability
//! schedule.
use super::{
    check_numeric, log_generation, replace_worst_with_elite, validate_fixed_k, write_plot,
    EliteTracker,
};
use crate::chromosome::{label, Chromosome};
use crate::config::{EndingCondition, GaConfig, RunReport};
use crate::dataset::{ClusterIdx, Dataset};
use crate::distance::DistanceKind;
use crate::error::Error;
use crate::feature::Feature;
use crate::operators::select::RouletteWheel;
use crate::operators::{crossover, init, mutate};
use crate::population::Population;
use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
use rand::Rng;

pub fn label_ga<F: Feature>(
    dataset: &Dataset<F>,
    num_clusters: usize,
    dist: &DistanceKind,
    config: &GaConfig,
) -> Result<RunReport<Chromosome<Vec<ClusterIdx>>>, Error> {
    validate_fixed_k(dataset, num_clusters)?;

    let num_points = dataset.num_points();
    let mut rng = rng_from_seed(&config.random_seed);
    let timer = RunTimer::new(config.max_exec_time_seconds);
    let mut history = GenerationHistory::new();
    let mut invalid_offspring: u64 = 0;
    let mut ending = EndingCondition::MaxGenerations;

    let mut population: Population<Chromosome<Vec<ClusterIdx>>> = Population::new(
        (0..config.population_size)
            .map(|_| {
                let mut chromosome =
                    Chromosome::new(init::random_labels(num_points, num_clusters, &mut rng));
                let (objective, valid) =
                    label::evaluate(&chromosome.genes, num_clusters, dataset, dist);
                if !valid {
                    invalid_offspring += 1;
                }
                chromosome.set_evaluation(objective, valid);
                chromosome
            })
            .collect(),
    );

    let best = population.best_index().expect("population is never empty");
    let mut elite = EliteTracker::new(population.chromosomes[best].clone(), &timer);
    history.record(elite.chromosome.objective, &population);
    if let Err(error) = check_numeric(&population.chromosomes) {
        log::error!("label_ga: aborting, {}", error);
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
        let parents: Vec<Chromosome<Vec<ClusterIdx>>> = (0..config.population_size)
            .map(|_| population.chromosomes[wheel.spin(&mut rng)].clone())
            .collect();

        // crossover into the reserved offspring slots
        let mut offspring = parents.clone();
        for pair in (0..config.population_size).step_by(2) {
            if pair + 1 >= config.population_size {
                break;
            }
            if rng.gen::<f64>() < config.prob_crossover {
                let (left, right) = offspring.split_at_mut(pair + 1);
                invalid_offspring += crossover::label_one_point_repaired(
                    &parents[pair].genes,
                    &parents[pair + 1].genes,
                    &mut left[pair].genes,
                    &mut right[0].genes,
                    num_clusters,
                    &mut rng,
                );
            }
        }

        // mutation, probability rising toward 1 / string_size
        let string_size = config.adaptive_string_size.unwrap_or(num_points);
        let prob_mutation = mutate::adaptive_mutation_probability(
            config.prob_mutation,
            generation,
            config.max_generations,
            string_size,
        );
        for chromosome in offspring.iter_mut() {
            if rng.gen::<f64>() < prob_mutation {
                let (_, rollbacks) =
                    mutate::label_single_gene(&mut chromosome.genes, num_clusters, &mut rng);
                invalid_offspring += rollbacks;
            }
        }

        // evaluation
        for chromosome in offspring.iter_mut() {
            let (objective, valid) = label::evaluate(&chromosome.genes, num_clusters, dataset, dist);
            if !valid {
                invalid_offspring += 1;
            }
            chromosome.set_evaluation(objective, valid);
        }
        population = Population::new(offspring);
        if let Err(error) = check_numeric(&population.chromosomes) {
            log::error!("label_ga: aborting at generation {}, {}", generation, error);
            ending = EndingCondition::Error;
            break;
        }

        replace_worst_with_elite(&mut population, &elite.chromosome);
        let best = population.best_index().expect("population is never empty");
        elite.challenge(&population.chromosomes[best], generation, &timer);

        history.record(elite.chromosome.objective, &population);
        log_generation("label_ga", generation, elite.chromosome.objective, &population);
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
