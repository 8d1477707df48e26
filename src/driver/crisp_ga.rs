//! Fixed-K genetic algorithm over the crisp bit-matrix encoding:
//! word-aligned two-point column-interval crossover and single-column
//! membership mutation.
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
use crate::matrix::CrispMatrix;
use crate::operators::select::RouletteWheel;
use crate::operators::{crossover, mutate};
use crate::population::Population;
use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
use rand::Rng;

fn evaluate<F: Feature>(
    chromosome: &mut Chromosome<CrispMatrix>,
    num_clusters: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) {
    let labels: Vec<ClusterIdx> = chromosome
        .genes
        .to_members()
        .into_iter()
        .map(|member| member as ClusterIdx)
        .collect();
    let (objective, valid) = label::evaluate(&labels, num_clusters, dataset, dist);
    chromosome.set_evaluation(objective, valid);
}

pub fn crisp_ga<F: Feature>(
    dataset: &Dataset<F>,
    num_clusters: usize,
    dist: &DistanceKind,
    config: &GaConfig,
) -> Result<RunReport<Chromosome<CrispMatrix>>, Error> {
    validate_fixed_k(dataset, num_clusters)?;

    let num_points = dataset.num_points();
    let mut rng = rng_from_seed(&config.random_seed);
    let timer = RunTimer::new(config.max_exec_time_seconds);
    let mut history = GenerationHistory::new();
    let mut invalid_offspring: u64 = 0;
    let mut ending = EndingCondition::MaxGenerations;

    let mut population: Population<Chromosome<CrispMatrix>> = Population::new(
        (0..config.population_size)
            .map(|_| {
                let members: Vec<usize> = (0..num_points)
                    .map(|_| rng.gen_range(0..num_clusters))
                    .collect();
                let mut chromosome =
                    Chromosome::new(CrispMatrix::from_members(num_clusters, &members));
                evaluate(&mut chromosome, num_clusters, dataset, dist);
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
        log::error!("crisp_ga: aborting, {}", error);
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
        let parents: Vec<Chromosome<CrispMatrix>> = (0..config.population_size)
            .map(|_| population.chromosomes[wheel.spin(&mut rng)].clone())
            .collect();

        // aligned column-interval crossover
        let mut offspring = parents;
        for pair in (0..config.population_size).step_by(2) {
            if pair + 1 >= config.population_size {
                break;
            }
            if rng.gen::<f64>() < config.prob_crossover {
                let (left, right) = offspring.split_at_mut(pair + 1);
                crossover::two_point_columns_aligned(
                    &mut left[pair].genes,
                    &mut right[0].genes,
                    &mut rng,
                );
            }
        }

        // single-column membership mutation
        for chromosome in offspring.iter_mut() {
            if rng.gen::<f64>() < config.prob_mutation {
                mutate::crisp_column(&mut chromosome.genes, &mut rng);
            }
        }

        // evaluation
        for chromosome in offspring.iter_mut() {
            evaluate(chromosome, num_clusters, dataset, dist);
            if !chromosome.valid {
                invalid_offspring += 1;
            }
        }
        population = Population::new(offspring);
        if let Err(error) = check_numeric(&population.chromosomes) {
            log::error!("crisp_ga: aborting at generation {}, {}", generation, error);
            ending = EndingCondition::Error;
            break;
        }

        replace_worst_with_elite(&mut population, &elite.chromosome);
        let best = population.best_index().expect("population is never empty");
        elite.challenge(&population.chromosomes[best], generation, &timer);

        history.record(elite.chromosome.objective, &population);
        log_generation(
            "crisp_ga",
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
