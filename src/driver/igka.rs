//! Fixed-K incremental genetic algorithm (FGKA/IGKA), after Lu et al.:
//! fitness-proportional selection, distance-guided allele mutation, and a
//! K-means operator step, all evaluated through the staged-delta path of
//! [IgkaChromosome] instead of full re-evaluation.
use super::{
    check_numeric, log_generation, replace_worst_with_elite, validate_fixed_k, write_plot,
    EliteTracker,
};
use crate::chromosome::IgkaChromosome;
use crate::config::{EndingCondition, GaConfig, RunReport};
use crate::dataset::{ClusterIdx, Dataset};
use crate::distance::DistanceKind;
use crate::error::Error;
use crate::feature::Feature;
use crate::operators::init;
use crate::operators::select::RouletteWheel;
use crate::population::{Population, Scored};
use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
use rand::Rng;

/// Distance-guided allele choice: cluster k is drawn with mass
/// `max(1.5 * d_max(x) - d(x, c_k), 0)`, where an emptied cluster counts
/// as distance zero so it attracts points back. Falls back to a uniform
/// draw when every mass vanishes.
fn sample_allele<F: Feature, R: Rng>(
    chromosome: &IgkaChromosome<F>,
    point: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
    rng: &mut R,
) -> ClusterIdx {
    let features = dataset.point(point);
    let d_max = chromosome.farthest_dist(point);
    let num_clusters = chromosome.num_clusters();
    let mut cumulative = Vec::with_capacity(num_clusters);
    let mut total = 0.0;
    for cluster in 0..num_clusters {
        let d = match chromosome.centroids().try_row(cluster) {
            Some(centroid) => dist.dist(features, centroid),
            None => 0.0,
        };
        total += (1.5 * d_max - d).max(0.0);
        cumulative.push(total);
    }
    if total <= 0.0 {
        return rng.gen_range(0..num_clusters as ClusterIdx);
    }
    let threshold = rng.gen::<f64>() * total;
    cumulative
        .partition_point(|&mass| mass <= threshold)
        .min(num_clusters - 1) as ClusterIdx
}

pub fn igka<F: Feature>(
    dataset: &Dataset<F>,
    num_clusters: usize,
    dist: &DistanceKind,
    config: &GaConfig,
) -> Result<RunReport<IgkaChromosome<F>>, Error> {
    validate_fixed_k(dataset, num_clusters)?;

    let num_points = dataset.num_points();
    let mut rng = rng_from_seed(&config.random_seed);
    let timer = RunTimer::new(config.max_exec_time_seconds);
    let mut history = GenerationHistory::new();
    let mut invalid_offspring: u64 = 0;
    let mut ending = EndingCondition::MaxGenerations;

    let mut population: Population<IgkaChromosome<F>> = Population::new(
        (0..config.population_size)
            .map(|_| {
                let labels = init::random_labels(num_points, num_clusters, &mut rng);
                let chromosome = IgkaChromosome::new(labels, num_clusters, dataset, dist);
                if !chromosome.is_valid() {
                    invalid_offspring += 1;
                }
                chromosome
            })
            .collect(),
    );

    let best = population.best_index().expect("population is never empty");
    let mut elite = EliteTracker::new(population.chromosomes[best].clone(), &timer);
    history.record(elite.chromosome.objective(), &population);
    if let Err(error) = check_numeric(&population.chromosomes) {
        log::error!("igka: aborting, {}", error);
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
        let mut offspring: Vec<IgkaChromosome<F>> = (0..config.population_size)
            .map(|_| population.chromosomes[wheel.spin(&mut rng)].clone())
            .collect();

        for chromosome in offspring.iter_mut() {
            // distance-guided mutation, staged per gene
            let mut staged = false;
            for point in 0..num_points {
                if rng.gen::<f64>() < config.prob_mutation {
                    let target = sample_allele(chromosome, point, dataset, dist, &mut rng);
                    if target != chromosome.label(point) {
                        chromosome.accumulate_update(point, target, dataset);
                        staged = true;
                    }
                }
            }
            if staged {
                chromosome.incremental_update(dataset, dist);
            }

            // K-means operator from the cached nearest clusters
            let mut moved = false;
            for point in 0..num_points {
                let nearest = chromosome.nearest(point);
                if nearest >= 0 && nearest != chromosome.label(point) {
                    chromosome.accumulate_update(point, nearest, dataset);
                    moved = true;
                }
            }
            if moved {
                chromosome.incremental_update(dataset, dist);
            }

            if !chromosome.is_valid() {
                invalid_offspring += 1;
            }
        }
        population = Population::new(offspring);
        if let Err(error) = check_numeric(&population.chromosomes) {
            log::error!("igka: aborting at generation {}, {}", generation, error);
            ending = EndingCondition::Error;
            break;
        }

        replace_worst_with_elite(&mut population, &elite.chromosome);
        let best = population.best_index().expect("population is never empty");
        elite.challenge(&population.chromosomes[best], generation, &timer);

        history.record(elite.chromosome.objective(), &population);
        log_generation(
            "igka",
            generation,
            elite.chromosome.objective(),
            &population,
        );
    }

    write_plot(config, &history);
    Ok(RunReport {
        num_clusters,
        objective: elite.chromosome.objective(),
        fitness: elite.chromosome.fitness(),
        num_generations: history.generation(),
        best_generation: elite.generation,
        seconds_to_best: elite.seconds,
        seconds_total: timer.elapsed_seconds(),
        invalid_offspring,
        ending,
        best: elite.chromosome,
    })
}
