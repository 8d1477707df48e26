//! Variable-K genetic algorithm over the codebook encoding: K moves
//! inside `[k_min, k_max]`, crossover happens in the label projection
//! where differing parent Ks are natural, and mutation splits a cluster
//! by 2-means or merges the cheapest PNN pair. Empty-cluster removal and
//! singleton fill keep every offspring structurally sound.
use super::{check_numeric, log_generation, steady_state_insert, write_plot, EliteTracker};
use crate::chromosome::{Chromosome, Codebook};
use crate::config::{EndingCondition, GaConfig, RunReport};
use crate::dataset::{ClusterIdx, Dataset};
use crate::distance::DistanceKind;
use crate::error::Error;
use crate::feature::Feature;
use crate::kernel;
use crate::matrix::ResizableMatrix;
use crate::operators::init;
use crate::operators::select::RouletteWheel;
use crate::population::Population;
use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
use itertools::Itertools;
use rand::Rng;

fn evaluate<F: Feature>(
    chromosome: &mut Chromosome<Codebook<F>>,
    k_min: usize,
    k_max: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) {
    let valid = chromosome.genes.is_valid(k_min, k_max);
    if !valid {
        chromosome.invalidate();
        return;
    }
    let objective = kernel::sse(
        &chromosome.genes.partition,
        &chromosome.genes.centroids,
        dataset,
        dist,
    );
    chromosome.set_evaluation(objective, true);
}

/// Repairs a freshly decoded codebook: empty clusters are joined away
/// down to `k_min`, any that must stay are refilled with far singletons,
/// and the centroids become the partition means.
fn repair_and_refresh<F: Feature>(
    codebook: &mut Codebook<F>,
    k_min: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) {
    kernel::remove_empty_clusters(&mut codebook.partition, &mut codebook.centroids, k_min);
    codebook.optimality = crate::chromosome::Optimality::None;
    let empty = codebook.partition.mean_centroids(&mut codebook.centroids);
    if empty > 0 {
        kernel::fill_empty(&mut codebook.partition, &mut codebook.centroids, dataset, dist);
    } else {
        codebook.optimality = codebook.optimality.after_centroid_update();
    }
}

/// Builds a codebook chromosome from a label string whose K is the
/// larger parent K; the repair pass brings it back into the band.
fn from_labels<F: Feature>(
    labels: &[ClusterIdx],
    num_clusters: usize,
    k_min: usize,
    k_max: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
) -> Chromosome<Codebook<F>> {
    let partition = crate::chromosome::label::decode(labels, num_clusters, dataset);
    let mut centroids = ResizableMatrix::with_capacity(k_max.max(num_clusters), dataset.num_dimensions());
    centroids.resize(num_clusters);
    let mut codebook = Codebook::new(centroids, partition);
    codebook.optimality = crate::chromosome::Optimality::None;
    repair_and_refresh(&mut codebook, k_min, dataset, dist);
    let mut chromosome = Chromosome::new(codebook);
    evaluate(&mut chromosome, k_min, k_max, dataset, dist);
    chromosome
}

/// Splits a cluster with at least two points by 2-means over its members.
/// Returns false when no splittable cluster exists, K is at the cap, or
/// the mini clustering degenerates.
fn split_mutation<F: Feature, R: Rng>(
    codebook: &mut Codebook<F>,
    k_max: usize,
    dataset: &Dataset<F>,
    dist: &DistanceKind,
    rng: &mut R,
) -> bool {
    let num_clusters = codebook.num_clusters();
    if num_clusters + 1 > k_max {
        return false;
    }
    let candidates: Vec<usize> = (0..num_clusters)
        .filter(|&cluster| codebook.partition.count(cluster) >= 2)
        .collect();
    if candidates.is_empty() {
        return false;
    }
    let cluster = candidates[rng.gen_range(0..candidates.len())];
    let members: Vec<usize> = codebook.partition.iter_cluster(cluster).collect();

    let seed_a = members[rng.gen_range(0..members.len())];
    let mut seed_b = members[rng.gen_range(0..members.len())];
    while seed_b == seed_a {
        seed_b = members[rng.gen_range(0..members.len())];
    }
    let mut centroid_a = dataset.point(seed_a).to_vec();
    let mut centroid_b = dataset.point(seed_b).to_vec();

    let num_dimensions = dataset.num_dimensions();
    let mut side_b = vec![false; members.len()];
    for _ in 0..10 {
        let mut moved = false;
        for (slot, &point) in members.iter().enumerate() {
            let features = dataset.point(point);
            let to_b = dist.dist(features, &centroid_b) < dist.dist(features, &centroid_a);
            if to_b != side_b[slot] {
                side_b[slot] = to_b;
                moved = true;
            }
        }
        let mut sums_a = vec![F::Sum::default(); num_dimensions];
        let mut sums_b = vec![F::Sum::default(); num_dimensions];
        let mut count_a = 0i64;
        let mut count_b = 0i64;
        for (slot, &point) in members.iter().enumerate() {
            let frequency = dataset.frequency(point);
            let target = if side_b[slot] { &mut sums_b } else { &mut sums_a };
            crate::vector_ops::axpy_widened::<F>(target, frequency, dataset.point(point));
            if side_b[slot] {
                count_b += frequency;
            } else {
                count_a += frequency;
            }
        }
        if count_a == 0 || count_b == 0 {
            return false;
        }
        for dim in 0..num_dimensions {
            centroid_a[dim] = F::mean(sums_a[dim], count_a);
            centroid_b[dim] = F::mean(sums_b[dim], count_b);
        }
        if !moved {
            break;
        }
    }
    if !side_b.iter().any(|&b| b) || side_b.iter().all(|&b| b) {
        return false;
    }

    let new_cluster = num_clusters;
    codebook.partition.resize(num_clusters + 1);
    for (slot, &point) in members.iter().enumerate() {
        if side_b[slot] {
            codebook.partition.change_member(
                new_cluster,
                point,
                dataset.point(point),
                dataset.frequency(point),
            );
        }
    }
    codebook.centroids.row_mut(cluster).copy_from_slice(&centroid_a);
    codebook.centroids.push_row(&centroid_b);
    codebook.optimality = crate::chromosome::Optimality::None;
    true
}

/// Joins the pair of clusters with the smallest weighted-distortion
/// increase. Returns false when K already sits at the floor.
fn merge_mutation<F: Feature>(
    codebook: &mut Codebook<F>,
    k_min: usize,
    dist: &DistanceKind,
) -> bool {
    let num_clusters = codebook.num_clusters();
    if num_clusters <= k_min || num_clusters < 2 {
        return false;
    }
    let mut best: Option<(f64, usize, usize)> = None;
    for i in 0..num_clusters {
        for j in i + 1..num_clusters {
            let cost = kernel::merge_cost(
                codebook.partition.count(i),
                codebook.partition.count(j),
                codebook.centroids.row(i),
                codebook.centroids.row(j),
                dist,
            );
            match best {
                Some((incumbent, _, _)) if cost >= incumbent => {}
                _ => best = Some((cost, i, j)),
            }
        }
    }
    let Some((_, keep, remove)) = best else {
        return false;
    };
    let count_keep = codebook.partition.count(keep);
    let count_remove = codebook.partition.count(remove);
    codebook
        .centroids
        .merge_two_rows(keep, remove, count_keep, count_remove);
    codebook.partition.join(remove, keep);
    codebook.centroids.remove_row(remove);
    codebook.optimality = crate::chromosome::Optimality::None;
    true
}

pub fn codebook_ga<F: Feature>(
    dataset: &Dataset<F>,
    k_min: usize,
    k_max: usize,
    dist: &DistanceKind,
    config: &GaConfig,
) -> Result<RunReport<Chromosome<Codebook<F>>>, Error> {
    if k_min < 2 {
        return Err(Error::InvalidParameter("k_min below 2"));
    }
    if k_max < k_min {
        return Err(Error::InvalidParameter("k_max below k_min"));
    }
    if dataset.num_points() < k_max {
        return Err(Error::InsufficientData {
            num_points: dataset.num_points(),
            num_clusters: k_max,
        });
    }

    let mut rng = rng_from_seed(&config.random_seed);
    let timer = RunTimer::new(config.max_exec_time_seconds);
    let mut history = GenerationHistory::new();
    let mut invalid_offspring: u64 = 0;
    let mut ending = EndingCondition::MaxGenerations;

    let mut population: Population<Chromosome<Codebook<F>>> = Population::new(
        (0..config.population_size)
            .map(|_| {
                let num_clusters = rng.gen_range(k_min..=k_max);
                let seeds =
                    init::distinct_point_indices(dataset.num_points(), num_clusters, &mut rng);
                let centroids = init::codebook_from_points(dataset, &seeds, k_max);
                let partition = kernel::assign_all(&centroids, dataset, dist);
                let mut codebook = Codebook::new(centroids, partition);
                codebook.optimality = codebook.optimality.after_partition_update();
                repair_and_refresh(&mut codebook, k_min, dataset, dist);
                let mut chromosome = Chromosome::new(codebook);
                evaluate(&mut chromosome, k_min, k_max, dataset, dist);
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
        log::error!("codebook_ga: aborting, {}", error);
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
        let parents: Vec<usize> = (0..config.population_size)
            .map(|_| wheel.spin(&mut rng))
            .collect();

        // crossover in the label projection
        let mut offspring: Vec<Chromosome<Codebook<F>>> =
            Vec::with_capacity(config.population_size);
        for pair in parents.chunks(2) {
            match pair {
                &[father, mother] => {
                    let father = &population.chromosomes[father];
                    let mother = &population.chromosomes[mother];
                    if rng.gen::<f64>() < config.prob_crossover {
                        let labels_father = father.genes.partition.members();
                        let labels_mother = mother.genes.partition.members();
                        let cut = rng.gen_range(1..dataset.num_points());
                        let child_clusters = father
                            .genes
                            .num_clusters()
                            .max(mother.genes.num_clusters());
                        let mut child1 = labels_father.to_vec();
                        child1[cut..].copy_from_slice(&labels_mother[cut..]);
                        let mut child2 = labels_mother.to_vec();
                        child2[cut..].copy_from_slice(&labels_father[cut..]);
                        offspring.push(from_labels(
                            &child1,
                            child_clusters,
                            k_min,
                            k_max,
                            dataset,
                            dist,
                        ));
                        offspring.push(from_labels(
                            &child2,
                            child_clusters,
                            k_min,
                            k_max,
                            dataset,
                            dist,
                        ));
                    } else {
                        offspring.push(father.clone());
                        offspring.push(mother.clone());
                    }
                }
                &[single] => offspring.push(population.chromosomes[single].clone()),
                _ => {}
            }
        }
        offspring.truncate(config.population_size);

        // split / merge mutation
        for chromosome in offspring.iter_mut() {
            if rng.gen::<f64>() < config.prob_mutation {
                let applied = if rng.gen::<bool>() {
                    split_mutation(&mut chromosome.genes, k_max, dataset, dist, &mut rng)
                } else {
                    merge_mutation(&mut chromosome.genes, k_min, dist)
                };
                if applied {
                    repair_and_refresh(&mut chromosome.genes, k_min, dataset, dist);
                }
            }
        }

        // evaluation, then steady-state replacement: an offspring only
        // enters by improving on the current worst. The numeric guard
        // runs on the offspring batch, which the insert would otherwise
        // drop silently (NaN never compares below the worst).
        for chromosome in offspring.iter_mut() {
            evaluate(chromosome, k_min, k_max, dataset, dist);
            if !chromosome.valid {
                invalid_offspring += 1;
            }
        }
        if let Err(error) = check_numeric(&offspring) {
            log::error!("codebook_ga: aborting at generation {}, {}", generation, error);
            ending = EndingCondition::Error;
            break;
        }
        steady_state_insert(&mut population, offspring);

        let best = population.best_index().expect("population is never empty");
        elite.challenge(&population.chromosomes[best], generation, &timer);

        history.record(elite.chromosome.objective, &population);
        log_generation(
            "codebook_ga",
            generation,
            elite.chromosome.objective,
            &population,
        );
    }

    if ending == EndingCondition::MaxGenerations
        && population
            .chromosomes
            .iter()
            .map(|chromosome| chromosome.genes.num_clusters())
            .all_equal()
    {
        ending = EndingCondition::ConvergedK;
    }

    write_plot(config, &history);
    Ok(RunReport {
        num_clusters: elite.chromosome.genes.num_clusters(),
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
