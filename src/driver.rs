//! The algorithm catalog: one driver function per evolutionary clustering
//! algorithm.
//!
//! Every driver owns its population, mating pool, PRNG, wall-clock budget
//! and generation counter, and runs the same skeleton: initialize,
//! evaluate, then select / crossover / mutate / evaluate / elitist-replace
//! per generation, recording one history line each. They differ only in
//! encoding, operator set and whether evaluation is full or incremental.
pub mod codebook_ga;
pub mod crisp_ga;
pub mod igka;
pub mod kga;
pub mod label_ga;
pub mod medoid_ga;

pub use self::codebook_ga::codebook_ga;
pub use self::crisp_ga::crisp_ga;
pub use self::igka::igka;
pub use self::kga::kga;
pub use self::label_ga::label_ga;
pub use self::medoid_ga::medoid_ga;

use crate::config::GaConfig;
use crate::dataset::Dataset;
use crate::error::Error;
use crate::feature::Feature;
use crate::population::{Population, Scored};
use crate::runtime::{GenerationHistory, RunTimer};

pub(crate) fn validate_fixed_k<F: Feature>(
    dataset: &Dataset<F>,
    num_clusters: usize,
) -> Result<(), Error> {
    if num_clusters < 2 {
        return Err(Error::InvalidParameter("fewer than two clusters requested"));
    }
    if dataset.num_points() < num_clusters {
        return Err(Error::InsufficientData {
            num_points: dataset.num_points(),
            num_clusters,
        });
    }
    Ok(())
}

/// Generational elitism: if the population's worst is worse than the
/// carried elite, the elite takes its slot.
pub(crate) fn replace_worst_with_elite<C: Scored + Clone>(
    population: &mut Population<C>,
    elite: &C,
) {
    if let Some(worst) = population.worst_index() {
        if population.chromosomes[worst].objective() > elite.objective() {
            population.chromosomes[worst] = elite.clone();
        }
    }
}

/// Guards a batch of freshly evaluated chromosomes against numeric-layer
/// breakdown: a NaN objective (overflowed squared differences, an
/// indefinite induced weight matrix) is unordered and would silently
/// corrupt selection and elitism. The caller aborts its loop with
/// [EndingCondition::Error](crate::config::EndingCondition::Error) and
/// returns the best seen so far.
pub(crate) fn check_numeric<C: Scored>(chromosomes: &[C]) -> Result<(), Error> {
    if chromosomes
        .iter()
        .any(|chromosome| chromosome.objective().is_nan())
    {
        Err(Error::NumericOverflow)
    } else {
        Ok(())
    }
}

/// Steady-state replacement: each offspring takes the current worst slot
/// when it improves on it, otherwise it is dropped.
pub(crate) fn steady_state_insert<C: Scored>(population: &mut Population<C>, offspring: Vec<C>) {
    for child in offspring {
        if let Some(worst) = population.worst_index() {
            if child.objective() < population.chromosomes[worst].objective() {
                population.chromosomes[worst] = child;
            }
        }
    }
}

/// The best-so-far chromosome with the bookkeeping the output record
/// needs.
pub(crate) struct EliteTracker<C> {
    pub chromosome: C,
    pub generation: usize,
    pub seconds: f64,
}

impl<C: Scored + Clone> EliteTracker<C> {
    pub fn new(chromosome: C, timer: &RunTimer) -> Self {
        Self {
            chromosome,
            generation: 0,
            seconds: timer.elapsed_seconds(),
        }
    }

    /// Adopts the candidate when it strictly improves the objective.
    pub fn challenge(&mut self, candidate: &C, generation: usize, timer: &RunTimer) {
        if candidate.objective() < self.chromosome.objective() {
            self.chromosome = candidate.clone();
            self.generation = generation;
            self.seconds = timer.elapsed_seconds();
        }
    }
}

pub(crate) fn write_plot(config: &GaConfig, history: &GenerationHistory) {
    if let Some(path) = &config.plot_objective {
        if let Err(error) = history.write_plot_file(path) {
            log::warn!(
                "objective plot not written to {}: {}",
                path.display(),
                error
            );
        }
    }
}

pub(crate) fn log_generation<C: Scored>(
    driver: &str,
    generation: usize,
    elite_objective: f64,
    population: &Population<C>,
) {
    log::debug!(
        "{}: generation {}, objective (best/mean/stddev): {:.6} / {:.6} / {:.6}, valid: {}/{}",
        driver,
        generation,
        elite_objective,
        population.objective_mean(),
        population.objective_stddev(),
        population.num_valid(),
        population.size(),
    );
}
