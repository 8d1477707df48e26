//! Driver input parameters and the output record of a finished run.
use crate::error::Error;
use crate::population::Scored;
use std::fmt;
use std::path::PathBuf;

/// Shared parameter record of every driver. Built through
/// [GaConfigBuilder], which validates ranges; driver-specific cluster
/// counts are plain function arguments.
#[derive(Clone, Debug)]
pub struct GaConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Wall-clock budget in seconds; 0 means unbounded.
    pub max_exec_time_seconds: f64,
    pub prob_crossover: f64,
    pub prob_mutation: f64,
    /// Initial bit probability of the medoid drivers; defaults to K / N.
    pub prob_init: Option<f64>,
    /// Cardinality penalty weight of the medoid drivers.
    pub alpha: f64,
    /// Printable seed; equal strings reproduce runs exactly.
    pub random_seed: String,
    /// Denominator of the adaptive mutation schedule. Defaults to the
    /// point count, which matches the label string length; centroid
    /// encodings may configure their own gene count here.
    pub adaptive_string_size: Option<usize>,
    /// Objective history file; `None` disables plotting.
    pub plot_objective: Option<PathBuf>,
}

impl GaConfig {
    pub fn builder() -> GaConfigBuilder {
        GaConfigBuilder::default()
    }
}

#[derive(Clone, Debug)]
pub struct GaConfigBuilder {
    population_size: Option<usize>,
    max_generations: Option<usize>,
    max_exec_time_seconds: f64,
    prob_crossover: f64,
    prob_mutation: f64,
    prob_init: Option<f64>,
    alpha: f64,
    random_seed: String,
    adaptive_string_size: Option<usize>,
    plot_objective: Option<PathBuf>,
}

impl Default for GaConfigBuilder {
    fn default() -> Self {
        Self {
            population_size: None,
            max_generations: None,
            max_exec_time_seconds: 0.0,
            prob_crossover: 0.8,
            prob_mutation: 0.1,
            prob_init: None,
            alpha: 0.0,
            random_seed: "0".to_string(),
            adaptive_string_size: None,
            plot_objective: None,
        }
    }
}

impl GaConfigBuilder {
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = Some(population_size);
        self
    }
    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = Some(max_generations);
        self
    }
    pub fn with_max_exec_time_seconds(mut self, seconds: f64) -> Self {
        self.max_exec_time_seconds = seconds;
        self
    }
    pub fn with_prob_crossover(mut self, prob: f64) -> Self {
        self.prob_crossover = prob;
        self
    }
    pub fn with_prob_mutation(mut self, prob: f64) -> Self {
        self.prob_mutation = prob;
        self
    }
    pub fn with_prob_init(mut self, prob: f64) -> Self {
        self.prob_init = Some(prob);
        self
    }
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
    pub fn with_random_seed<S: Into<String>>(mut self, seed: S) -> Self {
        self.random_seed = seed.into();
        self
    }
    pub fn with_adaptive_string_size(mut self, string_size: usize) -> Self {
        self.adaptive_string_size = Some(string_size);
        self
    }
    pub fn with_plot_objective<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.plot_objective = Some(path.into());
        self
    }

    pub fn build(self) -> Result<GaConfig, Error> {
        let population_size = self
            .population_size
            .ok_or(Error::InvalidParameter("population_size is required"))?;
        let max_generations = self
            .max_generations
            .ok_or(Error::InvalidParameter("max_generations is required"))?;
        if population_size < 2 {
            return Err(Error::InvalidParameter("population_size below 2"));
        }
        if max_generations == 0 {
            return Err(Error::InvalidParameter("max_generations is zero"));
        }
        if !(0.0..=1.0).contains(&self.prob_crossover) {
            return Err(Error::InvalidParameter("prob_crossover outside [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.prob_mutation) {
            return Err(Error::InvalidParameter("prob_mutation outside [0, 1]"));
        }
        if let Some(prob_init) = self.prob_init {
            if !(prob_init > 0.0 && prob_init <= 1.0) {
                return Err(Error::InvalidParameter("prob_init outside (0, 1]"));
            }
        }
        if self.alpha < 0.0 {
            return Err(Error::InvalidParameter("alpha is negative"));
        }
        if self.max_exec_time_seconds < 0.0 {
            return Err(Error::InvalidParameter("max_exec_time_seconds is negative"));
        }
        if self.adaptive_string_size == Some(0) {
            return Err(Error::InvalidParameter("adaptive_string_size is zero"));
        }
        Ok(GaConfig {
            population_size,
            max_generations,
            max_exec_time_seconds: self.max_exec_time_seconds,
            prob_crossover: self.prob_crossover,
            prob_mutation: self.prob_mutation,
            prob_init: self.prob_init,
            alpha: self.alpha,
            random_seed: self.random_seed,
            adaptive_string_size: self.adaptive_string_size,
            plot_objective: self.plot_objective,
        })
    }
}

/// Why a run stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndingCondition {
    MaxGenerations,
    Timeout,
    /// A variable-K run whose whole population settled on one K.
    ConvergedK,
    /// A numeric-layer failure aborted the loop; the report still carries
    /// the best chromosome seen.
    Error,
}

impl fmt::Display for EndingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndingCondition::MaxGenerations => write!(f, "max generations"),
            EndingCondition::Timeout => write!(f, "timeout"),
            EndingCondition::ConvergedK => write!(f, "converged k"),
            EndingCondition::Error => write!(f, "error"),
        }
    }
}

/// Output record of a run; the best chromosome is returned by value.
#[derive(Clone, Debug)]
pub struct RunReport<C> {
    pub num_clusters: usize,
    pub objective: f64,
    pub fitness: f64,
    pub num_generations: usize,
    pub best_generation: usize,
    pub seconds_to_best: f64,
    pub seconds_total: f64,
    pub invalid_offspring: u64,
    pub ending: EndingCondition,
    pub best: C,
}

impl<C: Scored> fmt::Display for RunReport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run_report:")?;
        writeln!(f, "  num_clusters: {}", self.num_clusters)?;
        writeln!(f, "  objective: {}", self.objective)?;
        writeln!(f, "  fitness: {}", self.fitness)?;
        writeln!(f, "  num_generations: {}", self.num_generations)?;
        writeln!(f, "  best_generation: {}", self.best_generation)?;
        writeln!(f, "  seconds_to_best: {:.3}", self.seconds_to_best)?;
        writeln!(f, "  seconds_total: {:.3}", self.seconds_total)?;
        writeln!(f, "  invalid_offspring: {}", self.invalid_offspring)?;
        writeln!(f, "  ending: {}", self.ending)
    }
}
