//! The population is a container for scored chromosomes of one encoding.

/// Anything carrying an objective (minimized) and a fitness (maximized).
/// Implemented by [Chromosome](crate::chromosome::Chromosome) for every
/// gene container and by the incremental
/// [IgkaChromosome](crate::chromosome::IgkaChromosome).
pub trait Scored {
    fn objective(&self) -> f64;
    fn fitness(&self) -> f64;
    fn is_valid(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct Population<C: Scored> {
    pub chromosomes: Vec<C>,
}

impl<C: Scored> Population<C> {
    pub fn new(chromosomes: Vec<C>) -> Self {
        Self { chromosomes }
    }

    pub fn size(&self) -> usize {
        self.chromosomes.len()
    }

    /// Index of the lowest objective; ties keep the lowest index. `None`
    /// only for an empty population (+inf objectives still win over
    /// nothing).
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, chromosome) in self.chromosomes.iter().enumerate() {
            let objective = chromosome.objective();
            match best {
                Some((_, incumbent)) if objective >= incumbent => {}
                _ => best = Some((index, objective)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Index of the highest objective; ties keep the lowest index.
    pub fn worst_index(&self) -> Option<usize> {
        let mut worst: Option<(usize, f64)> = None;
        for (index, chromosome) in self.chromosomes.iter().enumerate() {
            let objective = chromosome.objective();
            match worst {
                Some((_, incumbent)) if objective <= incumbent => {}
                _ => worst = Some((index, objective)),
            }
        }
        worst.map(|(index, _)| index)
    }

    pub fn num_valid(&self) -> usize {
        self.chromosomes.iter().filter(|c| c.is_valid()).count()
    }

    /// Finite objectives only; +inf markers of invalid chromosomes would
    /// poison the summary statistics.
    fn finite_objectives(&self) -> impl Iterator<Item = f64> + '_ {
        self.chromosomes
            .iter()
            .map(|c| c.objective())
            .filter(|objective| objective.is_finite())
    }

    pub fn objective_mean(&self) -> f64 {
        stats::mean(self.finite_objectives())
    }

    pub fn objective_stddev(&self) -> f64 {
        stats::stddev(self.finite_objectives())
    }

    pub fn objective_min(&self) -> f64 {
        self.finite_objectives().fold(f64::INFINITY, f64::min)
    }

    pub fn objective_max(&self) -> f64 {
        self.finite_objectives().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl<C: Scored> From<Vec<C>> for Population<C> {
    fn from(chromosomes: Vec<C>) -> Self {
        Self::new(chromosomes)
    }
}
