//! Selection: fitness-proportional roulette and k-way tournament.
use crate::population::{Population, Scored};
use rand::Rng;

/// Cumulative distribution over non-normalized fitness, binary-searched
/// per draw. Negative and non-finite fitnesses carry no mass, so invalid
/// chromosomes are never drawn. Falls back to a uniform draw when the
/// whole population is massless.
#[derive(Clone, Debug)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
    total: f64,
}

impl RouletteWheel {
    pub fn from_population<C: Scored>(population: &Population<C>) -> Self {
        let mut cumulative = Vec::with_capacity(population.size());
        let mut total = 0.0;
        for chromosome in &population.chromosomes {
            let fitness = chromosome.fitness();
            if fitness.is_finite() && fitness > 0.0 {
                total += fitness;
            }
            cumulative.push(total);
        }
        Self { cumulative, total }
    }

    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        if self.total <= 0.0 {
            return rng.gen_range(0..self.cumulative.len());
        }
        let threshold = rng.gen::<f64>() * self.total;
        self.cumulative
            .partition_point(|&mass| mass <= threshold)
            .min(self.cumulative.len() - 1)
    }
}

/// Draws `size` contestants with replacement and returns the index of the
/// fittest; fitness ties keep the earliest draw.
pub fn tournament<C: Scored, R: Rng>(
    population: &Population<C>,
    size: usize,
    rng: &mut R,
) -> usize {
    debug_assert!(size > 0);
    let mut winner = rng.gen_range(0..population.size());
    for _ in 1..size {
        let contender = rng.gen_range(0..population.size());
        if population.chromosomes[contender].fitness() > population.chromosomes[winner].fitness() {
            winner = contender;
        }
    }
    winner
}
