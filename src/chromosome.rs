//! Candidate partitions in their five encodings.
//!
//! The variants form a closed set; a driver picks one statically and the
//! operator library is parameterized over the gene container, not an
//! object hierarchy. Every chromosome carries its objective (minimized),
//! its fitness (a monotone decreasing transform of the objective) and a
//! validity flag; invalid chromosomes hold `objective = +inf`,
//! `fitness = -inf` and are dominated through selection rather than
//! discarded.
pub mod codebook;
pub mod igka;
pub mod label;
pub mod medoid;

pub use self::codebook::{Codebook, Optimality};
pub use self::igka::IgkaChromosome;

use crate::population::Scored;

#[derive(Clone, Debug)]
pub struct Chromosome<G> {
    pub genes: G,
    pub objective: f64,
    pub fitness: f64,
    pub valid: bool,
}

impl<G> Chromosome<G> {
    /// A fresh, not yet evaluated chromosome; starts in the dominated
    /// state.
    pub fn new(genes: G) -> Self {
        Self {
            genes,
            objective: f64::INFINITY,
            fitness: f64::NEG_INFINITY,
            valid: false,
        }
    }

    /// Records an evaluation. A valid chromosome gets
    /// `fitness = 1 / objective`; an invalid one is forced into the
    /// dominated state regardless of the computed objective.
    pub fn set_evaluation(&mut self, objective: f64, valid: bool) {
        if valid {
            self.objective = objective;
            self.fitness = 1.0 / objective;
            self.valid = true;
        } else {
            self.invalidate();
        }
    }

    /// Records an evaluation that stays comparable although the encoding
    /// invariant is broken: the medoid driver penalizes a wrong prototype
    /// count instead of discarding the chromosome.
    pub fn set_penalized_evaluation(&mut self, objective: f64, valid: bool) {
        self.objective = objective;
        self.fitness = 1.0 / objective;
        self.valid = valid;
    }

    pub fn invalidate(&mut self) {
        self.objective = f64::INFINITY;
        self.fitness = f64::NEG_INFINITY;
        self.valid = false;
    }
}

impl<G> Scored for Chromosome<G> {
    fn objective(&self) -> f64 {
        self.objective
    }
    fn fitness(&self) -> f64 {
        self.fitness
    }
    fn is_valid(&self) -> bool {
        self.valid
    }
}
