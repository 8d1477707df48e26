//! Convenient single import for driving a clustering run.
pub use crate::chromosome::{Chromosome, Codebook, IgkaChromosome, Optimality};
pub use crate::config::{EndingCondition, GaConfig, GaConfigBuilder, RunReport};
pub use crate::dataset::{ClusterIdx, Dataset, MEMBER_NOISE, MEMBER_UNKNOWN};
pub use crate::distance::DistanceKind;
pub use crate::driver::{codebook_ga, crisp_ga, igka, kga, label_ga, medoid_ga};
pub use crate::error::Error;
pub use crate::feature::Feature;
pub use crate::population::{Population, Scored};
pub use crate::runtime::{rng_from_seed, GenerationHistory, RunTimer};
