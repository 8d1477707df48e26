//! A catalog of genetic, evolutionary and memetic algorithms for
//! partitional clustering.
//!
//! Given an immutable [Dataset](crate::dataset::Dataset) of d-dimensional
//! points and a cluster count K (or a `[k_min, k_max]` band), each
//! [driver](crate::driver) evolves a population of encoded partitions and
//! returns the best one found together with a
//! [RunReport](crate::config::RunReport). The layers compose bottom-up:
//! * [vector_ops] and [distance] - the numeric primitives
//! * [matrix] and [partition] - centroid containers and the linked
//!   partition with running cluster statistics
//! * [chromosome] - the partition encodings (label, centroid, medoid
//!   bitmask, crisp bit-matrix, variable-K codebook, incremental)
//! * [kernel] - nearest-centroid assignment, centroid recomputation,
//!   empty-cluster repair and the PNN merge engine
//! * [operators] - initialization, selection, crossover, mutation
//! * [driver] - the algorithm catalog tying it all together
//!
//! ## Quick usage
//!
//! ```rust
//! use genetic_clustering::prelude::*;
//!
//! // two well-separated groups on a line
//! let dataset = Dataset::from_rows(&[
//!     vec![1.0], vec![2.0], vec![3.0], vec![10.0], vec![11.0], vec![12.0],
//! ])
//! .unwrap();
//!
//! let config = GaConfig::builder()
//!     .with_population_size(4)
//!     .with_max_generations(20)
//!     .with_prob_crossover(0.8)
//!     .with_prob_mutation(0.1)
//!     .with_random_seed("quick-usage")
//!     .build()
//!     .unwrap();
//!
//! let report = label_ga(&dataset, 2, &DistanceKind::Euclidean, &config).unwrap();
//! assert!(report.best.valid);
//! println!("{}", report);
//! ```
//!
//! Runs are pure functions of (parameters, dataset, seed): identical
//! inputs reproduce identical outputs. Drivers are strictly
//! single-threaded; the optional objective-history plot is their only
//! side effect.

pub mod chromosome;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod driver;
pub mod error;
pub mod feature;
pub mod fuzzy;
pub mod kernel;
pub mod matrix;
pub mod operators;
pub mod partition;
pub mod population;
pub mod prelude;
pub mod runtime;
pub mod supervised;
pub mod vector_ops;
