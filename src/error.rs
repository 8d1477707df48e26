//! Errors raised by the numeric layer and by parameter validation.
use std::error::Error as StdError;
use std::fmt;

/// Errors abort a run before or during the evolutionary loop. A chromosome
/// violating its encoding's validity invariant is *not* an error; it is
/// dominated through selection instead (see
/// [Chromosome](crate::chromosome::Chromosome)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A driver or builder parameter is out of range (e.g. k = 0,
    /// population_size < 2, probability outside [0, 1], k_max < k_min).
    InvalidParameter(&'static str),
    /// Matrix inverse attempted on a singular matrix. Only raised while
    /// setting up an induced (Mahalanobis-like) distance.
    Singular,
    /// The dataset holds no points.
    EmptyDataset,
    /// Fewer points than requested clusters.
    InsufficientData {
        num_points: usize,
        num_clusters: usize,
    },
    /// A numeric accumulator broke down. Integer sums widen instead of
    /// wrapping, so in practice this reports a floating-point objective
    /// degenerating into a NaN (overflowed squared differences, an
    /// indefinite induced weight matrix); drivers abort the run with
    /// `EndingCondition::Error` when they observe it.
    NumericOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter(reason) => write!(f, "invalid parameter: {}", reason),
            Error::Singular => write!(f, "matrix is singular"),
            Error::EmptyDataset => write!(f, "dataset holds no points"),
            Error::InsufficientData {
                num_points,
                num_clusters,
            } => write!(
                f,
                "{} points cannot be split into {} clusters",
                num_points, num_clusters
            ),
            Error::NumericOverflow => write!(f, "integer accumulator would overflow"),
        }
    }
}

impl StdError for Error {}
