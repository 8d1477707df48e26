//! Dissimilarity between two feature vectors.
//!
//! A closed sum dispatched by tag at the call site; drivers never pay a
//! virtual call in the inner assignment loop. The squared form is what the
//! SSE objective and the PNN merge cost consume; nearest-neighbor argmin
//! agrees between a distance and its square.
use crate::error::Error;
use crate::feature::Feature;
use crate::matrix::MatrixRow;

#[derive(Clone, Debug)]
pub enum DistanceKind {
    Euclidean,
    EuclideanSquared,
    /// sqrt((x - y)^T W (x - y)) with W symmetric positive definite.
    Induced(MatrixRow<f64>),
    InducedSquared(MatrixRow<f64>),
}

impl DistanceKind {
    /// The Mahalanobis-like distance induced by a covariance matrix; the
    /// inverse is taken once here and is the only [Error::Singular] source
    /// in the crate.
    pub fn induced_from_covariance(covariance: &MatrixRow<f64>) -> Result<Self, Error> {
        Ok(DistanceKind::Induced(covariance.inverse()?))
    }

    pub fn induced_squared_from_covariance(covariance: &MatrixRow<f64>) -> Result<Self, Error> {
        Ok(DistanceKind::InducedSquared(covariance.inverse()?))
    }

    /// The dissimilarity as configured.
    pub fn dist<F: Feature>(&self, a: &[F], b: &[F]) -> f64 {
        match self {
            DistanceKind::Euclidean => euclidean_squared(a, b).sqrt(),
            DistanceKind::EuclideanSquared => euclidean_squared(a, b),
            DistanceKind::Induced(weights) => induced_squared(a, b, weights).sqrt(),
            DistanceKind::InducedSquared(weights) => induced_squared(a, b, weights),
        }
    }

    /// The squared form of the configured dissimilarity, independent of
    /// whether the tag is the plain or the squared variant.
    pub fn squared<F: Feature>(&self, a: &[F], b: &[F]) -> f64 {
        match self {
            DistanceKind::Euclidean | DistanceKind::EuclideanSquared => euclidean_squared(a, b),
            DistanceKind::Induced(weights) | DistanceKind::InducedSquared(weights) => {
                induced_squared(a, b, weights)
            }
        }
    }
}

fn euclidean_squared<F: Feature>(a: &[F], b: &[F]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut acc = 0.0;
    for (&ai, &bi) in a.iter().zip(b) {
        let diff = ai.as_f64() - bi.as_f64();
        acc += diff * diff;
    }
    acc
}

fn induced_squared<F: Feature>(a: &[F], b: &[F], weights: &MatrixRow<f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(weights.num_rows(), a.len());
    let diff: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(&ai, &bi)| ai.as_f64() - bi.as_f64())
        .collect();
    let mut acc = 0.0;
    for (i, &di) in diff.iter().enumerate() {
        let mut row_acc = 0.0;
        for (j, &dj) in diff.iter().enumerate() {
            row_acc += weights.get(i, j) * dj;
        }
        acc += di * row_acc;
    }
    acc
}
