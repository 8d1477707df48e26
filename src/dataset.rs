//! The immutable point collection a run clusters.
use crate::error::Error;
use crate::feature::Feature;

/// Index of the cluster a point belongs to. Negative values are the two
/// sentinels below; assigned points use `0..K`.
pub type ClusterIdx = i32;

/// Membership not yet decided.
pub const MEMBER_UNKNOWN: ClusterIdx = -1;
/// Point excluded as noise; only density-style callers produce it.
pub const MEMBER_NOISE: ClusterIdx = -2;

/// N points of fixed dimensionality, stored row-major. Optional per-point
/// integer frequencies stand for weighted duplicates; optional class
/// labels feed the supervised measures and never influence a run.
/// Immutable for the lifetime of a run.
#[derive(Clone, Debug)]
pub struct Dataset<F> {
    features: Vec<F>,
    num_points: usize,
    num_dimensions: usize,
    frequencies: Option<Vec<i64>>,
    class_labels: Option<Vec<u32>>,
}

impl<F: Feature> Dataset<F> {
    /// Builds from a flat row-major buffer.
    pub fn from_flat(num_dimensions: usize, features: Vec<F>) -> Result<Self, Error> {
        if num_dimensions == 0 {
            return Err(Error::InvalidParameter("dataset dimensionality is zero"));
        }
        if features.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if features.len() % num_dimensions != 0 {
            return Err(Error::InvalidParameter(
                "flat feature buffer is not a multiple of the dimensionality",
            ));
        }
        let num_points = features.len() / num_dimensions;
        Ok(Self {
            features,
            num_points,
            num_dimensions,
            frequencies: None,
            class_labels: None,
        })
    }

    pub fn from_rows(rows: &[Vec<F>]) -> Result<Self, Error> {
        if rows.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let num_dimensions = rows[0].len();
        if rows.iter().any(|row| row.len() != num_dimensions) {
            return Err(Error::InvalidParameter("ragged dataset rows"));
        }
        let mut features = Vec::with_capacity(rows.len() * num_dimensions);
        for row in rows {
            features.extend_from_slice(row);
        }
        Self::from_flat(num_dimensions, features)
    }

    pub fn with_frequencies(mut self, frequencies: Vec<i64>) -> Result<Self, Error> {
        if frequencies.len() != self.num_points {
            return Err(Error::InvalidParameter(
                "frequency count differs from point count",
            ));
        }
        if frequencies.iter().any(|&freq| freq <= 0) {
            return Err(Error::InvalidParameter("non-positive point frequency"));
        }
        self.frequencies = Some(frequencies);
        Ok(self)
    }

    pub fn with_class_labels(mut self, class_labels: Vec<u32>) -> Result<Self, Error> {
        if class_labels.len() != self.num_points {
            return Err(Error::InvalidParameter(
                "class label count differs from point count",
            ));
        }
        self.class_labels = Some(class_labels);
        Ok(self)
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn num_dimensions(&self) -> usize {
        self.num_dimensions
    }

    pub fn point(&self, index: usize) -> &[F] {
        let start = index * self.num_dimensions;
        &self.features[start..start + self.num_dimensions]
    }

    pub fn points(&self) -> impl Iterator<Item = &[F]> {
        self.features.chunks_exact(self.num_dimensions)
    }

    /// Weight of the point; 1 unless frequencies were supplied.
    pub fn frequency(&self, index: usize) -> i64 {
        self.frequencies.as_ref().map_or(1, |freqs| freqs[index])
    }

    pub fn total_frequency(&self) -> i64 {
        self.frequencies
            .as_ref()
            .map_or(self.num_points as i64, |freqs| freqs.iter().sum())
    }

    pub fn class_labels(&self) -> Option<&[u32]> {
        self.class_labels.as_deref()
    }

    /// Per-dimension (min, max) over all points; the mutation range of the
    /// bi-directional H operator.
    pub fn feature_bounds(&self) -> (Vec<F>, Vec<F>) {
        let mut lower = vec![F::MAX_BOUND; self.num_dimensions];
        let mut upper = vec![F::MIN_BOUND; self.num_dimensions];
        for point in self.points() {
            for (dim, &value) in point.iter().enumerate() {
                if value < lower[dim] {
                    lower[dim] = value;
                }
                if value > upper[dim] {
                    upper[dim] = value;
                }
            }
        }
        (lower, upper)
    }
}
