//! Variable-K codebook encoding: a resizable centroid matrix plus the
//! linked partition it induces, tagged with which side is currently
//! optimal with respect to the other.
use crate::feature::Feature;
use crate::matrix::ResizableMatrix;
use crate::partition::PartitionLinkedStats;

/// Which of the two coupled halves of a codebook is known optimal given
/// the other: the centroids w.r.t. the partition (CB), the partition
/// w.r.t. the centroids (PA), both, or neither.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Optimality {
    #[default]
    None,
    Centroids,
    Partition,
    Both,
}

impl Optimality {
    /// Centroids were just recomputed as the partition means; whatever
    /// partition-optimality held against the old centroids is gone.
    pub fn after_centroid_update(self) -> Self {
        Optimality::Centroids
    }

    /// Points were just reassigned to their nearest centroid.
    pub fn after_partition_update(self) -> Self {
        Optimality::Partition
    }

    /// A reassignment pass moved nothing: a Lloyd fixed point, both
    /// halves optimal at once.
    pub fn at_fixed_point(self) -> Self {
        Optimality::Both
    }

    pub fn centroids_optimal(self) -> bool {
        matches!(self, Optimality::Centroids | Optimality::Both)
    }

    pub fn partition_optimal(self) -> bool {
        matches!(self, Optimality::Partition | Optimality::Both)
    }
}

#[derive(Clone, Debug)]
pub struct Codebook<F: Feature> {
    pub centroids: ResizableMatrix<F>,
    pub partition: PartitionLinkedStats<F>,
    pub optimality: Optimality,
}

impl<F: Feature> Codebook<F> {
    pub fn new(centroids: ResizableMatrix<F>, partition: PartitionLinkedStats<F>) -> Self {
        Self {
            centroids,
            partition,
            optimality: Optimality::None,
        }
    }

    pub fn num_clusters(&self) -> usize {
        self.centroids.num_rows()
    }

    /// A codebook is structurally valid when every cluster owns a point
    /// and K sits inside the configured band.
    pub fn is_valid(&self, k_min: usize, k_max: usize) -> bool {
        let k = self.num_clusters();
        k >= k_min
            && k <= k_max
            && (0..k).all(|cluster| self.partition.count(cluster) > 0)
    }
}
