//! Supervised evaluation of a clustering against known class labels.
//!
//! Only consulted when the dataset carries class labels; no driver reads
//! these measures.
use crate::dataset::ClusterIdx;
use crate::matrix::MatrixRow;

/// Contingency table between class labels (rows) and cluster labels
/// (columns). Unassigned points (negative cluster index) are dropped.
#[derive(Clone, Debug)]
pub struct MatchingMatrix {
    counts: MatrixRow<u64>,
    total: u64,
}

impl MatchingMatrix {
    pub fn from_labels(class_labels: &[u32], cluster_labels: &[ClusterIdx]) -> Self {
        assert_eq!(class_labels.len(), cluster_labels.len());
        let num_classes = class_labels.iter().map(|&c| c as usize + 1).max().unwrap_or(0);
        let num_clusters = cluster_labels
            .iter()
            .filter(|&&k| k >= 0)
            .map(|&k| k as usize + 1)
            .max()
            .unwrap_or(0);
        let mut counts = MatrixRow::new(num_classes, num_clusters);
        let mut total = 0;
        for (&class, &cluster) in class_labels.iter().zip(cluster_labels) {
            if cluster >= 0 {
                let value = counts.get(class as usize, cluster as usize) + 1;
                counts.set(class as usize, cluster as usize, value);
                total += 1;
            }
        }
        Self { counts, total }
    }

    pub fn num_classes(&self) -> usize {
        self.counts.num_rows()
    }
    pub fn num_clusters(&self) -> usize {
        self.counts.num_columns()
    }
    pub fn get(&self, class: usize, cluster: usize) -> u64 {
        self.counts.get(class, cluster)
    }
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Rand index: the fraction of point pairs on which class and cluster
    /// structure agree. 1.0 for a perfect match; 1.0 by convention for
    /// fewer than two points.
    pub fn rand_index(&self) -> f64 {
        fn pairs(n: u64) -> f64 {
            (n * n.saturating_sub(1)) as f64 / 2.0
        }
        let all_pairs = pairs(self.total);
        if all_pairs == 0.0 {
            return 1.0;
        }
        let mut cell_pairs = 0.0;
        for class in 0..self.num_classes() {
            for cluster in 0..self.num_clusters() {
                cell_pairs += pairs(self.counts.get(class, cluster));
            }
        }
        let mut row_pairs = 0.0;
        for class in 0..self.num_classes() {
            let row_total: u64 = (0..self.num_clusters())
                .map(|cluster| self.counts.get(class, cluster))
                .sum();
            row_pairs += pairs(row_total);
        }
        let mut column_pairs = 0.0;
        for cluster in 0..self.num_clusters() {
            let column_total: u64 = (0..self.num_classes())
                .map(|class| self.counts.get(class, cluster))
                .sum();
            column_pairs += pairs(column_total);
        }
        (all_pairs + 2.0 * cell_pairs - row_pairs - column_pairs) / all_pairs
    }

    /// Fraction of points sitting in their cluster's majority class.
    pub fn purity(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let mut majority_total = 0;
        for cluster in 0..self.num_clusters() {
            let majority = (0..self.num_classes())
                .map(|class| self.counts.get(class, cluster))
                .max()
                .unwrap_or(0);
            majority_total += majority;
        }
        majority_total as f64 / self.total as f64
    }
}
