//! Label chromosome with incremental evaluation state, the workhorse of
//! the FGKA/IGKA driver.
//!
//! Mutations are staged into a (delta-sum, delta-count, changed-mask)
//! accumulator; one [incremental_update](IgkaChromosome::incremental_update)
//! per generation commits the deltas and touches only the clusters whose
//! membership moved: their centroids, their within-cluster variation, and
//! the per-instance cached distance extrema. An emptied cluster's centroid
//! row is nulled until a point moves back in; nearest/farthest scans skip
//! null rows.
use crate::dataset::{ClusterIdx, Dataset};
use crate::distance::DistanceKind;
use crate::feature::Feature;
use crate::matrix::{MatrixRow, MatrixWithRowNull};
use crate::population::Scored;
use crate::vector_ops;

#[derive(Clone, Debug)]
pub struct IgkaChromosome<F: Feature> {
    labels: Vec<ClusterIdx>,
    sums: MatrixRow<F::Sum>,
    counts: Vec<i64>,
    centroids: MatrixWithRowNull<F>,
    wcv: Vec<f64>,
    twcv: f64,
    valid: bool,
    delta_sums: MatrixRow<F::Sum>,
    delta_counts: Vec<i64>,
    changed: Vec<bool>,
    nearest: Vec<ClusterIdx>,
    nearest_dist: Vec<f64>,
    farthest: Vec<ClusterIdx>,
    farthest_dist: Vec<f64>,
}

impl<F: Feature> IgkaChromosome<F> {
    pub fn new(
        labels: Vec<ClusterIdx>,
        num_clusters: usize,
        dataset: &Dataset<F>,
        dist: &DistanceKind,
    ) -> Self {
        let num_points = dataset.num_points();
        let num_dimensions = dataset.num_dimensions();
        let mut chromosome = Self {
            labels,
            sums: MatrixRow::new(num_clusters, num_dimensions),
            counts: vec![0; num_clusters],
            centroids: MatrixWithRowNull::new(num_clusters, num_dimensions),
            wcv: vec![0.0; num_clusters],
            twcv: 0.0,
            valid: false,
            delta_sums: MatrixRow::new(num_clusters, num_dimensions),
            delta_counts: vec![0; num_clusters],
            changed: vec![false; num_clusters],
            nearest: vec![crate::dataset::MEMBER_UNKNOWN; num_points],
            nearest_dist: vec![f64::INFINITY; num_points],
            farthest: vec![crate::dataset::MEMBER_UNKNOWN; num_points],
            farthest_dist: vec![f64::NEG_INFINITY; num_points],
        };
        chromosome.evaluate_from_scratch(dataset, dist);
        chromosome
    }

    pub fn num_clusters(&self) -> usize {
        self.counts.len()
    }
    pub fn labels(&self) -> &[ClusterIdx] {
        &self.labels
    }
    pub fn label(&self, point: usize) -> ClusterIdx {
        self.labels[point]
    }
    pub fn count(&self, cluster: usize) -> i64 {
        self.counts[cluster]
    }
    pub fn sum_row(&self, cluster: usize) -> &[F::Sum] {
        self.sums.row(cluster)
    }
    pub fn centroids(&self) -> &MatrixWithRowNull<F> {
        &self.centroids
    }
    pub fn wcv(&self) -> &[f64] {
        &self.wcv
    }
    pub fn twcv(&self) -> f64 {
        self.twcv
    }
    /// Cached nearest cluster of a point, the K-means-operator target.
    pub fn nearest(&self, point: usize) -> ClusterIdx {
        self.nearest[point]
    }
    pub fn nearest_dist(&self, point: usize) -> f64 {
        self.nearest_dist[point]
    }
    /// Cached farthest-cluster distance, the normalizer of the
    /// distance-guided allele choice.
    pub fn farthest_dist(&self, point: usize) -> f64 {
        self.farthest_dist[point]
    }

    /// Full evaluation; also the reference the incremental path must
    /// agree with.
    pub fn evaluate_from_scratch(&mut self, dataset: &Dataset<F>, dist: &DistanceKind) {
        let num_clusters = self.num_clusters();
        for cluster in 0..num_clusters {
            vector_ops::fill(self.sums.row_mut(cluster), F::Sum::default());
            vector_ops::fill(self.delta_sums.row_mut(cluster), F::Sum::default());
        }
        vector_ops::fill(&mut self.counts, 0);
        vector_ops::fill(&mut self.delta_counts, 0);
        vector_ops::fill(&mut self.changed, false);

        for (point, &label) in self.labels.iter().enumerate() {
            debug_assert!(label >= 0);
            let cluster = label as usize;
            vector_ops::axpy_widened::<F>(
                self.sums.row_mut(cluster),
                dataset.frequency(point),
                dataset.point(point),
            );
            self.counts[cluster] += dataset.frequency(point);
        }
        self.refresh_centroids(0..num_clusters);

        vector_ops::fill(&mut self.wcv, 0.0);
        for (point, &label) in self.labels.iter().enumerate() {
            let cluster = label as usize;
            if let Some(centroid) = self.centroids.try_row(cluster) {
                self.wcv[cluster] += dataset.frequency(point) as f64
                    * dist.squared(dataset.point(point), centroid);
            }
        }
        self.twcv = vector_ops::sum(&self.wcv);
        self.valid = self.counts.iter().all(|&count| count > 0);

        for point in 0..dataset.num_points() {
            self.rescan_extrema(point, dataset, dist);
        }
    }

    /// Stages the move of `point` to `to_cluster` without recomputing
    /// anything. The gene changes immediately; the statistics catch up at
    /// the next [incremental_update](IgkaChromosome::incremental_update).
    pub fn accumulate_update(&mut self, point: usize, to_cluster: ClusterIdx, dataset: &Dataset<F>) {
        let from = self.labels[point];
        if from == to_cluster {
            return;
        }
        debug_assert!(from >= 0 && to_cluster >= 0);
        let frequency = dataset.frequency(point);
        let features = dataset.point(point);
        let from = from as usize;
        let to = to_cluster as usize;
        vector_ops::axpy_widened::<F>(self.delta_sums.row_mut(from), -frequency, features);
        self.delta_counts[from] -= frequency;
        self.changed[from] = true;
        vector_ops::axpy_widened::<F>(self.delta_sums.row_mut(to), frequency, features);
        self.delta_counts[to] += frequency;
        self.changed[to] = true;
        self.labels[point] = to_cluster;
    }

    /// Commits every staged move: cluster sums and counts, centroids of
    /// changed clusters (nulling emptied ones), their within-cluster
    /// variation, the total, and the per-instance distance extrema. Points
    /// rescan all clusters only when a previous extremum sat at a changed
    /// cluster.
    pub fn incremental_update(&mut self, dataset: &Dataset<F>, dist: &DistanceKind) {
        let changed_clusters: Vec<usize> = (0..self.num_clusters())
            .filter(|&cluster| self.changed[cluster])
            .collect();
        if changed_clusters.is_empty() {
            return;
        }

        for &cluster in &changed_clusters {
            for dim in 0..self.sums.num_columns() {
                let delta = self.delta_sums.get(cluster, dim);
                let sums = self.sums.row_mut(cluster);
                F::sum_add(&mut sums[dim], delta);
            }
            vector_ops::fill(self.delta_sums.row_mut(cluster), F::Sum::default());
            self.counts[cluster] += self.delta_counts[cluster];
            self.delta_counts[cluster] = 0;
        }
        self.refresh_centroids(changed_clusters.iter().copied());

        let mut twcv_delta = 0.0;
        for &cluster in &changed_clusters {
            twcv_delta -= self.wcv[cluster];
            self.wcv[cluster] = 0.0;
        }
        for (point, &label) in self.labels.iter().enumerate() {
            let cluster = label as usize;
            if !self.changed[cluster] {
                continue;
            }
            if let Some(centroid) = self.centroids.try_row(cluster) {
                self.wcv[cluster] += dataset.frequency(point) as f64
                    * dist.squared(dataset.point(point), centroid);
            }
        }
        for &cluster in &changed_clusters {
            twcv_delta += self.wcv[cluster];
        }
        self.twcv += twcv_delta;
        self.valid = self.counts.iter().all(|&count| count > 0);

        for point in 0..dataset.num_points() {
            let stale_min =
                self.nearest[point] < 0 || self.changed[self.nearest[point] as usize];
            let stale_max =
                self.farthest[point] < 0 || self.changed[self.farthest[point] as usize];
            if stale_min || stale_max {
                self.rescan_extrema(point, dataset, dist);
            } else {
                let features = dataset.point(point);
                for &cluster in &changed_clusters {
                    if let Some(centroid) = self.centroids.try_row(cluster) {
                        let d = dist.dist(features, centroid);
                        if d < self.nearest_dist[point] {
                            self.nearest[point] = cluster as ClusterIdx;
                            self.nearest_dist[point] = d;
                        }
                        if d > self.farthest_dist[point] {
                            self.farthest[point] = cluster as ClusterIdx;
                            self.farthest_dist[point] = d;
                        }
                    }
                }
            }
        }

        vector_ops::fill(&mut self.changed, false);
    }

    fn refresh_centroids<I: IntoIterator<Item = usize>>(&mut self, clusters: I) {
        let mut centroid = vec![F::ZERO; self.sums.num_columns()];
        for cluster in clusters {
            let count = self.counts[cluster];
            if count > 0 {
                for (value, &sum) in centroid.iter_mut().zip(self.sums.row(cluster)) {
                    *value = F::mean(sum, count);
                }
                self.centroids.set_row(cluster, &centroid);
            } else {
                self.centroids.null_row(cluster);
            }
        }
    }

    fn rescan_extrema(&mut self, point: usize, dataset: &Dataset<F>, dist: &DistanceKind) {
        let features = dataset.point(point);
        let mut nearest = crate::dataset::MEMBER_UNKNOWN;
        let mut nearest_dist = f64::INFINITY;
        let mut farthest = crate::dataset::MEMBER_UNKNOWN;
        let mut farthest_dist = f64::NEG_INFINITY;
        for cluster in 0..self.num_clusters() {
            let Some(centroid) = self.centroids.try_row(cluster) else {
                continue;
            };
            let d = dist.dist(features, centroid);
            if d < nearest_dist {
                nearest = cluster as ClusterIdx;
                nearest_dist = d;
            }
            if d > farthest_dist {
                farthest = cluster as ClusterIdx;
                farthest_dist = d;
            }
        }
        self.nearest[point] = nearest;
        self.nearest_dist[point] = nearest_dist;
        self.farthest[point] = farthest;
        self.farthest_dist[point] = farthest_dist;
    }
}

impl<F: Feature> Scored for IgkaChromosome<F> {
    fn objective(&self) -> f64 {
        if self.valid {
            self.twcv
        } else {
            f64::INFINITY
        }
    }
    fn fitness(&self) -> f64 {
        if self.valid {
            1.0 / self.twcv
        } else {
            f64::NEG_INFINITY
        }
    }
    fn is_valid(&self) -> bool {
        self.valid
    }
}
