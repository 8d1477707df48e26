//! Fuzzy c-means partition-matrix and centroid updates.
//!
//! Shared with the matrix and distance layers but not part of the
//! evolutionary core; drivers stay crisp. The membership update consumes
//! squared dissimilarities, the natural input because the exponent
//! `1 / (m - 1)` is exactly 1 at the common fuzziness m = 2.
use crate::dataset::Dataset;
use crate::feature::Feature;
use crate::matrix::MatrixRow;

/// `u_ji = 1 / sum_l (d_ji / d_li)^(1 / (m - 1))` columnwise over a K x N
/// squared-distance table. A point sitting exactly on one or more
/// centroids splits its membership evenly over those.
pub fn update_membership(
    membership: &mut MatrixRow<f64>,
    squared_distances: &MatrixRow<f64>,
    fuzziness: f64,
) {
    debug_assert!(fuzziness > 1.0);
    debug_assert_eq!(membership.num_rows(), squared_distances.num_rows());
    debug_assert_eq!(membership.num_columns(), squared_distances.num_columns());
    let num_clusters = membership.num_rows();
    let num_points = membership.num_columns();
    let exponent = 1.0 / (fuzziness - 1.0);

    for point in 0..num_points {
        let coincident = (0..num_clusters)
            .filter(|&cluster| squared_distances.get(cluster, point) == 0.0)
            .count();
        if coincident > 0 {
            let share = 1.0 / coincident as f64;
            for cluster in 0..num_clusters {
                let value = if squared_distances.get(cluster, point) == 0.0 {
                    share
                } else {
                    0.0
                };
                membership.set(cluster, point, value);
            }
            continue;
        }
        for cluster in 0..num_clusters {
            let own = squared_distances.get(cluster, point);
            let mut denominator = 0.0;
            for other in 0..num_clusters {
                denominator += (own / squared_distances.get(other, point)).powf(exponent);
            }
            membership.set(cluster, point, 1.0 / denominator);
        }
    }
}

/// Fuzzy centroid update: `c_j = sum_i u_ji^m x_i / sum_i u_ji^m`,
/// rounded for integer features.
pub fn weighted_centroids<F: Feature>(
    centroids: &mut MatrixRow<F>,
    membership: &MatrixRow<f64>,
    dataset: &Dataset<F>,
    fuzziness: f64,
) {
    debug_assert_eq!(centroids.num_rows(), membership.num_rows());
    debug_assert_eq!(membership.num_columns(), dataset.num_points());
    let num_dimensions = dataset.num_dimensions();
    let mut accumulator = vec![0.0; num_dimensions];
    for cluster in 0..centroids.num_rows() {
        accumulator.iter_mut().for_each(|value| *value = 0.0);
        let mut weight_total = 0.0;
        for point in 0..dataset.num_points() {
            let weight =
                membership.get(cluster, point).powf(fuzziness) * dataset.frequency(point) as f64;
            weight_total += weight;
            for (acc, &value) in accumulator.iter_mut().zip(dataset.point(point)) {
                *acc += weight * value.as_f64();
            }
        }
        if weight_total > 0.0 {
            for (value, &acc) in centroids.row_mut(cluster).iter_mut().zip(&accumulator) {
                *value = F::from_f64_rounded(acc / weight_total);
            }
        }
    }
}
