#[allow(unused_imports)]
pub use genetic_clustering::prelude::*;
#[allow(unused_imports)]
pub use rand::rngs::SmallRng;
#[allow(unused_imports)]
pub use rand::{Rng, SeedableRng};

/// Two well-separated groups on a line; the toy scenario of the label
/// driver tests. Optimal 2-partition SSE is 4.0.
#[allow(dead_code)]
pub fn line_dataset() -> Dataset<f64> {
    Dataset::from_rows(&[
        vec![1.0],
        vec![2.0],
        vec![3.0],
        vec![10.0],
        vec![11.0],
        vec![12.0],
    ])
    .unwrap()
}

/// Deterministic well-separated blobs: `num_blobs` groups of
/// `points_per_blob` points in `dims` dimensions, blob b centered at
/// `b * spacing` in every coordinate, jittered uniformly in
/// `[-jitter, jitter]`.
#[allow(dead_code)]
pub fn blob_dataset(
    num_blobs: usize,
    points_per_blob: usize,
    dims: usize,
    spacing: f64,
    jitter: f64,
    seed: u64,
) -> Dataset<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(num_blobs * points_per_blob);
    for blob in 0..num_blobs {
        let center = blob as f64 * spacing;
        for _ in 0..points_per_blob {
            let row: Vec<f64> = (0..dims)
                .map(|_| center + rng.gen_range(-jitter..=jitter))
                .collect();
            rows.push(row);
        }
    }
    Dataset::from_rows(&rows).unwrap()
}

/// Which blob a point of [blob_dataset] belongs to, by construction.
#[allow(dead_code)]
pub fn blob_of(point: usize, points_per_blob: usize) -> usize {
    point / points_per_blob
}
