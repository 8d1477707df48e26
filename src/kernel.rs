//! The nearest-neighbor / clustering kernel: assignment loops, centroid
//! recomputation, empty-cluster repair and the pairwise-nearest-neighbor
//! merge engine.
mod assign;
mod pnn;

pub use self::assign::{
    assign_all, fill_empty, kmeans, nearest_centroid, reassign, recompute_centroids, sse,
};
pub use self::pnn::{merge_cost, pnn_fast, pnn_merge, remove_empty_clusters};
