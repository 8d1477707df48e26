//! Crossover operators. Children are written into reserved offspring
//! slots instead of allocating.
use crate::chromosome::label;
use crate::dataset::ClusterIdx;
use crate::matrix::CrispMatrix;
use fixedbitset::FixedBitSet;
use rand::Rng;

/// One-point crossover: `child1 = parent1[..cut] ++ parent2[cut..]` and
/// the mirror image. `cut` must be in `1..len`.
pub fn one_point<T: Copy>(
    parent1: &[T],
    parent2: &[T],
    cut: usize,
    child1: &mut [T],
    child2: &mut [T],
) {
    debug_assert!(cut >= 1 && cut < parent1.len());
    child1[..cut].copy_from_slice(&parent1[..cut]);
    child1[cut..].copy_from_slice(&parent2[cut..]);
    child2[..cut].copy_from_slice(&parent2[..cut]);
    child2[cut..].copy_from_slice(&parent1[cut..]);
}

/// One-point label crossover with validity repair: fresh cut points are
/// drawn until both children cover every cluster, capped at 100 attempts.
/// A child still invalid afterwards becomes a copy of one of its parents,
/// chosen uniformly. Returns how many children fell back to a parent
/// copy.
pub fn label_one_point_repaired<R: Rng>(
    parent1: &[ClusterIdx],
    parent2: &[ClusterIdx],
    child1: &mut [ClusterIdx],
    child2: &mut [ClusterIdx],
    num_clusters: usize,
    rng: &mut R,
) -> u64 {
    const MAX_ATTEMPTS: usize = 100;
    let len = parent1.len();
    for _ in 0..MAX_ATTEMPTS {
        let cut = rng.gen_range(1..len);
        one_point(parent1, parent2, cut, child1, child2);
        if label::covers_all_clusters(child1, num_clusters)
            && label::covers_all_clusters(child2, num_clusters)
        {
            return 0;
        }
    }
    let mut fallbacks = 0;
    if !label::covers_all_clusters(child1, num_clusters) {
        let parent = if rng.gen::<bool>() { parent1 } else { parent2 };
        child1.copy_from_slice(parent);
        fallbacks += 1;
    }
    if !label::covers_all_clusters(child2, num_clusters) {
        let parent = if rng.gen::<bool>() { parent1 } else { parent2 };
        child2.copy_from_slice(parent);
        fallbacks += 1;
    }
    fallbacks
}

/// Uniform crossover over bitmasks: every position where the parents
/// disagree swaps with probability `prob_swap`.
pub fn uniform_bits<R: Rng>(
    a: &mut FixedBitSet,
    b: &mut FixedBitSet,
    prob_swap: f64,
    rng: &mut R,
) {
    debug_assert_eq!(a.len(), b.len());
    for position in 0..a.len() {
        let bit_a = a.contains(position);
        let bit_b = b.contains(position);
        if bit_a != bit_b && rng.gen::<f64>() < prob_swap {
            a.set(position, bit_b);
            b.set(position, bit_a);
        }
    }
}

/// Two-point column-interval crossover between crisp partitions. The cut
/// pair is drawn uniformly from the word-aligned positions (plus the end
/// boundary), so the swap moves whole blocks.
pub fn two_point_columns_aligned<R: Rng>(a: &mut CrispMatrix, b: &mut CrispMatrix, rng: &mut R) {
    let mut cuts: Vec<usize> = a.aligned_columns().collect();
    cuts.push(a.num_columns());
    if cuts.len() < 2 {
        return;
    }
    let first = rng.gen_range(0..cuts.len());
    let second = rng.gen_range(0..cuts.len());
    if first == second {
        return;
    }
    let (lo, hi) = (cuts[first.min(second)], cuts[first.max(second)]);
    a.swap_columns_aligned(b, lo, hi);
}
