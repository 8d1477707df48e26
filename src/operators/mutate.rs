//! Mutation operators, including the adaptive schedule and the
//! bi-directional H operator of the centroid driver.
use crate::dataset::ClusterIdx;
use crate::feature::Feature;
use crate::matrix::CrispMatrix;
use fixedbitset::FixedBitSet;
use rand::Rng;

/// Single-gene label mutation: gene j (uniform) moves to a cluster drawn
/// uniformly from the other clusters. A draw that would empty the gene's
/// old cluster is rolled back and re-attempted, capped at 100 attempts.
/// Returns the applied `(gene, old, new)` move and how many attempts were
/// rolled back (the caller adds those to its invalid-offspring count).
pub fn label_single_gene<R: Rng>(
    labels: &mut [ClusterIdx],
    num_clusters: usize,
    rng: &mut R,
) -> (Option<(usize, ClusterIdx, ClusterIdx)>, u64) {
    const MAX_ATTEMPTS: usize = 100;
    debug_assert!(num_clusters >= 2);
    let mut rollbacks = 0;
    for _ in 0..MAX_ATTEMPTS {
        let gene = rng.gen_range(0..labels.len());
        let old = labels[gene];
        let mut new = rng.gen_range(0..num_clusters as ClusterIdx - 1);
        if new >= old {
            new += 1;
        }
        let old_count = labels.iter().filter(|&&label| label == old).count();
        if old_count <= 1 {
            // the move would empty a cluster
            rollbacks += 1;
            continue;
        }
        labels[gene] = new;
        return (Some((gene, old, new)), rollbacks);
    }
    (None, rollbacks)
}

/// The adaptive per-chromosome mutation probability
/// `p(t) = p0 + (t / t_max) * (1 / string_size - p0)`, reaching exactly
/// `1 / string_size` at the final generation. `string_size` defaults to
/// the point count for label encodings; centroid encodings may configure
/// their gene count instead.
pub fn adaptive_mutation_probability(
    prob_initial: f64,
    generation: usize,
    max_generations: usize,
    string_size: usize,
) -> f64 {
    prob_initial
        + (generation as f64 / max_generations as f64)
            * (1.0 / string_size as f64 - prob_initial)
}

/// Bi-directional H mutation over a flat K x d gene string. Each gene
/// moves toward the per-dimension maximum or minimum with equal
/// probability, scaled by `delta = 1 - r^(1 - d(M))` where
/// `d(M) = (M - M_min) / (M_max - M_min)` ranks the chromosome's
/// objective within the population (0 for the best).
pub fn bi_direction_h<F: Feature, R: Rng>(
    genes: &mut [F],
    objective: f64,
    min_objective: f64,
    max_objective: f64,
    lower: &[F],
    upper: &[F],
    rng: &mut R,
) {
    let spread = max_objective - min_objective;
    let rank = if spread > 0.0 && objective.is_finite() {
        ((objective - min_objective) / spread).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dimensions = lower.len();
    for (index, gene) in genes.iter_mut().enumerate() {
        let dim = index % dimensions;
        let r: f64 = rng.gen();
        let delta = 1.0 - r.powf(1.0 - rank);
        let value = gene.as_f64();
        let mutated = if rng.gen::<bool>() {
            value + delta * (upper[dim].as_f64() - value)
        } else {
            value - delta * (value - lower[dim].as_f64())
        };
        *gene = F::from_f64_rounded(mutated);
    }
}

/// Each bit independently toggled with probability `prob`.
pub fn bit_flip<R: Rng>(bits: &mut FixedBitSet, prob: f64, rng: &mut R) {
    for position in 0..bits.len() {
        if rng.gen::<f64>() < prob {
            bits.toggle(position);
        }
    }
}

/// Moves one uniformly chosen point-column of a crisp partition to a
/// different cluster row.
pub fn crisp_column<R: Rng>(crisp: &mut CrispMatrix, rng: &mut R) {
    if crisp.num_rows() < 2 {
        return;
    }
    let column = rng.gen_range(0..crisp.num_columns());
    let current = crisp.member(column);
    let mut target = rng.gen_range(0..crisp.num_rows() - 1);
    if target >= current {
        target += 1;
    }
    crisp.set_member(column, target);
}
