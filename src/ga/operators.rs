//! Permutation crossover and mutation for tours.
//!
//! The slice-level functions ([`order_crossover`], [`swap_mutation`]) work
//! on any permutation of distinct `usize` values. The tour-level wrappers
//! ([`crossover`], [`mutate`]) always return new [`Tour`] values and never
//! alias their inputs.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"

use crate::tour::Tour;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Order Crossover (OX) for permutations.
///
/// # Algorithm
///
/// 1. Pick cut points `a <= b` uniformly over the sequence
/// 2. Child1 copies `parent1[a..=b]` into the same positions
/// 3. Remaining slots are filled starting at `(b + 1) % n`, wrapping, with
///    parent2's cities in parent2's order (from its first element),
///    skipping cities already placed
/// 4. Child2 is built the same way with the parents swapped
///
/// Sequences of length 0 or 1 are returned as copies.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if parents have different lengths.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");

    if n < 2 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = random_segment(n, rng);

    let child1 = ox_build_child(parent1, parent2, start, end);
    let child2 = ox_build_child(parent2, parent1, start, end);

    (child1, child2)
}

/// Build one OX child: copy segment from `template`, fill from `donor`.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let bound = template.iter().copied().max().map_or(0, |m| m + 1);
    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; bound];

    for i in start..=end {
        child[i] = template[i];
        used[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for &city in donor {
        if !used[city] {
            child[pos] = city;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Order crossover on two tours. Children are unevaluated.
pub fn crossover<R: Rng>(parent1: &Tour, parent2: &Tour, rng: &mut R) -> (Tour, Tour) {
    let (c1, c2) = order_crossover(parent1.path(), parent2.path(), rng);
    (Tour::new(c1), Tour::new(c2))
}

// ============================================================================
// Mutation
// ============================================================================

/// Performs 1–3 random pairwise position swaps.
///
/// A swap may pick the same position twice, leaving it unchanged.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let swaps = rng.random_range(1..=3);
    for _ in 0..swaps {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        perm.swap(i, j);
    }
}

/// With probability `rate`, returns a swap-mutated copy of `tour` whose
/// length must be re-evaluated. Otherwise returns an identical copy,
/// length included.
///
/// Rates at or above 1.0 always mutate.
pub fn mutate<R: Rng>(tour: &Tour, rate: f64, rng: &mut R) -> Tour {
    if rng.random::<f64>() >= rate {
        return tour.clone();
    }
    let mut child = tour.clone();
    swap_mutation(child.path_mut(), rng);
    child.invalidate();
    child
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
