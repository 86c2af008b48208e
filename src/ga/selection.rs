//! Tournament selection.
//!
//! Assumes **minimization**: the shortest tour wins.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::tour::Tour;
use rand::Rng;

/// Draws `k` tours uniformly at random (with replacement) and returns the
/// index of the shortest.
///
/// `k = 0` is treated as 1. Ties keep the earliest draw.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[Tour], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].length() < population[best_idx].length() {
            best_idx = idx;
        }
    }
    best_idx
}
