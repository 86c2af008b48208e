//! Seeded random number generation.
//!
//! Every stochastic component in the crate takes `&mut R where R: Rng`
//! so a single generator can be threaded through the whole run.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator seeded from OS entropy.
pub fn entropy_rng() -> StdRng {
    create_rng(rand::random())
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
