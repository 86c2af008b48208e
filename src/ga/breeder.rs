//! Offspring generation that steers away from already-scored tours.
//!
//! The fitness cache doubles as a set of known tours. [`Breeder`] keeps
//! retrying crossover and mutation while their output is already in that
//! set, within the bounds of a [`DuplicateAvoidance`] policy. A collision
//! that survives every retry is accepted as is.

use super::config::DuplicateAvoidance;
use super::operators::{crossover, mutate};
use crate::cache::FitnessCache;
use crate::tour::Tour;
use rand::Rng;
use tracing::trace;

/// Duplicate-avoiding wrapper around [`crossover`] and [`mutate`].
///
/// The cache is only probed for membership here. Lengths are assigned
/// later by the evaluator.
pub struct Breeder<'a> {
    cache: &'a FitnessCache,
    policy: DuplicateAvoidance,
}

impl<'a> Breeder<'a> {
    pub fn new(cache: &'a FitnessCache, policy: DuplicateAvoidance) -> Self {
        Self { cache, policy }
    }

    fn is_known(&self, tour: &Tour) -> bool {
        self.cache.get(&tour.key()).is_some()
    }

    /// Returns the first crossover pair in which neither child is known.
    ///
    /// After `crossover_attempts` colliding pairs, one more crossover is
    /// returned unchecked.
    pub fn crossover<R: Rng>(&self, parent1: &Tour, parent2: &Tour, rng: &mut R) -> (Tour, Tour) {
        for _ in 0..self.policy.crossover_attempts {
            let (c1, c2) = crossover(parent1, parent2, rng);
            if !self.is_known(&c1) && !self.is_known(&c2) {
                return (c1, c2);
            }
        }
        trace!(
            attempts = self.policy.crossover_attempts,
            "crossover kept colliding, accepting duplicate"
        );
        crossover(parent1, parent2, rng)
    }

    /// Returns the first mutation of `tour` that is not known.
    ///
    /// Each attempt starts from `tour` itself. After a collision the rate
    /// for the next attempt is multiplied by `escalation`. Once the attempts
    /// run out, one more mutation at the original `rate` is returned
    /// unchecked.
    pub fn mutate<R: Rng>(&self, tour: &Tour, rate: f64, rng: &mut R) -> Tour {
        let mut effective = rate;
        for _ in 0..self.policy.mutation_attempts {
            let candidate = mutate(tour, effective, rng);
            if !self.is_known(&candidate) {
                return candidate;
            }
            effective *= self.policy.escalation;
        }
        trace!(
            attempts = self.policy.mutation_attempts,
            final_rate = effective,
            "mutation kept colliding, falling back to base rate"
        );
        mutate(tour, rate, rng)
    }
}
