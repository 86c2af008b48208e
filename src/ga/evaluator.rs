//! Memoized, parallel fitness evaluation.

use crate::cache::FitnessCache;
use crate::geometry::DistanceMatrix;
use crate::tour::Tour;
use rayon::prelude::*;

/// Assigns a length to every tour in a population, consulting the shared
/// [`FitnessCache`] first and filling it on a miss.
///
/// In parallel mode the population is split across the rayon thread pool
/// (one worker per available core). Each worker has exclusive access to
/// the slots it was handed, so the only shared state is the cache.
/// [`evaluate`](Self::evaluate) returns once every slot is done.
pub struct PopulationEvaluator<'a> {
    matrix: &'a DistanceMatrix,
    cache: &'a FitnessCache,
    parallel: bool,
}

impl<'a> PopulationEvaluator<'a> {
    pub fn new(matrix: &'a DistanceMatrix, cache: &'a FitnessCache) -> Self {
        Self {
            matrix,
            cache,
            parallel: true,
        }
    }

    /// Enables or disables the thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evaluates every tour and returns how many lengths came from the cache.
    pub fn evaluate(&self, population: &mut [Tour]) -> usize {
        if self.parallel {
            population
                .par_iter_mut()
                .map(|tour| usize::from(self.evaluate_one(tour)))
                .sum()
        } else {
            population
                .iter_mut()
                .map(|tour| usize::from(self.evaluate_one(tour)))
                .sum()
        }
    }

    /// Returns `true` on a cache hit.
    fn evaluate_one(&self, tour: &mut Tour) -> bool {
        let key = tour.key();
        if let Some(length) = self.cache.get(&key) {
            tour.set_length(length);
            return true;
        }
        let length = tour.closed_length(self.matrix);
        self.cache.put(key, length);
        tour.set_length(length);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::random::create_rng;

    fn random_points(n: usize, seed: u64) -> Vec<Point> {
        use rand::Rng;
        let mut rng = create_rng(seed);
        (0..n)
            .map(|_| Point::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect()
    }

    #[test]
    fn test_matches_direct_sum() {
        let dm = DistanceMatrix::from_points(&random_points(25, 1));
        let cache = FitnessCache::new(1000);
        let mut rng = create_rng(2);
        let mut pop: Vec<Tour> = (0..64).map(|_| Tour::random(25, &mut rng)).collect();

        PopulationEvaluator::new(&dm, &cache).evaluate(&mut pop);

        for tour in &pop {
            assert!(tour.is_evaluated());
            assert!((tour.length() - tour.closed_length(&dm)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_second_pass_hits_cache() {
        let dm = DistanceMatrix::from_points(&random_points(12, 3));
        let cache = FitnessCache::new(1000);
        let mut rng = create_rng(4);
        let mut pop: Vec<Tour> = (0..40).map(|_| Tour::random(12, &mut rng)).collect();
        let evaluator = PopulationEvaluator::new(&dm, &cache);

        evaluator.evaluate(&mut pop);
        let first = cache.len();
        let hits = evaluator.evaluate(&mut pop);

        assert_eq!(hits, pop.len());
        assert_eq!(cache.len(), first);
    }

    #[test]
    fn test_cleared_cache_reproduces_lengths() {
        let dm = DistanceMatrix::from_points(&random_points(15, 5));
        let cache = FitnessCache::new(1000);
        let mut rng = create_rng(6);
        let mut pop: Vec<Tour> = (0..30).map(|_| Tour::random(15, &mut rng)).collect();
        let evaluator = PopulationEvaluator::new(&dm, &cache);

        evaluator.evaluate(&mut pop);
        let before: Vec<f64> = pop.iter().map(Tour::length).collect();

        cache.clear();
        let mut again: Vec<Tour> = pop.iter().map(|t| Tour::new(t.path().to_vec())).collect();
        let hits = evaluator.evaluate(&mut again);

        let after: Vec<f64> = again.iter().map(Tour::length).collect();
        assert_eq!(before, after);
        assert!(hits < again.len(), "a cleared cache cannot serve every tour");
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let dm = DistanceMatrix::from_points(&random_points(30, 7));
        let mut rng = create_rng(8);
        let template: Vec<Tour> = (0..200).map(|_| Tour::random(30, &mut rng)).collect();

        let mut par = template.clone();
        let mut seq = template;
        let par_cache = FitnessCache::new(500);
        let seq_cache = FitnessCache::new(500);
        PopulationEvaluator::new(&dm, &par_cache).evaluate(&mut par);
        PopulationEvaluator::new(&dm, &seq_cache)
            .with_parallel(false)
            .evaluate(&mut seq);

        for (a, b) in par.iter().zip(&seq) {
            assert_eq!(a.length(), b.length());
        }
    }

    #[test]
    fn test_duplicates_share_one_entry() {
        let dm = DistanceMatrix::from_points(&random_points(6, 9));
        let cache = FitnessCache::new(100);
        let mut pop = vec![Tour::new(vec![1, 2, 3, 4, 5]); 10];

        let hits = PopulationEvaluator::new(&dm, &cache)
            .with_parallel(false)
            .evaluate(&mut pop);

        assert_eq!(cache.len(), 1);
        assert_eq!(hits, 9);
    }

    #[test]
    fn test_small_cache_still_correct() {
        let dm = DistanceMatrix::from_points(&random_points(10, 10));
        let cache = FitnessCache::new(2);
        let mut rng = create_rng(11);
        let mut pop: Vec<Tour> = (0..50).map(|_| Tour::random(10, &mut rng)).collect();

        PopulationEvaluator::new(&dm, &cache).evaluate(&mut pop);

        assert!(cache.len() <= 2);
        for tour in &pop {
            assert!((tour.length() - tour.closed_length(&dm)).abs() < 1e-9);
        }
    }
}
