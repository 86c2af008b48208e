//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → sort → elitism → selection → breeding →
//! evaluation → repeat.

use super::breeder::Breeder;
use super::config::GaConfig;
use super::evaluator::PopulationEvaluator;
use super::selection::tournament;
use crate::cache::{CacheStats, FitnessCache};
use crate::error::{Result, TspError};
use crate::geometry::DistanceMatrix;
use crate::random::{create_rng, entropy_rng};
use crate::tour::Tour;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The shortest tour seen during the entire run.
    pub best: Tour,

    /// Length of `best` (same as `best.length()`).
    pub best_length: f64,

    /// Number of generations completed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best length after the initial evaluation and after each generation.
    pub best_history: Vec<f64>,

    /// Fitness cache counters at the end of the run.
    pub cache_stats: CacheStats,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use tsp_evolve::ga::{GaConfig, GaRunner};
/// use tsp_evolve::geometry::{DistanceMatrix, Point};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let matrix = DistanceMatrix::from_points(&points);
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_elite_count(2)
///     .with_seed(42);
///
/// let result = GaRunner::run(&matrix, &config).unwrap();
/// assert!((result.best_length - 4.0).abs() < 1e-9);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA with a generator built from `config.seed`.
    ///
    /// # Errors
    /// [`TspError::Config`] for an invalid configuration and
    /// [`TspError::NoCities`] for an empty matrix. Both are reported
    /// before any work is done.
    pub fn run(matrix: &DistanceMatrix, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked between generations. When it is set, the run
    /// stops and returns the best tour found so far.
    pub fn run_with_cancel(
        matrix: &DistanceMatrix,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        };
        Self::run_with_rng(matrix, config, &mut rng, cancel)
    }

    /// Runs the GA drawing every random decision from `rng`.
    pub fn run_with_rng<R: Rng>(
        matrix: &DistanceMatrix,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        config.validate()?;
        if matrix.is_empty() {
            return Err(TspError::NoCities);
        }

        let num_cities = matrix.len();
        let cache = FitnessCache::new(config.cache_capacity);
        let evaluator = PopulationEvaluator::new(matrix, &cache).with_parallel(config.parallel);
        let breeder = Breeder::new(&cache, config.duplicate_avoidance);

        info!(
            event = "run_start",
            cities = num_cities,
            population = config.population_size,
            generations = config.max_generations,
            parallel = config.parallel,
        );

        // 1. Initialize and evaluate population
        let mut population: Vec<Tour> = (0..config.population_size)
            .map(|_| Tour::random(num_cities, rng))
            .collect();
        evaluator.evaluate(&mut population);

        // 2. Track best
        let mut best = find_best(&population)
            .ok_or_else(|| TspError::Config("population_size must be at least 1".into()))?
            .clone();
        let mut best_history = Vec::with_capacity(config.max_generations + 1);
        best_history.push(best.length());

        let mut generations = 0usize;
        let mut cancelled = false;

        // 3. Evolutionary loop
        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            population.sort_by(|a, b| a.length().total_cmp(&b.length()));
            if population[0].length() < best.length() {
                best = population[0].clone();
            }

            let mut next_gen: Vec<Tour> = Vec::with_capacity(config.population_size + 1);
            next_gen.extend_from_slice(&population[..config.elite_count]);

            while next_gen.len() < config.population_size {
                let p1 = tournament(&population, config.tournament_size, rng);
                let p2 = tournament(&population, config.tournament_size, rng);

                let (c1, c2) = breeder.crossover(&population[p1], &population[p2], rng);
                let c1 = breeder.mutate(&c1, config.mutation_rate, rng);
                let c2 = breeder.mutate(&c2, config.mutation_rate, rng);

                next_gen.push(c1);
                next_gen.push(c2);
            }
            next_gen.truncate(config.population_size);

            let hits = evaluator.evaluate(&mut next_gen);
            population = next_gen;
            generations = gen + 1;

            // Covers the final generation, which no later sort will see.
            if let Some(gen_best) = find_best(&population) {
                if gen_best.length() < best.length() {
                    best = gen_best.clone();
                }
            }
            best_history.push(best.length());

            debug!(
                generation = gen,
                best_length = best.length(),
                elite = config.elite_count,
                cache_hits = hits,
                cache_len = cache.len(),
            );
            if gen % config.progress_interval == 0 || gen + 1 == config.max_generations {
                info!(
                    generation = gen,
                    best_length = best.length(),
                    "Gen {}: Best = {:.2}",
                    gen,
                    best.length()
                );
            }
        }

        let cache_stats = cache.stats();
        info!(
            event = "run_end",
            best_length = best.length(),
            generations,
            cancelled,
            cache_hit_rate = cache_stats.hit_rate(),
        );

        Ok(GaResult {
            best_length: best.length(),
            best,
            generations,
            cancelled,
            best_history,
            cache_stats,
        })
    }
}

/// Find the tour with the smallest length. Ties keep the earliest.
fn find_best(population: &[Tour]) -> Option<&Tour> {
    population
        .iter()
        .reduce(|best, t| if t.length() < best.length() { t } else { best })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::DuplicateAvoidance;
    use crate::geometry::Point;

    fn unit_square() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    /// Cities evenly spaced on a circle; the optimum is the polygon.
    fn circle(n: usize) -> (DistanceMatrix, f64) {
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(10.0 * theta.cos(), 10.0 * theta.sin())
            })
            .collect();
        let side = points[0].distance_to(&points[1]);
        (DistanceMatrix::from_points(&points), side * n as f64)
    }

    fn small_config() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_max_generations(50)
            .with_tournament_size(3)
            .with_elite_count(2)
            .with_cache_capacity(1000)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_unit_square_converges() {
        let result = GaRunner::run(&unit_square(), &small_config()).unwrap();
        assert!(
            (result.best_length - 4.0).abs() < 1e-9,
            "expected perimeter 4.0, got {}",
            result.best_length
        );
        assert!(result.best.is_valid_for(4));
    }

    #[test]
    fn test_unit_square_every_seed() {
        for seed in 0..20 {
            let config = small_config().with_seed(seed).with_elite_count(1);
            let result = GaRunner::run(&unit_square(), &config).unwrap();
            assert!(
                (result.best_length - 4.0).abs() < 1e-9,
                "seed {seed} ended at {}",
                result.best_length
            );
        }
    }

    #[test]
    fn test_best_length_is_true_length() {
        let (dm, _) = circle(12);
        let result = GaRunner::run(&dm, &small_config().with_max_generations(100)).unwrap();
        assert!((result.best.closed_length(&dm) - result.best_length).abs() < 1e-9);
    }

    #[test]
    fn test_history_non_increasing() {
        let (dm, _) = circle(15);
        let config = small_config().with_max_generations(80).with_elite_count(0);
        let result = GaRunner::run(&dm, &config).unwrap();

        assert_eq!(result.best_history.len(), 81);
        for window in result.best_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best length should never increase: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(*result.best_history.last().unwrap(), result.best_length);
    }

    #[test]
    fn test_circle_improves() {
        let (dm, optimum) = circle(16);
        let config = GaConfig::default()
            .with_population_size(100)
            .with_max_generations(300)
            .with_tournament_size(5)
            .with_elite_count(5)
            .with_mutation_rate(0.3)
            .with_seed(42)
            .with_parallel(false);
        let result = GaRunner::run(&dm, &config).unwrap();

        assert!(result.best_history[0] > result.best_length);
        assert!(
            result.best_length < optimum * 2.0,
            "expected within a factor of two of {optimum}, got {}",
            result.best_length
        );
    }

    #[test]
    fn test_same_seed_same_result() {
        let (dm, _) = circle(10);
        let config = small_config();
        let a = GaRunner::run(&dm, &config).unwrap();
        let b = GaRunner::run(&dm, &config).unwrap();
        assert_eq!(a.best.path(), b.best.path());
        assert_eq!(a.best_history, b.best_history);
    }

    #[test]
    fn test_parallel_gives_valid_result() {
        let (dm, _) = circle(20);
        let config = small_config().with_parallel(true).with_max_generations(40);
        let result = GaRunner::run(&dm, &config).unwrap();
        assert!(result.best.is_valid_for(20));
        assert!((result.best.closed_length(&dm) - result.best_length).abs() < 1e-9);
        assert_eq!(result.generations, 40);
    }

    #[test]
    fn test_odd_population_truncated() {
        // Elite 0 + pairs of children overshoots an odd target by one.
        let (dm, _) = circle(8);
        let config = small_config().with_population_size(7).with_elite_count(0);
        let result = GaRunner::run(&dm, &config).unwrap();
        assert_eq!(result.generations, 50);
    }

    #[test]
    fn test_single_tour_population() {
        let dm = unit_square();
        for elite in [0, 1] {
            let config = small_config()
                .with_population_size(1)
                .with_elite_count(elite)
                .with_tournament_size(3)
                .with_max_generations(20);
            let result = GaRunner::run(&dm, &config).unwrap();
            assert_eq!(result.generations, 20);
            assert!(result.best.is_valid_for(4));
            for w in result.best_history.windows(2) {
                assert!(w[1] <= w[0]);
            }
        }
    }

    #[test]
    fn test_all_elite_population() {
        let (dm, _) = circle(8);
        let config = small_config().with_population_size(5).with_elite_count(5);
        let result = GaRunner::run(&dm, &config).unwrap();
        // Nothing is ever bred, so the initial best is final.
        assert_eq!(result.best_history[0], result.best_length);
    }

    #[test]
    fn test_tiny_instances() {
        for n in 1..=3 {
            let points: Vec<Point> = (0..n).map(|i| Point::new(i as f64, 0.0)).collect();
            let dm = DistanceMatrix::from_points(&points);
            let result = GaRunner::run(&dm, &small_config().with_max_generations(5)).unwrap();
            assert!(result.best.is_valid_for(n));
            let expected = 2.0 * (n as f64 - 1.0);
            assert!((result.best_length - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_cities_rejected() {
        let dm = DistanceMatrix::from_points(&[]);
        let err = GaRunner::run(&dm, &small_config()).unwrap_err();
        assert!(matches!(err, TspError::NoCities));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = small_config().with_population_size(4).with_elite_count(5);
        let err = GaRunner::run(&unit_square(), &config).unwrap_err();
        assert!(matches!(err, TspError::Config(_)));
    }

    #[test]
    fn test_cancellation() {
        let (dm, _) = circle(30);
        let config = small_config().with_max_generations(1_000_000);
        let cancel = Arc::new(AtomicBool::new(false));

        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result = GaRunner::run_with_cancel(&dm, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert!(result.generations < 1_000_000);
        assert_eq!(result.best_history.len(), result.generations + 1);
    }

    #[test]
    fn test_pre_cancelled_runs_nothing() {
        let config = small_config();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(&unit_square(), &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.best_history.len(), 1);
    }

    #[test]
    fn test_injected_rng() {
        let (dm, _) = circle(9);
        let config = small_config();
        let mut rng = create_rng(42);
        let injected = GaRunner::run_with_rng(&dm, &config, &mut rng, None).unwrap();
        let seeded = GaRunner::run(&dm, &config).unwrap();
        assert_eq!(injected.best.path(), seeded.best.path());
    }

    #[test]
    fn test_cache_is_used() {
        let (dm, _) = circle(6);
        let config = small_config().with_duplicate_avoidance(DuplicateAvoidance {
            crossover_attempts: 1,
            mutation_attempts: 1,
            escalation: 1.0,
        });
        let result = GaRunner::run(&dm, &config).unwrap();
        assert!(result.cache_stats.hits > 0);
        assert!(result.cache_stats.len <= config.cache_capacity);
    }
}
