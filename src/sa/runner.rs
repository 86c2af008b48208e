//! SA execution loop.

use super::config::SaConfig;
use super::neighbor::Reversal;
use crate::error::{Result, TspError};
use crate::geometry::DistanceMatrix;
use crate::random::{create_rng, entropy_rng};
use crate::tour::Tour;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a simulated annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The shortest tour seen during the run.
    pub best: Tour,

    /// Length of `best` (same as `best.length()`).
    pub best_length: f64,

    /// Number of neighbour evaluations performed.
    pub iterations: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best length at the start and every `progress_interval` iterations.
    pub best_history: Vec<f64>,
}

/// Executes simulated annealing over segment reversals.
///
/// # Usage
///
/// ```
/// use tsp_evolve::geometry::{DistanceMatrix, Point};
/// use tsp_evolve::sa::{SaConfig, SaRunner};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let matrix = DistanceMatrix::from_points(&points);
/// let config = SaConfig::default()
///     .with_initial_temperature(10.0)
///     .with_cooling_rate(0.99)
///     .with_max_iterations(2_000)
///     .with_seed(42);
///
/// let result = SaRunner::run(&matrix, &config).unwrap();
/// assert!((result.best_length - 4.0).abs() < 1e-9);
/// ```
pub struct SaRunner;

impl SaRunner {
    /// Runs SA with a generator built from `config.seed`.
    ///
    /// # Errors
    /// [`TspError::Config`] for an invalid configuration and
    /// [`TspError::NoCities`] for an empty matrix.
    pub fn run(matrix: &DistanceMatrix, config: &SaConfig) -> Result<SaResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs SA with an optional cancellation token, checked every iteration.
    pub fn run_with_cancel(
        matrix: &DistanceMatrix,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        };
        Self::run_with_rng(matrix, config, &mut rng, cancel)
    }

    /// Runs SA drawing every random decision from `rng`.
    pub fn run_with_rng<R: Rng>(
        matrix: &DistanceMatrix,
        config: &SaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult> {
        config.validate()?;
        if matrix.is_empty() {
            return Err(TspError::NoCities);
        }

        info!(
            event = "run_start",
            cities = matrix.len(),
            iterations = config.max_iterations,
            initial_temperature = config.initial_temperature,
        );

        // Initialize
        let mut current = Tour::random(matrix.len(), rng);
        let mut current_length = current.closed_length(matrix);
        current.set_length(current_length);
        let mut best = current.clone();

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut best_history = vec![best.length()];

        for i in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            if let Some(mv) = Reversal::random(current.path().len(), rng) {
                let delta = mv.delta(&current, matrix);

                // Metropolis acceptance criterion
                let accept = delta < 0.0
                    || (temperature > 0.0 && (-delta / temperature).exp() > rng.random::<f64>());

                if accept {
                    if delta < 0.0 {
                        improving_moves += 1;
                    }
                    accepted_moves += 1;
                    mv.apply(&mut current);
                    current_length += delta;

                    if current_length < best.length() {
                        // Recount so summed deltas never drift into the record.
                        current_length = current.closed_length(matrix);
                        current.set_length(current_length);
                        if current_length < best.length() {
                            best = current.clone();
                        }
                    }
                }
            }

            temperature *= config.cooling_rate;
            iterations = i + 1;

            if i % config.progress_interval == 0 {
                info!(
                    iteration = i,
                    temperature,
                    best_length = best.length(),
                    current_length,
                    "Iteration {}: Temp={:.2} Best={:.2} Current={:.2}",
                    i,
                    temperature,
                    best.length(),
                    current_length
                );
            }
            if iterations % config.progress_interval == 0 {
                best_history.push(best.length());
            }
        }

        if best_history.last() != Some(&best.length()) {
            best_history.push(best.length());
        }

        debug!(accepted_moves, improving_moves, final_temperature = temperature);
        info!(
            event = "run_end",
            best_length = best.length(),
            iterations,
            cancelled,
        );

        Ok(SaResult {
            best_length: best.length(),
            best,
            iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cancelled,
            best_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
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
                let t = std::f64::consts::TAU * i as f64 / n as f64;
                Point::new(10.0 * t.cos(), 10.0 * t.sin())
            })
            .collect();
        let side = points[0].distance_to(&points[1]);
        (DistanceMatrix::from_points(&points), side * n as f64)
    }

    fn small_config() -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.995)
            .with_max_iterations(5_000)
            .with_progress_interval(100)
            .with_seed(42)
    }

    #[test]
    fn test_sa_unit_square() {
        let result = SaRunner::run(&unit_square(), &small_config()).unwrap();
        assert!(
            (result.best_length - 4.0).abs() < 1e-9,
            "expected perimeter 4.0, got {}",
            result.best_length
        );
        assert!(result.best.is_valid_for(4));
    }

    #[test]
    fn test_sa_unit_square_many_seeds() {
        for seed in 0..20 {
            let config = small_config().with_max_iterations(500).with_seed(seed);
            let result = SaRunner::run(&unit_square(), &config).unwrap();
            assert!((result.best_length - 4.0).abs() < 1e-9, "seed {seed}");
        }
    }

    #[test]
    fn test_sa_circle_near_optimum() {
        let (dm, optimum) = circle(16);
        let config = small_config().with_max_iterations(50_000).with_cooling_rate(0.9998);
        let result = SaRunner::run(&dm, &config).unwrap();
        assert!(result.best.is_valid_for(16));
        assert!(
            result.best_length < optimum * 1.2,
            "expected within 20% of {optimum}, got {}",
            result.best_length
        );
    }

    #[test]
    fn test_sa_best_length_is_exact() {
        let (dm, _) = circle(20);
        let result = SaRunner::run(&dm, &small_config()).unwrap();
        assert!((result.best.closed_length(&dm) - result.best_length).abs() < 1e-9);
        assert_eq!(result.best.length(), result.best_length);
    }

    #[test]
    fn test_sa_history_non_increasing() {
        let (dm, _) = circle(20);
        let result = SaRunner::run(&dm, &small_config()).unwrap();
        assert!(result.best_history.len() >= 2);
        for w in result.best_history.windows(2) {
            assert!(w[1] <= w[0], "best got worse: {} -> {}", w[0], w[1]);
        }
        assert_eq!(*result.best_history.last().unwrap(), result.best_length);
    }

    #[test]
    fn test_sa_iteration_count_and_cooling() {
        let (dm, _) = circle(10);
        let config = small_config().with_max_iterations(300).with_cooling_rate(0.5);
        let result = SaRunner::run(&dm, &config).unwrap();
        assert_eq!(result.iterations, 300);
        assert!(!result.cancelled);
        assert!(result.final_temperature < 1e-80);
        assert!(result.accepted_moves >= result.improving_moves);
    }

    #[test]
    fn test_sa_high_temperature_accepts_uphill() {
        let (dm, _) = circle(20);
        let config = small_config()
            .with_initial_temperature(1e9)
            .with_cooling_rate(1.0)
            .with_max_iterations(2_000);
        let result = SaRunner::run(&dm, &config).unwrap();
        let ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(ratio > 0.95, "expected near-total acceptance, got {ratio}");
        assert!(result.accepted_moves > result.improving_moves);
    }

    #[test]
    fn test_sa_deterministic_with_seed() {
        let (dm, _) = circle(15);
        let a = SaRunner::run(&dm, &small_config()).unwrap();
        let b = SaRunner::run(&dm, &small_config()).unwrap();
        assert_eq!(a.best.path(), b.best.path());
        assert_eq!(a.best_history, b.best_history);
    }

    #[test]
    fn test_sa_tiny_instances() {
        for n in 1..=3 {
            let points: Vec<Point> = (0..n).map(|i| Point::new(i as f64, 0.0)).collect();
            let dm = DistanceMatrix::from_points(&points);
            let result = SaRunner::run(&dm, &small_config().with_max_iterations(50)).unwrap();
            assert!(result.best.is_valid_for(n));
            assert!((result.best_length - 2.0 * (n as f64 - 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sa_no_cities_rejected() {
        let dm = DistanceMatrix::from_points(&[]);
        assert!(matches!(
            SaRunner::run(&dm, &small_config()),
            Err(TspError::NoCities)
        ));
    }

    #[test]
    fn test_sa_invalid_config_rejected() {
        let config = small_config().with_cooling_rate(2.0);
        assert!(matches!(
            SaRunner::run(&unit_square(), &config),
            Err(TspError::Config(_))
        ));
    }

    #[test]
    fn test_sa_pre_cancelled() {
        let (dm, _) = circle(10);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = SaRunner::run_with_cancel(&dm, &small_config(), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.best.is_valid_for(10));
    }

    #[test]
    fn test_sa_injected_rng() {
        let (dm, _) = circle(12);
        let mut rng = create_rng(9);
        let result = SaRunner::run_with_rng(&dm, &small_config(), &mut rng, None).unwrap();
        assert!(result.best.is_valid_for(12));
    }
}
