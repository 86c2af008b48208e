//! ACO execution loop.

use super::ant::{construct_tour, heuristic_table};
use super::config::AcoConfig;
use super::pheromone::PheromoneMatrix;
use crate::error::{Result, TspError};
use crate::geometry::DistanceMatrix;
use crate::random::{create_rng, entropy_rng};
use crate::tour::Tour;
use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of an ant colony run.
#[derive(Debug, Clone)]
pub struct AcoResult {
    /// The shortest tour any ant built.
    pub best: Tour,

    /// Length of `best` (same as `best.length()`).
    pub best_length: f64,

    /// Number of colony iterations completed.
    pub iterations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best length before the first iteration and after each one.
    pub best_history: Vec<f64>,

    /// Pheromone levels when the run stopped.
    pub pheromone: PheromoneMatrix,
}

/// Executes the ant colony loop.
///
/// # Usage
///
/// ```
/// use tsp_evolve::aco::{AcoConfig, AcoRunner};
/// use tsp_evolve::geometry::{DistanceMatrix, Point};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let matrix = DistanceMatrix::from_points(&points);
/// let config = AcoConfig::default()
///     .with_ants(10)
///     .with_max_iterations(20)
///     .with_seed(42);
///
/// let result = AcoRunner::run(&matrix, &config).unwrap();
/// assert!((result.best_length - 4.0).abs() < 1e-9);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the colony with a generator built from `config.seed`.
    ///
    /// # Errors
    /// [`TspError::Config`] for an invalid configuration and
    /// [`TspError::NoCities`] for an empty matrix.
    pub fn run(matrix: &DistanceMatrix, config: &AcoConfig) -> Result<AcoResult> {
        Self::run_with_cancel(matrix, config, None)
    }

    /// Runs the colony with an optional cancellation token, checked between
    /// iterations.
    pub fn run_with_cancel(
        matrix: &DistanceMatrix,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        };
        Self::run_with_rng(matrix, config, &mut rng, cancel)
    }

    /// Runs the colony drawing every random decision from `rng`.
    ///
    /// Each ant gets its own generator seeded from `rng`, so parallel and
    /// sequential construction give the same result.
    pub fn run_with_rng<R: Rng>(
        matrix: &DistanceMatrix,
        config: &AcoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        config.validate()?;
        if matrix.is_empty() {
            return Err(TspError::NoCities);
        }

        let n = matrix.len();
        let heuristic = heuristic_table(matrix, config.beta);
        let mut pheromone = PheromoneMatrix::new(n, config.initial_pheromone);

        info!(
            event = "run_start",
            cities = n,
            ants = config.ants,
            iterations = config.max_iterations,
            parallel = config.parallel,
        );

        let mut best = Tour::random(n, rng);
        best.set_length(best.closed_length(matrix));
        let mut best_history = Vec::with_capacity(config.max_iterations + 1);
        best_history.push(best.length());

        let mut iterations = 0usize;
        let mut cancelled = false;

        for iter in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            // 1. Every ant builds a tour against this iteration's weights
            let weights = pheromone.attraction(&heuristic, config.alpha);
            let seeds: Vec<u64> = (0..config.ants).map(|_| rng.random()).collect();
            let build = |&seed: &u64| {
                let mut ant_rng = create_rng(seed);
                let mut tour = construct_tour(&weights, n, &mut ant_rng);
                tour.set_length(tour.closed_length(matrix));
                tour
            };
            let mut ants: Vec<Tour> = if config.parallel {
                seeds.par_iter().map(build).collect()
            } else {
                seeds.iter().map(build).collect()
            };

            // 2. Update best
            ants.sort_by(|a, b| a.length().total_cmp(&b.length()));
            if ants[0].length() < best.length() {
                best = ants[0].clone();
            }

            // 3. Evaporate, then let the shortest ants deposit
            pheromone.evaporate(config.evaporation);
            for ant in ants.iter().take(config.elite_ants) {
                if ant.length() > 0.0 {
                    pheromone.deposit(ant, config.deposit / ant.length());
                }
            }

            iterations = iter + 1;
            best_history.push(best.length());

            debug!(
                iteration = iter,
                best_length = best.length(),
                iteration_best = ants[0].length(),
            );
            if iter % config.progress_interval == 0 || iterations == config.max_iterations {
                info!(
                    iteration = iter,
                    best_length = best.length(),
                    "Iteration {}: Best = {:.2}",
                    iter,
                    best.length()
                );
            }
        }

        info!(
            event = "run_end",
            best_length = best.length(),
            iterations,
            cancelled,
        );

        Ok(AcoResult {
            best_length: best.length(),
            best,
            iterations,
            cancelled,
            best_history,
            pheromone,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
