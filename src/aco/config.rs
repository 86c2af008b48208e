//! ACO configuration.

use crate::error::{Result, TspError};

/// Configuration for the ant colony.
///
/// # Examples
///
/// ```
/// use tsp_evolve::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ants(20)
///     .with_alpha(1.0)
///     .with_beta(5.0)
///     .with_max_iterations(200)
///     .with_seed(11);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Tours built per iteration.
    pub ants: usize,

    /// Pheromone exponent.
    pub alpha: f64,

    /// Distance-heuristic exponent.
    pub beta: f64,

    /// Fraction of pheromone that evaporates each iteration (0.0–1.0).
    pub evaporation: f64,

    /// Pheromone quantity; an ant deposits `deposit / length` per edge.
    pub deposit: f64,

    /// Number of colony iterations.
    pub max_iterations: usize,

    /// Shortest ants per iteration allowed to deposit.
    ///
    /// Values above `ants` mean every ant deposits.
    pub elite_ants: usize,

    /// Pheromone on every edge before the first iteration.
    pub initial_pheromone: f64,

    /// Whether to build ants on the rayon thread pool.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Emit a progress event every this many iterations (and on the last).
    pub progress_interval: usize,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ants: 50,
            alpha: 1.0,
            beta: 2.0,
            evaporation: 0.1,
            deposit: 100.0,
            max_iterations: 100,
            elite_ants: 50,
            initial_pheromone: 1.0,
            parallel: true,
            seed: None,
            progress_interval: 10,
        }
    }
}

impl AcoConfig {
    pub fn with_ants(mut self, n: usize) -> Self {
        self.ants = n;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate, clamped to `[0, 1]`.
    pub fn with_evaporation(mut self, rho: f64) -> Self {
        self.evaporation = rho.clamp(0.0, 1.0);
        self
    }

    pub fn with_deposit(mut self, q: f64) -> Self {
        self.deposit = q;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_elite_ants(mut self, n: usize) -> Self {
        self.elite_ants = n;
        self
    }

    pub fn with_initial_pheromone(mut self, tau: f64) -> Self {
        self.initial_pheromone = tau;
        self
    }

    /// Enables or disables parallel tour construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_progress_interval(mut self, every: usize) -> Self {
        self.progress_interval = every;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns [`TspError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(TspError::Config(msg.into()));
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if self.ants == 0 {
            return fail("ants must be at least 1");
        }
        if self.max_iterations == 0 {
            return fail("max_iterations must be at least 1");
        }
        if !non_negative(self.alpha) || !non_negative(self.beta) {
            return fail("alpha and beta must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&self.evaporation) {
            return fail("evaporation must be within [0, 1]");
        }
        if !positive(self.deposit) {
            return fail("deposit must be finite and positive");
        }
        if !positive(self.initial_pheromone) {
            return fail("initial_pheromone must be finite and positive");
        }
        if self.progress_interval == 0 {
            return fail("progress_interval must be at least 1");
        }
        Ok(())
    }
}
