//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop;
//! [`DuplicateAvoidance`] holds the retry policy of the breeder.

use crate::error::{Result, TspError};

/// Retry policy used when offspring collide with tours already in the
/// fitness cache.
///
/// The defaults (15 crossover attempts, 8 mutation attempts, ×1.5 rate
/// escalation) are empirical.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuplicateAvoidance {
    /// Crossover attempts before accepting a colliding pair.
    pub crossover_attempts: usize,

    /// Mutation attempts before falling back to the unescalated rate.
    pub mutation_attempts: usize,

    /// Factor applied to the mutation rate after each colliding attempt.
    pub escalation: f64,
}

impl Default for DuplicateAvoidance {
    fn default() -> Self {
        Self {
            crossover_attempts: 15,
            mutation_attempts: 8,
            escalation: 1.5,
        }
    }
}

/// Configuration for the TSP genetic algorithm.
///
/// # Defaults
///
/// ```
/// use tsp_evolve::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 1000);
/// assert_eq!(config.max_generations, 2000);
/// assert_eq!(config.cache_capacity, 10_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_evolve::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_tournament_size(5)
///     .with_elite_count(4)
///     .with_mutation_rate(0.05)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of tours in every generation.
    pub population_size: usize,

    /// Number of generations to run.
    pub max_generations: usize,

    /// Candidates drawn per tournament.
    pub tournament_size: usize,

    /// Probability that an offspring is mutated (0.0–1.0).
    pub mutation_rate: f64,

    /// Best tours copied unchanged into the next generation.
    pub elite_count: usize,

    /// Maximum number of tour lengths memoized at once.
    pub cache_capacity: usize,

    /// Breeder retry policy.
    pub duplicate_avoidance: DuplicateAvoidance,

    /// Whether to evaluate tours on the rayon thread pool.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Emit a progress event every this many generations (and on the last).
    pub progress_interval: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            max_generations: 2000,
            tournament_size: 10,
            mutation_rate: 0.1,
            elite_count: 10,
            cache_capacity: 10_000,
            duplicate_avoidance: DuplicateAvoidance::default(),
            parallel: true,
            seed: None,
            progress_interval: 50,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_cache_capacity(mut self, n: usize) -> Self {
        self.cache_capacity = n;
        self
    }

    pub fn with_duplicate_avoidance(mut self, policy: DuplicateAvoidance) -> Self {
        self.duplicate_avoidance = policy;
        self
    }

    /// Enables or disables parallel evaluation.
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

        if self.population_size == 0 {
            return fail("population_size must be at least 1");
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1");
        }
        if self.elite_count > self.population_size {
            return fail("elite_count must not exceed population_size");
        }
        if self.tournament_size == 0 {
            return fail("tournament_size must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail("mutation_rate must be within [0, 1]");
        }
        if self.cache_capacity == 0 {
            return fail("cache_capacity must be at least 1");
        }
        if self.progress_interval == 0 {
            return fail("progress_interval must be at least 1");
        }
        let policy = &self.duplicate_avoidance;
        if policy.crossover_attempts == 0 || policy.mutation_attempts == 0 {
            return fail("duplicate avoidance attempts must be at least 1");
        }
        if !(policy.escalation.is_finite() && policy.escalation >= 1.0) {
            return fail("duplicate avoidance escalation must be a finite factor >= 1");
        }
        Ok(())
    }
}
