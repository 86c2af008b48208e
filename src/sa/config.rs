//! SA configuration.

use crate::error::{Result, TspError};

/// Configuration for simulated annealing.
///
/// The temperature starts at `initial_temperature` and is multiplied by
/// `cooling_rate` after every iteration.
///
/// # Examples
///
/// ```
/// use tsp_evolve::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(50_000.0)
///     .with_cooling_rate(0.999)
///     .with_max_iterations(10_000)
///     .with_seed(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Higher values accept more uphill moves early.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1]. Higher = slower cooling.
    pub cooling_rate: f64,

    /// Number of neighbour evaluations.
    pub max_iterations: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Emit a progress event and sample the best length every this many
    /// iterations.
    pub progress_interval: usize,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100_000.0,
            cooling_rate: 0.9999,
            max_iterations: 500_000,
            seed: None,
            progress_interval: 1000,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
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
        let fail = |msg: String| Err(TspError::Config(msg));

        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return fail(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return fail(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            ));
        }
        if self.max_iterations == 0 {
            return fail("max_iterations must be at least 1".into());
        }
        if self.progress_interval == 0 {
            return fail("progress_interval must be at least 1".into());
        }
        Ok(())
    }
}
