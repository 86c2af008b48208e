//! Genetic algorithm for the Traveling Salesman Problem.
//!
//! Fitness evaluation is memoized in a shared [`FitnessCache`] and spread
//! over a thread pool. Offspring that the cache already knows are retried
//! before they are accepted.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, tournament size,
//!   elitism, cache capacity)
//! - [`DuplicateAvoidance`]: Retry bounds and rate escalation for the breeder
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best tour with run statistics
//! - [`PopulationEvaluator`]: Parallel, cache-backed length assignment
//! - [`Breeder`]: Duplicate-avoiding crossover and mutation
//!
//! # Submodules
//!
//! - [`operators`]: Order crossover (OX) and swap mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//!
//! [`FitnessCache`]: crate::cache::FitnessCache

mod breeder;
mod config;
mod evaluator;
pub mod operators;
mod runner;
mod selection;

pub use breeder::Breeder;
pub use config::{DuplicateAvoidance, GaConfig};
pub use evaluator::PopulationEvaluator;
pub use runner::{GaResult, GaRunner};
pub use selection::tournament;
