//! Ant colony optimization for the Traveling Salesman Problem.
//!
//! Each iteration a colony of ants builds complete tours, picking every
//! next city with probability proportional to `τ^α · η^β`, where τ is the
//! pheromone on the edge and η = 1/distance. Pheromone then evaporates
//! everywhere and the shortest tours of the iteration deposit `q / length`
//! on every edge they used. Ants are built in parallel on the rayon pool,
//! each with its own generator seeded from the run's generator, so the
//! outcome does not depend on scheduling.
//!
//! # Key Types
//!
//! - [`AcoConfig`]: Colony size, exponents, evaporation and deposit
//! - [`AcoRunner`]: Executes the colony loop
//! - [`AcoResult`]: Best tour with per-iteration history
//! - [`PheromoneMatrix`]: Symmetric pheromone levels
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"

mod ant;
mod config;
mod pheromone;
mod runner;

pub use ant::construct_tour;
pub use config::AcoConfig;
pub use pheromone::PheromoneMatrix;
pub use runner::{AcoResult, AcoRunner};
