//! Heuristic solvers for the Traveling Salesman Problem.
//!
//! Three searches share one tour representation, distance table and TSPLIB
//! reader: a cache-backed genetic algorithm ([`ga`]), simulated annealing
//! over segment reversals ([`sa`]) and ant colony optimization ([`aco`]).
//!
//! The genetic algorithm is generational (tournament selection, order
//! crossover, swap mutation, elitism) built around three cooperating parts:
//!
//! - **[`cache::FitnessCache`]**: a fixed-capacity, mutex-guarded LRU map
//!   from a rotation-normalized tour key to the tour's length
//! - **[`ga::PopulationEvaluator`]**: fans a population out over a thread
//!   pool, reading from and filling the cache
//! - **[`ga::Breeder`]**: wraps crossover and mutation with bounded retries
//!   that steer offspring away from tours the cache already holds
//!
//! Supporting modules: [`geometry`] (points and the distance table),
//! [`tour`] (tour type and canonical keys), [`tsplib`] (input parsing),
//! [`random`] (seeded generators) and [`error`].
//!
//! # Example
//!
//! ```
//! use tsp_evolve::ga::{GaConfig, GaRunner};
//! use tsp_evolve::geometry::{DistanceMatrix, Point};
//!
//! let points: Vec<Point> = (0..8)
//!     .map(|i| {
//!         let t = std::f64::consts::TAU * i as f64 / 8.0;
//!         Point::new(t.cos(), t.sin())
//!     })
//!     .collect();
//! let matrix = DistanceMatrix::from_points(&points);
//! let config = GaConfig::default()
//!     .with_population_size(50)
//!     .with_max_generations(100)
//!     .with_seed(1);
//!
//! let result = GaRunner::run(&matrix, &config)?;
//! assert!(result.best.is_valid_for(8));
//! # Ok::<(), tsp_evolve::TspError>(())
//! ```

pub mod aco;
pub mod cache;
pub mod error;
pub mod ga;
pub mod geometry;
pub mod random;
pub mod sa;
pub mod tour;
pub mod tsplib;

pub use error::{Result, TspError};
