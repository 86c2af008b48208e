//! Simulated annealing for the Traveling Salesman Problem.
//!
//! A single tour is improved by reversing random segments of its path
//! (a 2-opt move on the closed cycle). Worse tours are accepted with a
//! probability that shrinks as the temperature cools geometrically, which
//! lets the search leave local optima early in the run.
//!
//! # Key Types
//!
//! - [`SaConfig`]: Temperature, cooling rate and iteration budget
//! - [`SaRunner`]: Executes the annealing loop
//! - [`SaResult`]: Best tour with move statistics
//! - [`Reversal`]: The segment-reversal neighbourhood move
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod neighbor;
mod runner;

pub use config::SaConfig;
pub use neighbor::Reversal;
pub use runner::{SaResult, SaRunner};
