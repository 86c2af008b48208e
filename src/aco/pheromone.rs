//! Pheromone levels on the edges between cities.

use crate::tour::Tour;

/// Symmetric N×N pheromone table, stored row-major like
/// [`DistanceMatrix`](crate::geometry::DistanceMatrix).
///
/// The diagonal starts at zero and stays there unless a single-city tour
/// deposits on its self-loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    n: usize,
    data: Vec<f64>,
}

impl PheromoneMatrix {
    /// Every off-diagonal edge starts at `initial`.
    pub fn new(n: usize, initial: f64) -> Self {
        let mut data = vec![initial; n * n];
        for i in 0..n {
            data[i * n + i] = 0.0;
        }
        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Pheromone on edge `i → j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Multiplies every level by `1 - rho`.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho;
        for tau in &mut self.data {
            *tau *= keep;
        }
    }

    /// Adds `amount` to both directions of every edge on the tour's cycle.
    pub fn deposit(&mut self, tour: &Tour, amount: f64) {
        let n = self.n;
        for (from, to) in tour.edges() {
            self.data[from * n + to] += amount;
            self.data[to * n + from] += amount;
        }
    }

    /// Edge weights `τ^alpha · heuristic` for one round of construction.
    ///
    /// `heuristic` is a row-major table of the same size, usually `η^β`.
    pub fn attraction(&self, heuristic: &[f64], alpha: f64) -> Vec<f64> {
        debug_assert_eq!(heuristic.len(), self.data.len());
        self.data
            .iter()
            .zip(heuristic)
            .map(|(&tau, &eta)| tau.powf(alpha) * eta)
            .collect()
    }
}
