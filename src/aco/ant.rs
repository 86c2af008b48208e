//! Tour construction by a single ant.

use crate::geometry::DistanceMatrix;
use crate::tour::{Tour, ANCHOR};
use rand::Rng;

/// Distances below this are treated as this, so coincident cities get a
/// large but finite heuristic.
const MIN_DISTANCE: f64 = 1e-10;

/// Row-major table of `(1 / distance)^beta`, zero on the diagonal.
pub(crate) fn heuristic_table(matrix: &DistanceMatrix, beta: f64) -> Vec<f64> {
    let n = matrix.len();
    let mut table = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                table[i * n + j] = (1.0 / matrix.distance(i, j).max(MIN_DISTANCE)).powf(beta);
            }
        }
    }
    table
}

/// Builds one tour over `n` cities from a row-major weight table.
///
/// The ant starts at a uniformly random city. Each step moves to an
/// unvisited city chosen with probability proportional to its weight from
/// the current city; when no weight is usable the choice is uniform. The
/// finished cycle is rotated so that it starts at the anchor, which leaves
/// its length unchanged. The returned tour is unevaluated.
pub fn construct_tour<R: Rng>(weights: &[f64], n: usize, rng: &mut R) -> Tour {
    if n <= 1 {
        return Tour::new(Vec::new());
    }
    debug_assert_eq!(weights.len(), n * n);

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let start = rng.random_range(0..n);
    visited[start] = true;
    order.push(start);

    let mut candidates: Vec<usize> = Vec::with_capacity(n);
    let mut current = start;
    for _ in 1..n {
        candidates.clear();
        candidates.extend((0..n).filter(|&c| !visited[c]));

        let row = &weights[current * n..(current + 1) * n];
        let total: f64 = candidates.iter().map(|&c| row[c]).sum();

        let next = if total > 0.0 && total.is_finite() {
            let r = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = candidates[candidates.len() - 1];
            for &c in &candidates {
                cumulative += row[c];
                if r < cumulative {
                    chosen = c;
                    break;
                }
            }
            chosen
        } else {
            candidates[rng.random_range(0..candidates.len())]
        };

        visited[next] = true;
        order.push(next);
        current = next;
    }

    let pos = order.iter().position(|&c| c == ANCHOR).unwrap_or(0);
    let path = order[pos + 1..]
        .iter()
        .chain(&order[..pos])
        .copied()
        .collect();
    Tour::new(path)
}
