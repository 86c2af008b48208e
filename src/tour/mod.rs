//! Tour representation and identity.
//!
//! A [`Tour`] visits every city exactly once and returns home. City 0 is a
//! fixed anchor: it is never stored, so the stored path is a permutation
//! of `1..n` and the closed cycle is `0 → path[0] → … → path[last] → 0`.
//!
//! [`canonical_key`] turns a cyclic ordering into a [`CanonicalKey`] that
//! ignores the starting offset. Tours are keyed by their closed cycle so
//! that equal keys always mean equal lengths.

mod key;

pub use key::{canonical_key, CanonicalKey, SEPARATOR};

use crate::geometry::DistanceMatrix;
use crate::random::shuffle;
use rand::Rng;

/// The implicit start and end city of every tour.
pub const ANCHOR: usize = 0;

/// A candidate solution: an ordering of the non-anchor cities plus its
/// cached length.
///
/// The length starts out as `f64::INFINITY` and only becomes meaningful
/// after evaluation. Anything that changes the path must be followed by a
/// fresh evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    path: Vec<usize>,
    length: f64,
}

impl Tour {
    /// Wraps a path. The tour is unevaluated.
    pub fn new(path: Vec<usize>) -> Self {
        Self {
            path,
            length: f64::INFINITY,
        }
    }

    /// Creates a uniformly random tour over `num_cities` cities.
    pub fn random<R: Rng>(num_cities: usize, rng: &mut R) -> Self {
        let mut path: Vec<usize> = (1..num_cities).collect();
        shuffle(&mut path, rng);
        Self::new(path)
    }

    /// The visiting order, anchor excluded.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub(crate) fn path_mut(&mut self) -> &mut [usize] {
        &mut self.path
    }

    /// Cached length of the closed cycle.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    /// Whether a length has been assigned since construction.
    pub fn is_evaluated(&self) -> bool {
        self.length.is_finite()
    }

    /// Resets the cached length after the path changed.
    pub(crate) fn invalidate(&mut self) {
        self.length = f64::INFINITY;
    }

    /// Cache identity of this tour's closed cycle `[ANCHOR] + path`.
    ///
    /// The anchor is the smallest city, so the canonical rotation is the
    /// cycle as stored. Rotating `path` itself changes the cycle and
    /// therefore the key: `[1, 2, 3]` and `[2, 3, 1]` are different tours.
    /// Only rotations of the closed cycle share a key, and those all have
    /// the same length.
    pub fn key(&self) -> CanonicalKey {
        let mut cycle = Vec::with_capacity(self.path.len() + 1);
        cycle.push(ANCHOR);
        cycle.extend_from_slice(&self.path);
        canonical_key(&cycle)
    }

    /// Directed edges of the closed cycle, starting and ending at the anchor.
    ///
    /// A single-city tour yields the one self-loop `(0, 0)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let from = std::iter::once(ANCHOR).chain(self.path.iter().copied());
        let to = self.path.iter().copied().chain(std::iter::once(ANCHOR));
        from.zip(to)
    }

    /// Sums distances along `0 → path… → 0` without touching any cache.
    pub fn closed_length(&self, matrix: &DistanceMatrix) -> f64 {
        self.edges().map(|(a, b)| matrix.distance(a, b)).sum()
    }

    /// Whether the path is a permutation of `1..num_cities`.
    pub fn is_valid_for(&self, num_cities: usize) -> bool {
        if self.path.len() + 1 != num_cities.max(1) {
            return false;
        }
        let mut seen = vec![false; num_cities];
        self.path.iter().all(|&c| {
            if c == ANCHOR || c >= num_cities || seen[c] {
                return false;
            }
            seen[c] = true;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::random::create_rng;

    fn square() -> DistanceMatrix {
        DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_new_is_unevaluated() {
        let t = Tour::new(vec![1, 2, 3]);
        assert!(!t.is_evaluated());
        assert_eq!(t.length(), f64::INFINITY);
    }

    #[test]
    fn test_random_is_valid() {
        let mut rng = create_rng(42);
        for n in 1..30 {
            let t = Tour::random(n, &mut rng);
            assert!(t.is_valid_for(n), "invalid random tour for n={n}: {t:?}");
        }
    }

    #[test]
    fn test_closed_length_square() {
        let dm = square();
        let perimeter = Tour::new(vec![1, 2, 3]);
        assert!((perimeter.closed_length(&dm) - 4.0).abs() < 1e-12);

        let crossed = Tour::new(vec![2, 1, 3]);
        let expected = 2.0 + 2.0 * 2f64.sqrt();
        assert!((crossed.closed_length(&dm) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_city_tour() {
        let dm = DistanceMatrix::from_points(&[Point::new(3.0, 4.0)]);
        let t = Tour::new(vec![]);
        assert!(t.is_valid_for(1));
        assert_eq!(t.closed_length(&dm), 0.0);
    }

    #[test]
    fn test_edges_close_the_cycle() {
        let t = Tour::new(vec![2, 1, 3]);
        let edges: Vec<_> = t.edges().collect();
        assert_eq!(edges, vec![(0, 2), (2, 1), (1, 3), (3, 0)]);
        assert_eq!(Tour::new(vec![]).edges().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn test_key_includes_anchor() {
        let t = Tour::new(vec![3, 1, 2]);
        assert_eq!(t.key().as_str(), "0,3,1,2");
    }

    #[test]
    fn test_distinct_lengths_get_distinct_keys() {
        // [1,2,3] and [2,3,1] are rotations of each other as bare paths,
        // but their closed cycles through the anchor differ in length.
        let dm = square();
        let a = Tour::new(vec![1, 2, 3]);
        let b = Tour::new(vec![2, 3, 1]);
        assert_ne!(a.closed_length(&dm), b.closed_length(&dm));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_is_valid_rejects_bad_paths() {
        assert!(!Tour::new(vec![1, 1, 3]).is_valid_for(4));
        assert!(!Tour::new(vec![0, 1, 2]).is_valid_for(4));
        assert!(!Tour::new(vec![1, 2]).is_valid_for(4));
        assert!(!Tour::new(vec![1, 2, 4]).is_valid_for(4));
        assert!(Tour::new(vec![3, 1, 2]).is_valid_for(4));
    }
}
