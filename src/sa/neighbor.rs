//! Segment-reversal neighbourhood.

use crate::geometry::DistanceMatrix;
use crate::tour::{Tour, ANCHOR};
use rand::Rng;

/// Reversal of `path[start..=end]`.
///
/// On the closed cycle this replaces the two edges around the segment
/// and leaves every other edge in place, so its effect on the length is
/// known without walking the whole tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reversal {
    pub start: usize,
    pub end: usize,
}

impl Reversal {
    /// Draws two positions uniformly from `0..len` and orders them.
    ///
    /// Returns `None` when the path is too short for any move.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Option<Self> {
        if len < 2 {
            return None;
        }
        let a = rng.random_range(0..len);
        let b = rng.random_range(0..len);
        Some(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    /// Change in closed-cycle length if this move were applied to `tour`.
    pub fn delta(&self, tour: &Tour, matrix: &DistanceMatrix) -> f64 {
        if self.start == self.end {
            return 0.0;
        }
        let path = tour.path();
        let prev = if self.start == 0 {
            ANCHOR
        } else {
            path[self.start - 1]
        };
        let next = path.get(self.end + 1).copied().unwrap_or(ANCHOR);
        let first = path[self.start];
        let last = path[self.end];

        matrix.distance(prev, last) + matrix.distance(first, next)
            - matrix.distance(prev, first)
            - matrix.distance(last, next)
    }

    /// Reverses the segment in place and invalidates the cached length.
    pub fn apply(&self, tour: &mut Tour) {
        tour.path_mut()[self.start..=self.end].reverse();
        tour.invalidate();
    }
}
