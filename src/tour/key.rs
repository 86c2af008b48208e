//! Rotation-normalized tour identity.

use std::fmt::{self, Write as _};

/// Separator between city indices in a serialized key.
pub const SEPARATOR: char = ',';

/// Rotation-invariant identity of a cyclic city ordering.
///
/// Two sequences that are cyclic rotations of each other produce equal
/// keys. The key depends only on the sequence contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalKey {
    fn from(s: &str) -> Self {
        CanonicalKey(s.to_owned())
    }
}

impl From<String> for CanonicalKey {
    fn from(s: String) -> Self {
        CanonicalKey(s)
    }
}

/// Rotates `seq` so its smallest element comes first, then joins it with
/// [`SEPARATOR`].
///
/// An empty sequence yields an empty key.
///
/// # Examples
///
/// ```
/// use tsp_evolve::tour::canonical_key;
///
/// assert_eq!(canonical_key(&[3, 1, 2]).as_str(), "1,2,3");
/// assert_eq!(canonical_key(&[2, 3, 1]), canonical_key(&[1, 2, 3]));
/// ```
pub fn canonical_key(seq: &[usize]) -> CanonicalKey {
    let start = seq
        .iter()
        .enumerate()
        .min_by_key(|&(_, city)| *city)
        .map_or(0, |(i, _)| i);

    let mut out = String::with_capacity(seq.len() * 4);
    for (n, city) in seq[start..].iter().chain(&seq[..start]).enumerate() {
        if n > 0 {
            out.push(SEPARATOR);
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{city}");
    }
    CanonicalKey(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rotates_minimum_first() {
        assert_eq!(canonical_key(&[4, 2, 5, 1, 3]).as_str(), "1,3,4,2,5");
    }

    #[test]
    fn test_already_canonical() {
        assert_eq!(canonical_key(&[0, 7, 3]).as_str(), "0,7,3");
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(canonical_key(&[9]).as_str(), "9");
        assert_eq!(canonical_key(&[]).as_str(), "");
    }

    #[test]
    fn test_multi_digit_cities_do_not_collide() {
        // Without a separator, [1, 23] and [12, 3] would both read "123".
        assert_ne!(canonical_key(&[1, 23]), canonical_key(&[12, 3]));
    }

    #[test]
    fn test_reversal_is_distinct() {
        assert_ne!(canonical_key(&[1, 2, 3, 4]), canonical_key(&[4, 3, 2, 1]));
    }

    proptest! {
        #[test]
        fn prop_rotation_invariant(
            perm in Just((1..20usize).collect::<Vec<_>>()).prop_shuffle(),
            shift in 0..19usize,
        ) {
            let mut rotated = perm.clone();
            rotated.rotate_left(shift);
            prop_assert_eq!(canonical_key(&rotated), canonical_key(&perm));
        }
    }
}
