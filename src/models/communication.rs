//! Pairwise communication intensity between workload units.
//!
//! Intensities are synthetic: each off-diagonal entry is drawn uniformly
//! from `[0.1, 1.0]`, the diagonal is zero. The full table is generated in
//! row-major order so the number and order of random draws match a full
//! N×N build, although only the upper triangle is ever read.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest intensity for an off-diagonal pair.
pub const MIN_INTENSITY: f64 = 0.1;
/// Highest intensity for an off-diagonal pair.
pub const MAX_INTENSITY: f64 = 1.0;

/// Dense N×N communication-intensity table (N = workload unit count).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationMatrix {
    size: usize,
    /// Row-major entries, `size * size` long.
    weights: Vec<f64>,
}

impl CommunicationMatrix {
    /// Builds a random matrix for `unit_count` units.
    ///
    /// Deterministic for a given RNG state. Draws `unit_count * (unit_count - 1)`
    /// values; a zero count yields an empty table.
    pub fn build<R: Rng>(unit_count: usize, rng: &mut R) -> Self {
        let mut weights = vec![0.0; unit_count * unit_count];
        for i in 0..unit_count {
            for j in 0..unit_count {
                if i != j {
                    weights[i * unit_count + j] =
                        MIN_INTENSITY + rng.random::<f64>() * (MAX_INTENSITY - MIN_INTENSITY);
                }
            }
        }
        Self {
            size: unit_count,
            weights,
        }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// Returns `None` unless `rows` is square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            weights: rows.into_iter().flatten().collect(),
        })
    }

    /// A matrix of `unit_count` units with no communication at all.
    pub fn silent(unit_count: usize) -> Self {
        Self {
            size: unit_count,
            weights: vec![0.0; unit_count * unit_count],
        }
    }

    /// Number of units (rows) covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Intensity from unit index `i` to unit index `j`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "unit index out of range");
        self.weights[i * self.size + j]
    }

    /// Number of unordered distinct pairs, `N(N-1)/2`.
    pub fn pair_count(&self) -> usize {
        self.size * self.size.saturating_sub(1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_build_ranges() {
        let mut rng = SmallRng::seed_from_u64(42);
        let m = CommunicationMatrix::build(6, &mut rng);
        assert_eq!(m.size(), 6);
        for i in 0..6 {
            for j in 0..6 {
                let w = m.weight(i, j);
                if i == j {
                    assert_eq!(w, 0.0);
                } else {
                    assert!((MIN_INTENSITY..=MAX_INTENSITY).contains(&w), "w = {w}");
                }
            }
        }
    }

    #[test]
    fn test_build_deterministic() {
        let a = CommunicationMatrix::build(5, &mut SmallRng::seed_from_u64(7));
        let b = CommunicationMatrix::build(5, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_consumes_full_table() {
        // Both triangles are drawn, so the stream advances by n(n-1) values.
        let mut rng = SmallRng::seed_from_u64(3);
        let _ = CommunicationMatrix::build(4, &mut rng);
        let after_build: f64 = rng.random();

        let mut reference = SmallRng::seed_from_u64(3);
        for _ in 0..12 {
            let _: f64 = reference.random();
        }
        let expected: f64 = reference.random();
        assert_eq!(after_build, expected);
    }

    #[test]
    fn test_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let m = CommunicationMatrix::build(0, &mut rng);
        assert_eq!(m.size(), 0);
        assert_eq!(m.pair_count(), 0);
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(CommunicationMatrix::silent(1).pair_count(), 0);
        assert_eq!(CommunicationMatrix::silent(2).pair_count(), 1);
        assert_eq!(CommunicationMatrix::silent(20).pair_count(), 190);
    }

    #[test]
    fn test_from_rows() {
        let m = CommunicationMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.2, 0.0]]).unwrap();
        assert!((m.weight(0, 1) - 0.5).abs() < 1e-10);
        assert!((m.weight(1, 0) - 0.2).abs() < 1e-10);
        assert!(CommunicationMatrix::from_rows(vec![vec![0.0, 0.5]]).is_none());
    }
}
