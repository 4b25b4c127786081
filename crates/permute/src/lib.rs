//! Deterministic, seeded permutation families for MinHash.
//!
//! A [`PermutationFamily`] is the fixed, shared configuration that realizes
//! the MinHash hash functions: `P` independent permutations of `[0, R)`,
//! built by seeded shuffling so that two processes constructed with the
//! same `(rows, permutations, bands, seed)` agree bit-for-bit (spec §4.2,
//! §8 "Determinism").

mod error;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use error::PermuteError;

/// A column index into `[0, rows)`.
pub type Column = u32;

/// An immutable, shareable family of `P` permutations of `[0, rows)`.
///
/// Built once per feature and shared across threads (spec §5: "the
/// permutation family is immutable after construction and safely shared
/// across threads"). Uses `ChaCha8Rng` rather than the platform default RNG
/// because its output stream is part of its documented contract and does
/// not drift across `rand` releases, which a bit-identical-across-restarts
/// requirement (spec §4.2) cannot tolerate.
#[derive(Debug, Clone)]
pub struct PermutationFamily {
    rows: u32,
    bands: usize,
    band_size: usize,
    /// `permutations[i][j]` is the value permutation `i` places at row `j`.
    permutations: Vec<Vec<u32>>,
    /// `inverse[i][v]` is the row at which permutation `i` places value `v`;
    /// precomputed so signature computation is O(|columns|) rather than
    /// O(rows) per permutation.
    inverse: Vec<Vec<u32>>,
}

impl PermutationFamily {
    pub fn new(rows: u32, permutations: usize, bands: usize, seed: u64) -> Result<Self, PermuteError> {
        if rows == 0 {
            return Err(PermuteError::ZeroRows);
        }
        if permutations == 0 {
            return Err(PermuteError::ZeroPermutations);
        }
        if bands == 0 {
            return Err(PermuteError::ZeroBands);
        }
        if permutations % bands != 0 {
            return Err(PermuteError::BandsDoNotDivide { permutations, bands });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut perms = Vec::with_capacity(permutations);
        let mut inverses = Vec::with_capacity(permutations);
        for _ in 0..permutations {
            let mut perm: Vec<u32> = (0..rows).collect();
            perm.shuffle(&mut rng);
            let mut inverse = vec![0u32; rows as usize];
            for (position, &value) in perm.iter().enumerate() {
                inverse[value as usize] = position as u32;
            }
            perms.push(perm);
            inverses.push(inverse);
        }

        Ok(Self {
            rows,
            bands,
            band_size: permutations / bands,
            permutations: perms,
            inverse: inverses,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn permutation_count(&self) -> usize {
        self.permutations.len()
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn band_size(&self) -> usize {
        self.band_size
    }

    /// The smallest row index at which permutation `i` places a member of
    /// `columns`, i.e. the MinHash signature entry for that permutation
    /// (spec §4.3 step 2). `None` iff `columns` is empty.
    pub fn min_position(&self, permutation_index: usize, columns: &[Column]) -> Option<u32> {
        let inverse = &self.inverse[permutation_index];
        columns.iter().map(|&c| inverse[c as usize]).min()
    }

    /// Compute the full `P`-entry signature for a column set in one pass.
    pub fn signature(&self, columns: &[Column]) -> Option<Vec<u32>> {
        if columns.is_empty() {
            return None;
        }
        Some(
            (0..self.permutations.len())
                .map(|i| self.min_position(i, columns).expect("columns checked non-empty"))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_rows() {
        assert_eq!(PermutationFamily::new(0, 16, 8, 0), Err(PermuteError::ZeroRows));
    }

    #[test]
    fn rejects_zero_permutations() {
        assert_eq!(
            PermutationFamily::new(1024, 0, 8, 0),
            Err(PermuteError::ZeroPermutations)
        );
    }

    #[test]
    fn rejects_zero_bands() {
        assert_eq!(PermutationFamily::new(1024, 16, 0, 0), Err(PermuteError::ZeroBands));
    }

    #[test]
    fn rejects_bands_not_dividing_permutations() {
        assert_eq!(
            PermutationFamily::new(1024, 16, 5, 0),
            Err(PermuteError::BandsDoNotDivide {
                permutations: 16,
                bands: 5
            })
        );
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let a = PermutationFamily::new(1024, 16, 4, 42).unwrap();
        let b = PermutationFamily::new(1024, 16, 4, 42).unwrap();
        assert_eq!(a.permutations, b.permutations);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = PermutationFamily::new(1024, 16, 4, 1).unwrap();
        let b = PermutationFamily::new(1024, 16, 4, 2).unwrap();
        assert_ne!(a.permutations, b.permutations);
    }

    #[test]
    fn each_permutation_is_a_bijection_of_rows() {
        let family = PermutationFamily::new(64, 4, 2, 7).unwrap();
        for perm in &family.permutations {
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..64).collect::<Vec<_>>());
        }
    }

    #[test]
    fn signature_is_none_for_empty_columns() {
        let family = PermutationFamily::new(1024, 16, 4, 0).unwrap();
        assert_eq!(family.signature(&[]), None);
    }

    #[test]
    fn signature_has_one_entry_per_permutation() {
        let family = PermutationFamily::new(1024, 16, 4, 0).unwrap();
        let sig = family.signature(&[3, 17, 900]).unwrap();
        assert_eq!(sig.len(), 16);
    }

    #[test]
    fn signature_is_invariant_to_column_order() {
        let family = PermutationFamily::new(1024, 16, 4, 0).unwrap();
        let a = family.signature(&[3, 17, 900]).unwrap();
        let b = family.signature(&[900, 3, 17]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn band_size_divides_permutation_count() {
        let family = PermutationFamily::new(1024, 16, 4, 0).unwrap();
        assert_eq!(family.band_size(), 4);
        assert_eq!(family.bands() * family.band_size(), family.permutation_count());
    }
}
