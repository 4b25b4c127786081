use thiserror::Error;

/// Errors raised constructing a [`crate::PermutationFamily`].
///
/// Spec §7: "Configuration error — raised at construction when `P mod B ≠
/// 0`, `R ≤ 0`, or any permutation cannot be built. Fatal; no object is
/// returned."
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermuteError {
    #[error("rows (R) must be greater than zero")]
    ZeroRows,

    #[error("permutations (P={permutations}) must be a positive multiple of bands (B={bands})")]
    BandsDoNotDivide { permutations: usize, bands: usize },

    #[error("permutations (P) must be greater than zero")]
    ZeroPermutations,

    #[error("bands (B) must be greater than zero")]
    ZeroBands,
}
