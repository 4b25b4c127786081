use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Stable, non-cryptographic 64-bit hash of a token.
///
/// Spec §9: "the tokenizer's hash MUST be specified and fixed ... so that
/// index data is portable across restarts and hosts." `xxh3_64_with_seed`
/// is the primitive the teacher uses throughout `crates/perceptual` for the
/// same reason (see `minhash.rs::mix_u64`): deterministic across processes,
/// platforms, and `xxhash-rust` releases within the same major version.
pub fn stable_hash(token: &str, seed: u64) -> u64 {
    xxh3_64_with_seed(token.as_bytes(), seed)
}
