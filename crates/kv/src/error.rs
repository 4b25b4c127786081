use thiserror::Error;

/// Errors surfaced by the KV abstraction.
///
/// The index does not retry on any of these (spec §7: backing-store errors
/// propagate to the caller after the failing batch). Grounded on the
/// teacher's `IndexError::backend(e.to_string())` pattern in
/// `crates/index/src/backend/redb.rs`: every concrete `redb` error is
/// collapsed to its message rather than threaded through as distinct
/// `#[from]` variants, since callers only ever need to surface it, not
/// pattern-match on it.
#[derive(Debug, Error)]
pub enum KvError {
    #[error("backing store error: {0}")]
    Backend(String),

    #[cfg(feature = "backend-redb")]
    #[error("encoding error: {0}")]
    Encode(String),
}

#[cfg(feature = "backend-redb")]
impl KvError {
    pub(crate) fn backend(err: impl std::fmt::Display) -> Self {
        KvError::Backend(err.to_string())
    }
}
