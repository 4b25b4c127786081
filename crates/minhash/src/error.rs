use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Errors produced by a [`crate::MinHashFeature`] (spec §7).
#[derive(Debug, Error)]
pub enum MinHashError {
    /// Raised at construction; fatal, no feature is returned.
    #[error("invalid minhash config: {0}")]
    Config(String),

    /// Propagated from the caller-supplied tokenizer; the core does not
    /// catch it. `record` fails; earlier streams in the same call may
    /// already be durable.
    #[error("tokenizer error: {0}")]
    Tokenizer(#[source] BoxedError),

    /// Propagated after a failing batch. No auto-retry; state may be
    /// partially written.
    #[error("kv store error: {0}")]
    Kv(#[from] kv::KvError),

    /// Raised when the permutation family itself could not be built.
    #[error("permutation family error: {0}")]
    Permute(#[from] permute::PermuteError),
}

/// A type-erased error, used to carry an arbitrary caller tokenizer's
/// associated error type across the object-safe [`crate::Feature`] trait
/// boundary.
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl MinHashError {
    pub fn tokenizer<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        MinHashError::Tokenizer(BoxedError(Box::new(err)))
    }
}
