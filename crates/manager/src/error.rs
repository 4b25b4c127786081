use minhash::MinHashError;
use thiserror::Error;

/// Errors produced by a [`crate::FeatureManager`].
///
/// Spec §7: "Weighted fusion in FeatureManager is fail-fast: a failing
/// sub-feature fails the whole query" — [`ManagerError::Query`] is returned
/// by `get_similar` on the first failing feature. `record`, by contrast,
/// dispatches to every feature independently (spec §4.6); a failing feature
/// does not stop the others from being attempted, and every failure is
/// reported together in [`ManagerError::Record`].
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("feature '{label}' failed: {source}")]
    Query { label: String, source: MinHashError },

    #[error("{} feature(s) failed during record", .0.len())]
    Record(Vec<(String, MinHashError)>),
}
