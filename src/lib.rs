//! Near-duplicate retrieval index built on MinHash/LSH banding over a
//! pipelined key-value store.
//!
//! Facade crate re-exporting the workspace's member crates, the way the
//! teacher's root `src/lib.rs` re-exports its own sub-crates:
//!
//! - [`kv`] — the pipelined, sharded KV client abstraction.
//! - [`tokenize`] — tokenizers, shingling, and the stable token hash.
//! - [`permute`] — deterministic seeded permutation families.
//! - [`minhash`] — MinHash signature computation, recording, and querying.
//! - [`manager`] — weighted fusion of several named MinHash features.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kv::{InMemoryBackend, KvCluster};
//! use manager::FeatureManager;
//! use minhash::{MinHashConfig, MinHashFeature};
//! use tokenize::WhitespaceTokenizer;
//!
//! let cluster = Arc::new(KvCluster::single(InMemoryBackend::new()));
//! let message = MinHashFeature::new(
//!     "message",
//!     MinHashConfig::default(),
//!     WhitespaceTokenizer,
//!     cluster,
//! )
//! .expect("valid config");
//!
//! let manager = FeatureManager::builder()
//!     .with_feature("message", 1.0, message)
//!     .build();
//!
//! manager.record("tenant-1", "event-1", &"the quick brown fox".to_string()).unwrap();
//! let similar = manager.get_similar("tenant-1", "event-1").unwrap();
//! assert_eq!(similar[0].0, "event-1");
//! ```

pub use kv;
pub use manager;
pub use minhash;
pub use permute;
pub use tokenize;

pub use manager::{FeatureManager, FeatureManagerBuilder, ManagerError};
pub use minhash::{Feature, MinHashConfig, MinHashError, MinHashFeature};

use thiserror::Error;

/// Top-level error wrapping every sub-crate's error type, for callers that
/// want a single error type at the facade boundary (teacher convention:
/// `src/lib.rs::PipelineError` wraps each stage's error with `#[from]`).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Manager(#[from] ManagerError),
    #[error(transparent)]
    MinHash(#[from] MinHashError),
    #[error(transparent)]
    Permute(#[from] permute::PermuteError),
    #[error(transparent)]
    Kv(#[from] kv::KvError),
}
