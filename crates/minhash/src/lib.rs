//! MinHash signature computation and LSH banding over a pipelined KV store.
//!
//! [`MinHashFeature`] is the core of this workspace (spec §2: "~55%"): it
//! derives MinHash signatures from tokenizer-produced streams, banding them
//! into forward/reverse LSH indexes maintained in a [`kv::KvCluster`], and
//! answers [`MinHashFeature::get_similar`] queries with a bounded number of
//! round trips regardless of index size.

mod config;
mod error;
mod feature;
mod feature_trait;
mod keys;

pub use config::MinHashConfig;
pub use error::{BoxedError, MinHashError};
pub use feature::MinHashFeature;
pub use feature_trait::Feature;
pub use keys::{encode_band, forward_key, reverse_key};
