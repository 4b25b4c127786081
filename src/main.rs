use std::sync::Arc;

use kv::{InMemoryBackend, KvCluster};
use manager::FeatureManager;
use minhash::{MinHashConfig, MinHashFeature};
use tokenize::WhitespaceTokenizer;

/// Small demo binary exercising the near-duplicate scenario from the
/// design's testable-properties section: two keys whose values overlap
/// heavily should both surface in each other's candidate set, with the
/// query key itself at similarity 1.0.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = MinHashConfig::default()
        .with_rows(1024)
        .with_permutations(8)
        .with_bands(4)
        .with_seed(0);

    let cluster = Arc::new(KvCluster::single(InMemoryBackend::new()));
    let message_feature = MinHashFeature::new("message", config, WhitespaceTokenizer, cluster)?;
    let manager = FeatureManager::builder()
        .with_feature("message", 1.0, message_feature)
        .build();

    manager.record("demo", "a", &"the quick brown fox".to_string())?;
    manager.record("demo", "b", &"the quick brown fox jumps".to_string())?;

    for (key, score) in manager.get_similar("demo", "a")? {
        println!("{key}\t{score:.4}");
    }

    Ok(())
}
