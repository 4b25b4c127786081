use std::sync::Arc;

use kv::{InMemoryBackend, KvCluster};
use manager::FeatureManager;
use minhash::{MinHashConfig, MinHashFeature};
use tokenize::WhitespaceTokenizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = server::ServerConfig::from_env();
    let cluster = Arc::new(KvCluster::single(InMemoryBackend::new()));
    let message_feature = MinHashFeature::new("message", MinHashConfig::default(), WhitespaceTokenizer, cluster)?;
    let manager = FeatureManager::builder().with_feature("message", 1.0, message_feature).build();

    server::serve(config, manager).await?;
    Ok(())
}
