use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;

use kv::KvCluster;
use permute::PermutationFamily;
use tokenize::{stable_hash, Tokenizer};
use tracing::{debug, instrument};

use crate::config::MinHashConfig;
use crate::error::MinHashError;
use crate::feature_trait::Feature;
use crate::keys::{encode_band, forward_key, reverse_key};

/// A fixed hash seed for mapping tokens to signature columns, deliberately
/// independent of `MinHashConfig::seed` (which seeds the permutation
/// family): changing the permutation seed should reshuffle the bands
/// without also reassigning every token's column.
const COLUMN_HASH_SEED: u64 = 0x5151_c0de;

/// Records and queries MinHash/LSH signatures for one named feature
/// (spec §4.3–§4.5). Generic over the record value `V` and its tokenizer
/// `T`; different features in a [`crate::FeatureManager`]-style composition
/// may use different `(V, T)` pairs as long as each implements
/// [`Feature<V>`] for a shared `V`.
pub struct MinHashFeature<V, T> {
    label: String,
    config: MinHashConfig,
    permutations: PermutationFamily,
    tokenizer: T,
    cluster: Arc<KvCluster>,
    _marker: PhantomData<fn(&V)>,
}

impl<V, T> MinHashFeature<V, T>
where
    T: Tokenizer<V>,
    T::Token: AsRef<str> + Sync,
{
    pub fn new(
        label: impl Into<String>,
        config: MinHashConfig,
        tokenizer: T,
        cluster: Arc<KvCluster>,
    ) -> Result<Self, MinHashError> {
        config.validate()?;
        let permutations =
            PermutationFamily::new(config.rows, config.permutations, config.bands, config.seed)?;
        Ok(Self {
            label: label.into(),
            config,
            permutations,
            tokenizer,
            cluster,
            _marker: PhantomData,
        })
    }

    pub fn config(&self) -> &MinHashConfig {
        &self.config
    }

    /// Hash every token in the stream to its signature column. Parallelized
    /// with `rayon` the way the teacher's `crates/perceptual` parallelizes
    /// its own per-token hashing passes; worthwhile once a stream carries
    /// more than a handful of shingles.
    fn column_set(&self, tokens: &[T::Token]) -> HashSet<u32> {
        use rayon::prelude::*;
        tokens
            .par_iter()
            .map(|t| (stable_hash(t.as_ref(), COLUMN_HASH_SEED) % self.config.rows as u64) as u32)
            .collect()
    }

    #[instrument(skip(self, value), fields(label = %self.label))]
    pub fn record(&self, scope: &str, key: &str, value: &V) -> Result<(), MinHashError> {
        let streams = self.tokenizer.streams(value).map_err(MinHashError::tokenizer)?;

        for tokens in streams {
            let columns = self.column_set(&tokens);
            if columns.is_empty() {
                debug!(scope, key, label = %self.label, "skipping stream with empty column set");
                continue;
            }
            let column_vec: Vec<u32> = columns.into_iter().collect();
            let signature = self
                .permutations
                .signature(&column_vec)
                .expect("column set checked non-empty above");

            let mut pipeline = self.cluster.pipeline();
            let band_size = self.config.band_size();
            for band in 0..self.config.bands {
                let entries = &signature[band * band_size..(band + 1) * band_size];
                let band_value = encode_band(entries);
                let fwd = forward_key(&self.config.namespace, &self.label, scope, band, &band_value);
                let rev = reverse_key(&self.config.namespace, &self.label, scope, band, key);
                pipeline.sadd(fwd, key.to_string());
                pipeline.zincrby(rev, band_value, 1.0);
            }
            pipeline.flush()?;
        }
        Ok(())
    }

    #[instrument(skip(self), fields(label = %self.label))]
    pub fn get_similar(&self, scope: &str, key: &str) -> Result<Vec<(String, f64)>, MinHashError> {
        let bands = self.config.bands;
        let ns = &self.config.namespace;

        // Step 1: self-histograms, one range read per band, all in one batch.
        let mut pipe1 = self.cluster.pipeline();
        let self_handles: Vec<_> = (0..bands)
            .map(|band| pipe1.zrange_all(reverse_key(ns, &self.label, scope, band, key)))
            .collect();
        let flushed1 = pipe1.flush()?;
        let raw_q: Vec<Vec<(String, f64)>> =
            self_handles.into_iter().map(|h| flushed1.scored(h)).collect();
        let dist_q: Vec<HashMap<String, f64>> = raw_q.iter().map(|raw| normalize(raw)).collect();

        // Step 2: candidate generation, one smembers per (band, band-value)
        // present in the query's own histogram, all in one batch.
        let mut pipe2 = self.cluster.pipeline();
        let mut bucket_handles = Vec::new();
        for (band, hist) in raw_q.iter().enumerate() {
            for (band_value, _count) in hist {
                let fwd = forward_key(ns, &self.label, scope, band, band_value);
                bucket_handles.push(pipe2.smembers(fwd));
            }
        }
        let flushed2 = pipe2.flush()?;
        let mut candidates: HashSet<String> = HashSet::new();
        for handle in bucket_handles {
            candidates.extend(flushed2.members(handle));
        }
        if self.config.include_self {
            candidates.insert(key.to_string());
        } else {
            candidates.remove(key);
        }
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Step 3: candidate histograms, all B bands per candidate, one batch.
        let mut candidate_list: Vec<String> = candidates.into_iter().collect();
        candidate_list.sort();
        let mut pipe3 = self.cluster.pipeline();
        let candidate_handles: Vec<Vec<_>> = candidate_list
            .iter()
            .map(|candidate| {
                (0..bands)
                    .map(|band| pipe3.zrange_all(reverse_key(ns, &self.label, scope, band, candidate)))
                    .collect()
            })
            .collect();
        let flushed3 = pipe3.flush()?;

        // Step 4 + 5: fuse per-band L2 distances into a similarity score,
        // then sort descending (ties broken by candidate key).
        let mut results = Vec::with_capacity(candidate_list.len());
        for (candidate, handles) in candidate_list.into_iter().zip(candidate_handles) {
            let mut accumulated = 0.0;
            for (band, handle) in handles.into_iter().enumerate() {
                let raw_c = flushed3.scored(handle);
                let dist_c = normalize(&raw_c);
                accumulated += l2_distance(&dist_q[band], &dist_c) / std::f64::consts::SQRT_2;
            }
            let similarity = 1.0 - accumulated / bands as f64;
            results.push((candidate, similarity));
        }

        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Ok(results)
    }
}

impl<V, T> Feature<V> for MinHashFeature<V, T>
where
    T: Tokenizer<V> + Send + Sync,
    T::Token: AsRef<str> + Sync,
{
    fn record(&self, scope: &str, key: &str, value: &V) -> Result<(), MinHashError> {
        MinHashFeature::record(self, scope, key, value)
    }

    fn get_similar(&self, scope: &str, key: &str) -> Result<Vec<(String, f64)>, MinHashError> {
        MinHashFeature::get_similar(self, scope, key)
    }
}

/// Normalize raw `(member, count)` pairs into a probability distribution.
/// An empty or all-zero input yields the all-zero distribution (spec §4.5
/// step 1: "skip normalization for an empty mapping; yield an all-zero
/// distribution instead").
fn normalize(raw: &[(String, f64)]) -> HashMap<String, f64> {
    let sum: f64 = raw.iter().map(|(_, count)| count).sum();
    if sum == 0.0 {
        return HashMap::new();
    }
    raw.iter().map(|(value, count)| (value.clone(), count / sum)).collect()
}

/// Euclidean distance over the union of both distributions' keys; a key
/// missing from one side contributes 0 (spec §4.5 step 4).
fn l2_distance(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let mut keys: HashSet<&String> = HashSet::with_capacity(a.len() + b.len());
    keys.extend(a.keys());
    keys.extend(b.keys());
    keys.iter()
        .map(|k| {
            let av = a.get(*k).copied().unwrap_or(0.0);
            let bv = b.get(*k).copied().unwrap_or(0.0);
            (av - bv).powi(2)
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kv::InMemoryBackend;
    use tokenize::WhitespaceTokenizer;

    fn feature(config: MinHashConfig) -> MinHashFeature<String, WhitespaceTokenizer> {
        let cluster = Arc::new(KvCluster::single(InMemoryBackend::new()));
        MinHashFeature::new("message", config, WhitespaceTokenizer, cluster).unwrap()
    }

    fn small_config() -> MinHashConfig {
        MinHashConfig::default()
            .with_rows(1024)
            .with_permutations(8)
            .with_bands(4)
            .with_seed(0)
    }

    #[test]
    fn identity_scenario() {
        let f = feature(small_config());
        f.record("s", "a", &"the quick brown fox".to_string()).unwrap();
        let results = f.get_similar("s", "a").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "a");
        assert!((results[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn near_duplicate_scenario() {
        let f = feature(small_config());
        f.record("s", "a", &"the quick brown fox".to_string()).unwrap();
        f.record("s", "b", &"the quick brown fox jumps".to_string())
            .unwrap();
        let results = f.get_similar("s", "a").unwrap();
        let a_sim = results.iter().find(|(k, _)| k == "a").unwrap().1;
        let b_sim = results.iter().find(|(k, _)| k == "b").unwrap().1;
        assert!((a_sim - 1.0).abs() < 1e-9);
        assert!(b_sim > 0.0 && b_sim < a_sim);
    }

    #[test]
    fn disjoint_scenario() {
        let f = feature(small_config());
        f.record("s", "a", &"alpha beta gamma".to_string()).unwrap();
        f.record("s", "b", &"xyzzy plover plugh".to_string()).unwrap();
        let results = f.get_similar("s", "a").unwrap();
        if let Some((_, sim)) = results.iter().find(|(k, _)| k == "b") {
            assert!(*sim <= 0.1);
        }
    }

    #[test]
    fn scope_isolation_scenario() {
        let f = feature(small_config());
        f.record("s1", "a", &"shared content here".to_string()).unwrap();
        f.record("s2", "a", &"totally different words".to_string())
            .unwrap();
        let results = f.get_similar("s1", "a").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "a");
    }

    #[test]
    fn unknown_key_returns_empty() {
        let f = feature(small_config());
        assert_eq!(f.get_similar("s", "missing").unwrap(), Vec::new());
    }

    #[test]
    fn empty_value_records_nothing_and_is_not_an_error() {
        let f = feature(small_config());
        f.record("s", "a", &"   ".to_string()).unwrap();
        assert_eq!(f.get_similar("s", "a").unwrap(), Vec::new());
    }

    #[test]
    fn include_self_false_filters_query_key() {
        let f = feature(small_config().with_include_self(false));
        f.record("s", "a", &"the quick brown fox".to_string()).unwrap();
        let results = f.get_similar("s", "a").unwrap();
        assert!(results.iter().all(|(k, _)| k != "a"));
    }

    #[test]
    fn repeated_record_accumulates_reverse_counts() {
        let f = feature(small_config());
        f.record("s", "a", &"the quick brown fox".to_string()).unwrap();
        f.record("s", "a", &"the quick brown fox".to_string()).unwrap();
        let results = f.get_similar("s", "a").unwrap();
        assert_eq!(results[0].0, "a");
        assert!((results[0].1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn similarity_is_bounded_in_zero_one() {
        let f = feature(small_config());
        f.record("s", "a", &"the quick brown fox".to_string()).unwrap();
        f.record("s", "b", &"completely unrelated sentence text".to_string())
            .unwrap();
        for (_, sim) in f.get_similar("s", "a").unwrap() {
            assert!((0.0..=1.0).contains(&sim));
        }
    }
}
