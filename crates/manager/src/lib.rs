//! Weighted fusion of several named MinHash features (spec §4.6).
//!
//! Grounded on the teacher's `crates/matcher/src/engine.rs::calculate_final_score`
//! (weighted combination across signals) and `::postprocess_hits` (merging
//! per-signal result sets by key), generalized from a fixed exact/semantic/
//! perceptual split into an arbitrary named-feature map.

mod error;

use std::collections::HashMap;

pub use error::ManagerError;
use minhash::Feature;

/// One named, weighted feature inside a [`FeatureManager`].
struct Entry<V> {
    label: String,
    weight: f64,
    feature: Box<dyn Feature<V>>,
}

/// Composes several named [`Feature`]s with scalar weights (spec §4.6).
///
/// `record` dispatches to every feature independently; `get_similar`
/// collects per-feature ranked lists, indexes them by candidate key, and
/// fuses them as `score(c) = Σ_label weight[label] × sim_label(q, c)`,
/// where a feature that doesn't return a candidate contributes 0 for it.
pub struct FeatureManager<V> {
    entries: Vec<Entry<V>>,
}

impl<V> FeatureManager<V> {
    pub fn builder() -> FeatureManagerBuilder<V> {
        FeatureManagerBuilder::new()
    }

    pub fn record(&self, scope: &str, key: &str, value: &V) -> Result<(), ManagerError> {
        let mut failures = Vec::new();
        for entry in &self.entries {
            if let Err(source) = entry.feature.record(scope, key, value) {
                failures.push((entry.label.clone(), source));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ManagerError::Record(failures))
        }
    }

    pub fn get_similar(&self, scope: &str, key: &str) -> Result<Vec<(String, f64)>, ManagerError> {
        let mut fused: HashMap<String, f64> = HashMap::new();
        for entry in &self.entries {
            let results = entry
                .feature
                .get_similar(scope, key)
                .map_err(|source| ManagerError::Query {
                    label: entry.label.clone(),
                    source,
                })?;
            for (candidate, sim) in results {
                *fused.entry(candidate).or_insert(0.0) += entry.weight * sim;
            }
        }
        let mut results: Vec<(String, f64)> = fused.into_iter().collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Ok(results)
    }
}

/// Fluent builder for [`FeatureManager`], mirroring the teacher's
/// builder-style configs elsewhere in this workspace.
pub struct FeatureManagerBuilder<V> {
    entries: Vec<Entry<V>>,
}

impl<V> FeatureManagerBuilder<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with_feature(
        mut self,
        label: impl Into<String>,
        weight: f64,
        feature: impl Feature<V> + 'static,
    ) -> Self {
        self.entries.push(Entry {
            label: label.into(),
            weight,
            feature: Box::new(feature),
        });
        self
    }

    pub fn build(self) -> FeatureManager<V> {
        FeatureManager {
            entries: self.entries,
        }
    }
}

impl<V> Default for FeatureManagerBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
