use serde::{Deserialize, Serialize};

use crate::error::MinHashError;

/// Tunable parameters for one [`crate::MinHashFeature`] (spec §6:
/// "Configuration per feature: `(rows R, permutations P, bands B, seed,
/// namespace, tokenizer)`").
///
/// Shaped like the teacher's `PerceptualConfig`: `Default` + fluent
/// `with_*` builder + `validate()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinHashConfig {
    /// Number of rows each permutation ranges over. Typical reference
    /// value: `0xFFFF`.
    pub rows: u32,
    /// Number of permutations (signature length). Typical: `16`.
    pub permutations: usize,
    /// Number of LSH bands; must divide `permutations` evenly. Typical: `8`.
    pub bands: usize,
    /// Seed for the permutation family's deterministic shuffle.
    pub seed: u64,
    /// Index namespace prefix, used in every forward/reverse key.
    pub namespace: String,
    /// Whether `get_similar` retains the query key in its own candidate
    /// set. Spec §9 Open Question: "whether self-similarity should be
    /// `1.0` or whether the query key should be filtered from results" —
    /// resolved here as an explicit, documented, configurable knob.
    /// Defaults to `true`, matching the reference implementation.
    pub include_self: bool,
}

impl Default for MinHashConfig {
    fn default() -> Self {
        Self {
            rows: 0xFFFF,
            permutations: 16,
            bands: 8,
            seed: 0,
            namespace: "sim".to_string(),
            include_self: true,
        }
    }
}

impl MinHashConfig {
    pub fn with_rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    pub fn with_bands(mut self, bands: usize) -> Self {
        self.bands = bands;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_include_self(mut self, include_self: bool) -> Self {
        self.include_self = include_self;
        self
    }

    /// Validate before constructing a [`crate::MinHashFeature`]. Fatal on
    /// failure (spec §7: "Configuration error ... Fatal; no object is
    /// returned").
    pub fn validate(&self) -> Result<(), MinHashError> {
        if self.rows == 0 {
            return Err(MinHashError::Config("rows (R) must be greater than zero".into()));
        }
        if self.permutations == 0 {
            return Err(MinHashError::Config(
                "permutations (P) must be greater than zero".into(),
            ));
        }
        if self.bands == 0 {
            return Err(MinHashError::Config("bands (B) must be greater than zero".into()));
        }
        if self.permutations % self.bands != 0 {
            return Err(MinHashError::Config(format!(
                "permutations (P={}) must be a multiple of bands (B={})",
                self.permutations, self.bands
            )));
        }
        if self.namespace.trim().is_empty() {
            return Err(MinHashError::Config("namespace must not be empty".into()));
        }
        Ok(())
    }

    pub fn band_size(&self) -> usize {
        self.permutations / self.bands
    }
}
