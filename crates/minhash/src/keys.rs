/// Deterministic, bit-exact key encoding (spec §6).
///
/// `bandvalue` is the band's signature entries joined by `','` with default
/// decimal formatting — unambiguous because entries are non-negative
/// integers in `[0, R)`.
pub fn encode_band(entries: &[u32]) -> String {
    entries
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Forward bucket key: `"{ns}:{label}:{scope}:0:{band}:{bandvalue}"`.
pub fn forward_key(ns: &str, label: &str, scope: &str, band: usize, band_value: &str) -> String {
    format!("{ns}:{label}:{scope}:0:{band}:{band_value}")
}

/// Reverse histogram key: `"{ns}:{label}:{scope}:1:{band}:{key}"`.
///
/// Spec §6 gives `"{ns}:{label}:{scope}:{key}:1:{band}:{key}"`, which
/// repeats `{key}`; see `DESIGN.md` for why this resolves to the form used
/// here (mirrors the forward key's shape, one extra `{label}` segment over
/// the original Python's `"{ns}:{scope}:1:{band}:{key}"`, never a duplicate
/// `{key}`).
pub fn reverse_key(ns: &str, label: &str, scope: &str, band: usize, key: &str) -> String {
    format!("{ns}:{label}:{scope}:1:{band}:{key}")
}
