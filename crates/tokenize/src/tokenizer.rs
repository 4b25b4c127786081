use std::error::Error as StdError;

use crate::shingle::shingle;

/// A pure function `value → sequence of streams` (spec §4.1).
///
/// Each stream is a finite sequence of hashable tokens. A single value may
/// yield zero, one, or several streams (spec §3: "a single record may
/// contribute multiple streams"). Implementations are arbitrary
/// caller-supplied logic; different features may tokenize different `V`.
pub trait Tokenizer<V> {
    type Token: AsRef<str>;
    type Error: StdError + Send + Sync + 'static;

    fn streams(&self, value: &V) -> Result<Vec<Vec<Self::Token>>, Self::Error>;
}

/// Splits a string on Unicode whitespace into a single stream.
///
/// The concrete tokenizer assumed by spec §8's end-to-end scenarios
/// ("Tokenize as whitespace-split"), left abstract by spec.md itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer<String> for WhitespaceTokenizer {
    type Token = String;
    type Error = std::convert::Infallible;

    fn streams(&self, value: &String) -> Result<Vec<Vec<String>>, Self::Error> {
        let tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
        Ok(if tokens.is_empty() {
            Vec::new()
        } else {
            vec![tokens]
        })
    }
}

impl Tokenizer<str> for WhitespaceTokenizer {
    type Token = String;
    type Error = std::convert::Infallible;

    fn streams(&self, value: &str) -> Result<Vec<Vec<String>>, Self::Error> {
        let tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
        Ok(if tokens.is_empty() {
            Vec::new()
        } else {
            vec![tokens]
        })
    }
}

/// Composes an inner tokenizer with the `n`-gram shingler.
///
/// Grounded on the teacher's two-stage `shingles.rs` → `minhash.rs`
/// pipeline: tokenization and shingling are kept as separate, composable
/// stages rather than inlined into every tokenizer.
#[derive(Debug, Clone, Copy)]
pub struct Shingled<Inner> {
    inner: Inner,
    n: usize,
}

impl<Inner> Shingled<Inner> {
    pub fn new(inner: Inner, n: usize) -> Self {
        Self { inner, n }
    }
}

impl<V, Inner> Tokenizer<V> for Shingled<Inner>
where
    Inner: Tokenizer<V>,
    Inner::Token: AsRef<str>,
{
    type Token = JoinedShingle;
    type Error = Inner::Error;

    fn streams(&self, value: &V) -> Result<Vec<Vec<Self::Token>>, Self::Error> {
        let streams = self.inner.streams(value)?;
        Ok(streams
            .into_iter()
            .map(|tokens| {
                shingle(&tokens, self.n)
                    .iter()
                    .map(|window| JoinedShingle::join(window))
                    .collect()
            })
            .collect())
    }
}

/// A shingle rendered as a single joined string, so it can be hashed like
/// any other token. Shingling alone produces a window of tokens, which
/// doesn't implement `AsRef<str>`; this wraps that into something the
/// column-hashing step can consume directly. The join separator is a unit
/// separator control character, chosen so it can never appear in ordinary
/// tokenized text and so distinct windows never alias to the same string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedShingle(String);

impl JoinedShingle {
    pub fn join<T: AsRef<str>>(parts: &[T]) -> Self {
        let joined = parts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\u{1f}");
        JoinedShingle(joined)
    }
}

impl AsRef<str> for JoinedShingle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
