//! Normalized deduplication keys.

use serde::{Deserialize, Serialize};

/// Whole-word abbreviations expanded during normalization.
const ABBREVIATIONS: &[(&str, &str)] = &[("mlrd", "milliard"), ("mln", "million")];

/// Canonical form of a fact's text, used only for equality comparison.
///
/// Two facts are duplicates iff their keys are equal.
///
/// # Examples
///
/// ```
/// use bilim_core::NormalizedKey;
///
/// let a = NormalizedKey::new("Quyosh 4,6 mlrd yoshda!");
/// let b = NormalizedKey::new("  quyosh 46 milliard   yoshda ");
/// assert_eq!(a, b);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Normalizes `text` into a key.
    pub fn new(text: &str) -> Self {
        Self(normalize_fact(text))
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the normalized text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Lower-cases, strips punctuation, collapses whitespace and expands abbreviations.
///
/// Punctuation is removed before abbreviations are expanded so that the result
/// is a fixed point: normalizing it again yields the same string.
pub fn normalize_fact(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(expand_abbreviation)
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_abbreviation(word: &str) -> &str {
    ABBREVIATIONS
        .iter()
        .find(|(short, _)| *short == word)
        .map(|(_, long)| *long)
        .unwrap_or(word)
}
