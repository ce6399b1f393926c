//! Identifier normalization.
//!
//! Every key this crate emits (translation keys, schema reference segments,
//! translation groups) goes through [`normalize`]. Keys are diffed against
//! previously generated files, so the mapping must stay stable across runs.

use std::borrow::Borrow;
use std::fmt;

/// Separator placed between alphanumeric runs.
pub const SEPARATOR: char = '_';

/// A slug derived from arbitrary human text (newtype for type safety).
///
/// Two different texts may normalize to the same key; callers that need
/// uniqueness resolve the collision themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a literal suffix, e.g. `save_changes` -> `save_changes_2`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalize human text into a [`NormalizedKey`].
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single [`SEPARATOR`] and drops leading/trailing separators. Total: the
/// empty string (or pure punctuation) normalizes to the empty key.
///
/// # Examples
///
/// ```
/// use themegen::core::normalize;
///
/// assert_eq!(normalize("Save changes").as_str(), "save_changes");
/// assert_eq!(normalize("  --Hello,   World!-- ").as_str(), "hello_world");
/// assert_eq!(normalize("").as_str(), "");
/// ```
pub fn normalize(text: &str) -> NormalizedKey {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(SEPARATOR);
            }
            pending_separator = false;
            out.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    NormalizedKey(out)
}
