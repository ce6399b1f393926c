//! Key assignment for translatable spans.
//!
//! Candidates are tried in a fixed order. The first one that is free (or
//! already holds the same text) wins; when all collide, the short phrase key
//! gets a suffix and is taken unconditionally.

use crate::core::normalize::{NormalizedKey, normalize};
use crate::utils::leading_words;

use super::table::TranslationTable;

/// Number of leading words forming the short phrase key.
pub const SHORT_PHRASE_WORDS: usize = 2;

/// Appended to the short phrase key when every candidate collides.
pub const FALLBACK_SUFFIX: &str = "_2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// `<t id="...">`
    ExplicitId,
    /// First two words of the text.
    ShortPhrase,
    /// The whole text.
    FullText,
}

impl KeyStrategy {
    pub const ORDER: [KeyStrategy; 3] = [
        KeyStrategy::ExplicitId,
        KeyStrategy::ShortPhrase,
        KeyStrategy::FullText,
    ];

    /// Candidate key, or `None` when this strategy has nothing to offer.
    pub fn candidate(self, id: Option<&str>, text: &str) -> Option<NormalizedKey> {
        let key = match self {
            KeyStrategy::ExplicitId => normalize(id?),
            KeyStrategy::ShortPhrase => normalize(&leading_words(text, SHORT_PHRASE_WORDS)),
            KeyStrategy::FullText => normalize(text),
        };
        (!key.is_empty()).then_some(key)
    }
}

/// Outcome of assigning a key to one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// A free key was taken.
    Reserved(NormalizedKey),
    /// The key already held identical text.
    Reused(NormalizedKey),
    /// Every candidate collided; the suffixed key was overwritten.
    Forced(NormalizedKey),
    /// The text yields no key at all (e.g. only punctuation).
    Verbatim,
}

impl Assignment {
    pub fn key(&self) -> Option<&NormalizedKey> {
        match self {
            Assignment::Reserved(key) | Assignment::Reused(key) | Assignment::Forced(key) => {
                Some(key)
            }
            Assignment::Verbatim => None,
        }
    }
}

/// Assign a key for `text` in `table`, recording it when new.
pub fn assign_key(id: Option<&str>, text: &str, table: &mut TranslationTable) -> Assignment {
    for strategy in KeyStrategy::ORDER {
        let Some(key) = strategy.candidate(id, text) else {
            continue;
        };
        match table.get(key.as_str()) {
            None => {
                table.insert(key.clone(), text);
                return Assignment::Reserved(key);
            }
            Some(existing) if existing == text => return Assignment::Reused(key),
            Some(_) => {}
        }
    }

    match KeyStrategy::ShortPhrase.candidate(id, text) {
        Some(short) => {
            let key = short.with_suffix(FALLBACK_SUFFIX);
            table.insert(key.clone(), text);
            Assignment::Forced(key)
        }
        None => Assignment::Verbatim,
    }
}
