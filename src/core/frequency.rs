//! Locale frequency index.
//!
//! Counts how often each short human text occurs across the whole schema
//! forest of a pass. Texts seen more than once are hoisted into the shared
//! `all` namespace by the localizer.

use std::collections::HashMap;

use crate::core::normalize::{NormalizedKey, normalize};
use crate::core::schema::Section;
use crate::utils::word_count;

/// Texts with more words than this are never hoisted.
pub const DEFAULT_HOIST_WORD_LIMIT: usize = 4;

#[derive(Debug, Clone)]
pub struct FrequencyIndex {
    /// Occurrences in traversal order, keyed by normalized text.
    entries: HashMap<NormalizedKey, Vec<String>>,
    word_limit: usize,
}

impl Default for FrequencyIndex {
    fn default() -> Self {
        Self::empty(DEFAULT_HOIST_WORD_LIMIT)
    }
}

impl FrequencyIndex {
    /// An index that never reports a shared text.
    pub fn empty(word_limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            word_limit,
        }
    }

    /// Build the index over every setting of every section and its custom
    /// blocks, depth-first in document order.
    ///
    /// Must be given the complete current forest: hoisting is a global
    /// decision and a partial forest yields wrong placements silently.
    pub fn build<'a>(sections: impl IntoIterator<Item = &'a Section>, word_limit: usize) -> Self {
        let mut index = Self::empty(word_limit);
        for section in sections {
            for setting in section.all_settings() {
                for text in setting.translatable_texts() {
                    index.record(text);
                }
            }
        }
        index
    }

    fn record(&mut self, text: &str) {
        if word_count(text) > self.word_limit {
            return;
        }
        let key = normalize(text);
        if key.is_empty() {
            return;
        }
        self.entries.entry(key).or_default().push(text.to_string());
    }

    pub fn word_limit(&self) -> usize {
        self.word_limit
    }

    /// Number of recorded occurrences of `key`.
    pub fn count(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, Vec::len)
    }

    /// First recorded occurrence of `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|texts| texts.first())
            .map(String::as_str)
    }

    /// Whether `text` belongs in the shared namespace.
    pub fn is_shared(&self, text: &str) -> bool {
        word_count(text) <= self.word_limit && self.count(normalize(text).as_str()) > 1
    }

    /// Keys occurring more than once, with their first occurrence, sorted by key.
    pub fn shared_entries(&self) -> Vec<(&NormalizedKey, &str)> {
        let mut shared: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, texts)| texts.len() > 1)
            .map(|(key, texts)| (key, texts[0].as_str()))
            .collect();
        shared.sort_by(|a, b| a.0.cmp(b.0));
        shared
    }
}
