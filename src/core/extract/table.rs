//! Translation tables, one per group, kept in insertion order.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::core::normalize::NormalizedKey;

/// Key -> original text for a single group.
///
/// Order is insertion order so the serialized locale file is stable across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    entries: Vec<(NormalizedKey, String)>,
    positions: HashMap<NormalizedKey, usize>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.positions
            .get(key)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Insert or overwrite. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: NormalizedKey, text: impl Into<String>) -> Option<String> {
        let text = text.into();
        match self.positions.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, text)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, text));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect::<Map<String, Value>>(),
        )
    }
}

/// All groups produced during one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translations {
    groups: Vec<(NormalizedKey, TranslationTable)>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `group`, created empty on first use.
    pub fn group_mut(&mut self, group: &NormalizedKey) -> &mut TranslationTable {
        let index = match self.groups.iter().position(|(name, _)| name == group) {
            Some(index) => index,
            None => {
                self.groups.push((group.clone(), TranslationTable::new()));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index].1
    }

    pub fn group(&self, group: &str) -> Option<&TranslationTable> {
        self.groups
            .iter()
            .find(|(name, _)| name.as_str() == group)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, &TranslationTable)> {
        self.groups.iter().map(|(name, table)| (name, table))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, table)| table.is_empty())
    }

    /// `{ group: { key: text } }`; groups without entries are left out.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .filter(|(_, table)| !table.is_empty())
                .map(|(name, table)| (name.to_string(), table.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }
}
