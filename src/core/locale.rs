//! Locale JSON documents.
//!
//! Dotted locale paths (`sections.hero.settings.title.label`) are expanded
//! into nested objects, preserving insertion order.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::core::frequency::FrequencyIndex;
use crate::core::localize::{LocaleEntry, SHARED_SCOPE};

/// Action taken on a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
}

/// A locale file under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleDocument {
    data: Map<String, Value>,
}

impl LocaleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value at a dotted path, creating intermediate objects.
    pub fn insert(&mut self, path: &str, value: Value) -> KeyAction {
        let parts: Vec<&str> = path.split('.').collect();
        insert_nested(&mut self.data, &parts, value)
    }

    /// Make sure an (empty) object exists at `path`.
    pub fn ensure_object(&mut self, path: &str) {
        let parts: Vec<&str> = path.split('.').collect();
        let mut current = &mut self.data;
        for part in parts {
            let next = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !next.is_object() {
                *next = Value::Object(Map::new());
            }
            let Value::Object(inner) = next else {
                return;
            };
            current = inner;
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = self.data.get(parts.next()?)?;
        parts.try_fold(first, |value, part| value.get(part))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    /// Pretty JSON (2-space indentation) with a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize locale JSON")?;
        Ok(format!("{}\n", content))
    }
}

/// The schema locale document for one root (`sections`, `blocks`, `settings_schema`).
///
/// `<root>.all` comes first and holds the first occurrence of every shared
/// text; scoped entries follow in the order the localizer produced them.
pub fn schema_locale<'a>(
    root: &str,
    index: &FrequencyIndex,
    entries: impl IntoIterator<Item = &'a LocaleEntry>,
) -> LocaleDocument {
    let mut document = LocaleDocument::new();
    let shared_scope = format!("{root}.{SHARED_SCOPE}");
    document.ensure_object(&shared_scope);

    for (key, text) in index.shared_entries() {
        document.insert(&format!("{shared_scope}.{key}"), Value::String(text.to_string()));
    }
    for entry in entries {
        document.insert(&entry.path, Value::String(entry.text.clone()));
    }
    document
}

/// Insert a value at a nested path, creating intermediate objects as needed
fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: Value) -> KeyAction {
    let Some((first, rest)) = path.split_first() else {
        return KeyAction::Added;
    };

    if rest.is_empty() {
        return match root.insert(first.to_string(), value) {
            Some(_) => KeyAction::Updated,
            None => KeyAction::Added,
        };
    }

    let next_level = root
        .entry(first.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    // A leaf in the way is replaced by an object
    if !next_level.is_object() {
        *next_level = Value::Object(Map::new());
    }

    match next_level {
        Value::Object(inner) => insert_nested(inner, rest, value),
        _ => KeyAction::Added,
    }
}
