//! Translation extraction from template text.
//!
//! Finds `<t>...</t>` spans (optionally `<t id="...">`), assigns each a key in
//! the file's group and replaces the span with a `{{ "group.key" | t }}`
//! reference. Spans are matched left to right, non-overlapping and
//! non-nested. An opening tag without a close, or with another opening tag
//! before its close, is reported and left in place verbatim.

mod strategy;
mod table;

pub use strategy::{Assignment, FALLBACK_SUFFIX, KeyStrategy, SHORT_PHRASE_WORDS, assign_key};
pub use table::{TranslationTable, Translations};

use std::sync::LazyLock;

use regex::Regex;

use crate::core::normalize::NormalizedKey;
use crate::utils::{build_line_index, line_col};

static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<t(\s[^>]*)?>").unwrap());

static CLOSE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</t>").unwrap());

static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// A well-formed translatable span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    /// Value of the `id` attribute, if any.
    pub id: Option<&'a str>,
    /// Inner text, exactly as written.
    pub text: &'a str,
    /// Byte offset of the opening tag.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// No closing tag follows.
    Unclosed,
    /// Another opening tag appears before the closing tag.
    Nested,
}

/// An opening tag that could not be paired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSpan {
    pub kind: MalformedKind,
    pub offset: usize,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub col: usize,
}

/// Rewritten text plus any spans that were left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    pub malformed: Vec<MalformedSpan>,
}

/// Extract every span in `source` into `group`'s table and return the rewritten text.
///
/// Only `group`'s table is touched. Given the same source and starting table
/// the result is always identical.
pub fn extract(group: &NormalizedKey, source: &str, table: &mut TranslationTable) -> Extraction {
    scan(source, |span| match assign_key(span.id, span.text, table).key() {
        Some(key) => reference(group, key),
        None => span.text.to_string(),
    })
}

/// Opening tags in `source` that cannot be paired, without rewriting anything.
pub fn malformed_spans(source: &str) -> Vec<MalformedSpan> {
    scan(source, |_| String::new()).malformed
}

/// Replace every span by its inner text (localization disabled).
pub fn unwrap_spans(source: &str) -> Extraction {
    scan(source, |span| span.text.to_string())
}

/// Template reference to a translation key.
pub fn reference(group: &NormalizedKey, key: &NormalizedKey) -> String {
    format!("{{{{ \"{}.{}\" | t }}}}", group, key)
}

fn scan<'a>(source: &'a str, mut replace: impl FnMut(Span<'a>) -> String) -> Extraction {
    let mut text = String::with_capacity(source.len());
    let mut malformed = Vec::new();
    let mut cursor = 0;

    while let Some(open) = OPEN_TAG.captures_at(source, cursor) {
        let tag = open.get(0).map_or(cursor..cursor, |m| m.range());
        let inner_start = tag.end;

        let Some(close) = CLOSE_TAG.find_at(source, inner_start) else {
            // Nothing after this point can be paired.
            malformed.extend(
                OPEN_TAG
                    .find_iter(&source[tag.start..])
                    .map(|m| (MalformedKind::Unclosed, tag.start + m.start())),
            );
            break;
        };

        if let Some(nested) = OPEN_TAG.find_at(source, inner_start)
            && nested.start() < close.start()
        {
            malformed.push((MalformedKind::Nested, tag.start));
            text.push_str(&source[cursor..nested.start()]);
            cursor = nested.start();
            continue;
        }

        let id = open
            .get(1)
            .and_then(|attrs| ID_ATTR.captures(attrs.as_str()))
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str());

        text.push_str(&source[cursor..tag.start]);
        text.push_str(&replace(Span {
            id,
            text: &source[inner_start..close.start()],
            offset: tag.start,
        }));
        cursor = close.end();
    }
    text.push_str(&source[cursor..]);

    Extraction {
        text,
        malformed: locate(source, malformed),
    }
}

fn locate(source: &str, found: Vec<(MalformedKind, usize)>) -> Vec<MalformedSpan> {
    if found.is_empty() {
        return Vec::new();
    }
    let index = build_line_index(source);
    found
        .into_iter()
        .map(|(kind, offset)| {
            let (line, col) = line_col(source, &index, offset);
            MalformedSpan {
                kind,
                offset,
                line,
                col,
            }
        })
        .collect()
}
