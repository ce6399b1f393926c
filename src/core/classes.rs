//! Class-token namespacing.
//!
//! Rewrites utility class names inside `class` attributes so every token
//! carries a namespace prefix, e.g. `hover:underline` -> `hover:tw-underline`.
//! Two shapes are recognised:
//!
//! - attribute style: `class="..."`, `class='...'`, `` class=`...` `` (or `class:` in object literals)
//! - call style: `class=(...)` followed by `}` or `,`, where every quoted
//!   literal inside the parentheses is a class list
//!
//! Embedded Liquid spans (`{{ ... }}`, `{% ... %}`) are held aside, never
//! prefixed, and appended after the tokens.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class([=:][_\w$]*)(?:"([^"'`]+)"|'([^"'`]+)'|`([^"'`]+)`)"#).unwrap()
});

static CLASS_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class([=:][_\w$]*)\((.*?)\)([},])").unwrap());

static QUOTED_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"'`]+)"|'([^"'`]+)'|`([^"'`]+)`"#).unwrap());

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[{%]-?[^}]*-?[%}]\}").unwrap());

const NEGATION: char = '!';

/// Prefix every class token in `source` with `prefix`.
///
/// Idempotent: already-prefixed tokens are left alone, so running the
/// rewrite twice gives the same text as running it once. An empty prefix
/// returns the input unchanged.
pub fn rewrite<'a>(source: &'a str, prefix: &str) -> Cow<'a, str> {
    if prefix.is_empty() {
        return Cow::Borrowed(source);
    }

    let attributes = CLASS_ATTR.replace_all(source, |caps: &Captures| {
        let (quote, value) = quoted(caps, 2);
        format!(
            "class{}{quote}{}{quote}",
            &caps[1],
            rewrite_class_list(value, prefix)
        )
    });

    let calls = CLASS_CALL.replace_all(&attributes, |caps: &Captures| {
        let arguments = QUOTED_LITERAL.replace_all(&caps[2], |lit: &Captures| {
            let (quote, value) = quoted(lit, 1);
            format!("{quote}{}{quote}", rewrite_class_list(value, prefix))
        });
        format!("class{}({}){}", &caps[1], arguments, &caps[3])
    });

    match calls {
        Cow::Borrowed(_) if matches!(attributes, Cow::Borrowed(_)) => Cow::Borrowed(source),
        calls => Cow::Owned(calls.into_owned()),
    }
}

/// The quote character and value of a three-way quote alternation starting at `first`.
fn quoted<'c>(caps: &Captures<'c>, first: usize) -> (char, &'c str) {
    ['"', '\'', '`']
        .into_iter()
        .zip(first..)
        .find_map(|(quote, i)| caps.get(i).map(|m| (quote, m.as_str())))
        .unwrap_or(('"', ""))
}

/// Rewrite one class list: tokens first, then the held-aside expressions.
pub fn rewrite_class_list(value: &str, prefix: &str) -> String {
    let expressions: Vec<&str> = EXPRESSION.find_iter(value).map(|m| m.as_str()).collect();
    let remainder = EXPRESSION.replace_all(value, " ");

    remainder
        .split_whitespace()
        .map(|token| prefix_token(token, prefix))
        .chain(expressions.into_iter().map(str::to_string))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prefix the base (last `:`-separated) segment of a token.
///
/// Segments with unbalanced brackets belong to an arbitrary value that
/// itself contains `:`; they are left as they are.
pub fn prefix_token(token: &str, prefix: &str) -> String {
    let segments: Vec<&str> = token.split(':').collect();
    let last = segments.len() - 1;

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i == last && !segment.is_empty() && brackets_balanced(segment) {
                prefix_base(segment, prefix)
            } else {
                Cow::Borrowed(*segment)
            }
        })
        .collect::<Vec<_>>()
        .join(":")
}

fn prefix_base<'s>(segment: &'s str, prefix: &str) -> Cow<'s, str> {
    let unnegated = segment.strip_prefix(NEGATION);
    if segment.starts_with(prefix) || unnegated.is_some_and(|rest| rest.starts_with(prefix)) {
        return Cow::Borrowed(segment);
    }
    match unnegated {
        Some(rest) => Cow::Owned(format!("{NEGATION}{prefix}{rest}")),
        None => Cow::Owned(format!("{prefix}{segment}")),
    }
}

fn brackets_balanced(segment: &str) -> bool {
    segment.matches('[').count() == segment.matches(']').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const P: &str = "tw-";

    #[test]
    fn test_basic_attribute() {
        assert_eq!(
            rewrite(r#"<div class="btn text-lg hover:underline">"#, P),
            r#"<div class="tw-btn tw-text-lg hover:tw-underline">"#
        );
    }

    #[test]
    fn test_quote_styles() {
        assert_eq!(rewrite("class='a b'", P), "class='tw-a tw-b'");
        assert_eq!(rewrite("class=`a`", P), "class=`tw-a`");
        assert_eq!(rewrite(r#"class:list="a""#, P), r#"class:list="a""#);
        assert_eq!(rewrite(r#"class:"a""#, P), r#"class:"tw-a""#);
    }

    #[test]
    fn test_negation_and_existing_prefix() {
        assert_eq!(prefix_token("!mt-2", P), "!tw-mt-2");
        assert_eq!(prefix_token("md:!hidden", P), "md:!tw-hidden");
        assert_eq!(prefix_token("tw-flex", P), "tw-flex");
        assert_eq!(prefix_token("!tw-flex", P), "!tw-flex");
        assert_eq!(prefix_token("md:tw-flex", P), "md:tw-flex");
    }

    #[test]
    fn test_arbitrary_values() {
        assert_eq!(prefix_token("w-[10px]", P), "tw-w-[10px]");
        assert_eq!(prefix_token("[&>*]:p-2", P), "[&>*]:tw-p-2");
        assert_eq!(
            prefix_token("bg-[url(https://x.test/a.png)]", P),
            "bg-[url(https://x.test/a.png)]"
        );
        assert_eq!(prefix_token("hover:", P), "hover:");
    }

    #[test]
    fn test_expressions_are_held_aside() {
        let source = r#"<div class="p-4 {% if active %}is-active{% endif %} {{ extra }} flex">"#;
        assert_eq!(
            rewrite(source, P),
            r#"<div class="tw-p-4 tw-is-active tw-flex {% if active %} {% endif %} {{ extra }}">"#
        );
    }

    #[test]
    fn test_call_style() {
        let source = r#"<div class=("p-2 md:p-4", active && 'ring', other)}>"#;
        assert_eq!(
            rewrite(source, P),
            r#"<div class=("tw-p-2 md:tw-p-4", active && 'tw-ring', other)}>"#
        );
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(
            rewrite("class=\"  a\n\t b  \"", P),
            "class=\"tw-a tw-b\""
        );
    }

    #[test]
    fn test_value_with_quotes_is_not_touched() {
        let source = r#"class="{{ 'x' | append: 'y' }}""#;
        assert_eq!(rewrite(source, P), source);
    }

    #[test]
    fn test_empty_prefix_is_identity() {
        let source = "class=\"  a   b \"";
        assert!(matches!(rewrite(source, ""), Cow::Borrowed(s) if s == source));
    }

    #[test]
    fn test_idempotent() {
        let source = r#"<a class="!x md:y w-[1px] {{ z }}"><b class=("c", 'd:e')}>"#;
        let once = rewrite(source, P).into_owned();
        let twice = rewrite(&once, P).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_match_borrows() {
        assert!(matches!(rewrite("<p>plain</p>", P), Cow::Borrowed(_)));
    }
}
