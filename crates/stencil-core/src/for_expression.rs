/*
 * for_expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Splitting a loop directive into its source and alias parts.

use once_cell::sync::Lazy;
use regex::Regex;
use stencil_expr::SimpleExpression;
use stencil_source_map::SourceLocation;

use crate::error::{Result, TemplateError};

// `<aliases> in|of <source>`; the alias list is matched lazily so the first
// `in`/`of` separates the two
static FOR_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\s\S]*?)\s+(?:in|of)(?:\s+([\s\S]*))?$").expect("valid loop alias pattern")
});

// Trailing `, key` or `, key, index` outside any destructuring pattern
static FOR_ITERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",([^,\}\]]*)(?:,([^,\}\]]*))?$").expect("valid loop iterator pattern"));

/// The raw parts of `(value, key, index) in source`, each with its own
/// location inside the directive value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForExpression {
    pub source: SimpleExpression,
    pub value: Option<SimpleExpression>,
    pub key: Option<SimpleExpression>,
    pub index: Option<SimpleExpression>,
}

/// Split a loop directive value.
///
/// Parentheses around the alias list are dropped. Aliases that are left
/// empty (`(, i) in list`) come back as `None`.
pub fn parse_for_expression(exp: &SimpleExpression) -> Result<ForExpression> {
    let raw = exp.content.as_str();
    if raw.trim().is_empty() {
        return Err(TemplateError::MissingForSource);
    }

    let captures = FOR_ALIAS
        .captures(raw)
        .ok_or_else(|| TemplateError::MalformedFor(raw.trim().to_string()))?;
    let whole = SourceLocation::from_source(raw, exp.loc.start);

    let source = captures
        .get(2)
        .and_then(|m| part(&whole, m.start(), m.end()))
        .ok_or(TemplateError::MissingForSource)?;

    let aliases = captures.get(1).map_or(0..0, |m| m.range());
    let (mut start, mut end) = trimmed(raw, aliases.start, aliases.end);
    if raw[start..end].starts_with('(') {
        start += 1;
    }
    if raw[start..end].ends_with(')') {
        end -= 1;
    }
    let (start, end) = trimmed(raw, start, end);

    let (value_end, key, index) = match FOR_ITERATOR.captures(&raw[start..end]) {
        Some(iterator) => {
            let at = |group: usize| {
                iterator
                    .get(group)
                    .and_then(|m| part(&whole, start + m.start(), start + m.end()))
            };
            let value_end = iterator.get(0).map_or(end, |m| start + m.start());
            (value_end, at(1), at(2))
        }
        None => (end, None, None),
    };

    Ok(ForExpression {
        source,
        value: part(&whole, start, value_end),
        key,
        index,
    })
}

/// The trimmed text of `start..end` as its own expression, if non-empty.
fn part(whole: &SourceLocation, start: usize, end: usize) -> Option<SimpleExpression> {
    let (start, end) = trimmed(&whole.source, start, end);
    if start >= end {
        return None;
    }
    let loc = whole.slice(start, end);
    Some(SimpleExpression::new(loc.source.clone(), loc))
}

fn trimmed(text: &str, start: usize, end: usize) -> (usize, usize) {
    let slice = &text[start..end];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    if leading == slice.len() {
        return (start, start);
    }
    (start + leading, end - trailing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stencil_source_map::Position;

    fn parse(source: &str) -> Result<ForExpression> {
        parse_for_expression(&SimpleExpression::from_source(source, Position::default()))
    }

    fn content(part: &Option<SimpleExpression>) -> Option<&str> {
        part.as_ref().map(|p| p.content.as_str())
    }

    #[test]
    fn test_value_only() {
        let parsed = parse("item in items").unwrap();
        assert_eq!(parsed.source.content, "items");
        assert_eq!(parsed.source.loc.start.offset, 8);
        assert_eq!(content(&parsed.value), Some("item"));
        assert_eq!(content(&parsed.key), None);
        assert_eq!(content(&parsed.index), None);
    }

    #[test]
    fn test_of_with_parens_key_and_index() {
        let parsed = parse("( item, key, index ) of list").unwrap();
        assert_eq!(parsed.source.content, "list");
        assert_eq!(content(&parsed.value), Some("item"));
        assert_eq!(content(&parsed.key), Some("key"));
        assert_eq!(content(&parsed.index), Some("index"));
        let key = parsed.key.unwrap();
        assert_eq!(key.loc.start.offset, 8);
        assert_eq!(key.loc.end.offset, 11);
    }

    #[test]
    fn test_destructured_value() {
        let parsed = parse("({ id, name }, i) in rows").unwrap();
        assert_eq!(content(&parsed.value), Some("{ id, name }"));
        assert_eq!(content(&parsed.key), Some("i"));
        assert_eq!(content(&parsed.index), None);
    }

    #[test]
    fn test_empty_value_slot() {
        let parsed = parse("(, i) in rows").unwrap();
        assert_eq!(content(&parsed.value), None);
        assert_eq!(content(&parsed.key), Some("i"));
    }

    #[test]
    fn test_source_on_later_line() {
        let parsed = parse("item in\n  items").unwrap();
        assert_eq!(parsed.source.loc.start, Position::new(10, 2, 3));
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(parse("items").unwrap_err(), TemplateError::MalformedFor("items".into()));
    }

    #[test]
    fn test_missing_source() {
        assert_eq!(parse("item in").unwrap_err(), TemplateError::MissingForSource);
        assert_eq!(parse("item in   ").unwrap_err(), TemplateError::MissingForSource);
        assert_eq!(parse("  ").unwrap_err(), TemplateError::MissingForSource);
    }
}
