//! Placeholder parsing helpers shared by the template engine.
//!
//! Templates use `#{any()}` and `#{any(fq.Type)}` placeholders. This module
//! centralises the lexing rules: extraction of the ordered placeholder list
//! and normalisation of the template source into parseable code, with each
//! placeholder replaced by a marker identifier.

use crate::error::RewriteError;

pub(crate) const MARKER_PREFIX: &str = "__refit_slot_";
pub(crate) const MARKER_SUFFIX: &str = "__";

/// One placeholder slot in a template, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Zero-based position of the slot.
    pub index: usize,
    /// The declared type constraint, if any.
    pub constraint: Option<String>,
}

/// Builds the marker identifier standing in for a placeholder.
#[must_use]
pub(crate) fn marker_for_slot(index: usize) -> String {
    format!("{MARKER_PREFIX}{index}{MARKER_SUFFIX}")
}

/// Extracts the slot index from a marker identifier, if it is one.
#[must_use]
pub(crate) fn slot_from_marker(text: &str) -> Option<usize> {
    text.strip_prefix(MARKER_PREFIX)
        .and_then(|rest| rest.strip_suffix(MARKER_SUFFIX))
        .and_then(|digits| digits.parse().ok())
}

/// Scans template source for placeholders.
///
/// Returns the source with each placeholder replaced by its marker
/// identifier, plus the ordered placeholder list.
pub(crate) fn extract_placeholders(
    source: &str,
) -> Result<(String, Vec<Placeholder>), RewriteError> {
    let mut normalised = String::with_capacity(source.len());
    let mut placeholders = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("#{") {
        normalised.push_str(rest.get(..start).unwrap_or_default());
        let after = rest.get(start.saturating_add(2)..).unwrap_or_default();
        let end = after.find('}').ok_or_else(|| {
            RewriteError::invalid_placeholder("unterminated '#{' in template source")
        })?;

        let body = after.get(..end).unwrap_or_default();
        let constraint = parse_placeholder_body(body)?;
        let index = placeholders.len();
        placeholders.push(Placeholder { index, constraint });
        normalised.push_str(&marker_for_slot(index));

        rest = after.get(end.saturating_add(1)..).unwrap_or_default();
    }

    normalised.push_str(rest);
    Ok((normalised, placeholders))
}

/// Parses the inside of a placeholder: `any()` or `any(fq.Type)`.
fn parse_placeholder_body(body: &str) -> Result<Option<String>, RewriteError> {
    let trimmed = body.trim();
    let inner = trimmed
        .strip_prefix("any(")
        .and_then(|tail| tail.strip_suffix(')'))
        .map(str::trim)
        .ok_or_else(|| {
            RewriteError::invalid_placeholder(format!("expected 'any(..)', found '{trimmed}'"))
        })?;

    if inner.is_empty() {
        return Ok(None);
    }

    if !is_type_name(inner) {
        return Err(RewriteError::invalid_placeholder(format!(
            "'{inner}' is not a type name"
        )));
    }

    Ok(Some(inner.to_owned()))
}

/// Returns whether the text looks like a (possibly qualified) type name.
fn is_type_name(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
