//! Declarative signature patterns for call-site matching.
//!
//! A pattern is written as `owner member(params)`:
//!
//! - the owner is a dotted type name whose segments may be `*` (exactly one
//!   segment) or `..` (any run of segments, including none) — `*..*` matches
//!   any owner of at least two segments;
//! - the member name is exact, or `*` for any member;
//! - the parameter list is an exact sequence of fully qualified types, or
//!   `..` for any arguments.
//!
//! Patterns are parsed and validated once, at rule construction, and are
//! immutable and shareable afterwards. Matching a call whose target was
//! never resolved returns `false` — an unresolved call site is silently
//! skipped, never rewritten and never an error.

use crate::error::RewriteError;
use refit_syntax::{MethodCall, MethodSig};

/// One segment of an owner-type pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OwnerSeg {
    /// A literal segment.
    Literal(String),
    /// `*`: exactly one segment, any name.
    AnyOne,
    /// `..`: any run of segments, including none.
    AnyMany,
}

/// The member-name part of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NamePattern {
    Exact(String),
    Any,
}

/// The parameter-list part of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParamsPattern {
    Exact(Vec<String>),
    Any,
}

/// A compiled signature pattern for matching call expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePattern {
    source: String,
    owner: Vec<OwnerSeg>,
    name: NamePattern,
    params: ParamsPattern,
}

impl SignaturePattern {
    /// Parses a pattern of the form `owner member(params)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not of that shape, the owner has
    /// empty leading or trailing segments, or the parameter list is
    /// unterminated.
    pub fn parse(source: &str) -> Result<Self, RewriteError> {
        let trimmed = source.trim();
        let (owner_part, member_part) = trimmed.split_once(char::is_whitespace).ok_or_else(|| {
            RewriteError::invalid_signature(source, "expected 'owner member(params)'")
        })?;

        let owner = parse_owner(source, owner_part)?;

        let (raw_name, raw_params) = member_part.trim_start().split_once('(').ok_or_else(|| {
            RewriteError::invalid_signature(source, "expected a parenthesised parameter list")
        })?;
        let param_list = raw_params
            .strip_suffix(')')
            .map(str::trim)
            .ok_or_else(|| {
                RewriteError::invalid_signature(source, "unterminated parameter list")
            })?;

        let member_name = raw_name.trim();
        if member_name.is_empty() {
            return Err(RewriteError::invalid_signature(source, "missing member name"));
        }
        let name = if member_name == "*" {
            NamePattern::Any
        } else {
            NamePattern::Exact(member_name.to_owned())
        };

        let params = if param_list == ".." {
            ParamsPattern::Any
        } else if param_list.is_empty() {
            ParamsPattern::Exact(Vec::new())
        } else {
            ParamsPattern::Exact(param_list.split(',').map(|p| p.trim().to_owned()).collect())
        };

        Ok(Self {
            source: trimmed.to_owned(),
            owner,
            name,
            params,
        })
    }

    /// Returns the original pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns whether the call's resolved target matches this pattern.
    ///
    /// A call without a resolved target never matches.
    #[must_use]
    pub fn matches(&self, call: &MethodCall) -> bool {
        call.sig.as_ref().is_some_and(|sig| self.matches_sig(sig))
    }

    /// Returns whether a resolved signature matches this pattern.
    #[must_use]
    pub fn matches_sig(&self, sig: &MethodSig) -> bool {
        match &self.name {
            NamePattern::Exact(name) if *name != sig.name => return false,
            _ => {}
        }

        let owner_parts: Vec<&str> = sig.owner.split('.').collect();
        if !owner_matches(&self.owner, &owner_parts) {
            return false;
        }

        match &self.params {
            ParamsPattern::Any => true,
            ParamsPattern::Exact(params) => {
                params.len() == sig.params.len()
                    && params.iter().zip(sig.params.iter()).all(|(p, s)| p == s)
            }
        }
    }
}

fn parse_owner(source: &str, owner_part: &str) -> Result<Vec<OwnerSeg>, RewriteError> {
    let raw: Vec<&str> = owner_part.split('.').collect();
    if raw.first().is_some_and(|s| s.is_empty()) || raw.last().is_some_and(|s| s.is_empty()) {
        return Err(RewriteError::invalid_signature(
            source,
            "owner pattern has a leading or trailing dot",
        ));
    }

    let mut segments = Vec::new();
    for segment in raw {
        match segment {
            // An empty segment comes from `..` between two dots.
            "" => segments.push(OwnerSeg::AnyMany),
            "*" => segments.push(OwnerSeg::AnyOne),
            literal => segments.push(OwnerSeg::Literal(literal.to_owned())),
        }
    }

    if segments.is_empty() {
        return Err(RewriteError::invalid_signature(source, "missing owner pattern"));
    }

    Ok(segments)
}

fn owner_matches(segments: &[OwnerSeg], parts: &[&str]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return parts.is_empty();
    };

    match first {
        OwnerSeg::Literal(literal) => parts
            .split_first()
            .is_some_and(|(part, remaining)| part == literal && owner_matches(rest, remaining)),
        OwnerSeg::AnyOne => parts
            .split_first()
            .is_some_and(|(_, remaining)| owner_matches(rest, remaining)),
        OwnerSeg::AnyMany => (0..=parts.len())
            .any(|skip| owner_matches(rest, parts.get(skip..).unwrap_or(&[]))),
    }
}
