//! Error types for the rewrite engine.
//!
//! Everything here is a *configuration* failure: malformed signature
//! patterns, malformed templates, or a template applied with the wrong
//! arguments. All of them surface at rule construction or from a rule's own
//! visitor, before or during a pass — never as a silently degraded rewrite.

use thiserror::Error;

/// Errors from rule configuration and template application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RewriteError {
    /// A signature pattern failed to parse.
    #[error("invalid signature pattern '{pattern}': {message}")]
    InvalidSignature {
        /// The offending pattern source.
        pattern: String,
        /// Description of the failure.
        message: String,
    },

    /// A template source failed to parse or validate.
    #[error("invalid template: {message}")]
    InvalidTemplate {
        /// Description of the failure.
        message: String,
    },

    /// A template placeholder was malformed.
    #[error("invalid placeholder: {message}")]
    InvalidPlaceholder {
        /// Description of the failure.
        message: String,
    },

    /// A template was applied with the wrong number of arguments.
    #[error("template expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// The number of placeholders in the template.
        expected: usize,
        /// The number of arguments supplied.
        actual: usize,
    },

    /// A bound argument's type contradicts its placeholder constraint.
    #[error("placeholder {index} expects {expected}, got {actual}")]
    PlaceholderType {
        /// The zero-based placeholder position.
        index: usize,
        /// The declared constraint type.
        expected: String,
        /// The argument's statically known type.
        actual: String,
    },

    /// An underlying parse failure while building a template.
    #[error("template parse failed: {0}")]
    TemplateParse(#[from] refit_syntax::SyntaxError),
}

impl RewriteError {
    /// Creates an invalid signature pattern error.
    #[must_use]
    pub fn invalid_signature(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSignature {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid template error.
    #[must_use]
    pub fn invalid_template(message: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            message: message.into(),
        }
    }

    /// Creates an invalid placeholder error.
    #[must_use]
    pub fn invalid_placeholder(message: impl Into<String>) -> Self {
        Self::InvalidPlaceholder {
            message: message.into(),
        }
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub const fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    /// Creates a placeholder type error.
    #[must_use]
    pub fn placeholder_type(
        index: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::PlaceholderType {
            index,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
