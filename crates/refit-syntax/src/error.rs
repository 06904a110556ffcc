//! Error types for the parsing and lowering front end.
//!
//! This module provides structured error types for all operations in the
//! `refit-syntax` crate: parser initialisation, parsing, and lowering of
//! concrete syntax trees into the typed tree model.

use thiserror::Error;

/// Errors from parsing and lowering operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser.
    #[error("failed to initialise parser: {message}")]
    ParserInit {
        /// Description of the failure.
        message: String,
    },

    /// Failed to parse source code.
    #[error("failed to parse source: {message}")]
    Parse {
        /// Description of the failure.
        message: String,
    },

    /// The concrete syntax tree had an unexpected shape during lowering.
    #[error("unexpected syntax shape: {message}")]
    Lower {
        /// Description of the unexpected shape.
        message: String,
    },

    /// Internal error indicating a bug or system failure.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInit {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a lowering error.
    #[must_use]
    pub fn lower(message: impl Into<String>) -> Self {
        Self::Lower {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
