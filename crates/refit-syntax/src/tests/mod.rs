//! Cross-module tests for refit-syntax.
