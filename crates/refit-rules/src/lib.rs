//! Shipped modernization rules for the Refit toolchain.
//!
//! Each rule packages the engine pieces from `refit-rewrite` — signature
//! patterns, a precondition gate, templates, and import requests — into one
//! [`refit_rewrite::Rule`] implementation a runner can drive over parsed
//! translation units.
//!
//! # Example
//!
//! ```
//! use refit_rewrite::{run_rule, Rule};
//! use refit_rules::ModernizeHelpers;
//! use refit_syntax::{lower_unit, Parser};
//!
//! let rule = ModernizeHelpers::new()?;
//! let table = ModernizeHelpers::signatures();
//!
//! let mut parser = Parser::new().map_err(refit_rewrite::RewriteError::from)?;
//! let parsed = parser
//!     .parse("class T {}\n")
//!     .map_err(refit_rewrite::RewriteError::from)?;
//! let unit = lower_unit(&parsed, &table).map_err(refit_rewrite::RewriteError::from)?;
//!
//! // Nothing to modernize: the gate short-circuits.
//! let outcome = run_rule(&rule, unit)?;
//! assert!(!outcome.changed);
//! # Ok::<(), refit_rewrite::RewriteError>(())
//! ```

mod modernize;

pub use modernize::ModernizeHelpers;
