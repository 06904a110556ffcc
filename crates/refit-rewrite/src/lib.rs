//! Call-site rewrite engine for the Refit modernization toolchain.
//!
//! This crate provides the machinery a modernization rule is made of:
//!
//! - **Signature matching** via [`SignaturePattern`] — declarative
//!   `owner member(params)` matchers with wildcards, compiled once and
//!   shared across passes
//! - **Precondition gating** via [`Precondition`] and [`UsesMethod`] —
//!   cheap whole-unit scans composed with AND/OR that keep the expensive
//!   visitor from ever running on units that cannot match
//! - **Sub-match lookup** via [`find_first`] — leftmost depth-first search
//!   for a nested call inside an already matched node
//! - **Template substitution** via [`Template`] — `#{any(..)}` placeholder
//!   snippets parsed and validated at rule construction, bound and spliced
//!   per rewrite with formatting preserved
//! - **Import bookkeeping** via [`ImportLedger`] — pass-scoped add/remove
//!   requests drained into an [`ImportPlan`] for the serialization
//!   collaborator
//! - **Rule orchestration** via [`Rule`], [`run_rule`], and [`Runner`] —
//!   gate, fresh visitor per pass, and fixpoint cycling over one unit
//!
//! # Example
//!
//! ```
//! use refit_rewrite::{Precondition, SignaturePattern, Template};
//!
//! let pattern = SignaturePattern::parse(
//!     "com.google.common.collect.Lists newArrayList(java.lang.Iterable)",
//! )?;
//! let gate = Precondition::uses(pattern);
//!
//! let template = Template::builder("new ArrayList<>(#{any(java.util.Collection)})")
//!     .import("java.util.ArrayList")
//!     .build()?;
//! assert_eq!(template.placeholders().len(), 1);
//! # Ok::<(), refit_rewrite::RewriteError>(())
//! ```

mod error;
mod ledger;
mod placeholder;
mod rule;
mod search;
mod signature;
mod template;

pub use error::RewriteError;
pub use ledger::{ImportAction, ImportLedger, ImportPlan, ImportRequest};
pub use placeholder::Placeholder;
pub use rule::{RewriteContext, Rule, RuleOutcome, RunOutcome, Runner, run_rule};
pub use search::{Precondition, UsesMethod, find_first};
pub use signature::SignaturePattern;
pub use template::{Template, TemplateBuilder, TemplateImport};
