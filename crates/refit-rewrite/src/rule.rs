//! Rule contract and per-unit driver.
//!
//! A [`Rule`] packages a precondition with a visitor factory and metadata.
//! [`run_rule`] is the single-unit entry point: evaluate the gate, and only
//! when it holds run a fresh visitor over the unit, collecting import
//! requests in a pass-scoped context. [`Runner`] sequences several rules
//! over one unit and repeats cycles until nothing changes or a cycle limit
//! is reached.
//!
//! The visitor factory returns a *new* visitor per pass so no state leaks
//! between cycles; patterns and templates stay shared behind it.

use crate::error::RewriteError;
use crate::ledger::{ImportLedger, ImportPlan};
use crate::search::Precondition;
use refit_syntax::{walk_unit, ImportDecl, SourceUnit, UnitVisitor};

/// Pass-scoped context threaded through a rule's visitor.
#[derive(Debug, Default)]
pub struct RewriteContext {
    /// Import requests recorded by the pass.
    pub ledger: ImportLedger,
    /// Snapshot of the unit's imports at pass start, for context lookups.
    pub imports: Vec<ImportDecl>,
}

impl RewriteContext {
    /// Creates a context for one pass over `unit`.
    #[must_use]
    pub fn for_unit(unit: &SourceUnit) -> Self {
        Self {
            ledger: ImportLedger::new(),
            imports: unit.imports.clone(),
        }
    }
}

/// A single rewrite rule.
pub trait Rule: Send + Sync {
    /// Short human-readable name of the rule.
    fn display_name(&self) -> &str;

    /// One-sentence description of what the rule does.
    fn description(&self) -> &str;

    /// The gate evaluated once per unit before any mutation.
    fn precondition(&self) -> Precondition;

    /// Creates a fresh visitor for one pass.
    fn visitor(&self) -> Box<dyn UnitVisitor<RewriteContext, Error = RewriteError> + '_>;
}

/// Result of running one rule over one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// The (possibly rewritten) unit.
    pub unit: SourceUnit,
    /// The import deltas requested by the pass.
    pub imports: ImportPlan,
    /// Whether the pass changed the unit.
    pub changed: bool,
}

/// Runs one rule over one unit.
///
/// When the precondition does not hold the unit is returned untouched and
/// the visitor is never constructed.
///
/// # Errors
///
/// Propagates errors raised by the rule's visitor (template application
/// failures and the like). The unit consumed by a failing pass is dropped;
/// no partially rewritten tree is ever surfaced.
pub fn run_rule(rule: &dyn Rule, unit: SourceUnit) -> Result<RuleOutcome, RewriteError> {
    if !rule.precondition().evaluate(&unit) {
        tracing::debug!(rule = rule.display_name(), "precondition not met; skipping");
        return Ok(RuleOutcome {
            unit,
            imports: ImportPlan::default(),
            changed: false,
        });
    }

    let before = unit.clone();
    let mut ctx = RewriteContext::for_unit(&unit);
    let mut visitor = rule.visitor();
    let after = walk_unit(unit, visitor.as_mut(), &mut ctx)?;

    let changed = after != before;
    tracing::debug!(rule = rule.display_name(), changed, "pass complete");

    Ok(RuleOutcome {
        unit: after,
        imports: ctx.ledger.into_plan(),
        changed,
    })
}

/// Sequences rules over one unit until a fixpoint or a cycle limit.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    cycle_limit: usize,
}

impl Runner {
    /// Creates a runner with the default cycle limit of 3.
    #[must_use]
    pub const fn new() -> Self {
        Self { cycle_limit: 3 }
    }

    /// Creates a runner with an explicit cycle limit.
    #[must_use]
    pub const fn with_cycle_limit(cycle_limit: usize) -> Self {
        Self { cycle_limit }
    }

    /// Runs every rule in order, repeating the whole sequence until no rule
    /// reports a change or the cycle limit is reached. Each rule's output
    /// feeds the next rule's input.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by any rule's pass.
    pub fn run(&self, rules: &[&dyn Rule], unit: SourceUnit) -> Result<RunOutcome, RewriteError> {
        let mut current = unit;
        let mut imports = ImportPlan::default();
        let mut cycles = 0usize;
        let mut changed_overall = false;

        while cycles < self.cycle_limit {
            let mut changed_this_cycle = false;
            for rule in rules {
                let outcome = run_rule(*rule, current)?;
                current = outcome.unit;
                imports.merge(outcome.imports);
                changed_this_cycle |= outcome.changed;
            }

            cycles = cycles.saturating_add(1);
            changed_overall |= changed_this_cycle;
            if !changed_this_cycle {
                break;
            }
        }

        Ok(RunOutcome {
            unit: current,
            imports,
            cycles,
            changed: changed_overall,
        })
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of running a rule sequence to fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// The final unit.
    pub unit: SourceUnit,
    /// The merged import deltas of all passes.
    pub imports: ImportPlan,
    /// How many cycles ran.
    pub cycles: usize,
    /// Whether any pass changed the unit.
    pub changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::SignaturePattern;
    use refit_syntax::{
        lower_unit, Cursor, Expr, Identifier, MethodCall, Parser, SignatureTable,
    };

    fn lower(source: &str) -> SourceUnit {
        let table = SignatureTable::new().method("acme.Util", "legacy", &[], None);
        let mut parser = Parser::new().expect("parser init");
        let parsed = parser.parse(source).expect("parse");
        lower_unit(&parsed, &table).expect("lower")
    }

    /// Replaces resolved `legacy()` calls with the identifier `modern`.
    struct LegacyRule {
        pattern: SignaturePattern,
    }

    impl LegacyRule {
        fn new() -> Self {
            Self {
                pattern: SignaturePattern::parse("acme.Util legacy()").expect("pattern"),
            }
        }
    }

    struct LegacyVisitor<'r> {
        pattern: &'r SignaturePattern,
    }

    impl UnitVisitor<RewriteContext> for LegacyVisitor<'_> {
        type Error = RewriteError;

        fn visit_method_call(
            &mut self,
            call: MethodCall,
            _cursor: &Cursor,
            ctx: &mut RewriteContext,
        ) -> Result<Expr, Self::Error> {
            if self.pattern.matches(&call) {
                ctx.ledger.request_remove("acme.Util");
                return Ok(Expr::Ident(Identifier {
                    prefix: call.prefix,
                    name: "modern".to_owned(),
                }));
            }
            Ok(Expr::Call(call))
        }
    }

    impl Rule for LegacyRule {
        fn display_name(&self) -> &str {
            "Replace legacy() with modern"
        }

        fn description(&self) -> &str {
            "Replaces acme.Util.legacy() calls with the modern identifier."
        }

        fn precondition(&self) -> Precondition {
            Precondition::uses(self.pattern.clone())
        }

        fn visitor(&self) -> Box<dyn UnitVisitor<RewriteContext, Error = RewriteError> + '_> {
            Box::new(LegacyVisitor {
                pattern: &self.pattern,
            })
        }
    }

    // Unqualified calls resolve through static imports.
    const HIT: &str =
        "import static acme.Util.*;\n\nclass T {\n    void t() {\n        legacy();\n    }\n}\n";
    const MISS: &str = "class T {\n    void t() {\n        other();\n    }\n}\n";

    #[test]
    fn gated_unit_passes_through_untouched() {
        let unit = lower(MISS);
        let rule = LegacyRule::new();

        let outcome = run_rule(&rule, unit.clone()).expect("run");

        assert!(!outcome.changed);
        assert!(outcome.imports.is_empty());
        assert_eq!(outcome.unit, unit);
    }

    #[test]
    fn matching_unit_is_rewritten_with_import_plan() {
        let unit = lower(HIT);
        let rule = LegacyRule::new();

        let outcome = run_rule(&rule, unit).expect("run");

        assert!(outcome.changed);
        assert_eq!(
            outcome.imports.removals.first().map(|r| r.name.as_str()),
            Some("acme.Util")
        );
        assert!(refit_syntax::unit_to_source(&outcome.unit).contains("modern;"));
    }

    #[test]
    fn runner_reaches_fixpoint_and_reports_cycles() {
        let unit = lower(HIT);
        let rule = LegacyRule::new();

        let outcome = Runner::new()
            .run(&[&rule], unit)
            .expect("run");

        assert!(outcome.changed);
        // One changing cycle plus one confirming cycle.
        assert_eq!(outcome.cycles, 2);
    }

    #[test]
    fn runner_on_clean_unit_stops_after_one_cycle() {
        let unit = lower(MISS);
        let rule = LegacyRule::new();

        let outcome = Runner::new().run(&[&rule], unit.clone()).expect("run");

        assert!(!outcome.changed);
        assert_eq!(outcome.cycles, 1);
        assert_eq!(outcome.unit, unit);
    }

    #[test]
    fn runner_respects_cycle_limit() {
        let unit = lower(MISS);
        let rule = LegacyRule::new();

        let outcome = Runner::with_cycle_limit(1)
            .run(&[&rule], unit)
            .expect("run");

        assert_eq!(outcome.cycles, 1);
    }

    #[test]
    fn patterns_and_templates_are_shareable_across_units() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<SignaturePattern>();
        assert_send_sync::<crate::template::Template>();
    }
}
