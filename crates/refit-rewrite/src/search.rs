//! Read-only searches over translation units: precondition predicates and
//! nested sub-match lookup.
//!
//! Preconditions answer "does this unit use method X anywhere" with one
//! cheap whole-tree scan, composed with AND/OR. They run once per unit,
//! before any mutation; a false gate means the expensive visitor never runs.
//! Predicates are pure reads — nothing they observe is cached across passes,
//! because a later pass may see a different tree.
//!
//! [`find_first`] is the sub-match finder: the same depth-first walk run to
//! completion over a subtree, returning the leftmost call matching a second
//! pattern. It backs compound rewrites of the form "rewrite C only if an
//! argument of C contains a call to Q".

use crate::signature::SignaturePattern;
use refit_syntax::{Expr, Member, MethodCall, SourceUnit, Statement, UnitItem};

/// A predicate that holds when a unit contains at least one call matching
/// the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsesMethod {
    pattern: SignaturePattern,
}

impl UsesMethod {
    /// Creates a predicate for the given pattern.
    #[must_use]
    pub const fn new(pattern: SignaturePattern) -> Self {
        Self { pattern }
    }

    /// Returns the wrapped pattern.
    #[must_use]
    pub const fn pattern(&self) -> &SignaturePattern {
        &self.pattern
    }

    /// Scans the unit for a matching call.
    #[must_use]
    pub fn check(&self, unit: &SourceUnit) -> bool {
        unit_exprs(unit).any(|expr| find_first(expr, &self.pattern).is_some())
    }
}

/// A composable precondition over one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Holds when the wrapped predicate finds a match.
    Uses(UsesMethod),
    /// Holds when any inner precondition holds.
    AnyOf(Vec<Precondition>),
    /// Holds when every inner precondition holds.
    AllOf(Vec<Precondition>),
}

impl Precondition {
    /// Creates a predicate precondition for the given pattern.
    #[must_use]
    pub const fn uses(pattern: SignaturePattern) -> Self {
        Self::Uses(UsesMethod::new(pattern))
    }

    /// Composes preconditions with OR.
    #[must_use]
    pub fn any_of(preconditions: impl IntoIterator<Item = Self>) -> Self {
        Self::AnyOf(preconditions.into_iter().collect())
    }

    /// Composes preconditions with AND.
    #[must_use]
    pub fn all_of(preconditions: impl IntoIterator<Item = Self>) -> Self {
        Self::AllOf(preconditions.into_iter().collect())
    }

    /// Evaluates the precondition against a unit.
    ///
    /// This is a pure read; the unit is never modified and the result is
    /// never cached.
    #[must_use]
    pub fn evaluate(&self, unit: &SourceUnit) -> bool {
        match self {
            Self::Uses(uses) => uses.check(unit),
            Self::AnyOf(inner) => inner.iter().any(|p| p.evaluate(unit)),
            Self::AllOf(inner) => inner.iter().all(|p| p.evaluate(unit)),
        }
    }
}

/// Finds the leftmost call in `root`'s subtree matching `pattern`.
///
/// Pre-order, depth-first, short-circuiting on the first hit: a node is
/// tested before its children, the receiver before the arguments.
#[must_use]
pub fn find_first<'a>(root: &'a Expr, pattern: &SignaturePattern) -> Option<&'a MethodCall> {
    match root {
        Expr::Call(call) => {
            if pattern.matches(call) {
                return Some(call);
            }
            if let Some(found) = call
                .select
                .as_deref()
                .and_then(|select| find_first(select, pattern))
            {
                return Some(found);
            }
            call.args.iter().find_map(|arg| find_first(arg, pattern))
        }
        Expr::New(new) => new.args.iter().find_map(|arg| find_first(arg, pattern)),
        Expr::Field(field) => find_first(&field.target, pattern),
        _ => None,
    }
}

/// Iterates over every top-level expression in a unit (field initialisers
/// and statement expressions), in source order.
fn unit_exprs(unit: &SourceUnit) -> impl Iterator<Item = &Expr> {
    unit.items
        .iter()
        .filter_map(|item| match item {
            UnitItem::Type(class) => Some(class),
            UnitItem::Raw(_) => None,
        })
        .flat_map(|class| class.body.members.iter())
        .flat_map(|member| -> Box<dyn Iterator<Item = &Expr> + '_> {
            match member {
                Member::Field(field) => {
                    Box::new(field.init.iter().map(|init| &init.value))
                }
                Member::Method(method) => Box::new(
                    method
                        .body
                        .statements
                        .iter()
                        .filter_map(|statement| match statement {
                            Statement::Expr(expr) => Some(expr),
                            Statement::Local(local) => {
                                local.init.as_ref().map(|init| &init.value)
                            }
                            Statement::Raw(_) => None,
                        }),
                ),
                Member::Raw(_) => Box::new(std::iter::empty()),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use refit_syntax::{lower_unit, Parser, SignatureTable};

    fn table() -> SignatureTable {
        SignatureTable::new()
            .method(
                "com.shazam.shazamcrest.matcher.Matchers",
                "sameBeanAs",
                &["java.lang.Object"],
                Some("org.hamcrest.Matcher"),
            )
            .method(
                "org.hamcrest.MatcherAssert",
                "assertThat",
                &["java.lang.Object", "org.hamcrest.Matcher"],
                None,
            )
    }

    fn lower(source: &str) -> SourceUnit {
        let mut parser = Parser::new().expect("parser init");
        let parsed = parser.parse(source).expect("parse");
        lower_unit(&parsed, &table()).expect("lower")
    }

    fn same_bean_as() -> SignaturePattern {
        SignaturePattern::parse(
            "com.shazam.shazamcrest.matcher.Matchers sameBeanAs(java.lang.Object)",
        )
        .expect("pattern")
    }

    const FIXTURE: &str = "import static com.shazam.shazamcrest.matcher.Matchers.sameBeanAs;\nimport static org.hamcrest.MatcherAssert.assertThat;\n\nclass T {\n    void t() {\n        assertThat(a, is(sameBeanAs(b)));\n    }\n}\n";

    #[test]
    fn uses_method_finds_nested_call() {
        let unit = lower(FIXTURE);
        assert!(UsesMethod::new(same_bean_as()).check(&unit));
    }

    #[test]
    fn uses_method_misses_absent_call() {
        let unit = lower("class T {\n    void t() {\n        other(a);\n    }\n}\n");
        assert!(!UsesMethod::new(same_bean_as()).check(&unit));
    }

    #[test]
    fn any_of_is_disjunction() {
        let unit = lower(FIXTURE);
        let absent =
            SignaturePattern::parse("com.google.common.collect.Lists newArrayList(java.lang.Iterable)")
                .expect("pattern");

        assert!(
            Precondition::any_of([Precondition::uses(absent.clone()), Precondition::uses(same_bean_as())])
                .evaluate(&unit)
        );
        assert!(!Precondition::any_of([Precondition::uses(absent)]).evaluate(&unit));
    }

    #[test]
    fn all_of_is_conjunction() {
        let unit = lower(FIXTURE);
        let assert_that = SignaturePattern::parse("*..* assertThat(..)").expect("pattern");
        let absent =
            SignaturePattern::parse("com.google.common.collect.Lists newArrayList(java.lang.Iterable)")
                .expect("pattern");

        assert!(Precondition::all_of([
            Precondition::uses(same_bean_as()),
            Precondition::uses(assert_that.clone()),
        ])
        .evaluate(&unit));
        assert!(!Precondition::all_of([
            Precondition::uses(assert_that),
            Precondition::uses(absent),
        ])
        .evaluate(&unit));
    }

    #[test]
    fn find_first_returns_leftmost_match() {
        let unit = lower(
            "import static com.shazam.shazamcrest.matcher.Matchers.sameBeanAs;\n\nclass T {\n    void t() {\n        pair(sameBeanAs(a), sameBeanAs(b));\n    }\n}\n",
        );
        let Some(expr) = unit_exprs(&unit).next() else {
            panic!("expected an expression");
        };

        let found = find_first(expr, &same_bean_as()).expect("match");
        assert_eq!(
            found.args.first().map(refit_syntax::expr_to_source),
            Some("a".to_owned())
        );
    }

    #[test]
    fn find_first_returns_none_without_match() {
        let unit = lower("class T {\n    void t() {\n        pair(one(), two());\n    }\n}\n");
        let Some(expr) = unit_exprs(&unit).next() else {
            panic!("expected an expression");
        };

        assert!(find_first(expr, &same_bean_as()).is_none());
    }
}
