//! Replacement of bean-matcher assertions and Guava list factories.
//!
//! One rule, four patterns, three templates:
//!
//! - `assertThat(x, is(sameBeanAs(y)))` (Shazamcrest via Hamcrest) becomes
//!   the fluent `Assertions.assertThat(x)`, but only when a `sameBeanAs`
//!   call is actually nested somewhere in the arguments — a bare
//!   `assertThat` is left alone;
//! - `Lists.newArrayList(iterable)` becomes `new ArrayList<>(iterable)`;
//! - `Lists.newArrayListWithCapacity(n)` becomes `new ArrayList<>(n)`.
//!
//! Import requests follow each rewrite: the matcher-library statics are
//! marked for removal and the replacement's imports for addition. The
//! removals stay hints — an `assertThat` static still used elsewhere in the
//! unit survives reconciliation.

use refit_rewrite::{
    find_first, Precondition, RewriteContext, RewriteError, Rule, SignaturePattern, Template,
};
use refit_syntax::{Cursor, Expr, MethodCall, SignatureTable, UnitVisitor};

const SAME_BEAN_AS: &str =
    "com.shazam.shazamcrest.matcher.Matchers sameBeanAs(java.lang.Object)";
const ANY_ASSERT_THAT: &str = "*..* assertThat(..)";
const NEW_ARRAY_LIST_ITERABLE: &str =
    "com.google.common.collect.Lists newArrayList(java.lang.Iterable)";
const NEW_ARRAY_LIST_CAPACITY: &str =
    "com.google.common.collect.Lists newArrayListWithCapacity(int)";

/// Rewrites bean-matcher assertions to AssertJ and Guava list factories to
/// plain `ArrayList` constructors.
#[derive(Debug, Clone)]
pub struct ModernizeHelpers {
    same_bean_as: SignaturePattern,
    any_assert_that: SignaturePattern,
    new_array_list_iterable: SignaturePattern,
    new_array_list_capacity: SignaturePattern,
    assert_that: Template,
    array_list_from_iterable: Template,
    array_list_with_capacity: Template,
}

impl ModernizeHelpers {
    /// Builds the rule, compiling its patterns and templates.
    ///
    /// # Errors
    ///
    /// Fails fast on any malformed pattern or template. This is the
    /// configuration boundary: an error here means the rule never sees a
    /// unit.
    pub fn new() -> Result<Self, RewriteError> {
        Ok(Self {
            same_bean_as: SignaturePattern::parse(SAME_BEAN_AS)?,
            any_assert_that: SignaturePattern::parse(ANY_ASSERT_THAT)?,
            new_array_list_iterable: SignaturePattern::parse(NEW_ARRAY_LIST_ITERABLE)?,
            new_array_list_capacity: SignaturePattern::parse(NEW_ARRAY_LIST_CAPACITY)?,
            assert_that: Template::builder("Assertions.assertThat(#{any()})")
                .import("org.assertj.core.api.Assertions")
                .static_import("org.assertj.core.api.Assertions.assertThat")
                .signatures(Self::signatures())
                .build()?,
            array_list_from_iterable: Template::builder(
                "new ArrayList<>(#{any(java.util.Collection)})",
            )
            .import("java.util.ArrayList")
            .build()?,
            array_list_with_capacity: Template::builder("new ArrayList<>(#{any(int)})")
                .import("java.util.ArrayList")
                .build()?,
        })
    }

    /// Returns the signatures of the APIs this rule recognises.
    ///
    /// Useful for wiring a resolver when no richer type information is
    /// available, e.g. in tests.
    #[must_use]
    pub fn signatures() -> SignatureTable {
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
            .method(
                "com.shazam.shazamcrest.MatcherAssert",
                "assertThat",
                &["java.lang.Object", "org.hamcrest.Matcher"],
                None,
            )
            .method(
                "org.junit.Assert",
                "assertThat",
                &["java.lang.Object", "org.hamcrest.Matcher"],
                None,
            )
            .method(
                "org.hamcrest.core.Is",
                "is",
                &["org.hamcrest.Matcher"],
                Some("org.hamcrest.Matcher"),
            )
            .method(
                "com.google.common.collect.Lists",
                "newArrayList",
                &["java.lang.Iterable"],
                Some("java.util.ArrayList"),
            )
            .method(
                "com.google.common.collect.Lists",
                "newArrayListWithCapacity",
                &["int"],
                Some("java.util.ArrayList"),
            )
            .method(
                "org.assertj.core.api.Assertions",
                "assertThat",
                &["java.lang.Object"],
                Some("org.assertj.core.api.AbstractAssert"),
            )
            .method(
                "java.util.Collections",
                "emptyList",
                &[],
                Some("java.util.List"),
            )
    }
}

impl Rule for ModernizeHelpers {
    fn display_name(&self) -> &str {
        "Modernize matcher assertions and list factories"
    }

    fn description(&self) -> &str {
        "Prefers AssertJ over Shazamcrest bean matchers and `new ArrayList<>()` over Guava list factories."
    }

    fn precondition(&self) -> Precondition {
        Precondition::any_of([
            Precondition::uses(self.same_bean_as.clone()),
            Precondition::uses(self.new_array_list_iterable.clone()),
            Precondition::uses(self.new_array_list_capacity.clone()),
        ])
    }

    fn visitor(&self) -> Box<dyn UnitVisitor<RewriteContext, Error = RewriteError> + '_> {
        Box::new(ModernizeVisitor { rule: self })
    }
}

struct ModernizeVisitor<'r> {
    rule: &'r ModernizeHelpers,
}

impl ModernizeVisitor<'_> {
    fn rewrite_assertion(
        &self,
        call: MethodCall,
        ctx: &mut RewriteContext,
    ) -> Result<Expr, RewriteError> {
        let nested = call
            .args
            .iter()
            .any(|arg| find_first(arg, &self.rule.same_bean_as).is_some());
        if !nested {
            // No bean matcher inside the arguments: not our call shape,
            // leave the node exactly as it was.
            return Ok(Expr::Call(call));
        }
        let Some(actual) = call.args.first().cloned() else {
            return Ok(Expr::Call(call));
        };

        ctx.ledger
            .request_remove_static("com.shazam.shazamcrest.matcher.Matchers.sameBeanAs");
        ctx.ledger
            .request_remove_static("com.shazam.shazamcrest.MatcherAssert.assertThat");
        ctx.ledger
            .request_remove_static("org.hamcrest.MatcherAssert.assertThat");
        ctx.ledger.request_remove_static("org.junit.Assert.assertThat");
        ctx.ledger.request_add("org.assertj.core.api.Assertions");
        ctx.ledger
            .request_add_static("org.assertj.core.api.Assertions.assertThat");

        tracing::debug!(method = call.name.as_str(), "rewriting bean-matcher assertion");
        self.rule.assert_that.apply(&call.prefix, vec![actual])
    }

    fn rewrite_factory(
        &self,
        template: &Template,
        call: MethodCall,
        ctx: &mut RewriteContext,
    ) -> Result<Expr, RewriteError> {
        let Some(arg) = call.args.first().cloned() else {
            return Ok(Expr::Call(call));
        };

        ctx.ledger.request_remove("com.google.common.collect.Lists");
        ctx.ledger.request_add("java.util.ArrayList");

        tracing::debug!(method = call.name.as_str(), "rewriting list factory");
        template.apply(&call.prefix, vec![arg])
    }
}

impl UnitVisitor<RewriteContext> for ModernizeVisitor<'_> {
    type Error = RewriteError;

    fn visit_method_call(
        &mut self,
        call: MethodCall,
        _cursor: &Cursor,
        ctx: &mut RewriteContext,
    ) -> Result<Expr, Self::Error> {
        if self.rule.any_assert_that.matches(&call) {
            self.rewrite_assertion(call, ctx)
        } else if self.rule.new_array_list_iterable.matches(&call) {
            self.rewrite_factory(&self.rule.array_list_from_iterable, call, ctx)
        } else if self.rule.new_array_list_capacity.matches(&call) {
            self.rewrite_factory(&self.rule.array_list_with_capacity, call, ctx)
        } else {
            Ok(Expr::Call(call))
        }
    }
}
