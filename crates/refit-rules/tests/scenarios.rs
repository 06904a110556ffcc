//! End-to-end scenarios for the modernization rule: parse a fixture, run
//! the rule, and check the rendered output plus the requested import plan.
//!
//! Import reconciliation is the serializer's job, so rendered output keeps
//! the original import list; the assertions on import handling target the
//! plan instead.

use insta::assert_debug_snapshot;
use refit_rewrite::{run_rule, RewriteContext, Rule, RuleOutcome, Runner};
use refit_rules::ModernizeHelpers;
use refit_syntax::{lower_unit, unit_to_source, walk_unit, Parser, SourceUnit};
use rstest::rstest;

fn lower(source: &str) -> SourceUnit {
    let mut parser = Parser::new().expect("parser init");
    let parsed = parser.parse(source).expect("parse");
    assert!(!parsed.has_errors(), "fixture should parse cleanly");
    lower_unit(&parsed, &ModernizeHelpers::signatures()).expect("lower")
}

fn modernize(source: &str) -> RuleOutcome {
    let rule = ModernizeHelpers::new().expect("rule");
    run_rule(&rule, lower(source)).expect("run")
}

// =============================================================================
// Bean-matcher assertions
// =============================================================================

const BEAN_MATCHER_ASSERTION: &str = r"import static com.shazam.shazamcrest.matcher.Matchers.sameBeanAs;
import static org.hamcrest.MatcherAssert.assertThat;
import static org.hamcrest.core.Is.is;

class Test {
    public void someTest() {
        assertThat(new Object(), is(sameBeanAs(new Object())));
    }
}
";

#[test]
fn bean_matcher_assertion_becomes_fluent() {
    let outcome = modernize(BEAN_MATCHER_ASSERTION);

    assert!(outcome.changed);
    assert_eq!(
        unit_to_source(&outcome.unit),
        r"import static com.shazam.shazamcrest.matcher.Matchers.sameBeanAs;
import static org.hamcrest.MatcherAssert.assertThat;
import static org.hamcrest.core.Is.is;

class Test {
    public void someTest() {
        Assertions.assertThat(new Object());
    }
}
"
    );
}

#[test]
fn bean_matcher_rewrite_requests_import_swap() {
    let outcome = modernize(BEAN_MATCHER_ASSERTION);

    assert_debug_snapshot!(outcome.imports.additions, @r###"
    [
        ImportRequest {
            is_static: false,
            name: "org.assertj.core.api.Assertions",
        },
        ImportRequest {
            is_static: true,
            name: "org.assertj.core.api.Assertions.assertThat",
        },
    ]
    "###);

    let removed: Vec<&str> = outcome
        .imports
        .removals
        .iter()
        .map(|request| request.name.as_str())
        .collect();
    assert_eq!(
        removed,
        vec![
            "com.shazam.shazamcrest.MatcherAssert.assertThat",
            "com.shazam.shazamcrest.matcher.Matchers.sameBeanAs",
            "org.hamcrest.MatcherAssert.assertThat",
            "org.junit.Assert.assertThat",
        ]
    );
    assert!(outcome.imports.removals.iter().all(|request| request.is_static));
}

#[test]
fn assertion_without_bean_matcher_stays_untouched() {
    // The capacity factory lets the gate pass, so the visitor really does
    // inspect the assertion and decline it.
    let source = r"import com.google.common.collect.*;

import static org.hamcrest.MatcherAssert.assertThat;
import static org.hamcrest.core.Is.is;

class Test {
    Object seed = Lists.newArrayListWithCapacity(2);

    public void someTest() {
        assertThat(new Object(), is(equalTo(new Object())));
    }
}
";
    let outcome = modernize(source);

    assert!(outcome.changed);
    let output = unit_to_source(&outcome.unit);
    assert!(output.contains("assertThat(new Object(), is(equalTo(new Object())));"));
    assert!(output.contains("Object seed = new ArrayList<>(2);"));
    // Declining the assertion leaves no trace in the plan.
    assert!(
        !outcome
            .imports
            .additions
            .iter()
            .any(|request| request.name.starts_with("org.assertj"))
    );
}

#[test]
fn arguments_of_a_declined_assertion_are_still_visited() {
    let source = r"import com.google.common.collect.*;

import static org.hamcrest.MatcherAssert.assertThat;

class Test {
    public void someTest() {
        assertThat(Lists.newArrayList(seed), is(other()));
    }
}
";
    let outcome = modernize(source);

    assert!(outcome.changed);
    assert!(unit_to_source(&outcome.unit)
        .contains("assertThat(new ArrayList<>(seed), is(other()));"));
}

// =============================================================================
// Guava list factories
// =============================================================================

const FACTORY_FROM_ITERABLE: &str = r"import com.google.common.collect.*;

import java.util.Collections;
import java.util.List;

class Test {
    List<Integer> l = Collections.emptyList();
    List<Integer> cardinalsWorldSeries = Lists.newArrayList(l);
}
";

#[test]
fn iterable_factory_becomes_constructor() {
    let outcome = modernize(FACTORY_FROM_ITERABLE);

    assert!(outcome.changed);
    assert_eq!(
        unit_to_source(&outcome.unit),
        r"import com.google.common.collect.*;

import java.util.Collections;
import java.util.List;

class Test {
    List<Integer> l = Collections.emptyList();
    List<Integer> cardinalsWorldSeries = new ArrayList<>(l);
}
"
    );
}

#[test]
fn factory_rewrite_requests_import_swap() {
    let outcome = modernize(FACTORY_FROM_ITERABLE);

    assert_debug_snapshot!(outcome.imports, @r###"
    ImportPlan {
        additions: [
            ImportRequest {
                is_static: false,
                name: "java.util.ArrayList",
            },
        ],
        removals: [
            ImportRequest {
                is_static: false,
                name: "com.google.common.collect.Lists",
            },
        ],
    }
    "###);
}

#[test]
fn capacity_factory_becomes_constructor_with_literal() {
    let source = r"import com.google.common.collect.*;

import java.util.ArrayList;
import java.util.List;

class Test {
    List<Integer> cardinalsWorldSeries = Lists.newArrayListWithCapacity(2);
}
";
    let outcome = modernize(source);

    assert!(outcome.changed);
    assert!(unit_to_source(&outcome.unit)
        .contains("List<Integer> cardinalsWorldSeries = new ArrayList<>(2);"));
}

#[rstest]
#[case("Lists.newArrayListWithCapacity(2)", "new ArrayList<>(2)")]
#[case("Lists.newArrayList(seed)", "new ArrayList<>(seed)")]
fn factory_calls_rewrite_in_statement_position(#[case] call: &str, #[case] replacement: &str) {
    let source = format!(
        "import com.google.common.collect.*;\n\nclass Test {{\n    void t() {{\n        {call};\n    }}\n}}\n"
    );
    let outcome = modernize(&source);

    assert!(outcome.changed);
    assert!(unit_to_source(&outcome.unit).contains(&format!("{replacement};")));
}

#[test]
fn capacity_factory_accepts_a_variable_argument() {
    let source = r"import com.google.common.collect.*;

import java.util.List;

class Test {
    void t() {
        List<Integer> xs = Lists.newArrayListWithCapacity(n);
    }
}
";
    let outcome = modernize(source);

    assert!(outcome.changed);
    assert!(unit_to_source(&outcome.unit).contains("List<Integer> xs = new ArrayList<>(n);"));
}

// =============================================================================
// Gate behaviour
// =============================================================================

const NOTHING_TO_DO: &str = r"import java.util.List;

class Test {
    List<Integer> xs = otherFactory(seed);

    void t() {
        render(xs);
    }
}
";

#[test]
fn unit_without_target_shapes_is_returned_byte_for_byte() {
    let outcome = modernize(NOTHING_TO_DO);

    assert!(!outcome.changed);
    assert!(outcome.imports.is_empty());
    assert_eq!(unit_to_source(&outcome.unit), NOTHING_TO_DO);
}

#[test]
fn false_gate_means_the_visitor_is_a_no_op() {
    let rule = ModernizeHelpers::new().expect("rule");
    let unit = lower(NOTHING_TO_DO);
    assert!(!rule.precondition().evaluate(&unit));

    // Force the visitor over the gated unit: it must agree with the gate.
    let mut ctx = RewriteContext::for_unit(&unit);
    let mut visitor = rule.visitor();
    let walked = walk_unit(unit.clone(), visitor.as_mut(), &mut ctx).expect("walk");

    assert_eq!(walked, unit);
    assert!(ctx.ledger.is_empty());
}

// =============================================================================
// Conservative matching
// =============================================================================

#[test]
fn unresolved_assertion_is_never_rewritten() {
    // No static imports: neither assertThat nor sameBeanAs resolves. The
    // capacity factory lets the gate pass.
    let source = r"import com.google.common.collect.*;

class Test {
    Object seed = Lists.newArrayListWithCapacity(2);

    void t() {
        assertThat(a, is(sameBeanAs(b)));
    }
}
";
    let outcome = modernize(source);

    assert!(outcome.changed);
    let output = unit_to_source(&outcome.unit);
    assert!(output.contains("assertThat(a, is(sameBeanAs(b)));"));
    assert!(output.contains("Object seed = new ArrayList<>(2);"));
}

// =============================================================================
// Idempotence and formatting
// =============================================================================

#[test]
fn second_run_over_own_output_changes_nothing() {
    let rule = ModernizeHelpers::new().expect("rule");
    let first = run_rule(&rule, lower(BEAN_MATCHER_ASSERTION)).expect("first run");
    assert!(first.changed);

    let second = run_rule(&rule, first.unit.clone()).expect("second run");

    assert!(!second.changed);
    assert!(second.imports.is_empty());
    assert_eq!(second.unit, first.unit);
}

#[test]
fn replacement_inherits_the_original_leading_whitespace() {
    let source = r"import static com.shazam.shazamcrest.matcher.Matchers.sameBeanAs;
import static org.hamcrest.MatcherAssert.assertThat;

class Test {
    void t() {
            assertThat(x, is(sameBeanAs(y)));
    }
}
";
    let outcome = modernize(source);

    // The rewritten call keeps the original twelve-space indentation.
    assert!(unit_to_source(&outcome.unit).contains("\n            Assertions.assertThat(x);"));
}

// =============================================================================
// Runner
// =============================================================================

#[test]
fn runner_drives_the_rule_to_fixpoint() {
    let rule = ModernizeHelpers::new().expect("rule");
    let outcome = Runner::new()
        .run(&[&rule], lower(BEAN_MATCHER_ASSERTION))
        .expect("run");

    assert!(outcome.changed);
    assert_eq!(outcome.cycles, 2);
    assert!(unit_to_source(&outcome.unit).contains("Assertions.assertThat(new Object());"));
}
