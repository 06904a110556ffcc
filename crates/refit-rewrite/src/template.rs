//! Two-phase template substitution: parse and validate once, bind and
//! splice many times.
//!
//! A [`Template`] is built from a small code snippet containing `#{any()}` /
//! `#{any(fq.Type)}` placeholders, plus the imports the produced code relies
//! on. Construction normalises the placeholders to marker identifiers,
//! parses the snippet inside a synthetic wrapper unit carrying the declared
//! imports, lowers it against the supplied signature table, and verifies
//! that every placeholder surfaced as a marker in the fragment. All of that
//! cost — and every way a template can be wrong — lives at rule
//! construction, not on the rewrite hot path.
//!
//! [`Template::apply`] binds captured sub-trees positionally into the
//! placeholder slots and stamps the replaced node's leading trivia onto the
//! result, so the surrounding layout survives the rewrite.

use crate::error::RewriteError;
use crate::placeholder::{extract_placeholders, slot_from_marker, Placeholder};
use refit_syntax::{
    lower_unit, Expr, Member, Parser, SignatureTable, Statement, UnitItem,
};

/// An import a template's produced code relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateImport {
    /// Whether this is a static member import.
    pub is_static: bool,
    /// The imported qualified name.
    pub name: String,
}

/// A pre-parsed, reusable replacement fragment.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    fragment: Expr,
    placeholders: Vec<Placeholder>,
    imports: Vec<TemplateImport>,
}

/// Builder for [`Template`], mirroring the construct-once lifecycle.
#[derive(Debug)]
pub struct TemplateBuilder {
    source: String,
    imports: Vec<TemplateImport>,
    signatures: SignatureTable,
}

impl Template {
    /// Starts building a template from snippet source.
    #[must_use]
    pub fn builder(source: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder {
            source: source.into(),
            imports: Vec::new(),
            signatures: SignatureTable::new(),
        }
    }

    /// Returns the original snippet source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the ordered placeholder slots.
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Returns the imports the produced code relies on.
    #[must_use]
    pub fn imports(&self) -> &[TemplateImport] {
        &self.imports
    }

    /// Returns the pre-parsed fragment.
    #[must_use]
    pub const fn fragment(&self) -> &Expr {
        &self.fragment
    }

    /// Binds arguments into the placeholder slots and returns the spliced
    /// node, carrying `prefix` as its leading trivia.
    ///
    /// # Errors
    ///
    /// Returns an error if the argument count does not match the
    /// placeholder count, or an argument's statically known type
    /// contradicts its placeholder constraint. An argument of unknown type
    /// always binds — the signature match that produced it already vetted
    /// the parameter types.
    pub fn apply(&self, prefix: &str, args: Vec<Expr>) -> Result<Expr, RewriteError> {
        if args.len() != self.placeholders.len() {
            return Err(RewriteError::arity_mismatch(
                self.placeholders.len(),
                args.len(),
            ));
        }

        for (placeholder, arg) in self.placeholders.iter().zip(args.iter()) {
            let Some(constraint) = placeholder.constraint.as_deref() else {
                continue;
            };
            if let Some(actual) = arg.static_type() {
                if !constraint_accepts(constraint, actual) {
                    return Err(RewriteError::placeholder_type(
                        placeholder.index,
                        constraint,
                        actual,
                    ));
                }
            }
        }

        let mut slots: Vec<Option<Expr>> = args.into_iter().map(Some).collect();
        let mut spliced = splice(self.fragment.clone(), &mut slots);
        spliced.set_prefix(prefix);
        Ok(spliced)
    }
}

impl TemplateBuilder {
    /// Declares an import the produced code relies on.
    #[must_use]
    pub fn import(mut self, name: &str) -> Self {
        self.imports.push(TemplateImport {
            is_static: false,
            name: name.to_owned(),
        });
        self
    }

    /// Declares a static member import the produced code relies on.
    #[must_use]
    pub fn static_import(mut self, name: &str) -> Self {
        self.imports.push(TemplateImport {
            is_static: true,
            name: name.to_owned(),
        });
        self
    }

    /// Supplies the signature table used to resolve the fragment's own
    /// calls, so the produced node carries consistent type information.
    #[must_use]
    pub fn signatures(mut self, table: SignatureTable) -> Self {
        self.signatures = table;
        self
    }

    /// Parses and validates the template.
    ///
    /// # Errors
    ///
    /// Fails fast on malformed placeholders, snippet source that does not
    /// parse as a single expression, or a placeholder that does not surface
    /// in the parsed fragment. These are configuration errors: they happen
    /// once, at rule construction, never per rewrite.
    pub fn build(self) -> Result<Template, RewriteError> {
        let (normalised, placeholders) = extract_placeholders(&self.source)?;

        let mut wrapped = String::new();
        for import in &self.imports {
            wrapped.push_str("import ");
            if import.is_static {
                wrapped.push_str("static ");
            }
            wrapped.push_str(&import.name);
            wrapped.push_str(";\n");
        }
        wrapped.push_str("class __RefitTemplate__ {\n    void __refit__() {\n        ");
        wrapped.push_str(&normalised);
        wrapped.push_str(";\n    }\n}\n");

        let mut parser = Parser::new()?;
        let parsed = parser.parse(&wrapped)?;
        if parsed.has_errors() {
            return Err(RewriteError::invalid_template(format!(
                "template source does not parse: '{}'",
                self.source
            )));
        }

        let unit = lower_unit(&parsed, &self.signatures)?;
        let fragment = extract_fragment(unit).ok_or_else(|| {
            RewriteError::invalid_template(format!(
                "template source is not a single expression: '{}'",
                self.source
            ))
        })?;

        let mut found = Vec::new();
        collect_markers(&fragment, &mut found);
        found.sort_unstable();
        let expected: Vec<usize> = (0..placeholders.len()).collect();
        if found != expected {
            return Err(RewriteError::invalid_template(format!(
                "placeholders do not surface as expression slots in '{}'",
                self.source
            )));
        }

        Ok(Template {
            source: self.source,
            fragment,
            placeholders,
            imports: self.imports,
        })
    }
}

/// Digs the single statement expression out of the wrapper unit.
fn extract_fragment(unit: refit_syntax::SourceUnit) -> Option<Expr> {
    let mut items = unit.items;
    let UnitItem::Type(class) = items.drain(..).next()? else {
        return None;
    };
    let mut members = class.body.members;
    let Member::Method(method) = members.drain(..).next()? else {
        return None;
    };
    let mut statements = method.body.statements;
    if statements.len() != 1 {
        return None;
    }
    let Statement::Expr(mut expr) = statements.drain(..).next()? else {
        return None;
    };
    expr.set_prefix("");
    Some(expr)
}

/// Collects placeholder marker slots appearing in the fragment.
fn collect_markers(expr: &Expr, found: &mut Vec<usize>) {
    match expr {
        Expr::Ident(ident) => {
            if let Some(slot) = slot_from_marker(&ident.name) {
                found.push(slot);
            }
        }
        Expr::Call(call) => {
            if let Some(select) = call.select.as_deref() {
                collect_markers(select, found);
            }
            for arg in &call.args {
                collect_markers(arg, found);
            }
        }
        Expr::New(new) => {
            for arg in &new.args {
                collect_markers(arg, found);
            }
        }
        Expr::Field(field) => collect_markers(&field.target, found),
        Expr::Literal(_) | Expr::Raw(_) => {}
    }
}

/// Replaces marker identifiers with the bound arguments.
///
/// A bound argument takes over the marker's leading trivia, so template
/// spacing wins at the splice point while the argument's internal layout is
/// preserved.
fn splice(expr: Expr, slots: &mut [Option<Expr>]) -> Expr {
    match expr {
        Expr::Ident(ident) => match slot_from_marker(&ident.name) {
            Some(slot) => {
                let marker_prefix = ident.prefix.clone();
                slots.get_mut(slot).and_then(Option::take).map_or_else(
                    || Expr::Ident(ident),
                    |mut bound| {
                        bound.set_prefix(marker_prefix);
                        bound
                    },
                )
            }
            None => Expr::Ident(ident),
        },
        Expr::Call(mut call) => {
            call.select = call
                .select
                .take()
                .map(|select| Box::new(splice(*select, slots)));
            call.args = call
                .args
                .drain(..)
                .map(|arg| splice(arg, slots))
                .collect();
            Expr::Call(call)
        }
        Expr::New(mut new) => {
            new.args = new.args.drain(..).map(|arg| splice(arg, slots)).collect();
            Expr::New(new)
        }
        Expr::Field(mut field) => {
            field.target = Box::new(splice(*field.target, slots));
            Expr::Field(field)
        }
        leaf => leaf,
    }
}

/// Returns whether an argument of type `actual` satisfies `constraint`.
///
/// Exact matches always pass; `java.lang.Object` accepts anything; the
/// iterable family accepts its common implementations. Unknown pairings are
/// rejected — the caller only reaches this check when both sides are known.
fn constraint_accepts(constraint: &str, actual: &str) -> bool {
    if constraint == actual || constraint == "java.lang.Object" {
        return true;
    }

    const ITERABLES: &[&str] = &[
        "java.util.Collection",
        "java.util.List",
        "java.util.ArrayList",
        "java.util.LinkedList",
        "java.util.Set",
        "java.util.HashSet",
    ];

    matches!(constraint, "java.lang.Iterable" | "java.util.Collection")
        && ITERABLES.contains(&actual)
}
