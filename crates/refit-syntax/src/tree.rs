//! Typed, immutable tree model for Java translation units.
//!
//! The model covers the constructs the rewrite engine needs to reason about
//! (imports, type and method declarations, variable initialisers, and a small
//! expression subset centred on method invocations). Everything outside that
//! subset is carried as a [`RawNode`]/[`RawExpr`] holding the exact source
//! text, so lowering is total and unmodified units render back byte-for-byte.
//!
//! Every node carries a `prefix`: the whitespace between the previous token
//! and the node's first token. Edits that replace a node stamp the original
//! prefix onto the replacement, which is how surrounding layout survives a
//! rewrite.
//!
//! Nodes own their children by value. Passes consume and return trees; an
//! unchanged subtree simply moves through a pass untouched.

/// One parsed translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Unit-level leading trivia not attributed to any child (usually
    /// empty; a child's leading trivia lives on the child).
    pub prefix: String,
    /// The package declaration, if present, carried verbatim.
    pub package: Option<PackageDecl>,
    /// Import declarations in source order.
    pub imports: Vec<ImportDecl>,
    /// Top-level items in source order.
    pub items: Vec<UnitItem>,
    /// Trivia after the last token of the unit.
    pub suffix: String,
}

/// A top-level item of a translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitItem {
    /// A class declaration.
    Type(TypeDecl),
    /// Any other top-level item, preserved verbatim.
    Raw(RawNode),
}

/// A package declaration, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    /// Trivia before the declaration.
    pub prefix: String,
    /// The exact declaration text, including the terminating semicolon.
    pub text: String,
}

/// An import declaration.
///
/// The qualified name keeps the source spelling: an on-demand import ends in
/// `.*`, a static member import names the member as its last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Trivia before the `import` keyword.
    pub prefix: String,
    /// Whether this is a `static` import.
    pub is_static: bool,
    /// The imported qualified name, possibly ending in `.*`.
    pub name: String,
}

impl ImportDecl {
    /// Returns whether this is an on-demand (`.*`) import.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.name.ends_with(".*")
    }

    /// Returns the qualified name without a trailing `.*`, if any.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix(".*").unwrap_or(&self.name)
    }
}

/// A class declaration.
///
/// The `head` holds the raw text from the first modifier through to the
/// opening brace (exclusive); only the class name is modelled separately,
/// for cursor lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Trivia before the declaration.
    pub prefix: String,
    /// Raw declaration text up to the class body.
    pub head: String,
    /// The declared type name.
    pub name: String,
    /// The class body.
    pub body: ClassBody,
}

/// The brace-delimited body of a class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBody {
    /// Members in source order.
    pub members: Vec<Member>,
    /// Trivia before the closing brace.
    pub close_prefix: String,
}

/// A class member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// A field declaration with a single declarator.
    Field(VarDecl),
    /// A method declaration with a body.
    Method(MethodDecl),
    /// Any other member, preserved verbatim.
    Raw(RawNode),
}

/// A method declaration.
///
/// As with [`TypeDecl`], the `head` is raw text (modifiers, return type,
/// name, parameter list) and only the name is modelled separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Trivia before the declaration.
    pub prefix: String,
    /// Raw declaration text up to the body.
    pub head: String,
    /// The declared method name.
    pub name: String,
    /// The method body.
    pub body: Block,
}

/// A brace-delimited statement block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Statement>,
    /// Trivia before the closing brace.
    pub close_prefix: String,
}

/// A statement inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// An expression statement; the expression's prefix carries the
    /// statement's leading trivia.
    Expr(Expr),
    /// A local variable declaration with a single declarator.
    Local(VarDecl),
    /// Any other statement, preserved verbatim.
    Raw(RawNode),
}

/// A single-declarator variable declaration (field or local).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    /// Trivia before the declaration.
    pub prefix: String,
    /// Raw text covering the type and the declared name.
    pub head: String,
    /// The declared variable name.
    pub name: String,
    /// The initialiser, if present.
    pub init: Option<Init>,
}

/// The initialiser part of a [`VarDecl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Init {
    /// Trivia between the declared name and the `=` sign.
    pub eq_prefix: String,
    /// The initialiser expression; its prefix is the trivia after `=`.
    pub value: Expr,
}

/// A syntactic construct outside the modelled subset, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    /// Trivia before the construct.
    pub prefix: String,
    /// The exact source text of the construct.
    pub text: String,
}

/// A typed expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A method invocation.
    Call(MethodCall),
    /// A constructor invocation.
    New(NewInstance),
    /// A bare identifier.
    Ident(Identifier),
    /// A field access (`target.name`).
    Field(FieldAccess),
    /// A literal value.
    Literal(Literal),
    /// Any other expression, preserved verbatim and opaque to matching.
    Raw(RawExpr),
}

impl Expr {
    /// Returns the node's leading trivia.
    #[must_use]
    pub fn prefix(&self) -> &str {
        match self {
            Self::Call(call) => &call.prefix,
            Self::New(new) => &new.prefix,
            Self::Ident(ident) => &ident.prefix,
            Self::Field(field) => &field.prefix,
            Self::Literal(literal) => &literal.prefix,
            Self::Raw(raw) => &raw.prefix,
        }
    }

    /// Replaces the node's leading trivia.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        let value = prefix.into();
        match self {
            Self::Call(call) => call.prefix = value,
            Self::New(new) => new.prefix = value,
            Self::Ident(ident) => ident.prefix = value,
            Self::Field(field) => field.prefix = value,
            Self::Literal(literal) => literal.prefix = value,
            Self::Raw(raw) => raw.prefix = value,
        }
    }

    /// Returns the statically known type of the expression, if any.
    ///
    /// Literals know their own type; calls know their resolved return type.
    /// Everything else is `None` — callers must treat an unknown type
    /// conservatively.
    #[must_use]
    pub fn static_type(&self) -> Option<&str> {
        match self {
            Self::Literal(literal) => literal.type_name.as_deref(),
            Self::Call(call) => call.sig.as_ref().and_then(|sig| sig.returns.as_deref()),
            _ => None,
        }
    }
}

/// A method invocation expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// Trivia before the first token of the invocation.
    pub prefix: String,
    /// The receiver expression, if the invocation is qualified.
    pub select: Option<Box<Expr>>,
    /// The invoked member name.
    pub name: String,
    /// Argument expressions; each argument's prefix is the trivia after the
    /// preceding `(` or `,`.
    pub args: Vec<Expr>,
    /// The resolved target, or `None` when resolution failed.
    pub sig: Option<MethodSig>,
}

/// A constructor invocation expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstance {
    /// Trivia before the `new` keyword.
    pub prefix: String,
    /// Trivia between `new` and the class reference.
    pub class_prefix: String,
    /// The instantiated class reference as written, including any type
    /// arguments (e.g. `ArrayList<>`).
    pub class: String,
    /// Argument expressions, as in [`MethodCall::args`].
    pub args: Vec<Expr>,
}

/// A bare identifier expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Trivia before the identifier.
    pub prefix: String,
    /// The identifier text.
    pub name: String,
}

/// A field access expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    /// Trivia before the target expression.
    pub prefix: String,
    /// The accessed target.
    pub target: Box<Expr>,
    /// The accessed field name.
    pub name: String,
}

/// A literal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// Trivia before the literal.
    pub prefix: String,
    /// The literal's source text.
    pub text: String,
    /// The literal's type, when the lowering recognises it (`int`,
    /// `boolean`, `java.lang.String`, …).
    pub type_name: Option<String>,
}

/// An expression outside the modelled subset, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExpr {
    /// Trivia before the expression.
    pub prefix: String,
    /// The exact source text of the expression.
    pub text: String,
}

/// The resolved target of a method invocation.
///
/// Produced by the type-resolution collaborator (see
/// [`crate::resolve::SignatureTable`]); consumed by signature matching.
/// Type names are fully qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    /// Fully qualified owner type of the member.
    pub owner: String,
    /// The member name.
    pub name: String,
    /// Fully qualified parameter types.
    pub params: Vec<String>,
    /// Fully qualified return type, when declared.
    pub returns: Option<String>,
}

impl MethodSig {
    /// Creates a signature from string parts.
    #[must_use]
    pub fn new(owner: &str, name: &str, params: &[&str], returns: Option<&str>) -> Self {
        Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
            returns: returns.map(ToOwned::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_wildcard_detection() {
        let on_demand = ImportDecl {
            prefix: String::new(),
            is_static: false,
            name: "com.google.common.collect.*".to_owned(),
        };
        assert!(on_demand.is_wildcard());
        assert_eq!(on_demand.base_name(), "com.google.common.collect");

        let single = ImportDecl {
            prefix: String::new(),
            is_static: true,
            name: "org.hamcrest.MatcherAssert.assertThat".to_owned(),
        };
        assert!(!single.is_wildcard());
        assert_eq!(single.base_name(), "org.hamcrest.MatcherAssert.assertThat");
    }

    #[test]
    fn expr_prefix_round_trip() {
        let mut expr = Expr::Ident(Identifier {
            prefix: " ".to_owned(),
            name: "x".to_owned(),
        });
        assert_eq!(expr.prefix(), " ");

        expr.set_prefix("\n        ");
        assert_eq!(expr.prefix(), "\n        ");
    }

    #[test]
    fn static_type_of_literals_and_calls() {
        let literal = Expr::Literal(Literal {
            prefix: String::new(),
            text: "2".to_owned(),
            type_name: Some("int".to_owned()),
        });
        assert_eq!(literal.static_type(), Some("int"));

        let unresolved = Expr::Call(MethodCall {
            prefix: String::new(),
            select: None,
            name: "mystery".to_owned(),
            args: Vec::new(),
            sig: None,
        });
        assert_eq!(unresolved.static_type(), None);
    }
}
