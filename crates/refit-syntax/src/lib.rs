//! Parsing front end and typed tree model for the Refit modernization
//! toolchain.
//!
//! This crate turns Java source text into a typed, immutable tree the
//! rewrite engine can match against and splice into:
//!
//! - **Parsing** via [`Parser`], a Tree-sitter wrapper with structured
//!   error reporting
//! - **Lowering** via [`lower_unit`], a total conversion from the concrete
//!   tree into the typed model — unmodelled constructs are preserved
//!   verbatim as raw nodes
//! - **Resolution** via [`SignatureTable`], a declarative stand-in for the
//!   external type resolver that attributes a [`MethodSig`] to each known
//!   call site
//! - **Rendering** via [`unit_to_source`], the byte-faithful inverse of
//!   lowering
//! - **Traversal** via [`UnitVisitor`] and [`walk_unit`], a depth-first
//!   transforming walk with a [`Cursor`] breadcrumb path
//!
//! # Example
//!
//! ```
//! use refit_syntax::{lower_unit, unit_to_source, Parser, SignatureTable};
//!
//! let table = SignatureTable::new().method(
//!     "com.google.common.collect.Lists",
//!     "newArrayList",
//!     &["java.lang.Iterable"],
//!     Some("java.util.ArrayList"),
//! );
//!
//! let mut parser = Parser::new()?;
//! let parsed = parser.parse(
//!     "import com.google.common.collect.*;\n\nclass T {\n    Object xs = Lists.newArrayList(l);\n}\n",
//! )?;
//! let unit = lower_unit(&parsed, &table)?;
//!
//! // An unmodified unit renders back byte-for-byte.
//! assert_eq!(unit_to_source(&unit), parsed.source());
//! # Ok::<(), refit_syntax::SyntaxError>(())
//! ```

mod cursor;
mod error;
mod lower;
mod parser;
mod position;
mod render;
mod resolve;
mod tree;
mod visit;

pub use cursor::{Breadcrumb, Cursor};
pub use error::SyntaxError;
pub use lower::lower_unit;
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use render::{expr_to_source, unit_to_source};
pub use resolve::{CallSite, Resolver, SignatureTable};
pub use tree::{
    Block, ClassBody, Expr, FieldAccess, Identifier, ImportDecl, Init, Literal, Member,
    MethodCall, MethodDecl, MethodSig, NewInstance, PackageDecl, RawExpr, RawNode, SourceUnit,
    Statement, TypeDecl, UnitItem, VarDecl,
};
pub use visit::{UnitVisitor, walk_unit};

#[cfg(test)]
mod tests;
