//! Rendering the typed tree back to source text.
//!
//! Rendering is the inverse of lowering: each node contributes its leading
//! trivia followed by its tokens, raw nodes contribute their text verbatim,
//! and separators are written in canonical form. A unit lowered from source
//! and left unmodified renders back byte-for-byte.
//!
//! Import reconciliation is *not* performed here: the import list renders
//! exactly as recorded on the unit. Applying an import plan against the
//! rewritten tree is the serialization collaborator's job.

use crate::tree::{
    Block, Expr, ImportDecl, Member, SourceUnit, Statement, UnitItem, VarDecl,
};

/// Renders a translation unit to source text.
#[must_use]
pub fn unit_to_source(unit: &SourceUnit) -> String {
    let mut out = String::new();
    out.push_str(&unit.prefix);

    if let Some(package) = &unit.package {
        out.push_str(&package.prefix);
        out.push_str(&package.text);
    }

    for import in &unit.imports {
        write_import(&mut out, import);
    }

    for item in &unit.items {
        match item {
            UnitItem::Type(class) => {
                out.push_str(&class.prefix);
                out.push_str(&class.head);
                out.push('{');
                for member in &class.body.members {
                    write_member(&mut out, member);
                }
                out.push_str(&class.body.close_prefix);
                out.push('}');
            }
            UnitItem::Raw(raw) => {
                out.push_str(&raw.prefix);
                out.push_str(&raw.text);
            }
        }
    }

    out.push_str(&unit.suffix);
    out
}

/// Renders a single expression to source text.
#[must_use]
pub fn expr_to_source(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_import(out: &mut String, import: &ImportDecl) {
    out.push_str(&import.prefix);
    out.push_str("import");
    if import.is_static {
        out.push_str(" static");
    }
    out.push(' ');
    out.push_str(&import.name);
    out.push(';');
}

fn write_member(out: &mut String, member: &Member) {
    match member {
        Member::Field(field) => write_var_decl(out, field),
        Member::Method(method) => {
            out.push_str(&method.prefix);
            out.push_str(&method.head);
            write_block(out, &method.body);
        }
        Member::Raw(raw) => {
            out.push_str(&raw.prefix);
            out.push_str(&raw.text);
        }
    }
}

fn write_block(out: &mut String, block: &Block) {
    out.push('{');
    for statement in &block.statements {
        write_statement(out, statement);
    }
    out.push_str(&block.close_prefix);
    out.push('}');
}

fn write_statement(out: &mut String, statement: &Statement) {
    match statement {
        Statement::Expr(expr) => {
            write_expr(out, expr);
            out.push(';');
        }
        Statement::Local(local) => write_var_decl(out, local),
        Statement::Raw(raw) => {
            out.push_str(&raw.prefix);
            out.push_str(&raw.text);
        }
    }
}

fn write_var_decl(out: &mut String, decl: &VarDecl) {
    out.push_str(&decl.prefix);
    out.push_str(&decl.head);
    if let Some(init) = &decl.init {
        out.push_str(&init.eq_prefix);
        out.push('=');
        write_expr(out, &init.value);
    }
    out.push(';');
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Call(call) => {
            out.push_str(&call.prefix);
            if let Some(select) = &call.select {
                write_expr(out, select);
                out.push('.');
            }
            out.push_str(&call.name);
            write_args(out, &call.args);
        }
        Expr::New(new) => {
            out.push_str(&new.prefix);
            out.push_str("new");
            out.push_str(&new.class_prefix);
            out.push_str(&new.class);
            write_args(out, &new.args);
        }
        Expr::Ident(ident) => {
            out.push_str(&ident.prefix);
            out.push_str(&ident.name);
        }
        Expr::Field(field) => {
            out.push_str(&field.prefix);
            write_expr(out, &field.target);
            out.push('.');
            out.push_str(&field.name);
        }
        Expr::Literal(literal) => {
            out.push_str(&literal.prefix);
            out.push_str(&literal.text);
        }
        Expr::Raw(raw) => {
            out.push_str(&raw.prefix);
            out.push_str(&raw.text);
        }
    }
}

fn write_args(out: &mut String, args: &[Expr]) {
    out.push('(');
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        write_expr(out, arg);
    }
    out.push(')');
}
