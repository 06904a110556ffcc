//! Depth-first transforming traversal over translation units.
//!
//! [`walk_unit`] rebuilds a unit by value, offering every method invocation
//! to the visitor exactly once. The expression the visitor returns replaces
//! the offered node in place, and traversal then descends into the returned
//! node's children — so a freshly spliced subtree still has its arguments
//! visited, while the spliced node itself is never re-offered within the
//! pass.
//!
//! The visitor is generic over a caller-supplied context `C`, threaded
//! mutably through the whole pass. The rewrite engine uses it to carry
//! per-unit state such as the import ledger; the traversal itself never
//! inspects it.

use crate::cursor::{Breadcrumb, Cursor};
use crate::tree::{Expr, Init, Member, MethodCall, SourceUnit, Statement, UnitItem};

/// A transforming visitor over one translation unit.
///
/// The default implementation leaves every node unchanged, so implementors
/// override only what they care about.
pub trait UnitVisitor<C> {
    /// The error type surfaced by a failing visit.
    type Error;

    /// Visits one method invocation.
    ///
    /// Returning the call wrapped back into [`Expr::Call`] leaves the node
    /// unchanged; returning anything else replaces it. Either way the
    /// traversal continues into the returned node's children.
    ///
    /// # Errors
    ///
    /// Implementations propagate their own failures; the default never
    /// fails.
    fn visit_method_call(
        &mut self,
        call: MethodCall,
        cursor: &Cursor,
        ctx: &mut C,
    ) -> Result<Expr, Self::Error> {
        let _ = (cursor, ctx);
        Ok(Expr::Call(call))
    }
}

/// Walks a unit depth-first, applying the visitor to every method call.
///
/// # Errors
///
/// Propagates the first error returned by the visitor; the unit consumed by
/// the failing pass is dropped, never partially surfaced.
pub fn walk_unit<C, V>(unit: SourceUnit, visitor: &mut V, ctx: &mut C) -> Result<SourceUnit, V::Error>
where
    V: UnitVisitor<C> + ?Sized,
{
    tracing::trace!(items = unit.items.len(), "walking unit");
    let mut cursor = Cursor::new();

    let SourceUnit {
        prefix,
        package,
        imports,
        items,
        suffix,
    } = unit;

    let items = items
        .into_iter()
        .map(|item| walk_item(item, visitor, &mut cursor, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SourceUnit {
        prefix,
        package,
        imports,
        items,
        suffix,
    })
}

fn walk_item<C, V>(
    item: UnitItem,
    visitor: &mut V,
    cursor: &mut Cursor,
    ctx: &mut C,
) -> Result<UnitItem, V::Error>
where
    V: UnitVisitor<C> + ?Sized,
{
    let mut class = match item {
        UnitItem::Type(class) => class,
        raw @ UnitItem::Raw(_) => return Ok(raw),
    };

    cursor.push(Breadcrumb::Type(class.name.clone()));
    let members = class
        .body
        .members
        .drain(..)
        .map(|member| walk_member(member, visitor, cursor, ctx))
        .collect::<Result<Vec<_>, _>>();
    cursor.pop();

    class.body.members = members?;
    Ok(UnitItem::Type(class))
}

fn walk_member<C, V>(
    member: Member,
    visitor: &mut V,
    cursor: &mut Cursor,
    ctx: &mut C,
) -> Result<Member, V::Error>
where
    V: UnitVisitor<C> + ?Sized,
{
    match member {
        Member::Field(mut field) => {
            let Some(init) = field.init.take() else {
                return Ok(Member::Field(field));
            };

            cursor.push(Breadcrumb::Field(field.name.clone()));
            let value = walk_expr(init.value, visitor, cursor, ctx);
            cursor.pop();

            field.init = Some(Init {
                eq_prefix: init.eq_prefix,
                value: value?,
            });
            Ok(Member::Field(field))
        }
        Member::Method(mut method) => {
            cursor.push(Breadcrumb::Method(method.name.clone()));
            let statements = method
                .body
                .statements
                .drain(..)
                .map(|statement| walk_statement(statement, visitor, cursor, ctx))
                .collect::<Result<Vec<_>, _>>();
            cursor.pop();

            method.body.statements = statements?;
            Ok(Member::Method(method))
        }
        Member::Raw(raw) => Ok(Member::Raw(raw)),
    }
}

fn walk_statement<C, V>(
    statement: Statement,
    visitor: &mut V,
    cursor: &mut Cursor,
    ctx: &mut C,
) -> Result<Statement, V::Error>
where
    V: UnitVisitor<C> + ?Sized,
{
    match statement {
        Statement::Expr(expr) => Ok(Statement::Expr(walk_expr(expr, visitor, cursor, ctx)?)),
        Statement::Local(mut local) => {
            let Some(init) = local.init.take() else {
                return Ok(Statement::Local(local));
            };

            let value = walk_expr(init.value, visitor, cursor, ctx)?;
            local.init = Some(Init {
                eq_prefix: init.eq_prefix,
                value,
            });
            Ok(Statement::Local(local))
        }
        Statement::Raw(raw) => Ok(Statement::Raw(raw)),
    }
}

fn walk_expr<C, V>(
    expr: Expr,
    visitor: &mut V,
    cursor: &mut Cursor,
    ctx: &mut C,
) -> Result<Expr, V::Error>
where
    V: UnitVisitor<C> + ?Sized,
{
    let visited = match expr {
        Expr::Call(call) => visitor.visit_method_call(call, cursor, ctx)?,
        other => other,
    };

    match visited {
        Expr::Call(mut call) => {
            cursor.push(Breadcrumb::Call(call.name.clone()));
            let select = match call.select.take() {
                Some(select) => Some(Box::new(walk_expr(*select, visitor, cursor, ctx)?)),
                None => None,
            };
            let args = call
                .args
                .drain(..)
                .map(|arg| walk_expr(arg, visitor, cursor, ctx))
                .collect::<Result<Vec<_>, _>>();
            cursor.pop();

            call.select = select;
            call.args = args?;
            Ok(Expr::Call(call))
        }
        Expr::New(mut new) => {
            cursor.push(Breadcrumb::New(new.class.clone()));
            let args = new
                .args
                .drain(..)
                .map(|arg| walk_expr(arg, visitor, cursor, ctx))
                .collect::<Result<Vec<_>, _>>();
            cursor.pop();

            new.args = args?;
            Ok(Expr::New(new))
        }
        Expr::Field(mut field) => {
            let target = walk_expr(*field.target, visitor, cursor, ctx)?;
            field.target = Box::new(target);
            Ok(Expr::Field(field))
        }
        leaf => Ok(leaf),
    }
}
