//! Lowering from Tree-sitter concrete trees into the typed model.
//!
//! Lowering is total: constructs the engine reasons about become typed nodes,
//! and everything else becomes a raw node carrying its exact source text.
//! Leading trivia is computed from the gaps between sibling nodes, so a
//! lowered unit renders back byte-for-byte (see [`crate::render`]).
//!
//! Method invocations are resolved against the supplied [`Resolver`] as they
//! are lowered; a call whose target the resolver does not know simply carries
//! no signature.

use crate::error::SyntaxError;
use crate::parser::ParseResult;
use crate::resolve::{CallSite, Resolver};
use crate::tree::{
    Block, ClassBody, Expr, FieldAccess, Identifier, ImportDecl, Init, Literal, Member,
    MethodCall, MethodDecl, NewInstance, PackageDecl, RawExpr, RawNode, SourceUnit, Statement,
    TypeDecl, UnitItem, VarDecl,
};

/// Lowers a parsed translation unit into the typed tree model.
///
/// # Errors
///
/// Returns an error if the parse result's root node is not a Java program.
/// Syntax errors inside the unit do not fail lowering; the affected
/// constructs are preserved as raw nodes.
pub fn lower_unit(parsed: &ParseResult, resolver: &dyn Resolver) -> Result<SourceUnit, SyntaxError> {
    let root = parsed.root_node();
    if root.kind() != "program" {
        return Err(SyntaxError::lower(format!(
            "expected a program root, found {}",
            root.kind()
        )));
    }

    let mut lowerer = Lowerer {
        source: parsed.source(),
        resolver,
        imports: Vec::new(),
    };
    lowerer.lower_program(root)
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "line_comment" | "block_comment")
}

struct Lowerer<'a> {
    source: &'a str,
    resolver: &'a dyn Resolver,
    imports: Vec<ImportDecl>,
}

impl Lowerer<'_> {
    fn slice(&self, start: usize, end: usize) -> String {
        self.source.get(start..end).unwrap_or_default().to_owned()
    }

    fn text(&self, node: tree_sitter::Node<'_>) -> String {
        self.slice(node.start_byte(), node.end_byte())
    }

    fn lower_program(&mut self, root: tree_sitter::Node<'_>) -> Result<SourceUnit, SyntaxError> {
        let mut package = None;
        let mut items = Vec::new();
        let mut pos = 0usize;

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            if is_comment(child.kind()) {
                continue;
            }

            let gap = self.slice(pos, child.start_byte());
            match child.kind() {
                "package_declaration" => {
                    package = Some(PackageDecl {
                        prefix: gap,
                        text: self.text(child),
                    });
                }
                "import_declaration" => self.lower_import(child, gap),
                "class_declaration" => {
                    let lowered = self.lower_class(child, gap)?;
                    items.push(UnitItem::Type(lowered));
                }
                _ => items.push(UnitItem::Raw(RawNode {
                    prefix: gap,
                    text: self.text(child),
                })),
            }
            pos = child.end_byte();
        }

        Ok(SourceUnit {
            prefix: String::new(),
            package,
            imports: std::mem::take(&mut self.imports),
            items,
            suffix: self.slice(pos, self.source.len()),
        })
    }

    fn lower_import(&mut self, node: tree_sitter::Node<'_>, prefix: String) {
        let mut is_static = false;
        let mut name = String::new();
        let mut wildcard = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static" => is_static = true,
                "identifier" | "scoped_identifier" => name = self.text(child),
                "asterisk" => wildcard = true,
                _ => {}
            }
        }

        if wildcard {
            name.push_str(".*");
        }

        self.imports.push(ImportDecl {
            prefix,
            is_static,
            name,
        });
    }

    fn lower_class(
        &mut self,
        node: tree_sitter::Node<'_>,
        prefix: String,
    ) -> Result<TypeDecl, SyntaxError> {
        let body_node = node
            .child_by_field_name("body")
            .ok_or_else(|| SyntaxError::lower("class declaration without a body"))?;
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let head = self.slice(node.start_byte(), body_node.start_byte());

        Ok(TypeDecl {
            prefix,
            head,
            name,
            body: self.lower_class_body(body_node),
        })
    }

    fn lower_class_body(&mut self, node: tree_sitter::Node<'_>) -> ClassBody {
        let mut members = Vec::new();
        let mut close_prefix = String::new();
        let mut pos = node.start_byte();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if is_comment(child.kind()) {
                continue;
            }

            match child.kind() {
                "{" => {
                    pos = child.end_byte();
                    continue;
                }
                "}" => {
                    close_prefix = self.slice(pos, child.start_byte());
                    break;
                }
                _ => {}
            }

            let gap = self.slice(pos, child.start_byte());
            let member = match child.kind() {
                "field_declaration" => self
                    .lower_var_decl(child, gap.clone())
                    .map_or_else(
                        || {
                            Member::Raw(RawNode {
                                prefix: gap.clone(),
                                text: self.text(child),
                            })
                        },
                        Member::Field,
                    ),
                "method_declaration" => self.lower_method(child, gap.clone()),
                _ => Member::Raw(RawNode {
                    prefix: gap,
                    text: self.text(child),
                }),
            };
            members.push(member);
            pos = child.end_byte();
        }

        ClassBody {
            members,
            close_prefix,
        }
    }

    fn lower_method(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Member {
        let Some(body_node) = node.child_by_field_name("body") else {
            return Member::Raw(RawNode {
                prefix,
                text: self.text(node),
            });
        };
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let head = self.slice(node.start_byte(), body_node.start_byte());

        Member::Method(MethodDecl {
            prefix,
            head,
            name,
            body: self.lower_block(body_node),
        })
    }

    fn lower_block(&mut self, node: tree_sitter::Node<'_>) -> Block {
        let mut statements = Vec::new();
        let mut close_prefix = String::new();
        let mut pos = node.start_byte();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if is_comment(child.kind()) {
                continue;
            }

            match child.kind() {
                "{" => {
                    pos = child.end_byte();
                    continue;
                }
                "}" => {
                    close_prefix = self.slice(pos, child.start_byte());
                    break;
                }
                _ => {}
            }

            let gap = self.slice(pos, child.start_byte());
            let statement = match child.kind() {
                "expression_statement" => self.lower_expr_statement(child, gap),
                "local_variable_declaration" => self
                    .lower_var_decl(child, gap.clone())
                    .map_or_else(
                        || {
                            Statement::Raw(RawNode {
                                prefix: gap.clone(),
                                text: self.text(child),
                            })
                        },
                        Statement::Local,
                    ),
                _ => Statement::Raw(RawNode {
                    prefix: gap,
                    text: self.text(child),
                }),
            };
            statements.push(statement);
            pos = child.end_byte();
        }

        Block {
            statements,
            close_prefix,
        }
    }

    fn lower_expr_statement(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Statement {
        let Some(expr_node) = node.named_child(0) else {
            return Statement::Raw(RawNode {
                prefix,
                text: self.text(node),
            });
        };

        Statement::Expr(self.lower_expr(expr_node, prefix))
    }

    /// Lowers a single-declarator variable declaration (field or local).
    ///
    /// Returns `None` for shapes outside the modelled subset (multiple
    /// declarators, missing pieces); the caller falls back to a raw node.
    fn lower_var_decl(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Option<VarDecl> {
        let mut declarators = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "variable_declarator" {
                declarators.push(child);
            }
        }

        let [declarator] = declarators.as_slice() else {
            return None;
        };
        let name_node = declarator.child_by_field_name("name")?;
        let head = self.slice(node.start_byte(), name_node.end_byte());
        let name = self.text(name_node);

        let init = match declarator.child_by_field_name("value") {
            None => None,
            Some(value_node) => {
                let between = self.slice(name_node.end_byte(), value_node.start_byte());
                let eq_index = between.find('=')?;
                let eq_prefix = between.get(..eq_index).unwrap_or_default().to_owned();
                let value_prefix = between
                    .get(eq_index.saturating_add(1)..)
                    .unwrap_or_default()
                    .to_owned();
                Some(Init {
                    eq_prefix,
                    value: self.lower_expr(value_node, value_prefix),
                })
            }
        };

        Some(VarDecl {
            prefix,
            head,
            name,
            init,
        })
    }

    fn lower_expr(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Expr {
        match node.kind() {
            "method_invocation" => self.lower_invocation(node, prefix),
            "object_creation_expression" => self.lower_creation(node, prefix),
            "identifier" => Expr::Ident(Identifier {
                prefix,
                name: self.text(node),
            }),
            "field_access" => self.lower_field_access(node, prefix),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => Expr::Literal(Literal {
                prefix,
                text: self.text(node),
                type_name: Some("int".to_owned()),
            }),
            "decimal_floating_point_literal" => Expr::Literal(Literal {
                prefix,
                text: self.text(node),
                type_name: Some("double".to_owned()),
            }),
            "string_literal" => Expr::Literal(Literal {
                prefix,
                text: self.text(node),
                type_name: Some("java.lang.String".to_owned()),
            }),
            "character_literal" => Expr::Literal(Literal {
                prefix,
                text: self.text(node),
                type_name: Some("char".to_owned()),
            }),
            "true" | "false" => Expr::Literal(Literal {
                prefix,
                text: self.text(node),
                type_name: Some("boolean".to_owned()),
            }),
            "null_literal" => Expr::Literal(Literal {
                prefix,
                text: self.text(node),
                type_name: None,
            }),
            _ => Expr::Raw(RawExpr {
                prefix,
                text: self.text(node),
            }),
        }
    }

    fn lower_invocation(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Expr {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let select = node
            .child_by_field_name("object")
            .map(|object| Box::new(self.lower_expr(object, String::new())));
        let args = node
            .child_by_field_name("arguments")
            .map(|arguments| self.lower_args(arguments))
            .unwrap_or_default();

        let sig = match select.as_deref() {
            Some(Expr::Ident(ident)) => self.resolver.resolve_call(&CallSite {
                imports: &self.imports,
                receiver: Some(ident.name.as_str()),
                name: &name,
                arg_count: args.len(),
            }),
            // Qualified through something richer than a simple name:
            // resolution stays conservative.
            Some(_) => None,
            None => self.resolver.resolve_call(&CallSite {
                imports: &self.imports,
                receiver: None,
                name: &name,
                arg_count: args.len(),
            }),
        };

        Expr::Call(MethodCall {
            prefix,
            select,
            name,
            args,
            sig,
        })
    }

    fn lower_creation(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Expr {
        // Anonymous class bodies fall outside the modelled subset.
        let mut cursor = node.walk();
        let has_class_body = node
            .children(&mut cursor)
            .any(|child| child.kind() == "class_body");
        let type_node = node.child_by_field_name("type");
        let args_node = node.child_by_field_name("arguments");

        let (Some(type_node), Some(args_node)) = (type_node, args_node) else {
            return Expr::Raw(RawExpr {
                prefix,
                text: self.text(node),
            });
        };
        if has_class_body {
            return Expr::Raw(RawExpr {
                prefix,
                text: self.text(node),
            });
        }

        let mut walker = node.walk();
        let new_end = node
            .children(&mut walker)
            .find(|child| child.kind() == "new")
            .map_or(node.start_byte(), |kw| kw.end_byte());

        Expr::New(NewInstance {
            prefix,
            class_prefix: self.slice(new_end, type_node.start_byte()),
            class: self.text(type_node),
            args: self.lower_args(args_node),
        })
    }

    fn lower_field_access(&mut self, node: tree_sitter::Node<'_>, prefix: String) -> Expr {
        let object = node.child_by_field_name("object");
        let field = node.child_by_field_name("field");

        let (Some(object), Some(field)) = (object, field) else {
            return Expr::Raw(RawExpr {
                prefix,
                text: self.text(node),
            });
        };

        Expr::Field(FieldAccess {
            prefix,
            target: Box::new(self.lower_expr(object, String::new())),
            name: self.text(field),
        })
    }

    fn lower_args(&mut self, node: tree_sitter::Node<'_>) -> Vec<Expr> {
        let mut args = Vec::new();
        let mut prev_end = node.start_byte();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "(" | "," => {
                    prev_end = child.end_byte();
                    continue;
                }
                ")" => break,
                kind if is_comment(kind) => continue,
                _ => {}
            }

            let arg_prefix = self.slice(prev_end, child.start_byte());
            args.push(self.lower_expr(child, arg_prefix));
            prev_end = child.end_byte();
        }

        args
    }
}
