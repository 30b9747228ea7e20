//! Source text → [`Program`]
//!
//! Runs tree-sitter over the input, rejects trees that contain `ERROR` or
//! `MISSING` nodes, then lowers the concrete tree into the typed syntax tree.
//! Lowering is total: any construct without a dedicated variant (or with a
//! shape the variant cannot represent) becomes a `Verbatim` node.

use tree_sitter::Node;

use crate::ast::{
    Arrow, ArrowBody, ClassDecl, ClassMember, ClassProperty, Decl, DefaultDecl, Expr, Function,
    ForHead, ForInit, FunctionDecl, ImportDecl, ImportSpecifier, JsxAttr, JsxAttrValue, JsxChild,
    JsxElement, Lit, MemberProp, Method, MethodKind, ObjectPatProp, Param, Pattern, Program, Prop,
    PropKey, Stmt, Str, SwitchCase, Template, VarDecl, VarDeclarator, VarKind, Verbatim,
};
use crate::error::ParseError;
use crate::language::Language;

/// Parse source text into a syntax tree
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] with the position of the first offending
/// node when the source does not parse cleanly.
pub fn parse(source: &str, language: Language) -> Result<Program, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| ParseError::ParserInit {
            language: language.name(),
            message: e.to_string(),
        })?;

    let tree = parser.parse(source, None).ok_or(ParseError::ParseFailed)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error(root, source));
    }

    let lowerer = Lowerer { src: source };
    Ok(Program::new(lowerer.stmts(root)))
}

/// Check whether source text parses without errors
#[must_use]
pub fn is_valid(source: &str, language: Language) -> bool {
    parse(source, language).is_ok()
}

fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children excluding comments
fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    named(node).into_iter().next()
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    children(node).iter().any(|c| c.kind() == token)
}

fn first_error(root: Node<'_>, src: &str) -> ParseError {
    let mut current = root;
    'descend: loop {
        for child in children(current) {
            if child.is_error() || child.is_missing() {
                return error_at(child, src);
            }
            if child.has_error() {
                current = child;
                continue 'descend;
            }
        }
        return error_at(current, src);
    }
}

fn error_at(node: Node<'_>, src: &str) -> ParseError {
    let pos = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = src.get(node.byte_range()).unwrap_or_default();
        let snippet: String = text.lines().next().unwrap_or_default().chars().take(24).collect();
        if snippet.trim().is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected `{}`", snippet.trim())
        }
    };
    ParseError::syntax(pos.row + 1, pos.column + 1, message)
}

struct Lowerer<'s> {
    src: &'s str,
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        self.src.get(node.byte_range()).unwrap_or_default()
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
    }

    fn verbatim(&self, node: Node<'_>) -> Verbatim {
        Verbatim::new(self.text(node), node.start_position().column)
    }

    // ---- statements ----

    fn stmts(&self, parent: Node<'_>) -> Vec<Stmt> {
        let mut cursor = parent.walk();
        let nodes: Vec<_> = parent.named_children(&mut cursor).collect();
        self.stmt_list(&nodes)
    }

    /// Lower statements, keeping a comment that starts on the row where the
    /// previous statement ends attached to that statement
    fn stmt_list(&self, nodes: &[Node<'_>]) -> Vec<Stmt> {
        let mut out = Vec::with_capacity(nodes.len());
        let mut prev_end_row = None;
        for &node in nodes {
            let stmt = match node.kind() {
                "comment" if prev_end_row == Some(node.start_position().row) => {
                    Stmt::TrailingComment(self.verbatim(node))
                }
                "comment" => Stmt::Comment(self.verbatim(node)),
                _ => self.stmt(node),
            };
            prev_end_row = Some(node.end_position().row);
            out.push(stmt);
        }
        out
    }

    fn stmt(&self, node: Node<'_>) -> Stmt {
        self.try_stmt(node)
            .unwrap_or_else(|| Stmt::Verbatim(self.verbatim(node)))
    }

    fn try_stmt(&self, node: Node<'_>) -> Option<Stmt> {
        match node.kind() {
            "import_statement" => self.import(node).map(Stmt::Import),
            "export_statement" => self.export(node),
            "function_declaration"
            | "generator_function_declaration"
            | "class_declaration"
            | "lexical_declaration"
            | "variable_declaration" => self.decl(node).map(Stmt::Decl),
            "expression_statement" => Some(Stmt::Expr(self.expr(first_named(node)?))),
            "return_statement" => Some(Stmt::Return(first_named(node).map(|n| self.expr(n)))),
            "throw_statement" => Some(Stmt::Throw(self.expr(first_named(node)?))),
            "if_statement" => {
                let test = self.unwrap_paren(node.child_by_field_name("condition")?);
                let cons = self.stmt(node.child_by_field_name("consequence")?);
                let alt = match node.child_by_field_name("alternative") {
                    Some(clause) => Some(Box::new(self.stmt(first_named(clause)?))),
                    None => None,
                };
                Some(Stmt::If {
                    test,
                    cons: Box::new(cons),
                    alt,
                })
            }
            "statement_block" => Some(Stmt::Block(self.stmts(node))),
            "try_statement" => {
                let block = self.stmts(node.child_by_field_name("body")?);
                let (param, handler) = match node.child_by_field_name("handler") {
                    Some(catch) => (
                        catch
                            .child_by_field_name("parameter")
                            .map(|p| self.pattern(p)),
                        Some(self.stmts(catch.child_by_field_name("body")?)),
                    ),
                    None => (None, None),
                };
                let finalizer = match node.child_by_field_name("finalizer") {
                    Some(fin) => Some(self.stmts(fin.child_by_field_name("body")?)),
                    None => None,
                };
                Some(Stmt::Try {
                    block,
                    param,
                    handler,
                    finalizer,
                })
            }
            "for_statement" => self.for_loop(node),
            "for_in_statement" => self.for_in_loop(node),
            "while_statement" => Some(Stmt::While {
                test: self.unwrap_paren(node.child_by_field_name("condition")?),
                body: Box::new(self.stmt(node.child_by_field_name("body")?)),
            }),
            "do_statement" => Some(Stmt::DoWhile {
                body: Box::new(self.stmt(node.child_by_field_name("body")?)),
                test: self.unwrap_paren(node.child_by_field_name("condition")?),
            }),
            "switch_statement" => self.switch(node),
            "labeled_statement" => Some(Stmt::Labeled {
                label: self.field_text(node, "label")?,
                body: Box::new(self.stmt(node.child_by_field_name("body")?)),
            }),
            "break_statement" => Some(Stmt::Break(self.field_text(node, "label"))),
            "continue_statement" => Some(Stmt::Continue(self.field_text(node, "label"))),
            "empty_statement" => Some(Stmt::Empty),
            "comment" => Some(Stmt::Comment(self.verbatim(node))),
            _ => None,
        }
    }

    fn for_loop(&self, node: Node<'_>) -> Option<Stmt> {
        let init = match node.child_by_field_name("initializer") {
            Some(init) => match init.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    Some(ForInit::Var(self.var_decl(init)?))
                }
                "empty_statement" => None,
                _ => Some(ForInit::Expr(self.expr(init))),
            },
            None => None,
        };
        let test = node
            .child_by_field_name("condition")
            .filter(|n| n.kind() != "empty_statement")
            .map(|n| self.expr(n));
        let update = node.child_by_field_name("increment").map(|n| self.expr(n));
        Some(Stmt::For {
            init,
            test,
            update,
            body: Box::new(self.stmt(node.child_by_field_name("body")?)),
        })
    }

    fn for_in_loop(&self, node: Node<'_>) -> Option<Stmt> {
        // `for (var x = 0 in xs)` has no modelled form
        if node.child_by_field_name("value").is_some() {
            return None;
        }
        let left = node.child_by_field_name("left")?;
        let left = match node.child_by_field_name("kind") {
            Some(kind) => ForHead::Var {
                kind: VarKind::from_keyword(self.text(kind))?,
                name: self.pattern(left),
            },
            None => ForHead::Target(self.pattern(left)),
        };
        let operator = node.child_by_field_name("operator")?;
        Some(Stmt::ForIn {
            left,
            of: self.text(operator) == "of",
            is_await: has_token(node, "await"),
            right: self.expr(node.child_by_field_name("right")?),
            body: Box::new(self.stmt(node.child_by_field_name("body")?)),
        })
    }

    fn switch(&self, node: Node<'_>) -> Option<Stmt> {
        let discriminant = self.unwrap_paren(node.child_by_field_name("value")?);
        let mut cases: Vec<SwitchCase> = Vec::new();
        for clause in children(node.child_by_field_name("body")?) {
            match clause.kind() {
                "switch_case" | "switch_default" => {
                    let value = clause.child_by_field_name("value");
                    let body: Vec<_> = children(clause)
                        .into_iter()
                        .filter(|c| c.is_named() && Some(c.id()) != value.map(|v| v.id()))
                        .collect();
                    cases.push(SwitchCase {
                        test: value.map(|v| self.expr(v)),
                        body: self.stmt_list(&body),
                    });
                }
                "comment" => cases.last_mut()?.body.push(Stmt::Comment(self.verbatim(clause))),
                _ => {}
            }
        }
        Some(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    fn decl(&self, node: Node<'_>) -> Option<Decl> {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                self.function_decl(node).map(Decl::Function)
            }
            "class_declaration" => self.class(node).map(Decl::Class),
            "lexical_declaration" | "variable_declaration" => self.var_decl(node).map(Decl::Var),
            _ => None,
        }
    }

    fn import(&self, node: Node<'_>) -> Option<ImportDecl> {
        let source = self.string(node.child_by_field_name("source")?)?;
        let mut decl = ImportDecl::new(source.value, Vec::new());
        for child in children(node) {
            match child.kind() {
                "import_clause" => self.import_clause(child, &mut decl.specifiers)?,
                "type" => decl.type_only = true,
                "import_attribute" | "typeof" | "import_require_clause" => return None,
                _ => {}
            }
        }
        Some(decl)
    }

    fn import_clause(&self, clause: Node<'_>, out: &mut Vec<ImportSpecifier>) -> Option<()> {
        for part in named(clause) {
            match part.kind() {
                "identifier" => out.push(ImportSpecifier::Default(self.text(part).to_string())),
                "namespace_import" => {
                    let local = first_named(part)?;
                    out.push(ImportSpecifier::Namespace(self.text(local).to_string()));
                }
                "named_imports" => {
                    for spec in named(part) {
                        if spec.kind() != "import_specifier" || has_token(spec, "type") {
                            return None;
                        }
                        let name = spec.child_by_field_name("name")?;
                        if name.kind() != "identifier" {
                            return None;
                        }
                        out.push(ImportSpecifier::Named {
                            imported: self.text(name).to_string(),
                            local: self.field_text(spec, "alias"),
                        });
                    }
                }
                _ => return None,
            }
        }
        Some(())
    }

    fn export(&self, node: Node<'_>) -> Option<Stmt> {
        let kids = children(node);
        if node.child_by_field_name("source").is_some()
            || kids.iter().any(|c| c.kind() == "decorator")
        {
            return None;
        }
        let is_default = kids.iter().any(|c| c.kind() == "default");

        if let Some(decl) = node.child_by_field_name("declaration") {
            if !is_default {
                return self.decl(decl).map(Stmt::ExportDecl);
            }
            return match decl.kind() {
                "function_declaration" | "generator_function_declaration" => self
                    .function_decl(decl)
                    .map(|f| Stmt::ExportDefault(DefaultDecl::Function(f))),
                "class_declaration" => self
                    .class(decl)
                    .map(|c| Stmt::ExportDefault(DefaultDecl::Class(c))),
                _ => None,
            };
        }

        if !is_default {
            return None;
        }
        let value = node.child_by_field_name("value")?;
        let target = match value.kind() {
            "function_expression" | "function" | "generator_function" => {
                DefaultDecl::Function(self.function_decl(value)?)
            }
            "class" => DefaultDecl::Class(self.class(value)?),
            _ => DefaultDecl::Expr(self.expr(value)),
        };
        Some(Stmt::ExportDefault(target))
    }

    fn var_decl(&self, node: Node<'_>) -> Option<VarDecl> {
        let kind = VarKind::from_keyword(children(node).first()?.kind())?;
        let mut decls = Vec::new();
        for declarator in named(node) {
            if declarator.kind() != "variable_declarator" || has_token(declarator, "!") {
                return None;
            }
            decls.push(VarDeclarator {
                name: self.pattern(declarator.child_by_field_name("name")?),
                type_ann: self.field_text(declarator, "type"),
                init: declarator
                    .child_by_field_name("value")
                    .map(|v| self.expr(v)),
            });
        }
        Some(VarDecl { kind, decls })
    }

    // ---- functions and classes ----

    fn function_decl(&self, node: Node<'_>) -> Option<FunctionDecl> {
        Some(FunctionDecl {
            name: self.field_text(node, "name"),
            function: self.function(node)?,
        })
    }

    fn function(&self, node: Node<'_>) -> Option<Function> {
        let kids = children(node);
        Some(Function {
            params: self.params(node.child_by_field_name("parameters")?)?,
            body: self.stmts(node.child_by_field_name("body")?),
            is_async: kids.iter().any(|c| c.kind() == "async"),
            is_generator: kids.iter().any(|c| c.kind() == "*"),
            type_params: self.field_text(node, "type_parameters"),
            return_type: self.field_text(node, "return_type"),
        })
    }

    fn params(&self, node: Node<'_>) -> Option<Vec<Param>> {
        named(node)
            .into_iter()
            .map(|param| match param.kind() {
                "required_parameter" | "optional_parameter" => {
                    let modified = children(param).iter().any(|c| {
                        matches!(
                            c.kind(),
                            "accessibility_modifier" | "override_modifier" | "readonly"
                        )
                    });
                    if modified {
                        return None;
                    }
                    let mut pat = self.pattern(param.child_by_field_name("pattern")?);
                    if let Some(value) = param.child_by_field_name("value") {
                        pat = Pattern::Assign {
                            left: Box::new(pat),
                            right: Box::new(self.expr(value)),
                        };
                    }
                    Some(Param {
                        pat,
                        optional: param.kind() == "optional_parameter",
                        type_ann: self.field_text(param, "type"),
                    })
                }
                _ => Some(Param {
                    pat: self.pattern(param),
                    optional: false,
                    type_ann: None,
                }),
            })
            .collect()
    }

    fn class(&self, node: Node<'_>) -> Option<ClassDecl> {
        let mut class = ClassDecl {
            name: self.field_text(node, "name"),
            type_params: self.field_text(node, "type_parameters"),
            ..ClassDecl::default()
        };

        for child in children(node) {
            match child.kind() {
                "decorator" => class.decorators.push(self.text(child).to_string()),
                "class_heritage" => {
                    for clause in named(child) {
                        match clause.kind() {
                            "extends_clause" => {
                                class.super_class = clause
                                    .child_by_field_name("value")
                                    .map(|v| self.expr(v));
                                class.super_type_args = self.field_text(clause, "type_arguments");
                            }
                            "implements_clause" => {
                                class.implements = Some(self.text(clause).to_string());
                            }
                            _ => class.super_class = Some(self.expr(clause)),
                        }
                    }
                }
                _ => {}
            }
        }

        let body = node.child_by_field_name("body")?;
        let mut cursor = body.walk();
        class.body = body
            .named_children(&mut cursor)
            .map(|member| match member.kind() {
                "comment" => ClassMember::Comment(self.verbatim(member)),
                "method_definition" => self
                    .method(member)
                    .map_or_else(|| ClassMember::Verbatim(self.verbatim(member)), ClassMember::Method),
                "field_definition" | "public_field_definition" => self
                    .class_property(member)
                    .map_or_else(|| ClassMember::Verbatim(self.verbatim(member)), ClassMember::Property),
                _ => ClassMember::Verbatim(self.verbatim(member)),
            })
            .collect();

        Some(class)
    }

    fn method(&self, node: Node<'_>) -> Option<Method> {
        let mut kind = MethodKind::Method;
        let mut is_static = false;
        let mut is_async = false;
        let mut is_generator = false;
        let mut modifiers = Vec::new();

        for child in children(node) {
            match child.kind() {
                "decorator" | "?" | "!" => return None,
                "static" => is_static = true,
                "static get" => {
                    is_static = true;
                    kind = MethodKind::Getter;
                }
                "async" => is_async = true,
                "get" => kind = MethodKind::Getter,
                "set" => kind = MethodKind::Setter,
                "*" => is_generator = true,
                "accessibility_modifier" | "override_modifier" | "readonly" | "abstract" => {
                    modifiers.push(self.text(child).to_string());
                }
                _ => {}
            }
        }

        let key = self.prop_key(node.child_by_field_name("name")?);
        if kind == MethodKind::Method && !is_static && key.is_named("constructor") {
            kind = MethodKind::Constructor;
        }

        Some(Method {
            kind,
            key,
            is_static,
            modifiers,
            function: Function {
                params: self.params(node.child_by_field_name("parameters")?)?,
                body: self.stmts(node.child_by_field_name("body")?),
                is_async,
                is_generator,
                type_params: self.field_text(node, "type_parameters"),
                return_type: self.field_text(node, "return_type"),
            },
        })
    }

    fn class_property(&self, node: Node<'_>) -> Option<ClassProperty> {
        let mut is_static = false;
        let mut modifiers = Vec::new();
        for child in children(node) {
            match child.kind() {
                "decorator" | "?" | "!" => return None,
                "static" => is_static = true,
                "accessibility_modifier" | "override_modifier" | "readonly" | "declare"
                | "abstract" => modifiers.push(self.text(child).to_string()),
                _ => {}
            }
        }
        let key = node
            .child_by_field_name("property")
            .or_else(|| node.child_by_field_name("name"))?;
        Some(ClassProperty {
            key: self.prop_key(key),
            is_static,
            modifiers,
            type_ann: self.field_text(node, "type"),
            value: node.child_by_field_name("value").map(|v| self.expr(v)),
        })
    }

    fn prop_key(&self, node: Node<'_>) -> PropKey {
        match node.kind() {
            "string" => self
                .string(node)
                .map_or_else(|| PropKey::Ident(self.text(node).to_string()), PropKey::Str),
            "number" => PropKey::Num(self.text(node).to_string()),
            "computed_property_name" => match first_named(node) {
                Some(inner) => PropKey::Computed(Box::new(self.expr(inner))),
                None => PropKey::Ident(self.text(node).to_string()),
            },
            _ => PropKey::Ident(self.text(node).to_string()),
        }
    }

    fn string(&self, node: Node<'_>) -> Option<Str> {
        let text = self.text(node);
        let quote = text.chars().next().filter(|q| matches!(q, '\'' | '"'))?;
        let value = text.get(1..text.len().checked_sub(1)?)?;
        Some(Str {
            value: value.to_string(),
            quote,
        })
    }

    // ---- patterns ----

    fn pattern(&self, node: Node<'_>) -> Pattern {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" | "undefined" => {
                Pattern::Ident(self.text(node).to_string())
            }
            "object_pattern" => Pattern::Object(
                named(node)
                    .into_iter()
                    .map(|prop| self.object_pat_prop(prop))
                    .collect(),
            ),
            "array_pattern" => {
                let mut elems = Vec::new();
                let mut filled = false;
                for child in children(node) {
                    match child.kind() {
                        "[" | "]" | "comment" => {}
                        "," => {
                            if !filled {
                                elems.push(None);
                            }
                            filled = false;
                        }
                        _ => {
                            elems.push(Some(self.pattern(child)));
                            filled = true;
                        }
                    }
                }
                Pattern::Array(elems)
            }
            "assignment_pattern" => match (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                (Some(left), Some(right)) => Pattern::Assign {
                    left: Box::new(self.pattern(left)),
                    right: Box::new(self.expr(right)),
                },
                _ => Pattern::Verbatim(self.verbatim(node)),
            },
            "rest_pattern" => match first_named(node) {
                Some(inner) => Pattern::Rest(Box::new(self.pattern(inner))),
                None => Pattern::Verbatim(self.verbatim(node)),
            },
            "member_expression" | "subscript_expression" => {
                Pattern::Expr(Box::new(self.expr(node)))
            }
            _ => Pattern::Verbatim(self.verbatim(node)),
        }
    }

    fn object_pat_prop(&self, node: Node<'_>) -> ObjectPatProp {
        match node.kind() {
            "shorthand_property_identifier_pattern" => ObjectPatProp::Shorthand {
                name: self.text(node).to_string(),
                default: None,
            },
            "object_assignment_pattern" => {
                let left = node.child_by_field_name("left");
                let right = node.child_by_field_name("right");
                match (left, right) {
                    (Some(left), Some(right))
                        if left.kind() == "shorthand_property_identifier_pattern" =>
                    {
                        ObjectPatProp::Shorthand {
                            name: self.text(left).to_string(),
                            default: Some(self.expr(right)),
                        }
                    }
                    _ => ObjectPatProp::Verbatim(self.verbatim(node)),
                }
            }
            "pair_pattern" => match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => ObjectPatProp::KeyValue {
                    key: self.prop_key(key),
                    value: self.pattern(value),
                },
                _ => ObjectPatProp::Verbatim(self.verbatim(node)),
            },
            "rest_pattern" => match first_named(node) {
                Some(inner) => ObjectPatProp::Rest(self.pattern(inner)),
                None => ObjectPatProp::Verbatim(self.verbatim(node)),
            },
            _ => ObjectPatProp::Verbatim(self.verbatim(node)),
        }
    }

    // ---- expressions ----

    fn expr(&self, node: Node<'_>) -> Expr {
        self.try_expr(node)
            .unwrap_or_else(|| Expr::Verbatim(self.verbatim(node)))
    }

    fn unwrap_paren(&self, node: Node<'_>) -> Expr {
        if node.kind() == "parenthesized_expression" {
            if let Some(inner) = first_named(node) {
                return self.expr(inner);
            }
        }
        self.expr(node)
    }

    fn is_optional(node: Node<'_>) -> bool {
        children(node)
            .iter()
            .any(|c| matches!(c.kind(), "optional_chain" | "?."))
    }

    fn field_expr(&self, node: Node<'_>, field: &str) -> Option<Box<Expr>> {
        node.child_by_field_name(field)
            .map(|n| Box::new(self.expr(n)))
    }

    #[allow(clippy::too_many_lines)]
    fn try_expr(&self, node: Node<'_>) -> Option<Expr> {
        let expr = match node.kind() {
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "private_property_identifier"
            | "undefined" => Expr::Ident(self.text(node).to_string()),
            "this" => Expr::This,
            "super" => Expr::Super,
            "true" => Expr::Lit(Lit::Bool(true)),
            "false" => Expr::Lit(Lit::Bool(false)),
            "null" => Expr::Lit(Lit::Null),
            "number" => Expr::Lit(Lit::Num(self.text(node).to_string())),
            "regex" => Expr::Lit(Lit::Regex(self.text(node).to_string())),
            "string" => Expr::Lit(Lit::Str(self.string(node)?)),
            "template_string" => Expr::Template(self.template(node)?),
            "array" => {
                let mut elems = Vec::new();
                let mut filled = false;
                for child in children(node) {
                    match child.kind() {
                        "[" | "]" | "comment" => {}
                        "," => {
                            if !filled {
                                elems.push(None);
                            }
                            filled = false;
                        }
                        _ => {
                            elems.push(Some(self.expr(child)));
                            filled = true;
                        }
                    }
                }
                Expr::Array(elems)
            }
            "object" => Expr::Object(named(node).into_iter().map(|p| self.prop(p)).collect()),
            "member_expression" => {
                let prop = node.child_by_field_name("property")?;
                Expr::Member {
                    obj: self.field_expr(node, "object")?,
                    prop: MemberProp::Ident(self.text(prop).to_string()),
                    optional: Self::is_optional(node),
                }
            }
            "subscript_expression" => Expr::Member {
                obj: self.field_expr(node, "object")?,
                prop: MemberProp::Computed(self.field_expr(node, "index")?),
                optional: Self::is_optional(node),
            },
            "call_expression" => {
                if node.child_by_field_name("type_arguments").is_some() {
                    return None;
                }
                let args = node.child_by_field_name("arguments")?;
                if args.kind() != "arguments" {
                    return None;
                }
                Expr::Call {
                    callee: self.field_expr(node, "function")?,
                    args: self.args(args),
                    optional: Self::is_optional(node),
                }
            }
            "new_expression" => {
                if node.child_by_field_name("type_arguments").is_some() {
                    return None;
                }
                Expr::New {
                    callee: self.field_expr(node, "constructor")?,
                    args: node
                        .child_by_field_name("arguments")
                        .map(|a| self.args(a)),
                }
            }
            "arrow_function" => Expr::Arrow(Box::new(self.arrow(node)?)),
            "function_expression" | "function" | "generator_function" => {
                Expr::Function(Box::new(self.function_decl(node)?))
            }
            "class" => Expr::Class(Box::new(self.class(node)?)),
            "unary_expression" => Expr::Unary {
                op: self.field_text(node, "operator")?,
                arg: self.field_expr(node, "argument")?,
            },
            "update_expression" => {
                let op = self.field_text(node, "operator")?;
                let prefix = children(node)
                    .first()
                    .is_some_and(|c| matches!(c.kind(), "++" | "--"));
                Expr::Update {
                    op,
                    prefix,
                    arg: self.field_expr(node, "argument")?,
                }
            }
            "binary_expression" => Expr::Binary {
                op: self.field_text(node, "operator")?,
                left: self.field_expr(node, "left")?,
                right: self.field_expr(node, "right")?,
            },
            "assignment_expression" | "augmented_assignment_expression" => Expr::Assign {
                op: self
                    .field_text(node, "operator")
                    .unwrap_or_else(|| "=".to_string()),
                left: Box::new(self.pattern(node.child_by_field_name("left")?)),
                right: self.field_expr(node, "right")?,
            },
            "ternary_expression" => Expr::Cond {
                test: self.field_expr(node, "condition")?,
                cons: self.field_expr(node, "consequence")?,
                alt: self.field_expr(node, "alternative")?,
            },
            "sequence_expression" => {
                let mut exprs = Vec::new();
                self.flatten_sequence(node, &mut exprs);
                Expr::Seq(exprs)
            }
            "parenthesized_expression" => {
                let inner = named(node);
                if inner.len() != 1 {
                    return None;
                }
                Expr::Paren(Box::new(self.expr(inner[0])))
            }
            "await_expression" => Expr::Await(Box::new(self.expr(first_named(node)?))),
            "yield_expression" => Expr::Yield {
                arg: first_named(node).map(|n| Box::new(self.expr(n))),
                delegate: has_token(node, "*"),
            },
            "spread_element" => Expr::Spread(Box::new(self.expr(first_named(node)?))),
            "jsx_element" | "jsx_self_closing_element" | "jsx_fragment" => self.jsx(node)?,
            _ => return None,
        };
        Some(expr)
    }

    fn flatten_sequence(&self, node: Node<'_>, out: &mut Vec<Expr>) {
        for child in named(node) {
            if child.kind() == "sequence_expression" {
                self.flatten_sequence(child, out);
            } else {
                out.push(self.expr(child));
            }
        }
    }

    fn args(&self, node: Node<'_>) -> Vec<Expr> {
        named(node).into_iter().map(|a| self.expr(a)).collect()
    }

    fn prop(&self, node: Node<'_>) -> Prop {
        let prop = match node.kind() {
            "pair" => match (
                node.child_by_field_name("key"),
                node.child_by_field_name("value"),
            ) {
                (Some(key), Some(value)) => Some(Prop::KeyValue {
                    key: self.prop_key(key),
                    value: self.expr(value),
                }),
                _ => None,
            },
            "shorthand_property_identifier" => Some(Prop::Shorthand(self.text(node).to_string())),
            "spread_element" => first_named(node).map(|inner| Prop::Spread(self.expr(inner))),
            "method_definition" => self.method(node).map(Prop::Method),
            _ => None,
        };
        prop.unwrap_or_else(|| Prop::Verbatim(self.verbatim(node)))
    }

    fn template(&self, node: Node<'_>) -> Option<Template> {
        let end = node.end_byte().checked_sub(1)?;
        let mut pos = node.start_byte() + 1;
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();
        for sub in children(node) {
            if sub.kind() != "template_substitution" {
                continue;
            }
            quasis.push(self.src.get(pos..sub.start_byte())?.to_string());
            exprs.push(self.expr(first_named(sub)?));
            pos = sub.end_byte();
        }
        quasis.push(self.src.get(pos..end)?.to_string());
        Some(Template { quasis, exprs })
    }

    fn arrow(&self, node: Node<'_>) -> Option<Arrow> {
        if node.child_by_field_name("type_parameters").is_some() {
            return None;
        }
        let params = match node.child_by_field_name("parameter") {
            Some(param) => vec![Param::ident(self.text(param))],
            None => self.params(node.child_by_field_name("parameters")?)?,
        };
        let body = node.child_by_field_name("body")?;
        let body = if body.kind() == "statement_block" {
            ArrowBody::Block(self.stmts(body))
        } else {
            ArrowBody::Expr(Box::new(self.expr(body)))
        };
        Some(Arrow {
            params,
            body,
            is_async: has_token(node, "async"),
            return_type: self.field_text(node, "return_type"),
        })
    }

    // ---- JSX ----

    fn jsx(&self, node: Node<'_>) -> Option<Expr> {
        match node.kind() {
            "jsx_self_closing_element" => Some(Expr::Jsx(Box::new(JsxElement {
                name: self.field_text(node, "name")?,
                attrs: self.jsx_attrs(node)?,
                children: Vec::new(),
                self_closing: true,
            }))),
            "jsx_fragment" => Some(Expr::JsxFragment(self.jsx_children(node)?)),
            _ => {
                let open = node.child_by_field_name("open_tag")?;
                let children = self.jsx_children(node)?;
                match open.child_by_field_name("name") {
                    Some(name) => Some(Expr::Jsx(Box::new(JsxElement {
                        name: self.text(name).to_string(),
                        attrs: self.jsx_attrs(open)?,
                        children,
                        self_closing: false,
                    }))),
                    None => Some(Expr::JsxFragment(children)),
                }
            }
        }
    }

    fn jsx_attrs(&self, tag: Node<'_>) -> Option<Vec<JsxAttr>> {
        let mut cursor = tag.walk();
        let nodes: Vec<Node<'_>> = tag.children_by_field_name("attribute", &mut cursor).collect();
        nodes
            .into_iter()
            .map(|attr| match attr.kind() {
                "jsx_attribute" => {
                    let parts = named(attr);
                    let name = self.text(*parts.first()?).to_string();
                    let value = match parts.get(1) {
                        None => None,
                        Some(value) => Some(match value.kind() {
                            "string" => JsxAttrValue::Str(self.text(*value).to_string()),
                            "jsx_expression" => JsxAttrValue::Expr(self.expr(first_named(*value)?)),
                            _ => match self.jsx(*value)? {
                                Expr::Jsx(el) => JsxAttrValue::Element(el),
                                Expr::JsxFragment(children) => JsxAttrValue::Fragment(children),
                                _ => return None,
                            },
                        }),
                    };
                    Some(JsxAttr::Named { name, value })
                }
                "jsx_expression" => {
                    let spread = first_named(attr).filter(|n| n.kind() == "spread_element")?;
                    Some(JsxAttr::Spread(self.expr(first_named(spread)?)))
                }
                _ => None,
            })
            .collect()
    }

    fn jsx_children(&self, node: Node<'_>) -> Option<Vec<JsxChild>> {
        let mut out: Vec<JsxChild> = Vec::new();
        for child in named(node) {
            match child.kind() {
                "jsx_opening_element" | "jsx_closing_element" => {}
                "jsx_text" | "html_character_reference" => {
                    let text = self.text(child);
                    if let Some(JsxChild::Text(prev)) = out.last_mut() {
                        prev.push_str(text);
                    } else {
                        out.push(JsxChild::Text(text.to_string()));
                    }
                }
                "jsx_expression" => {
                    let inner = named(child);
                    out.push(match inner.first() {
                        None if children(child).iter().any(|c| c.kind() == "comment") => {
                            JsxChild::Raw(self.text(child).to_string())
                        }
                        None => JsxChild::Expr(None),
                        Some(spread) if spread.kind() == "spread_element" => {
                            JsxChild::Spread(self.expr(first_named(*spread)?))
                        }
                        Some(expr) => JsxChild::Expr(Some(self.expr(*expr))),
                    });
                }
                _ => match self.jsx(child)? {
                    Expr::Jsx(el) => out.push(JsxChild::Element(*el)),
                    Expr::JsxFragment(children) => out.push(JsxChild::Fragment(children)),
                    _ => return None,
                },
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;

    fn js(source: &str) -> Program {
        parse(source, Language::JavaScript).expect("parse")
    }

    #[test]
    fn lowers_imports() {
        let program = js("import React, { Component as Base, useState } from 'react';\nimport * as ns from \"x\";\nimport './side.css';\n");
        let imports: Vec<_> = program.imports().map(|(_, d)| d).collect();
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].source, "react");
        assert_eq!(
            imports[0].local_names().collect::<Vec<_>>(),
            vec!["React", "Base", "useState"]
        );
        assert!(imports[1].has_namespace());
        assert!(imports[2].specifiers.is_empty());
    }

    #[test]
    fn lowers_function_component_with_hooks() {
        let program = js("function Foo(){ const [x, setX] = useState(0); useEffect(() => { load(); }, []); return null; }");
        let func = program.body[0].as_function().expect("function");
        assert_eq!(func.name.as_deref(), Some("Foo"));
        assert_eq!(func.function.body.len(), 3);
        assert!(matches!(func.function.body[2], Stmt::Return(Some(Expr::Lit(Lit::Null)))));
        match &func.function.body[0] {
            Stmt::Decl(Decl::Var(var)) => {
                assert_eq!(var.kind, VarKind::Const);
                assert!(matches!(&var.decls[0].name, Pattern::Array(elems) if elems.len() == 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lowers_export_forms() {
        let program = js("export function Bar() {}\nexport default class App extends React.Component {}\n");
        assert!(matches!(program.body[0], Stmt::ExportDecl(Decl::Function(_))));
        let class = program.body[1].as_class().expect("class");
        assert!(class.extends_member("React", "Component"));
        assert!(matches!(program.body[1], Stmt::ExportDefault(DefaultDecl::Class(_))));
    }

    #[test]
    fn lowers_class_members() {
        let program = js("class A { static propTypes = {}; state = { a: 1 }; constructor(props) { super(props); } static get x() { return 1; } async load() {} render() { return <div/>; } }");
        let class = program.classes().next().expect("class");
        assert_eq!(class.body.len(), 6);
        assert!(class.constructor().is_some());
        assert!(class.has_render());
        match &class.body[3] {
            ClassMember::Method(m) => {
                assert!(m.is_static);
                assert_eq!(m.kind, MethodKind::Getter);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &class.body[4] {
            ClassMember::Method(m) => assert!(m.function.is_async),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn lowers_jsx_tree() {
        let program = js("const el = <Paper elevation={2} {...rest}><Button onClick={go}>Go &amp; run</Button><>{/* note */}</></Paper>;");
        let Stmt::Decl(Decl::Var(var)) = &program.body[0] else {
            panic!("expected variable declaration");
        };
        let Some(Expr::Jsx(paper)) = &var.decls[0].init else {
            panic!("expected JSX");
        };
        assert_eq!(paper.name, "Paper");
        assert_eq!(paper.attrs.len(), 2);
        assert!(matches!(paper.attrs[1], JsxAttr::Spread(_)));
        let JsxChild::Element(button) = &paper.children[0] else {
            panic!("expected element child");
        };
        assert_eq!(button.children, vec![JsxChild::Text("Go &amp; run".to_string())]);
        assert!(matches!(&paper.children[1], JsxChild::Fragment(inner) if matches!(inner[0], JsxChild::Raw(_))));
    }

    #[test]
    fn keeps_unmodelled_statements_verbatim() {
        let program = js("export * from './widgets';\ndebugger;\n");
        assert_eq!(program.body[0].kind(), NodeKind::Verbatim);
        assert_eq!(program.body[1].kind(), NodeKind::Verbatim);
    }

    #[test]
    fn lowers_loops() {
        let program = js("for (let i = 0; i < n; i++) tick(i);\nfor (;;) {}\nfor (const [k, v] of pairs) {}\nfor (key in obj) {}\nwhile (busy) wait();\ndo { step(); } while (more);\n");
        let Stmt::For { init: Some(ForInit::Var(var)), test: Some(_), update: Some(_), body } = &program.body[0] else {
            panic!("expected counted loop, got {:?}", program.body[0]);
        };
        assert_eq!(var.kind, VarKind::Let);
        assert!(matches!(body.as_ref(), Stmt::Expr(Expr::Call { .. })));
        assert!(matches!(&program.body[1], Stmt::For { init: None, test: None, update: None, .. }));
        let Stmt::ForIn { left: ForHead::Var { kind, name }, of: true, is_await: false, right, .. } = &program.body[2] else {
            panic!("expected for...of, got {:?}", program.body[2]);
        };
        assert_eq!(*kind, VarKind::Const);
        assert!(matches!(name, Pattern::Array(_)));
        assert_eq!(right.as_ident(), Some("pairs"));
        assert!(matches!(&program.body[3], Stmt::ForIn { left: ForHead::Target(Pattern::Ident(k)), of: false, .. } if k == "key"));
        assert!(matches!(&program.body[4], Stmt::While { test, .. } if test.as_ident() == Some("busy")));
        assert!(matches!(&program.body[5], Stmt::DoWhile { test, .. } if test.as_ident() == Some("more")));
    }

    #[test]
    fn lowers_switch_and_jumps() {
        let program = js("outer: for (const x of xs) {\n  switch (x) {\n    case 1:\n      continue outer;\n    case 2:\n    default:\n      // stop\n      break;\n  }\n}\n");
        let Stmt::Labeled { label, body } = &program.body[0] else {
            panic!("expected labeled statement");
        };
        assert_eq!(label, "outer");
        let Stmt::ForIn { body, .. } = body.as_ref() else {
            panic!("expected loop");
        };
        let Stmt::Block(stmts) = body.as_ref() else {
            panic!("expected block");
        };
        let Stmt::Switch { discriminant, cases } = &stmts[0] else {
            panic!("expected switch, got {:?}", stmts[0]);
        };
        assert_eq!(discriminant.as_ident(), Some("x"));
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].body, vec![Stmt::Continue(Some("outer".into()))]);
        assert!(cases[1].body.is_empty());
        assert!(cases[2].test.is_none());
        assert!(matches!(&cases[2].body[..], [Stmt::Comment(_), Stmt::Break(None)]));
    }

    #[test]
    fn same_line_comment_trails_its_statement() {
        let program = js("import React from 'react'; // trailing\n// leading\nconst a = 1;\n");
        assert!(matches!(&program.body[1], Stmt::TrailingComment(c) if c.text == "// trailing"));
        assert!(matches!(&program.body[2], Stmt::Comment(c) if c.text == "// leading"));
    }

    #[test]
    fn array_holes_are_preserved() {
        let program = js("const [, second] = pair;\nconst xs = [1, , 3];");
        let Stmt::Decl(Decl::Var(var)) = &program.body[1] else {
            panic!("expected variable declaration");
        };
        assert!(matches!(&var.decls[0].init, Some(Expr::Array(e)) if e.len() == 3 && e[1].is_none()));
        let Stmt::Decl(Decl::Var(var)) = &program.body[0] else {
            panic!("expected variable declaration");
        };
        assert!(matches!(&var.decls[0].name, Pattern::Array(e) if e.len() == 2 && e[0].is_none()));
    }

    #[test]
    fn template_literal_splits_quasis() {
        let program = js("const s = `a${b}c${d}`;");
        let Stmt::Decl(Decl::Var(var)) = &program.body[0] else {
            panic!("expected variable declaration");
        };
        let Some(Expr::Template(t)) = &var.decls[0].init else {
            panic!("expected template");
        };
        assert_eq!(t.quasis, vec!["a", "c", ""]);
        assert_eq!(t.exprs.len(), 2);
    }

    #[test]
    fn syntax_error_reports_position() {
        let err = parse("const a = 1;\nfunction (", Language::JavaScript).unwrap_err();
        match err {
            ParseError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_typescript_annotations() {
        let program = parse(
            "import type { FC } from 'react';\nexport function Bar(props: Props): JSX.Element { return <div />; }\n",
            Language::TypeScript,
        )
        .expect("parse");
        let (_, import) = program.imports().next().expect("import");
        assert!(import.type_only);
        let Stmt::ExportDecl(Decl::Function(func)) = &program.body[1] else {
            panic!("expected exported function");
        };
        assert_eq!(func.function.params[0].type_ann.as_deref(), Some(": Props"));
        assert_eq!(func.function.return_type.as_deref(), Some(": JSX.Element"));
    }
}
