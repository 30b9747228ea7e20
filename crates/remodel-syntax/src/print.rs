//! [`Program`] → source text
//!
//! Output style is fixed apart from [`PrintOptions`]: single quotes,
//! two-space indentation, semicolons, trailing commas in multi-line
//! literals and a single trailing newline. Verbatim nodes are re-indented
//! but otherwise emitted unchanged.
//!
//! Every printing method returns text whose first line carries no
//! indentation and whose following lines are indented absolutely; the caller
//! owns the indentation of the first line.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ast::{
    Arrow, ArrowBody, ClassDecl, ClassMember, Decl, DefaultDecl, Expr, ForHead, ForInit, Function,
    ImportDecl, ImportSpecifier, JsxAttr, JsxAttrValue, JsxChild, JsxElement, Lit, MemberProp, Method,
    MethodKind, NodeKind, ObjectPatProp, Param, Pattern, Program, Prop, PropKey, Stmt, Str,
    SwitchCase, VarDecl, Verbatim,
};
use crate::error::SerializeError;

type PrintResult = Result<String, SerializeError>;

/// Preferred string quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `'text'`
    #[default]
    Single,
    /// `"text"`
    Double,
    /// Keep the quote used in the source
    Preserve,
}

/// Printer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// String quote style
    pub quote: QuoteStyle,
    /// Spaces per indentation level
    pub tab_width: usize,
    /// Indent with tabs instead of spaces
    pub use_tabs: bool,
    /// Trailing commas in multi-line literals
    pub trailing_comma: bool,
    /// Line width that triggers breaking lists onto multiple lines
    pub max_line_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            quote: QuoteStyle::Single,
            tab_width: 2,
            use_tabs: false,
            trailing_comma: true,
            max_line_width: 80,
        }
    }
}

/// Print a syntax tree as source text
///
/// # Errors
///
/// Returns [`SerializeError`] when the tree violates a structural invariant
/// (empty identifier, duplicate import binding, mixed namespace and named
/// imports).
pub fn print(program: &Program, options: &PrintOptions) -> PrintResult {
    validate_imports(program)?;
    let printer = Printer { opts: options };
    let mut out = printer.stmt_lines(&program.body, 0, true)?;
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}

/// Check whether a string is a plain JavaScript identifier
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn validate_imports(program: &Program) -> Result<(), SerializeError> {
    let mut seen = HashSet::new();
    for (_, import) in program.imports() {
        if import.source.is_empty() {
            return Err(SerializeError::invalid(
                NodeKind::ImportDeclaration,
                "empty module path",
            ));
        }
        let defaults = import
            .specifiers
            .iter()
            .filter(|s| matches!(s, ImportSpecifier::Default(_)))
            .count();
        let namespaces = import
            .specifiers
            .iter()
            .filter(|s| matches!(s, ImportSpecifier::Namespace(_)))
            .count();
        let named = import.specifiers.len() - defaults - namespaces;
        if defaults > 1 || namespaces > 1 || (namespaces == 1 && named > 0) {
            return Err(SerializeError::invalid(
                NodeKind::ImportDeclaration,
                format!("unprintable specifier mix in import from '{}'", import.source),
            ));
        }
        for spec in &import.specifiers {
            let local = spec.local_name();
            let imported_ok = spec.imported_name().map_or(true, is_identifier);
            if !is_identifier(local) || !imported_ok {
                return Err(SerializeError::invalid(
                    NodeKind::ImportDeclaration,
                    format!("invalid binding '{local}' in import from '{}'", import.source),
                ));
            }
            if !seen.insert(local) {
                return Err(SerializeError::DuplicateImport {
                    local: local.to_string(),
                    source_module: import.source.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Binding strength used to decide where parentheses are required
fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Verbatim(_) => 0,
        Expr::Seq(_) => 1,
        Expr::Arrow(_) | Expr::Assign { .. } | Expr::Yield { .. } | Expr::Spread(_) => 2,
        Expr::Cond { .. } => 3,
        Expr::Binary { op, .. } => binary_precedence(op),
        Expr::Unary { .. } | Expr::Await(_) => 15,
        Expr::Update { .. } => 16,
        Expr::New { args: None, .. } => 17,
        Expr::Call { .. } | Expr::Member { .. } | Expr::New { .. } => 18,
        _ => 20,
    }
}

fn binary_precedence(op: &str) -> u8 {
    match op {
        "??" | "||" => 4,
        "&&" => 5,
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 10,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        _ => 14,
    }
}

fn is_declaration_like(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Decl(Decl::Function(_) | Decl::Class(_))
            | Stmt::ExportDecl(Decl::Function(_) | Decl::Class(_))
            | Stmt::ExportDefault(DefaultDecl::Function(_) | DefaultDecl::Class(_))
    )
}

fn blank_line_between(prev: &Stmt, next: &Stmt, top_level: bool) -> bool {
    if matches!(prev, Stmt::Comment(_) | Stmt::TrailingComment(_)) {
        return false;
    }
    if top_level {
        match (prev, next) {
            (Stmt::Import(_), Stmt::Import(_)) => false,
            (Stmt::Import(_), _) | (_, Stmt::ExportDefault(_)) => true,
            _ => is_declaration_like(prev) || is_declaration_like(next),
        }
    } else {
        is_declaration_like(prev) || is_declaration_like(next)
    }
}

/// Leftmost sub-expression, which decides how a statement starts
fn leftmost(expr: &Expr) -> &Expr {
    match expr {
        Expr::Member { obj, .. } => leftmost(obj),
        Expr::Call { callee, .. } => leftmost(callee),
        Expr::Binary { left, .. } => leftmost(left),
        Expr::Cond { test, .. } => leftmost(test),
        Expr::Update {
            arg, prefix: false, ..
        } => leftmost(arg),
        Expr::Seq(exprs) => exprs.first().map_or(expr, leftmost),
        _ => expr,
    }
}

struct Printer<'o> {
    opts: &'o PrintOptions,
}

impl Printer<'_> {
    fn indent(&self, level: usize) -> String {
        if self.opts.use_tabs {
            "\t".repeat(level)
        } else {
            " ".repeat(level * self.opts.tab_width)
        }
    }

    fn fits(&self, level: usize, text: &str) -> bool {
        !text.contains('\n') && level * self.opts.tab_width + text.len() <= self.opts.max_line_width
    }

    /// Comma-separated list, inline when it fits, one item per line otherwise
    ///
    /// Items must already be printed at `level + 1`.
    fn list(&self, open: &str, close: &str, items: &[String], level: usize, padded: bool) -> String {
        if items.is_empty() {
            return format!("{open}{close}");
        }
        let pad = if padded { " " } else { "" };
        let inline = format!("{open}{pad}{}{pad}{close}", items.join(", "));
        if self.fits(level, &inline) {
            return inline;
        }
        self.broken_list(open, close, items, level)
    }

    fn broken_list(&self, open: &str, close: &str, items: &[String], level: usize) -> String {
        let inner = self.indent(level + 1);
        let mut out = format!("{open}\n");
        for (i, item) in items.iter().enumerate() {
            out.push_str(&inner);
            out.push_str(item);
            if i + 1 < items.len() || self.opts.trailing_comma || item.is_empty() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push_str(&self.indent(level));
        out.push_str(close);
        out
    }

    fn verbatim(&self, raw: &Verbatim, level: usize) -> String {
        let indent = self.indent(level);
        let mut lines = raw.text.split('\n');
        let mut out = lines.next().unwrap_or_default().to_string();
        for line in lines {
            out.push('\n');
            let leading = line.len() - line.trim_start_matches([' ', '\t']).len();
            if leading >= raw.column && !line.trim().is_empty() {
                out.push_str(&indent);
                out.push_str(&line[raw.column..]);
            } else {
                out.push_str(line);
            }
        }
        out
    }

    fn string(&self, s: &Str) -> String {
        let target = match self.opts.quote {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
            QuoteStyle::Preserve => s.quote,
        };
        if s.quote == target {
            return format!("{target}{}{target}", s.value);
        }
        // Keep the original quote rather than introduce escapes
        if s.value.contains(target) {
            return format!("{q}{}{q}", s.value, q = s.quote);
        }
        let mut value = String::with_capacity(s.value.len());
        let mut chars = s.value.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(next) if next == s.quote => value.push(next),
                    Some(next) => {
                        value.push('\\');
                        value.push(next);
                    }
                    None => value.push('\\'),
                }
            } else {
                value.push(c);
            }
        }
        format!("{target}{value}{target}")
    }

    // ---- statements ----

    fn stmt_lines(&self, stmts: &[Stmt], level: usize, top_level: bool) -> PrintResult {
        let indent = self.indent(level);
        let mut out = String::new();
        let mut prev: Option<&Stmt> = None;
        for stmt in stmts {
            if let (Stmt::TrailingComment(raw), Some(_)) = (stmt, prev) {
                out.push(' ');
                out.push_str(&self.verbatim(raw, level));
                continue;
            }
            if let Some(prev) = prev {
                out.push('\n');
                if blank_line_between(prev, stmt, top_level) {
                    out.push('\n');
                }
            }
            out.push_str(&indent);
            out.push_str(&self.stmt(stmt, level)?);
            prev = Some(stmt);
        }
        Ok(out)
    }

    fn block(&self, stmts: &[Stmt], level: usize) -> PrintResult {
        if stmts.is_empty() {
            return Ok("{}".to_string());
        }
        Ok(format!(
            "{{\n{}\n{}}}",
            self.stmt_lines(stmts, level + 1, false)?,
            self.indent(level)
        ))
    }

    fn stmt(&self, stmt: &Stmt, level: usize) -> PrintResult {
        Ok(match stmt {
            Stmt::Import(import) => self.import(import, level),
            Stmt::Decl(decl) => self.decl(decl, 0, level)?,
            Stmt::ExportDecl(decl) => format!("export {}", self.decl(decl, "export ".len(), level)?),
            Stmt::ExportDefault(target) => match target {
                DefaultDecl::Function(func) => format!(
                    "export default {}",
                    self.function(&func.function, func.name.as_deref(), level)?
                ),
                DefaultDecl::Class(class) => format!("export default {}", self.class(class, level)?),
                DefaultDecl::Expr(expr) => format!(
                    "export default {};",
                    self.value_after("export default ".len(), expr, level)?
                ),
            },
            Stmt::Expr(expr) => {
                let text = self.expr(expr, level)?;
                let needs_paren = match leftmost(expr) {
                    Expr::Object(_) | Expr::Function(_) | Expr::Class(_) => true,
                    Expr::Assign { left, .. } => matches!(left.as_ref(), Pattern::Object(_)),
                    _ => false,
                };
                if needs_paren {
                    format!("({text});")
                } else {
                    format!("{text};")
                }
            }
            Stmt::Return(None) => "return;".to_string(),
            Stmt::Return(Some(arg)) => {
                format!("return {};", self.value_after("return ".len(), arg, level)?)
            }
            Stmt::Throw(arg) => format!("throw {};", self.expr(arg, level)?),
            Stmt::If { test, cons, alt } => {
                let mut out = format!("if ({}) {}", self.expr(test, level)?, self.stmt(cons, level)?);
                if let Some(alt) = alt {
                    if matches!(cons.as_ref(), Stmt::Block(_)) {
                        out.push_str(" else ");
                    } else {
                        out.push('\n');
                        out.push_str(&self.indent(level));
                        out.push_str("else ");
                    }
                    out.push_str(&self.stmt(alt, level)?);
                }
                out
            }
            Stmt::Block(body) => self.block(body, level)?,
            Stmt::Try {
                block,
                param,
                handler,
                finalizer,
            } => {
                let mut out = format!("try {}", self.block(block, level)?);
                if let Some(handler) = handler {
                    match param {
                        Some(param) => {
                            out.push_str(&format!(" catch ({}) ", self.pattern(param, level)?));
                        }
                        None => out.push_str(" catch "),
                    }
                    out.push_str(&self.block(handler, level)?);
                }
                if let Some(finalizer) = finalizer {
                    out.push_str(" finally ");
                    out.push_str(&self.block(finalizer, level)?);
                }
                out
            }
            Stmt::For {
                init,
                test,
                update,
                body,
            } => {
                let mut head = String::from("for (");
                match init {
                    Some(ForInit::Var(var)) => head.push_str(&self.var_decl(var, head.len(), level)?),
                    Some(ForInit::Expr(expr)) => head.push_str(&self.expr(expr, level)?),
                    None => {}
                }
                head.push(';');
                if let Some(test) = test {
                    head.push(' ');
                    head.push_str(&self.expr(test, level)?);
                }
                head.push(';');
                if let Some(update) = update {
                    head.push(' ');
                    head.push_str(&self.expr(update, level)?);
                }
                format!("{head}){}", self.loop_body(body, level)?)
            }
            Stmt::ForIn {
                left,
                of,
                is_await,
                right,
                body,
            } => {
                let left = match left {
                    ForHead::Var { kind, name } => {
                        format!("{} {}", kind.as_str(), self.pattern(name, level)?)
                    }
                    ForHead::Target(target) => self.pattern(target, level)?,
                };
                format!(
                    "{} ({left} {} {}){}",
                    if *is_await { "for await" } else { "for" },
                    if *of { "of" } else { "in" },
                    self.expr(right, level)?,
                    self.loop_body(body, level)?
                )
            }
            Stmt::While { test, body } => format!(
                "while ({}){}",
                self.expr(test, level)?,
                self.loop_body(body, level)?
            ),
            Stmt::DoWhile { body, test } => format!(
                "do {} while ({});",
                self.stmt(body, level)?,
                self.expr(test, level)?
            ),
            Stmt::Switch {
                discriminant,
                cases,
            } => self.switch(discriminant, cases, level)?,
            Stmt::Labeled { label, body } => format!("{label}: {}", self.stmt(body, level)?),
            Stmt::Break(None) => "break;".to_string(),
            Stmt::Break(Some(label)) => format!("break {label};"),
            Stmt::Continue(None) => "continue;".to_string(),
            Stmt::Continue(Some(label)) => format!("continue {label};"),
            Stmt::Empty => ";".to_string(),
            Stmt::Comment(raw) | Stmt::TrailingComment(raw) | Stmt::Verbatim(raw) => {
                self.verbatim(raw, level)
            }
        })
    }

    /// Loop body with its separator from the loop head
    fn loop_body(&self, body: &Stmt, level: usize) -> PrintResult {
        Ok(match body {
            Stmt::Empty => ";".to_string(),
            _ => format!(" {}", self.stmt(body, level)?),
        })
    }

    fn switch(&self, discriminant: &Expr, cases: &[SwitchCase], level: usize) -> PrintResult {
        let mut out = format!("switch ({}) {{", self.expr(discriminant, level)?);
        if cases.is_empty() {
            out.push('}');
            return Ok(out);
        }
        let inner = self.indent(level + 1);
        for case in cases {
            out.push('\n');
            out.push_str(&inner);
            match &case.test {
                Some(test) => out.push_str(&format!("case {}:", self.expr(test, level + 1)?)),
                None => out.push_str("default:"),
            }
            match &case.body[..] {
                [] => {}
                [Stmt::Block(block)] => {
                    out.push(' ');
                    out.push_str(&self.block(block, level + 1)?);
                }
                body => {
                    out.push('\n');
                    out.push_str(&self.stmt_lines(body, level + 2, false)?);
                }
            }
        }
        out.push('\n');
        out.push_str(&self.indent(level));
        out.push('}');
        Ok(out)
    }

    /// Declaration starting `lead` columns into its line
    fn decl(&self, decl: &Decl, lead: usize, level: usize) -> PrintResult {
        match decl {
            Decl::Function(func) => self.function(&func.function, func.name.as_deref(), level),
            Decl::Class(class) => self.class(class, level),
            Decl::Var(var) => Ok(format!("{};", self.var_decl(var, lead, level)?)),
        }
    }

    fn var_decl(&self, var: &VarDecl, lead: usize, level: usize) -> PrintResult {
        let mut parts = Vec::with_capacity(var.decls.len());
        let mut column = lead + var.kind.as_str().len() + 1;
        for declarator in &var.decls {
            let mut part = self.pattern(&declarator.name, level)?;
            if let Some(ty) = &declarator.type_ann {
                part.push_str(ty);
            }
            if let Some(init) = &declarator.init {
                part.push_str(" = ");
                part.push_str(&self.value_after(column + part.len(), init, level)?);
            }
            column += part.len() + ", ".len();
            parts.push(part);
        }
        Ok(format!("{} {}", var.kind.as_str(), parts.join(", ")))
    }

    fn import(&self, import: &ImportDecl, level: usize) -> String {
        let keyword = if import.type_only { "import type" } else { "import" };
        let source = self.string(&Str::new(import.source.clone()));
        if import.specifiers.is_empty() {
            return format!("{keyword} {source};");
        }

        let mut head = Vec::new();
        let mut named = Vec::new();
        for spec in &import.specifiers {
            match spec {
                ImportSpecifier::Default(local) => head.insert(0, local.clone()),
                ImportSpecifier::Namespace(local) => head.push(format!("* as {local}")),
                ImportSpecifier::Named { imported, local } => named.push(match local {
                    Some(local) if local != imported => format!("{imported} as {local}"),
                    _ => imported.clone(),
                }),
            }
        }

        let mut clause = head.join(", ");
        if !named.is_empty() {
            if !clause.is_empty() {
                clause.push_str(", ");
            }
            let inline = format!("{clause}{{ {} }}", named.join(", "));
            if self.fits(level, &format!("{keyword} {inline} from {source};")) {
                clause = inline;
            } else {
                clause.push_str(&self.broken_list("{", "}", &named, level));
            }
        }
        format!("{keyword} {clause} from {source};")
    }

    // ---- functions and classes ----

    fn params(&self, params: &[Param], level: usize) -> PrintResult {
        let mut items = Vec::with_capacity(params.len());
        for param in params {
            let item = match (&param.pat, &param.type_ann) {
                (Pattern::Assign { left, right }, Some(ty)) => format!(
                    "{}{}{ty} = {}",
                    self.pattern(left, level + 1)?,
                    if param.optional { "?" } else { "" },
                    self.operand(right, 2, level + 1)?
                ),
                (pat, ty) => format!(
                    "{}{}{}",
                    self.pattern(pat, level + 1)?,
                    if param.optional { "?" } else { "" },
                    ty.as_deref().unwrap_or_default()
                ),
            };
            items.push(item);
        }
        Ok(self.list("(", ")", &items, level, false))
    }

    fn function(&self, function: &Function, name: Option<&str>, level: usize) -> PrintResult {
        let mut out = String::new();
        if function.is_async {
            out.push_str("async ");
        }
        out.push_str("function");
        if function.is_generator {
            out.push('*');
        }
        if let Some(name) = name {
            out.push(' ');
            out.push_str(name);
        }
        self.signature_and_body(&mut out, function, level)?;
        Ok(out)
    }

    fn signature_and_body(&self, out: &mut String, function: &Function, level: usize) -> Result<(), SerializeError> {
        if let Some(tp) = &function.type_params {
            out.push_str(tp);
        }
        out.push_str(&self.params(&function.params, level)?);
        if let Some(rt) = &function.return_type {
            out.push_str(rt);
        }
        out.push(' ');
        out.push_str(&self.block(&function.body, level)?);
        Ok(())
    }

    fn method(&self, method: &Method, level: usize) -> PrintResult {
        let mut out = String::new();
        if method.is_static {
            out.push_str("static ");
        }
        for modifier in &method.modifiers {
            out.push_str(modifier);
            out.push(' ');
        }
        if method.function.is_async {
            out.push_str("async ");
        }
        match method.kind {
            MethodKind::Getter => out.push_str("get "),
            MethodKind::Setter => out.push_str("set "),
            MethodKind::Method | MethodKind::Constructor => {}
        }
        if method.function.is_generator {
            out.push('*');
        }
        out.push_str(&self.prop_key(&method.key, level)?);
        self.signature_and_body(&mut out, &method.function, level)?;
        Ok(out)
    }

    fn class(&self, class: &ClassDecl, level: usize) -> PrintResult {
        let mut out = String::new();
        for decorator in &class.decorators {
            out.push_str(decorator);
            out.push('\n');
            out.push_str(&self.indent(level));
        }
        out.push_str("class");
        if let Some(name) = &class.name {
            if name.is_empty() {
                return Err(SerializeError::invalid(NodeKind::ClassDeclaration, "empty name"));
            }
            out.push(' ');
            out.push_str(name);
        }
        if let Some(tp) = &class.type_params {
            out.push_str(tp);
        }
        if let Some(super_class) = &class.super_class {
            out.push_str(" extends ");
            out.push_str(&self.operand(super_class, 18, level)?);
        }
        if let Some(args) = &class.super_type_args {
            out.push_str(args);
        }
        if let Some(implements) = &class.implements {
            out.push(' ');
            out.push_str(implements);
        }
        out.push(' ');

        if class.body.is_empty() {
            out.push_str("{}");
            return Ok(out);
        }
        let inner = self.indent(level + 1);
        out.push_str("{\n");
        for (i, member) in class.body.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                let prev = &class.body[i - 1];
                let tight = matches!(prev, ClassMember::Comment(_))
                    || (matches!(prev, ClassMember::Property(_))
                        && matches!(member, ClassMember::Property(_)));
                if !tight {
                    out.push('\n');
                }
            }
            out.push_str(&inner);
            out.push_str(&self.class_member(member, level + 1)?);
        }
        out.push('\n');
        out.push_str(&self.indent(level));
        out.push('}');
        Ok(out)
    }

    fn class_member(&self, member: &ClassMember, level: usize) -> PrintResult {
        match member {
            ClassMember::Method(method) => self.method(method, level),
            ClassMember::Property(prop) => {
                let mut out = String::new();
                if prop.is_static {
                    out.push_str("static ");
                }
                for modifier in &prop.modifiers {
                    out.push_str(modifier);
                    out.push(' ');
                }
                out.push_str(&self.prop_key(&prop.key, level)?);
                if let Some(ty) = &prop.type_ann {
                    out.push_str(ty);
                }
                if let Some(value) = &prop.value {
                    out.push_str(" = ");
                    out.push_str(&self.value_after(out.len(), value, level)?);
                }
                out.push(';');
                Ok(out)
            }
            ClassMember::Comment(raw) | ClassMember::Verbatim(raw) => Ok(self.verbatim(raw, level)),
        }
    }

    fn prop_key(&self, key: &PropKey, level: usize) -> PrintResult {
        Ok(match key {
            PropKey::Ident(name) => {
                if name.is_empty() {
                    return Err(SerializeError::invalid(NodeKind::Identifier, "empty property name"));
                }
                name.clone()
            }
            PropKey::Str(s) => self.string(s),
            PropKey::Num(n) => n.clone(),
            PropKey::Computed(expr) => format!("[{}]", self.expr(expr, level)?),
        })
    }

    // ---- patterns ----

    fn pattern(&self, pattern: &Pattern, level: usize) -> PrintResult {
        Ok(match pattern {
            Pattern::Ident(name) => {
                if name.is_empty() {
                    return Err(SerializeError::invalid(NodeKind::Identifier, "empty binding name"));
                }
                name.clone()
            }
            Pattern::Array(elems) => {
                let mut items = Vec::with_capacity(elems.len());
                for elem in elems {
                    items.push(match elem {
                        Some(elem) => self.pattern(elem, level + 1)?,
                        None => String::new(),
                    });
                }
                self.list("[", "]", &items, level, false)
            }
            Pattern::Object(props) => {
                let mut items = Vec::with_capacity(props.len());
                for prop in props {
                    items.push(match prop {
                        ObjectPatProp::KeyValue { key, value } => format!(
                            "{}: {}",
                            self.prop_key(key, level + 1)?,
                            self.pattern(value, level + 1)?
                        ),
                        ObjectPatProp::Shorthand { name, default: None } => name.clone(),
                        ObjectPatProp::Shorthand {
                            name,
                            default: Some(default),
                        } => format!("{name} = {}", self.operand(default, 2, level + 1)?),
                        ObjectPatProp::Rest(rest) => format!("...{}", self.pattern(rest, level + 1)?),
                        ObjectPatProp::Verbatim(raw) => self.verbatim(raw, level + 1),
                    });
                }
                self.list("{", "}", &items, level, true)
            }
            Pattern::Assign { left, right } => format!(
                "{} = {}",
                self.pattern(left, level)?,
                self.operand(right, 2, level)?
            ),
            Pattern::Rest(inner) => format!("...{}", self.pattern(inner, level)?),
            Pattern::Expr(expr) => self.expr(expr, level)?,
            Pattern::Verbatim(raw) => self.verbatim(raw, level),
        })
    }

    // ---- expressions ----

    /// Print `expr`, parenthesized when it binds looser than `min`
    fn operand(&self, expr: &Expr, min: u8, level: usize) -> PrintResult {
        let text = self.expr(expr, level)?;
        if precedence(expr) < min {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    /// Print a value position, wrapping multi-line JSX in parentheses
    fn jsx_wrapped(&self, expr: &Expr, level: usize) -> PrintResult {
        if matches!(expr, Expr::Jsx(_) | Expr::JsxFragment(_)) {
            let text = self.expr(expr, level + 1)?;
            if text.contains('\n') {
                return Ok(format!(
                    "(\n{}{text}\n{})",
                    self.indent(level + 1),
                    self.indent(level)
                ));
            }
            return Ok(text);
        }
        self.operand(expr, 2, level)
    }

    /// Value that follows `lead` columns of other text on its line
    ///
    /// A literal that fits on its own but overflows once the preceding text
    /// and the closing `;` or `,` are counted is printed broken instead.
    fn value_after(&self, lead: usize, expr: &Expr, level: usize) -> PrintResult {
        let text = self.jsx_wrapped(expr, level)?;
        let width = level * self.opts.tab_width + lead + text.len() + 1;
        if text.contains('\n') || width <= self.opts.max_line_width {
            return Ok(text);
        }
        Ok(match expr {
            Expr::Object(props) if !props.is_empty() => {
                self.broken_list("{", "}", &self.object_items(props, level)?, level)
            }
            Expr::Array(elems) if !elems.is_empty() => {
                self.broken_list("[", "]", &self.array_items(elems, level)?, level)
            }
            _ => text,
        })
    }

    fn object_items(&self, props: &[Prop], level: usize) -> Result<Vec<String>, SerializeError> {
        let mut items = Vec::with_capacity(props.len());
        for prop in props {
            items.push(self.prop(prop, level + 1)?);
        }
        Ok(items)
    }

    fn array_items(&self, elems: &[Option<Expr>], level: usize) -> Result<Vec<String>, SerializeError> {
        let mut items = Vec::with_capacity(elems.len());
        for elem in elems {
            items.push(match elem {
                Some(elem) => self.operand(elem, 2, level + 1)?,
                None => String::new(),
            });
        }
        Ok(items)
    }

    fn args(&self, args: &[Expr], level: usize) -> PrintResult {
        let mut flat = Vec::with_capacity(args.len());
        for arg in args {
            flat.push(self.operand(arg, 2, level)?);
        }
        let joined = format!("({})", flat.join(", "));
        let multiline = flat.iter().filter(|a| a.contains('\n')).count();
        if multiline == 0 && self.fits(level, &joined) {
            return Ok(joined);
        }
        let huggable = |e: &Expr| {
            matches!(
                e,
                Expr::Arrow(_) | Expr::Function(_) | Expr::Object(_) | Expr::Array(_) | Expr::Jsx(_)
            )
        };
        let hug = multiline == 1
            && args
                .iter()
                .zip(&flat)
                .all(|(arg, text)| !text.contains('\n') || huggable(arg));
        if hug {
            return Ok(joined);
        }
        let mut nested = Vec::with_capacity(args.len());
        for arg in args {
            nested.push(self.operand(arg, 2, level + 1)?);
        }
        Ok(self.list("(", ")", &nested, level, false))
    }

    fn arrow(&self, arrow: &Arrow, level: usize) -> PrintResult {
        let mut out = String::new();
        if arrow.is_async {
            out.push_str("async ");
        }
        out.push_str(&self.params(&arrow.params, level)?);
        if let Some(rt) = &arrow.return_type {
            out.push_str(rt);
        }
        out.push_str(" => ");
        match &arrow.body {
            ArrowBody::Block(body) => out.push_str(&self.block(body, level)?),
            ArrowBody::Expr(body) => match body.as_ref() {
                Expr::Object(_) => out.push_str(&format!("({})", self.expr(body, level)?)),
                other => out.push_str(&self.jsx_wrapped(other, level)?),
            },
        }
        Ok(out)
    }

    #[allow(clippy::too_many_lines)]
    fn expr(&self, expr: &Expr, level: usize) -> PrintResult {
        Ok(match expr {
            Expr::Ident(name) => {
                if name.is_empty() || name.contains(char::is_whitespace) {
                    return Err(SerializeError::invalid(
                        NodeKind::Identifier,
                        format!("invalid identifier '{name}'"),
                    ));
                }
                name.clone()
            }
            Expr::This => "this".to_string(),
            Expr::Super => "super".to_string(),
            Expr::Lit(lit) => match lit {
                Lit::Str(s) => self.string(s),
                Lit::Num(raw) | Lit::Regex(raw) => raw.clone(),
                Lit::Bool(b) => b.to_string(),
                Lit::Null => "null".to_string(),
            },
            Expr::Template(template) => {
                let mut out = String::from("`");
                for (i, quasi) in template.quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = template.exprs.get(i) {
                        out.push_str("${");
                        out.push_str(&self.expr(expr, level)?);
                        out.push('}');
                    }
                }
                out.push('`');
                out
            }
            Expr::Array(elems) => {
                let items = self.array_items(elems, level)?;
                let mut out = self.list("[", "]", &items, level, false);
                if matches!(elems.last(), Some(None)) && !out.contains('\n') {
                    out.insert(out.len() - 1, ',');
                }
                out
            }
            Expr::Object(props) => self.list("{", "}", &self.object_items(props, level)?, level, true),
            Expr::Member { obj, prop, optional } => {
                let obj = self.callee(obj, level)?;
                match prop {
                    MemberProp::Ident(name) => {
                        format!("{obj}{}{name}", if *optional { "?." } else { "." })
                    }
                    MemberProp::Computed(index) => format!(
                        "{obj}{}[{}]",
                        if *optional { "?." } else { "" },
                        self.expr(index, level)?
                    ),
                }
            }
            Expr::Call {
                callee,
                args,
                optional,
            } => format!(
                "{}{}{}",
                self.callee(callee, level)?,
                if *optional { "?." } else { "" },
                self.args(args, level)?
            ),
            Expr::New { callee, args } => {
                let callee_text = match callee.as_ref() {
                    Expr::Call { .. } => format!("({})", self.expr(callee, level)?),
                    _ => self.callee(callee, level)?,
                };
                match args {
                    Some(args) => format!("new {callee_text}{}", self.args(args, level)?),
                    None => format!("new {callee_text}"),
                }
            }
            Expr::Arrow(arrow) => self.arrow(arrow, level)?,
            Expr::Function(func) => self.function(&func.function, func.name.as_deref(), level)?,
            Expr::Class(class) => self.class(class, level)?,
            Expr::Unary { op, arg } => {
                let arg_text = self.operand(arg, 15, level)?;
                let needs_space = op.chars().all(char::is_alphabetic)
                    || matches!(arg.as_ref(), Expr::Unary { op: inner, .. } | Expr::Update { op: inner, prefix: true, .. }
                        if inner.starts_with(op.as_str()));
                if needs_space {
                    format!("{op} {arg_text}")
                } else {
                    format!("{op}{arg_text}")
                }
            }
            Expr::Update { op, prefix, arg } => {
                let arg_text = self.operand(arg, 16, level)?;
                if *prefix {
                    format!("{op}{arg_text}")
                } else {
                    format!("{arg_text}{op}")
                }
            }
            Expr::Binary { op, left, right } => {
                let p = binary_precedence(op);
                let (left_min, right_min) = if op == "**" { (p + 1, p) } else { (p, p + 1) };
                format!(
                    "{} {op} {}",
                    self.operand(left, left_min, level)?,
                    self.operand(right, right_min, level)?
                )
            }
            Expr::Assign { op, left, right } => {
                let left = self.pattern(left, level)?;
                let lead = left.len() + op.len() + 2;
                format!("{left} {op} {}", self.value_after(lead, right, level)?)
            }
            Expr::Cond { test, cons, alt } => format!(
                "{} ? {} : {}",
                self.operand(test, 4, level)?,
                self.operand(cons, 2, level)?,
                self.operand(alt, 2, level)?
            ),
            Expr::Seq(exprs) => {
                let mut parts = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    parts.push(self.operand(expr, 2, level)?);
                }
                parts.join(", ")
            }
            Expr::Paren(inner) => {
                if matches!(inner.as_ref(), Expr::Jsx(_) | Expr::JsxFragment(_)) {
                    let text = self.expr(inner, level + 1)?;
                    if text.contains('\n') {
                        format!("(\n{}{text}\n{})", self.indent(level + 1), self.indent(level))
                    } else {
                        format!("({text})")
                    }
                } else {
                    format!("({})", self.expr(inner, level)?)
                }
            }
            Expr::Await(arg) => format!("await {}", self.operand(arg, 15, level)?),
            Expr::Yield { arg, delegate } => {
                let star = if *delegate { "*" } else { "" };
                match arg {
                    Some(arg) => format!("yield{star} {}", self.operand(arg, 2, level)?),
                    None => format!("yield{star}"),
                }
            }
            Expr::Spread(arg) => format!("...{}", self.operand(arg, 2, level)?),
            Expr::Jsx(element) => self.jsx_element(element, level)?,
            Expr::JsxFragment(children) => self.jsx_tag("", &[], children, false, level)?,
            Expr::Verbatim(raw) => self.verbatim(raw, level),
        })
    }

    /// Callee or member object position
    fn callee(&self, expr: &Expr, level: usize) -> PrintResult {
        let text = self.expr(expr, level)?;
        let wrap = precedence(expr) < 18
            || matches!(expr, Expr::Function(_) | Expr::Class(_) | Expr::Object(_));
        Ok(if wrap { format!("({text})") } else { text })
    }

    fn prop(&self, prop: &Prop, level: usize) -> PrintResult {
        Ok(match prop {
            Prop::KeyValue { key, value } => {
                let key = self.prop_key(key, level)?;
                let value = self.value_after(key.len() + 2, value, level)?;
                format!("{key}: {value}")
            }
            Prop::Shorthand(name) => {
                if name.is_empty() {
                    return Err(SerializeError::invalid(NodeKind::Object, "empty shorthand property"));
                }
                name.clone()
            }
            Prop::Spread(expr) => format!("...{}", self.operand(expr, 2, level)?),
            Prop::Method(method) => self.method(method, level)?,
            Prop::Verbatim(raw) => self.verbatim(raw, level),
        })
    }

    // ---- JSX ----

    fn jsx_element(&self, element: &JsxElement, level: usize) -> PrintResult {
        if element.name.is_empty() {
            return Err(SerializeError::invalid(NodeKind::JsxElement, "empty tag name"));
        }
        self.jsx_tag(
            &element.name,
            &element.attrs,
            &element.children,
            element.self_closing,
            level,
        )
    }

    fn jsx_attr(&self, attr: &JsxAttr, level: usize) -> PrintResult {
        Ok(match attr {
            JsxAttr::Named { name, value: None } => name.clone(),
            JsxAttr::Named {
                name,
                value: Some(value),
            } => {
                let value = match value {
                    JsxAttrValue::Str(raw) => raw.clone(),
                    JsxAttrValue::Expr(expr) => format!("{{{}}}", self.expr(expr, level)?),
                    JsxAttrValue::Element(el) => self.jsx_element(el, level)?,
                    JsxAttrValue::Fragment(children) => self.jsx_tag("", &[], children, false, level)?,
                };
                format!("{name}={value}")
            }
            JsxAttr::Spread(expr) => format!("{{...{}}}", self.expr(expr, level)?),
        })
    }

    fn jsx_tag(
        &self,
        name: &str,
        attrs: &[JsxAttr],
        children: &[JsxChild],
        self_closing: bool,
        level: usize,
    ) -> PrintResult {
        let mut inline_attrs = Vec::with_capacity(attrs.len());
        for attr in attrs {
            inline_attrs.push(self.jsx_attr(attr, level)?);
        }
        let mut open = format!("<{name}");
        for attr in &inline_attrs {
            open.push(' ');
            open.push_str(attr);
        }
        let break_attrs = attrs.len() > 1 && !self.fits(level, &format!("{open} />"));
        if break_attrs || (attrs.len() > 1 && inline_attrs.iter().any(|a| a.contains('\n'))) {
            let inner = self.indent(level + 1);
            open = format!("<{name}");
            for attr in attrs {
                open.push('\n');
                open.push_str(&inner);
                open.push_str(&self.jsx_attr(attr, level + 1)?);
            }
            open.push('\n');
            open.push_str(&self.indent(level));
            if self_closing {
                open.push_str("/>");
                return Ok(open);
            }
        } else if self_closing {
            open.push_str(" />");
            return Ok(open);
        }
        let close = format!("</{name}>");

        // Inline layout when the children never spanned lines
        let mut inline = String::new();
        let mut can_inline = true;
        for child in children {
            let text = self.jsx_child(child, level)?;
            if text.contains('\n') {
                can_inline = false;
                break;
            }
            inline.push_str(&text);
        }
        if can_inline {
            let candidate = format!("{open}>{inline}{close}");
            if children.is_empty() || (!open.contains('\n') && self.fits(level, &candidate)) {
                return Ok(candidate);
            }
        }

        let lines = self.jsx_lines(children, level + 1)?;
        if lines.is_empty() {
            return Ok(format!("{open}>{close}"));
        }
        let inner = self.indent(level + 1);
        let mut out = format!("{open}>");
        for line in lines {
            out.push('\n');
            out.push_str(&inner);
            out.push_str(&line);
        }
        out.push('\n');
        out.push_str(&self.indent(level));
        out.push_str(&close);
        Ok(out)
    }

    fn jsx_child(&self, child: &JsxChild, level: usize) -> PrintResult {
        Ok(match child {
            JsxChild::Text(raw) | JsxChild::Raw(raw) => raw.clone(),
            JsxChild::Expr(None) => "{}".to_string(),
            JsxChild::Expr(Some(expr)) => format!("{{{}}}", self.expr(expr, level)?),
            JsxChild::Spread(expr) => format!("{{...{}}}", self.expr(expr, level)?),
            JsxChild::Element(el) => self.jsx_element(el, level)?,
            JsxChild::Fragment(children) => self.jsx_tag("", &[], children, false, level)?,
        })
    }

    /// Group children into output lines, following JSX whitespace rules:
    /// text lines are trimmed and whitespace-only lines vanish
    fn jsx_lines(&self, children: &[JsxChild], level: usize) -> Result<Vec<String>, SerializeError> {
        let mut lines = vec![String::new()];
        for child in children {
            match child {
                JsxChild::Text(raw) => {
                    let mut segments = raw.split('\n');
                    if let Some(first) = segments.next() {
                        if let Some(current) = lines.last_mut() {
                            current.push_str(first);
                        }
                    }
                    for segment in segments {
                        lines.push(segment.trim_start().to_string());
                    }
                }
                other => {
                    let text = self.jsx_child(other, level)?;
                    if let Some(current) = lines.last_mut() {
                        current.push_str(&text);
                    }
                }
            }
        }
        Ok(lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Language};
    use pretty_assertions::assert_eq;

    fn roundtrip(source: &str) -> String {
        let program = parse(source, Language::JavaScript).expect("parse");
        print(&program, &PrintOptions::default()).expect("print")
    }

    #[test]
    fn normalizes_quotes_and_semicolons() {
        assert_eq!(
            roundtrip("import React from \"react\"\nconst a = \"it's\"\nconst b = \"plain\"\n"),
            "import React from 'react';\n\nconst a = \"it's\";\nconst b = 'plain';\n"
        );
    }

    #[test]
    fn prints_class_with_blank_lines_between_methods() {
        let out = roundtrip("class A extends React.Component { componentDidMount() { load() } render() { return null } }");
        assert_eq!(
            out,
            "class A extends React.Component {\n  componentDidMount() {\n    load();\n  }\n\n  render() {\n    return null;\n  }\n}\n"
        );
    }

    #[test]
    fn hugs_callback_arguments() {
        let out = roundtrip("useEffect(() => { load(); }, []);");
        assert_eq!(out, "useEffect(() => {\n  load();\n}, []);\n");
    }

    #[test]
    fn breaks_long_objects_with_trailing_comma() {
        let out = roundtrip("const x = { onClick: PropTypes.any, children: PropTypes.any, variant: PropTypes.any, color: PropTypes.any };");
        assert_eq!(
            out,
            "const x = {\n  onClick: PropTypes.any,\n  children: PropTypes.any,\n  variant: PropTypes.any,\n  color: PropTypes.any,\n};\n"
        );
    }

    #[test]
    fn text_before_a_literal_counts_toward_the_width() {
        let out = roundtrip("class A { static propTypes = { position: PropTypes.any, color: PropTypes.any, children: PropTypes.any }; }\nexport const sizes = ['small', 'medium', 'large', 'extra-large', 'extra-extra-large'];\n");
        assert_eq!(
            out,
            "class A {\n  static propTypes = {\n    position: PropTypes.any,\n    color: PropTypes.any,\n    children: PropTypes.any,\n  };\n}\n\nexport const sizes = [\n  'small',\n  'medium',\n  'large',\n  'extra-large',\n  'extra-extra-large',\n];\n"
        );
    }

    #[test]
    fn keeps_multiline_jsx_layout() {
        let source = "function A() {\n  return (\n    <div className=\"a\">\n      <span>{count}</span>\n      Hello {name}\n    </div>\n  );\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn reindents_verbatim_statements() {
        let source = "function f() {\n  with (scope) {\n    use(x);\n  }\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn prints_loops() {
        let source = "function f() {\n  for (let i = 0; i < n; i++) {\n    tick(i);\n  }\n  for (;;);\n  for await (const chunk of stream) {\n    push(chunk);\n  }\n  for (key in obj) use(key);\n  while (busy) {\n    wait();\n  }\n  do {\n    step();\n  } while (more);\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn prints_switch_with_labels() {
        let source = "scan: for (const x of xs) {\n  switch (x.kind) {\n    case 'skip':\n      continue scan;\n    case 'a':\n    case 'b': {\n      handle(x);\n      break;\n    }\n    default:\n      // done\n      break scan;\n  }\n}\n";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn trailing_comment_stays_on_its_line() {
        assert_eq!(
            roundtrip("import React from \"react\"; // trailing\nconst a = 1; /* note */\n// own line\nconst b = 2;\n"),
            "import React from 'react'; // trailing\n\nconst a = 1; /* note */\n// own line\nconst b = 2;\n"
        );
    }

    #[test]
    fn arrow_object_body_is_parenthesized() {
        let out = roundtrip("const f = (s) => ({ x: s.x });");
        assert_eq!(out, "const f = (s) => ({ x: s.x });\n");
    }

    #[test]
    fn rejects_duplicate_import_locals() {
        let program = Program::new(vec![
            Stmt::Import(ImportDecl::new("a", vec![ImportSpecifier::named("X")])),
            Stmt::Import(ImportDecl::new("b", vec![ImportSpecifier::Default("X".into())])),
        ]);
        let err = print(&program, &PrintOptions::default()).unwrap_err();
        assert!(matches!(err, SerializeError::DuplicateImport { ref local, .. } if local == "X"));
    }

    #[test]
    fn rejects_empty_identifier() {
        let program = Program::new(vec![Stmt::Expr(Expr::ident(""))]);
        assert!(print(&program, &PrintOptions::default()).is_err());
    }

    #[test]
    fn long_named_imports_break_across_lines() {
        let out = roundtrip("import { Button, Typography, Paper, Grid, TextField, AppBar, Toolbar } from '@material-ui/core';");
        assert_eq!(
            out,
            "import {\n  Button,\n  Typography,\n  Paper,\n  Grid,\n  TextField,\n  AppBar,\n  Toolbar,\n} from '@material-ui/core';\n"
        );
    }

    #[test]
    fn double_quote_option() {
        let program = parse("const a = 'x';", Language::JavaScript).expect("parse");
        let opts = PrintOptions {
            quote: QuoteStyle::Double,
            ..PrintOptions::default()
        };
        assert_eq!(print(&program, &opts).expect("print"), "const a = \"x\";\n");
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("Component"));
        assert!(is_identifier("$el"));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
