//! Tree traversal
//!
//! [`Visit`] walks a tree read-only, [`VisitMut`] walks it mutably. Every
//! method has a default that recurses through the matching `walk_*` function,
//! so an implementor overrides only the node kinds it cares about and calls
//! the `walk_*` function itself when it still wants to descend.
//!
//! Raw text (verbatim nodes, type annotations, decorators) is offered through
//! `visit_raw` so that conservative name scans can still look inside it.

use crate::ast::{
    ArrowBody, ClassDecl, ClassMember, Decl, DefaultDecl, Expr, ForHead, ForInit, Function,
    ImportDecl, JsxAttr, JsxAttrValue, JsxChild, JsxElement, MemberProp, ObjectPatProp, Param,
    Pattern, Program, Prop, PropKey, Stmt, VarDecl,
};

/// Read-only traversal
#[allow(unused_variables)]
pub trait Visit {
    /// Visit program root
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    /// Visit statement
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visit import declaration (leaf)
    fn visit_import(&mut self, import: &ImportDecl) {}

    /// Visit class declaration or expression
    fn visit_class(&mut self, class: &ClassDecl) {
        walk_class(self, class);
    }

    /// Visit function signature and body
    fn visit_function(&mut self, function: &Function) {
        walk_function(self, function);
    }

    /// Visit binding pattern
    fn visit_pattern(&mut self, pattern: &Pattern) {
        walk_pattern(self, pattern);
    }

    /// Visit expression
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    /// Visit object literal member
    fn visit_prop(&mut self, prop: &Prop) {
        walk_prop(self, prop);
    }

    /// Visit JSX element
    fn visit_jsx_element(&mut self, element: &JsxElement) {
        walk_jsx_element(self, element);
    }

    /// Visit raw source text
    fn visit_raw(&mut self, text: &str) {}
}

/// Walk program children
pub fn walk_program<V: Visit + ?Sized>(v: &mut V, program: &Program) {
    for stmt in &program.body {
        v.visit_stmt(stmt);
    }
}

/// Walk statement children
pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Import(import) => v.visit_import(import),
        Stmt::Decl(decl) | Stmt::ExportDecl(decl) => walk_decl(v, decl),
        Stmt::ExportDefault(target) => match target {
            DefaultDecl::Function(func) => v.visit_function(&func.function),
            DefaultDecl::Class(class) => v.visit_class(class),
            DefaultDecl::Expr(expr) => v.visit_expr(expr),
        },
        Stmt::Expr(expr) | Stmt::Throw(expr) => v.visit_expr(expr),
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        Stmt::If { test, cons, alt } => {
            v.visit_expr(test);
            v.visit_stmt(cons);
            if let Some(alt) = alt {
                v.visit_stmt(alt);
            }
        }
        Stmt::Block(body) => {
            for stmt in body {
                v.visit_stmt(stmt);
            }
        }
        Stmt::Try {
            block,
            param,
            handler,
            finalizer,
        } => {
            for stmt in block {
                v.visit_stmt(stmt);
            }
            if let Some(param) = param {
                v.visit_pattern(param);
            }
            for stmt in handler.iter().chain(finalizer.iter()).flatten() {
                v.visit_stmt(stmt);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(var)) => walk_var_decl(v, var),
                Some(ForInit::Expr(expr)) => v.visit_expr(expr),
                None => {}
            }
            for expr in test.iter().chain(update.iter()) {
                v.visit_expr(expr);
            }
            v.visit_stmt(body);
        }
        Stmt::ForIn {
            left, right, body, ..
        } => {
            match left {
                ForHead::Var { name, .. } | ForHead::Target(name) => v.visit_pattern(name),
            }
            v.visit_expr(right);
            v.visit_stmt(body);
        }
        Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
            v.visit_expr(test);
            v.visit_stmt(body);
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            v.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    v.visit_expr(test);
                }
                for stmt in &case.body {
                    v.visit_stmt(stmt);
                }
            }
        }
        Stmt::Labeled { body, .. } => v.visit_stmt(body),
        Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Empty
        | Stmt::Comment(_)
        | Stmt::TrailingComment(_) => {}
        Stmt::Verbatim(raw) => v.visit_raw(&raw.text),
    }
}

fn walk_decl<V: Visit + ?Sized>(v: &mut V, decl: &Decl) {
    match decl {
        Decl::Function(func) => v.visit_function(&func.function),
        Decl::Class(class) => v.visit_class(class),
        Decl::Var(var) => walk_var_decl(v, var),
    }
}

fn walk_var_decl<V: Visit + ?Sized>(v: &mut V, var: &VarDecl) {
    for declarator in &var.decls {
        v.visit_pattern(&declarator.name);
        if let Some(ty) = &declarator.type_ann {
            v.visit_raw(ty);
        }
        if let Some(init) = &declarator.init {
            v.visit_expr(init);
        }
    }
}

/// Walk class children
pub fn walk_class<V: Visit + ?Sized>(v: &mut V, class: &ClassDecl) {
    for raw in class
        .decorators
        .iter()
        .chain(&class.super_type_args)
        .chain(&class.implements)
    {
        v.visit_raw(raw);
    }
    if let Some(super_class) = &class.super_class {
        v.visit_expr(super_class);
    }
    for member in &class.body {
        match member {
            ClassMember::Method(method) => {
                walk_prop_key(v, &method.key);
                v.visit_function(&method.function);
            }
            ClassMember::Property(prop) => {
                walk_prop_key(v, &prop.key);
                if let Some(ty) = &prop.type_ann {
                    v.visit_raw(ty);
                }
                if let Some(value) = &prop.value {
                    v.visit_expr(value);
                }
            }
            ClassMember::Comment(_) => {}
            ClassMember::Verbatim(raw) => v.visit_raw(&raw.text),
        }
    }
}

/// Walk function parameters and body
pub fn walk_function<V: Visit + ?Sized>(v: &mut V, function: &Function) {
    for param in &function.params {
        walk_param(v, param);
    }
    if let Some(ty) = &function.return_type {
        v.visit_raw(ty);
    }
    for stmt in &function.body {
        v.visit_stmt(stmt);
    }
}

fn walk_param<V: Visit + ?Sized>(v: &mut V, param: &Param) {
    v.visit_pattern(&param.pat);
    if let Some(ty) = &param.type_ann {
        v.visit_raw(ty);
    }
}

fn walk_prop_key<V: Visit + ?Sized>(v: &mut V, key: &PropKey) {
    if let PropKey::Computed(expr) = key {
        v.visit_expr(expr);
    }
}

/// Walk pattern children (defaults and member targets)
pub fn walk_pattern<V: Visit + ?Sized>(v: &mut V, pattern: &Pattern) {
    match pattern {
        Pattern::Ident(_) => {}
        Pattern::Array(elems) => {
            for elem in elems.iter().flatten() {
                v.visit_pattern(elem);
            }
        }
        Pattern::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatProp::KeyValue { key, value } => {
                        walk_prop_key(v, key);
                        v.visit_pattern(value);
                    }
                    ObjectPatProp::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            v.visit_expr(default);
                        }
                    }
                    ObjectPatProp::Rest(rest) => v.visit_pattern(rest),
                    ObjectPatProp::Verbatim(raw) => v.visit_raw(&raw.text),
                }
            }
        }
        Pattern::Assign { left, right } => {
            v.visit_pattern(left);
            v.visit_expr(right);
        }
        Pattern::Rest(inner) => v.visit_pattern(inner),
        Pattern::Expr(expr) => v.visit_expr(expr),
        Pattern::Verbatim(raw) => v.visit_raw(&raw.text),
    }
}

/// Walk expression children
pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Ident(_) | Expr::This | Expr::Super | Expr::Lit(_) => {}
        Expr::Template(template) => {
            for expr in &template.exprs {
                v.visit_expr(expr);
            }
        }
        Expr::Array(elems) => {
            for elem in elems.iter().flatten() {
                v.visit_expr(elem);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                v.visit_prop(prop);
            }
        }
        Expr::Member { obj, prop, .. } => {
            v.visit_expr(obj);
            if let MemberProp::Computed(prop) = prop {
                v.visit_expr(prop);
            }
        }
        Expr::Call { callee, args, .. } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::New { callee, args } => {
            v.visit_expr(callee);
            for arg in args.iter().flatten() {
                v.visit_expr(arg);
            }
        }
        Expr::Arrow(arrow) => {
            for param in &arrow.params {
                walk_param(v, param);
            }
            match &arrow.body {
                ArrowBody::Block(body) => {
                    for stmt in body {
                        v.visit_stmt(stmt);
                    }
                }
                ArrowBody::Expr(body) => v.visit_expr(body),
            }
        }
        Expr::Function(func) => v.visit_function(&func.function),
        Expr::Class(class) => v.visit_class(class),
        Expr::Unary { arg, .. } | Expr::Update { arg, .. } => v.visit_expr(arg),
        Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Assign { left, right, .. } => {
            v.visit_pattern(left);
            v.visit_expr(right);
        }
        Expr::Cond { test, cons, alt } => {
            v.visit_expr(test);
            v.visit_expr(cons);
            v.visit_expr(alt);
        }
        Expr::Seq(exprs) => {
            for expr in exprs {
                v.visit_expr(expr);
            }
        }
        Expr::Paren(inner) | Expr::Await(inner) | Expr::Spread(inner) => v.visit_expr(inner),
        Expr::Yield { arg, .. } => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        Expr::Jsx(element) => v.visit_jsx_element(element),
        Expr::JsxFragment(children) => walk_jsx_children(v, children),
        Expr::Verbatim(raw) => v.visit_raw(&raw.text),
    }
}

/// Walk object member children
pub fn walk_prop<V: Visit + ?Sized>(v: &mut V, prop: &Prop) {
    match prop {
        Prop::KeyValue { key, value } => {
            walk_prop_key(v, key);
            v.visit_expr(value);
        }
        Prop::Shorthand(_) => {}
        Prop::Spread(expr) => v.visit_expr(expr),
        Prop::Method(method) => {
            walk_prop_key(v, &method.key);
            v.visit_function(&method.function);
        }
        Prop::Verbatim(raw) => v.visit_raw(&raw.text),
    }
}

/// Walk JSX attributes and children
pub fn walk_jsx_element<V: Visit + ?Sized>(v: &mut V, element: &JsxElement) {
    for attr in &element.attrs {
        match attr {
            JsxAttr::Named { value, .. } => match value {
                Some(JsxAttrValue::Expr(expr)) => v.visit_expr(expr),
                Some(JsxAttrValue::Element(el)) => v.visit_jsx_element(el),
                Some(JsxAttrValue::Fragment(children)) => walk_jsx_children(v, children),
                Some(JsxAttrValue::Str(_)) | None => {}
            },
            JsxAttr::Spread(expr) => v.visit_expr(expr),
        }
    }
    walk_jsx_children(v, &element.children);
}

fn walk_jsx_children<V: Visit + ?Sized>(v: &mut V, children: &[JsxChild]) {
    for child in children {
        match child {
            JsxChild::Text(_) | JsxChild::Raw(_) | JsxChild::Expr(None) => {}
            JsxChild::Expr(Some(expr)) | JsxChild::Spread(expr) => v.visit_expr(expr),
            JsxChild::Element(el) => v.visit_jsx_element(el),
            JsxChild::Fragment(children) => walk_jsx_children(v, children),
        }
    }
}

/// Mutable traversal
pub trait VisitMut {
    /// Visit program root
    fn visit_mut_program(&mut self, program: &mut Program) {
        walk_mut_program(self, program);
    }

    /// Visit statement
    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        walk_mut_stmt(self, stmt);
    }

    /// Visit class declaration or expression
    fn visit_mut_class(&mut self, class: &mut ClassDecl) {
        walk_mut_class(self, class);
    }

    /// Visit function signature and body
    fn visit_mut_function(&mut self, function: &mut Function) {
        walk_mut_function(self, function);
    }

    /// Visit binding pattern
    fn visit_mut_pattern(&mut self, pattern: &mut Pattern) {
        walk_mut_pattern(self, pattern);
    }

    /// Visit expression
    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        walk_mut_expr(self, expr);
    }

    /// Visit object literal member
    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        walk_mut_prop(self, prop);
    }

    /// Visit JSX element
    fn visit_mut_jsx_element(&mut self, element: &mut JsxElement) {
        walk_mut_jsx_element(self, element);
    }
}

/// Walk program children mutably
pub fn walk_mut_program<V: VisitMut + ?Sized>(v: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        v.visit_mut_stmt(stmt);
    }
}

/// Walk statement children mutably
pub fn walk_mut_stmt<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Decl(decl) | Stmt::ExportDecl(decl) => walk_mut_decl(v, decl),
        Stmt::ExportDefault(target) => match target {
            DefaultDecl::Function(func) => v.visit_mut_function(&mut func.function),
            DefaultDecl::Class(class) => v.visit_mut_class(class),
            DefaultDecl::Expr(expr) => v.visit_mut_expr(expr),
        },
        Stmt::Expr(expr) | Stmt::Throw(expr) => v.visit_mut_expr(expr),
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                v.visit_mut_expr(arg);
            }
        }
        Stmt::If { test, cons, alt } => {
            v.visit_mut_expr(test);
            v.visit_mut_stmt(cons);
            if let Some(alt) = alt {
                v.visit_mut_stmt(alt);
            }
        }
        Stmt::Block(body) => {
            for stmt in body {
                v.visit_mut_stmt(stmt);
            }
        }
        Stmt::Try {
            block,
            param,
            handler,
            finalizer,
        } => {
            for stmt in block {
                v.visit_mut_stmt(stmt);
            }
            if let Some(param) = param {
                v.visit_mut_pattern(param);
            }
            for stmt in handler.iter_mut().chain(finalizer.iter_mut()).flatten() {
                v.visit_mut_stmt(stmt);
            }
        }
        Stmt::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(var)) => walk_mut_var_decl(v, var),
                Some(ForInit::Expr(expr)) => v.visit_mut_expr(expr),
                None => {}
            }
            for expr in test.iter_mut().chain(update.iter_mut()) {
                v.visit_mut_expr(expr);
            }
            v.visit_mut_stmt(body);
        }
        Stmt::ForIn {
            left, right, body, ..
        } => {
            match left {
                ForHead::Var { name, .. } | ForHead::Target(name) => v.visit_mut_pattern(name),
            }
            v.visit_mut_expr(right);
            v.visit_mut_stmt(body);
        }
        Stmt::While { test, body } | Stmt::DoWhile { body, test } => {
            v.visit_mut_expr(test);
            v.visit_mut_stmt(body);
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            v.visit_mut_expr(discriminant);
            for case in cases {
                if let Some(test) = &mut case.test {
                    v.visit_mut_expr(test);
                }
                for stmt in &mut case.body {
                    v.visit_mut_stmt(stmt);
                }
            }
        }
        Stmt::Labeled { body, .. } => v.visit_mut_stmt(body),
        Stmt::Import(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Empty
        | Stmt::Comment(_)
        | Stmt::TrailingComment(_)
        | Stmt::Verbatim(_) => {}
    }
}

fn walk_mut_decl<V: VisitMut + ?Sized>(v: &mut V, decl: &mut Decl) {
    match decl {
        Decl::Function(func) => v.visit_mut_function(&mut func.function),
        Decl::Class(class) => v.visit_mut_class(class),
        Decl::Var(var) => walk_mut_var_decl(v, var),
    }
}

fn walk_mut_var_decl<V: VisitMut + ?Sized>(v: &mut V, var: &mut VarDecl) {
    for declarator in &mut var.decls {
        v.visit_mut_pattern(&mut declarator.name);
        if let Some(init) = &mut declarator.init {
            v.visit_mut_expr(init);
        }
    }
}

/// Walk class children mutably
pub fn walk_mut_class<V: VisitMut + ?Sized>(v: &mut V, class: &mut ClassDecl) {
    if let Some(super_class) = &mut class.super_class {
        v.visit_mut_expr(super_class);
    }
    for member in &mut class.body {
        match member {
            ClassMember::Method(method) => {
                walk_mut_prop_key(v, &mut method.key);
                v.visit_mut_function(&mut method.function);
            }
            ClassMember::Property(prop) => {
                walk_mut_prop_key(v, &mut prop.key);
                if let Some(value) = &mut prop.value {
                    v.visit_mut_expr(value);
                }
            }
            ClassMember::Comment(_) | ClassMember::Verbatim(_) => {}
        }
    }
}

/// Walk function parameters and body mutably
pub fn walk_mut_function<V: VisitMut + ?Sized>(v: &mut V, function: &mut Function) {
    for param in &mut function.params {
        v.visit_mut_pattern(&mut param.pat);
    }
    for stmt in &mut function.body {
        v.visit_mut_stmt(stmt);
    }
}

fn walk_mut_prop_key<V: VisitMut + ?Sized>(v: &mut V, key: &mut PropKey) {
    if let PropKey::Computed(expr) = key {
        v.visit_mut_expr(expr);
    }
}

/// Walk pattern children mutably
pub fn walk_mut_pattern<V: VisitMut + ?Sized>(v: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Ident(_) | Pattern::Verbatim(_) => {}
        Pattern::Array(elems) => {
            for elem in elems.iter_mut().flatten() {
                v.visit_mut_pattern(elem);
            }
        }
        Pattern::Object(props) => {
            for prop in props {
                match prop {
                    ObjectPatProp::KeyValue { key, value } => {
                        walk_mut_prop_key(v, key);
                        v.visit_mut_pattern(value);
                    }
                    ObjectPatProp::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            v.visit_mut_expr(default);
                        }
                    }
                    ObjectPatProp::Rest(rest) => v.visit_mut_pattern(rest),
                    ObjectPatProp::Verbatim(_) => {}
                }
            }
        }
        Pattern::Assign { left, right } => {
            v.visit_mut_pattern(left);
            v.visit_mut_expr(right);
        }
        Pattern::Rest(inner) => v.visit_mut_pattern(inner),
        Pattern::Expr(expr) => v.visit_mut_expr(expr),
    }
}

/// Walk expression children mutably
pub fn walk_mut_expr<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Ident(_) | Expr::This | Expr::Super | Expr::Lit(_) | Expr::Verbatim(_) => {}
        Expr::Template(template) => {
            for expr in &mut template.exprs {
                v.visit_mut_expr(expr);
            }
        }
        Expr::Array(elems) => {
            for elem in elems.iter_mut().flatten() {
                v.visit_mut_expr(elem);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                v.visit_mut_prop(prop);
            }
        }
        Expr::Member { obj, prop, .. } => {
            v.visit_mut_expr(obj);
            if let MemberProp::Computed(prop) = prop {
                v.visit_mut_expr(prop);
            }
        }
        Expr::Call { callee, args, .. } => {
            v.visit_mut_expr(callee);
            for arg in args {
                v.visit_mut_expr(arg);
            }
        }
        Expr::New { callee, args } => {
            v.visit_mut_expr(callee);
            for arg in args.iter_mut().flatten() {
                v.visit_mut_expr(arg);
            }
        }
        Expr::Arrow(arrow) => {
            for param in &mut arrow.params {
                v.visit_mut_pattern(&mut param.pat);
            }
            match &mut arrow.body {
                ArrowBody::Block(body) => {
                    for stmt in body {
                        v.visit_mut_stmt(stmt);
                    }
                }
                ArrowBody::Expr(body) => v.visit_mut_expr(body),
            }
        }
        Expr::Function(func) => v.visit_mut_function(&mut func.function),
        Expr::Class(class) => v.visit_mut_class(class),
        Expr::Unary { arg, .. } | Expr::Update { arg, .. } => v.visit_mut_expr(arg),
        Expr::Binary { left, right, .. } => {
            v.visit_mut_expr(left);
            v.visit_mut_expr(right);
        }
        Expr::Assign { left, right, .. } => {
            v.visit_mut_pattern(left);
            v.visit_mut_expr(right);
        }
        Expr::Cond { test, cons, alt } => {
            v.visit_mut_expr(test);
            v.visit_mut_expr(cons);
            v.visit_mut_expr(alt);
        }
        Expr::Seq(exprs) => {
            for expr in exprs {
                v.visit_mut_expr(expr);
            }
        }
        Expr::Paren(inner) | Expr::Await(inner) | Expr::Spread(inner) => v.visit_mut_expr(inner),
        Expr::Yield { arg, .. } => {
            if let Some(arg) = arg {
                v.visit_mut_expr(arg);
            }
        }
        Expr::Jsx(element) => v.visit_mut_jsx_element(element),
        Expr::JsxFragment(children) => walk_mut_jsx_children(v, children),
    }
}

/// Walk object member children mutably
pub fn walk_mut_prop<V: VisitMut + ?Sized>(v: &mut V, prop: &mut Prop) {
    match prop {
        Prop::KeyValue { key, value } => {
            walk_mut_prop_key(v, key);
            v.visit_mut_expr(value);
        }
        Prop::Shorthand(_) | Prop::Verbatim(_) => {}
        Prop::Spread(expr) => v.visit_mut_expr(expr),
        Prop::Method(method) => {
            walk_mut_prop_key(v, &mut method.key);
            v.visit_mut_function(&mut method.function);
        }
    }
}

/// Walk JSX attributes and children mutably
pub fn walk_mut_jsx_element<V: VisitMut + ?Sized>(v: &mut V, element: &mut JsxElement) {
    for attr in &mut element.attrs {
        match attr {
            JsxAttr::Named { value, .. } => match value {
                Some(JsxAttrValue::Expr(expr)) => v.visit_mut_expr(expr),
                Some(JsxAttrValue::Element(el)) => v.visit_mut_jsx_element(el),
                Some(JsxAttrValue::Fragment(children)) => walk_mut_jsx_children(v, children),
                Some(JsxAttrValue::Str(_)) | None => {}
            },
            JsxAttr::Spread(expr) => v.visit_mut_expr(expr),
        }
    }
    walk_mut_jsx_children(v, &mut element.children);
}

fn walk_mut_jsx_children<V: VisitMut + ?Sized>(v: &mut V, children: &mut [JsxChild]) {
    for child in children {
        match child {
            JsxChild::Text(_) | JsxChild::Raw(_) | JsxChild::Expr(None) => {}
            JsxChild::Expr(Some(expr)) | JsxChild::Spread(expr) => v.visit_mut_expr(expr),
            JsxChild::Element(el) => v.visit_mut_jsx_element(el),
            JsxChild::Fragment(children) => walk_mut_jsx_children(v, children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, Language};

    #[derive(Default)]
    struct Idents(Vec<String>);

    impl Visit for Idents {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Ident(name) = expr {
                self.0.push(name.clone());
            }
            walk_expr(self, expr);
        }
    }

    struct Rename;

    impl VisitMut for Rename {
        fn visit_mut_expr(&mut self, expr: &mut Expr) {
            if matches!(expr, Expr::Ident(name) if name == "count") {
                *expr = Expr::ident("total");
                return;
            }
            walk_mut_expr(self, expr);
        }
    }

    #[test]
    fn visit_reaches_nested_jsx_expressions() {
        let program = parse(
            "function A() { return <div onClick={go}>{items.map((i) => <b>{i}</b>)}</div>; }",
            Language::JavaScript,
        )
        .expect("parse");
        let mut idents = Idents::default();
        idents.visit_program(&program);
        assert_eq!(idents.0, vec!["go", "items", "i"]);
    }

    #[test]
    fn visit_mut_replaces_in_place() {
        let mut program =
            parse("log(count, { count: count + 1 });", Language::JavaScript).expect("parse");
        Rename.visit_mut_program(&mut program);
        let mut idents = Idents::default();
        idents.visit_program(&program);
        assert_eq!(idents.0, vec!["log", "total", "total"]);
    }
}
