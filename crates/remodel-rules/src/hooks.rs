//! Hook matching and state rewriting shared by the class conversions
//!
//! - [`extract_hooks`]: pull `useState` / mount-only `useEffect` statements
//!   out of a statement list
//! - [`StateRewriter`]: turn setter calls and state reads into
//!   `this.setState(...)` / `this.state.x`
//!
//! An effect whose cleanup reads locals of the effect body has those locals
//! moved onto the instance (`const id = f()` becomes `this.id = f()`), since
//! the body and the cleanup end up in different lifecycle methods.

use std::collections::HashSet;

use remodel_syntax::visit::{walk_mut_expr, walk_mut_function, walk_mut_prop};
use remodel_syntax::{
    retain_stmts, ArrowBody, Decl, Expr, Function, MemberProp, Param, Pattern, Program, Prop,
    PropKey, Stmt, VarDecl, VarDeclarator, VarKind, VisitMut,
};

use crate::imports::referenced_names;

/// Component members a hoisted effect local must not overwrite
const RESERVED_FIELDS: &[&str] = &["state", "props", "context", "refs", "setState", "forceUpdate"];

/// State variable bound from `const [x, setX] = useState(init)`
#[derive(Debug, Clone, PartialEq)]
pub struct StateBinding {
    /// State variable name
    pub state_name: String,
    /// Setter function name
    pub setter_name: String,
    /// Argument passed to the hook
    pub initial_value: Option<Expr>,
}

/// Body of a `useEffect(fn, [])` call
#[derive(Debug, Clone, PartialEq)]
pub struct MountEffect {
    /// Statements to run on mount
    pub body: Vec<Stmt>,
    /// Statements of the returned cleanup function
    pub cleanup: Option<Vec<Stmt>>,
}

/// Hooks removed from one statement list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookMatches {
    /// State bindings in source order
    pub states: Vec<StateBinding>,
    /// Mount effects in source order
    pub effects: Vec<MountEffect>,
}

impl HookMatches {
    /// Check whether nothing matched
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.effects.is_empty()
    }

    /// Append matches from another statement list
    pub fn extend(&mut self, other: HookMatches) {
        self.states.extend(other.states);
        self.effects.extend(other.effects);
    }

    /// Concatenated mount bodies
    #[must_use]
    pub fn mount_body(&self) -> Vec<Stmt> {
        self.effects
            .iter()
            .flat_map(|e| e.body.iter().cloned())
            .collect()
    }

    /// Concatenated cleanup bodies (empty when no effect returned one)
    #[must_use]
    pub fn cleanup_body(&self) -> Vec<Stmt> {
        self.effects
            .iter()
            .filter_map(|e| e.cleanup.as_ref())
            .flat_map(|body| body.iter().cloned())
            .collect()
    }
}

/// Check for `hook(...)` or `<namespace>.hook(...)`
fn is_hook_callee(callee: &Expr, hook: &str, namespace: &str) -> bool {
    match callee {
        Expr::Ident(name) => name == hook,
        Expr::Member {
            obj,
            prop: MemberProp::Ident(prop),
            optional: false,
        } => prop == hook && obj.as_ident() == Some(namespace),
        _ => false,
    }
}

fn match_state(stmt: &Stmt, namespace: &str) -> Option<StateBinding> {
    let Stmt::Decl(Decl::Var(var)) = stmt else {
        return None;
    };
    let [declarator] = var.decls.as_slice() else {
        return None;
    };
    let Pattern::Array(elems) = &declarator.name else {
        return None;
    };
    let [Some(Pattern::Ident(state)), Some(Pattern::Ident(setter))] = elems.as_slice() else {
        return None;
    };
    let Some(Expr::Call { callee, args, .. }) = &declarator.init else {
        return None;
    };
    if !is_hook_callee(callee, "useState", namespace) || args.len() > 1 {
        return None;
    }
    Some(StateBinding {
        state_name: state.clone(),
        setter_name: setter.clone(),
        initial_value: args.first().cloned(),
    })
}

/// Statements of a callback, or `None` if `expr` is not a plain callback
fn callback_body(expr: &Expr) -> Option<Vec<Stmt>> {
    match expr.unparen() {
        Expr::Arrow(arrow) if !arrow.is_async => Some(match &arrow.body {
            ArrowBody::Block(body) => body.clone(),
            ArrowBody::Expr(expr) => vec![Stmt::Expr(expr.as_ref().clone())],
        }),
        Expr::Function(func) if !func.function.is_async && !func.function.is_generator => {
            Some(func.function.body.clone())
        }
        _ => None,
    }
}

fn match_effect(stmt: &Stmt, namespace: &str) -> Option<MountEffect> {
    let Stmt::Expr(Expr::Call { callee, args, .. }) = stmt else {
        return None;
    };
    if !is_hook_callee(callee, "useEffect", namespace) {
        return None;
    }
    let [callback, Expr::Array(deps)] = args.as_slice() else {
        return None;
    };
    if !deps.is_empty() {
        return None;
    }
    let mut body = callback_body(callback)?;

    let mut cleanup = match body.last() {
        Some(Stmt::Return(Some(returned))) => match returned.unparen() {
            Expr::Ident(name) => Some(vec![Stmt::Expr(Expr::call(Expr::ident(name.clone()), vec![]))]),
            other => callback_body(other),
        },
        _ => None,
    };
    if let Some(cleanup) = &mut cleanup {
        body.pop();
        if !hoist_shared_locals(&mut body, cleanup) {
            tracing::debug!("effect cleanup shares a binding that cannot move to the instance");
            return None;
        }
    }
    Some(MountEffect { body, cleanup })
}

/// Move locals of `body` that `cleanup` reads onto the instance
///
/// Returns `false` without touching anything when a shared binding is
/// destructured, is a function or class declaration, or would overwrite a
/// component member.
fn hoist_shared_locals(body: &mut Vec<Stmt>, cleanup: &mut [Stmt]) -> bool {
    let used = referenced_names(&Program::new(cleanup.to_vec()));
    let mut shared = HashSet::new();
    for stmt in body.iter() {
        let declared = stmt
            .as_function()
            .and_then(|f| f.name.as_deref())
            .or_else(|| stmt.as_class().and_then(|c| c.name.as_deref()));
        if declared.is_some_and(|name| used.contains(name)) {
            return false;
        }
        let Stmt::Decl(Decl::Var(var)) = stmt else {
            continue;
        };
        for declarator in &var.decls {
            let mut bound = Vec::new();
            declarator.name.bound_names(&mut bound);
            if !bound.iter().any(|name| used.contains(*name)) {
                continue;
            }
            match &declarator.name {
                Pattern::Ident(name) if !RESERVED_FIELDS.contains(&name.as_str()) => {
                    shared.insert(name.clone());
                }
                _ => return false,
            }
        }
    }
    if shared.is_empty() {
        return true;
    }

    let mut hoisted = Vec::with_capacity(body.len());
    for stmt in body.drain(..) {
        match stmt {
            Stmt::Decl(Decl::Var(var)) => split_declaration(var, &shared, &mut hoisted),
            other => hoisted.push(other),
        }
    }
    *body = hoisted;

    let mut renamer = FieldRenamer {
        fields: &shared,
        shadowed: Vec::new(),
    };
    for stmt in body.iter_mut().chain(cleanup.iter_mut()) {
        renamer.visit_mut_stmt(stmt);
    }
    true
}

/// Replace declarators of `fields` with `this.name = init` assignments,
/// keeping the remaining declarators in source order
fn split_declaration(var: VarDecl, fields: &HashSet<String>, out: &mut Vec<Stmt>) {
    let kind = var.kind;
    let mut run = Vec::new();
    for declarator in var.decls {
        let field = match &declarator.name {
            Pattern::Ident(name) if fields.contains(name) => Some(name.clone()),
            _ => None,
        };
        let Some(field) = field else {
            run.push(declarator);
            continue;
        };
        flush_declarators(kind, &mut run, out);
        if let Some(init) = declarator.init {
            out.push(Stmt::Expr(Expr::assign(Expr::member(Expr::This, field), init)));
        }
    }
    flush_declarators(kind, &mut run, out);
}

fn flush_declarators(kind: VarKind, run: &mut Vec<VarDeclarator>, out: &mut Vec<Stmt>) {
    if !run.is_empty() {
        out.push(Stmt::Decl(Decl::Var(VarDecl {
            kind,
            decls: std::mem::take(run),
        })));
    }
}

/// Rewrites reads and assignments of hoisted locals to `this.name`
struct FieldRenamer<'a> {
    fields: &'a HashSet<String>,
    shadowed: Vec<HashSet<String>>,
}

impl FieldRenamer<'_> {
    fn field(&self, name: &str) -> Option<Expr> {
        let visible = self.fields.contains(name) && !self.shadowed.iter().any(|s| s.contains(name));
        visible.then(|| Expr::member(Expr::This, name))
    }

    fn with_params<F: FnOnce(&mut Self)>(&mut self, params: &[Param], f: F) {
        let mut bound = Vec::new();
        for param in params {
            param.pat.bound_names(&mut bound);
        }
        self.shadowed.push(bound.into_iter().map(str::to_string).collect());
        f(self);
        self.shadowed.pop();
    }
}

impl VisitMut for FieldRenamer<'_> {
    fn visit_mut_function(&mut self, function: &mut Function) {
        let params = function.params.clone();
        self.with_params(&params, |this| walk_mut_function(this, function));
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Ident(name) => {
                if let Some(field) = self.field(name) {
                    *expr = field;
                }
            }
            Expr::Assign { left, .. } => {
                let field = match left.as_ref() {
                    Pattern::Ident(name) => self.field(name),
                    _ => None,
                };
                if let Some(field) = field {
                    **left = Pattern::Expr(Box::new(field));
                }
                walk_mut_expr(self, expr);
            }
            Expr::Arrow(arrow) => {
                let params = arrow.params.clone();
                self.with_params(&params, |this| walk_mut_expr(this, expr));
            }
            _ => walk_mut_expr(self, expr),
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(name) = prop {
            if let Some(field) = self.field(name) {
                *prop = Prop::KeyValue {
                    key: PropKey::Ident(name.clone()),
                    value: field,
                };
                return;
            }
        }
        walk_mut_prop(self, prop);
    }
}

/// Remove matched hook statements from `stmts`, returning what matched
///
/// Only direct children are inspected; hooks nested in blocks or callbacks
/// stay where they are.
pub fn extract_hooks(stmts: &mut Vec<Stmt>, namespace: &str) -> HookMatches {
    let mut matches = HookMatches::default();
    retain_stmts(stmts, |stmt| {
        if let Some(state) = match_state(stmt, namespace) {
            matches.states.push(state);
            return false;
        }
        if let Some(effect) = match_effect(stmt, namespace) {
            matches.effects.push(effect);
            return false;
        }
        true
    });
    matches
}

/// `{ x: <initial> }` state object
#[must_use]
pub fn state_object(states: &[StateBinding], keep_initial: bool) -> Expr {
    Expr::object(states.iter().map(|s| {
        let value = if keep_initial {
            s.initial_value.clone().unwrap_or_else(Expr::null)
        } else {
            Expr::null()
        };
        (s.state_name.clone(), value)
    }))
}

/// Rewrites state reads and setter calls inside class members
///
/// Names rebound by the parameters of a nested function are left alone.
#[derive(Debug)]
pub struct StateRewriter<'a> {
    states: &'a [StateBinding],
    shadowed: Vec<HashSet<String>>,
}

impl<'a> StateRewriter<'a> {
    /// Create rewriter for the given bindings
    #[must_use]
    pub fn new(states: &'a [StateBinding]) -> Self {
        Self {
            states,
            shadowed: Vec::new(),
        }
    }

    fn is_shadowed(&self, name: &str) -> bool {
        self.shadowed.iter().any(|scope| scope.contains(name))
    }

    fn state(&self, name: &str) -> Option<&'a StateBinding> {
        self.states
            .iter()
            .find(|s| s.state_name == name)
            .filter(|_| !self.is_shadowed(name))
    }

    fn setter(&self, name: &str) -> Option<&'a StateBinding> {
        self.states
            .iter()
            .find(|s| s.setter_name == name)
            .filter(|_| !self.is_shadowed(name))
    }

    fn with_params<F: FnOnce(&mut Self)>(&mut self, params: &[Param], f: F) {
        let mut bound = Vec::new();
        for param in params {
            param.pat.bound_names(&mut bound);
        }
        let scope = bound.into_iter().map(str::to_string).collect();
        self.shadowed.push(scope);
        f(self);
        self.shadowed.pop();
    }

    /// `this.setState({ x: value })` or, for a function updater,
    /// `this.setState((state) => ({ x: (f)(state.x) }))`
    fn set_state(binding: &StateBinding, value: Expr) -> Expr {
        let set_state = Expr::member(Expr::This, "setState");
        let arg = match value.unparen() {
            updater @ (Expr::Arrow(_) | Expr::Function(_)) => {
                let applied = Expr::call(
                    Expr::paren(updater.clone()),
                    vec![Expr::member(Expr::ident("state"), binding.state_name.clone())],
                );
                Expr::arrow(
                    vec![Param::ident("state")],
                    ArrowBody::Expr(Box::new(Expr::object([(binding.state_name.clone(), applied)]))),
                )
            }
            _ => Expr::object([(binding.state_name.clone(), value)]),
        };
        Expr::call(set_state, vec![arg])
    }
}

impl VisitMut for StateRewriter<'_> {
    fn visit_mut_function(&mut self, function: &mut Function) {
        let params = function.params.clone();
        self.with_params(&params, |this| walk_mut_function(this, function));
    }

    fn visit_mut_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Ident(name) => {
                if let Some(state) = self.state(name) {
                    *expr = Expr::this_state_field(state.state_name.clone());
                } else if let Some(binding) = self.setter(name) {
                    // Setter passed by reference, e.g. `onChange={setValue}`
                    *expr = Expr::arrow(
                        vec![Param::ident("value")],
                        ArrowBody::Expr(Box::new(Self::set_state(binding, Expr::ident("value")))),
                    );
                }
            }
            Expr::Call { callee, args, .. } if args.len() <= 1 => {
                let binding = callee.as_ident().and_then(|name| self.setter(name));
                match binding {
                    Some(binding) => {
                        for arg in args.iter_mut() {
                            self.visit_mut_expr(arg);
                        }
                        let value = args.pop().unwrap_or_else(|| Expr::ident("undefined"));
                        *expr = Self::set_state(binding, value);
                    }
                    None => walk_mut_expr(self, expr),
                }
            }
            Expr::Arrow(arrow) => {
                let params = arrow.params.clone();
                self.with_params(&params, |this| walk_mut_expr(this, expr));
            }
            _ => walk_mut_expr(self, expr),
        }
    }

    fn visit_mut_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(name) = prop {
            if let Some(state) = self.state(name) {
                *prop = Prop::KeyValue {
                    key: PropKey::Ident(state.state_name.clone()),
                    value: Expr::this_state_field(state.state_name.clone()),
                };
                return;
            }
        }
        walk_mut_prop(self, prop);
    }
}
