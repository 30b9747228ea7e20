//! `functional-to-class`: function components with hooks become classes

use remodel_syntax::{
    ClassDecl, ClassMember, Decl, DefaultDecl, Expr, FunctionDecl, Method, Param, Pattern,
    Program, Stmt, VisitMut,
};

use crate::config::RuleConfig;
use crate::error::RuleError;
use crate::hooks::{extract_hooks, state_object, HookMatches, StateRewriter};
use crate::rule::{Outcome, Rule, RuleContext};

/// Converts top-level function components that use state or mount-effect
/// hooks into `<namespace>.Component` subclasses
#[derive(Debug, Default, Clone, Copy)]
pub struct FunctionalToClass;

impl Rule for FunctionalToClass {
    fn name(&self) -> &'static str {
        "functional-to-class"
    }

    fn description(&self) -> &'static str {
        "Convert function components using useState/useEffect into class components"
    }

    fn apply(&self, program: &mut Program, ctx: &RuleContext<'_>) -> Result<Outcome, RuleError> {
        let config = ctx.config();

        // Collect first so a half-converted file is never observable
        let mut conversions = Vec::new();
        for (index, stmt) in program.body.iter().enumerate() {
            let Some(func) = component_function(stmt) else {
                continue;
            };
            if let Some(class) = convert(func, config) {
                conversions.push((index, class));
            }
        }

        let changed = !conversions.is_empty();
        for (index, class) in conversions {
            tracing::debug!(
                component = class.name.as_deref().unwrap_or_default(),
                "converted function component to class"
            );
            let stmt = &mut program.body[index];
            *stmt = match stmt {
                Stmt::ExportDecl(_) => Stmt::ExportDecl(Decl::Class(class)),
                Stmt::ExportDefault(_) => Stmt::ExportDefault(DefaultDecl::Class(class)),
                _ => Stmt::Decl(Decl::Class(class)),
            };
        }
        Ok(Outcome::from_changed(changed))
    }
}

/// Named, synchronous, top-level function declaration
fn component_function(stmt: &Stmt) -> Option<&FunctionDecl> {
    let func = stmt.as_function()?;
    let named = func.name.as_ref().is_some_and(|n| !n.is_empty());
    (named && !func.function.is_async && !func.function.is_generator).then_some(func)
}

fn convert(func: &FunctionDecl, config: &RuleConfig) -> Option<ClassDecl> {
    let mut body = func.function.body.clone();
    let hooks = extract_hooks(&mut body, &config.react_namespace);
    if hooks.is_empty() {
        return None;
    }

    let mut members = Vec::new();
    if !hooks.states.is_empty() {
        members.push(ClassMember::Method(constructor(func, &hooks, config)));
    }
    if !hooks.effects.is_empty() {
        members.push(ClassMember::Method(Method::new(
            "componentDidMount",
            hooks.mount_body(),
        )));
    }
    if hooks.effects.iter().any(|e| e.cleanup.is_some()) {
        members.push(ClassMember::Method(Method::new(
            "componentWillUnmount",
            hooks.cleanup_body(),
        )));
    }

    let mut render = Vec::with_capacity(body.len() + 1);
    if let Some(param) = func.function.params.first() {
        render.push(props_binding(param, Expr::this_props()));
    }
    render.extend(body);
    members.push(ClassMember::Method(Method::new("render", render)));

    let mut rewriter = StateRewriter::new(&hooks.states);
    for member in &mut members {
        if let ClassMember::Method(method) = member {
            if method.key.is_named("constructor") {
                continue;
            }
            rewriter.visit_mut_function(&mut method.function);
        }
    }

    Some(ClassDecl {
        name: func.name.clone(),
        super_class: Some(Expr::member(
            Expr::ident(config.react_namespace.clone()),
            "Component",
        )),
        type_params: func.function.type_params.clone(),
        body: members,
        ..ClassDecl::default()
    })
}

/// `const <param> = <source>;`, dropping a parameter default
fn props_binding(param: &Param, source: Expr) -> Stmt {
    let pattern = match &param.pat {
        Pattern::Assign { left, .. } => left.as_ref().clone(),
        other => other.clone(),
    };
    let mut stmt = Stmt::const_decl(pattern, source);
    if let Stmt::Decl(Decl::Var(var)) = &mut stmt {
        if let Some(declarator) = var.decls.first_mut() {
            declarator.type_ann.clone_from(&param.type_ann);
        }
    }
    stmt
}

/// `constructor(props) { super(props); this.state = {...}; }`
fn constructor(func: &FunctionDecl, hooks: &HookMatches, config: &RuleConfig) -> Method {
    let mut body = vec![Stmt::super_call(vec![Expr::ident("props")])];
    if config.preserve_initial_state {
        // Initial values may read the component's props
        if let Some(param) = func.function.params.first() {
            if !matches!(&param.pat, Pattern::Ident(name) if name == "props") {
                body.push(props_binding(param, Expr::ident("props")));
            }
        }
    }
    body.push(Stmt::expr(Expr::assign(
        Expr::this_state(),
        state_object(&hooks.states, config.preserve_initial_state),
    )));
    Method::constructor(vec![Param::ident("props")], body)
}
