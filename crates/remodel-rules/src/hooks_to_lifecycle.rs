//! `hooks-to-lifecycle`: hooks left inside class methods become lifecycle
//! methods and instance state

use remodel_syntax::{
    ClassDecl, ClassMember, Expr, Method, MethodKind, Param, Pattern, Program, Prop, Stmt,
    VisitMut,
};

use crate::error::RuleError;
use crate::hooks::{extract_hooks, state_object, HookMatches, StateBinding, StateRewriter};
use crate::rule::{Outcome, Rule, RuleContext};

const RULE: &str = "hooks-to-lifecycle";

/// Moves mount-only effects into `componentDidMount`/`componentWillUnmount`
/// and state hooks into the instance state of the enclosing class
#[derive(Debug, Default, Clone, Copy)]
pub struct HooksToLifecycle;

impl Rule for HooksToLifecycle {
    fn name(&self) -> &'static str {
        RULE
    }

    fn description(&self) -> &'static str {
        "Replace hook calls inside class components with lifecycle methods and this.state"
    }

    fn apply(&self, program: &mut Program, ctx: &RuleContext<'_>) -> Result<Outcome, RuleError> {
        let namespace = &ctx.config().react_namespace;
        let mut outcome = Outcome::Unchanged;
        for class in program.classes_mut() {
            let hooks = take_hooks(class, namespace);
            if hooks.is_empty() {
                continue;
            }
            tracing::debug!(
                class = class.name.as_deref().unwrap_or_default(),
                states = hooks.states.len(),
                effects = hooks.effects.len(),
                "moving hooks into lifecycle"
            );

            if !hooks.effects.is_empty() {
                append_lifecycle(class, "componentDidMount", hooks.mount_body());
            }
            if hooks.effects.iter().any(|e| e.cleanup.is_some()) {
                append_lifecycle(class, "componentWillUnmount", hooks.cleanup_body());
            }
            if !hooks.states.is_empty() {
                merge_state(class, &hooks.states)?;
                rewrite_members(class, &hooks.states);
            }
            outcome = Outcome::Changed;
        }
        Ok(outcome)
    }
}

/// Remove hook statements from every non-constructor method body
fn take_hooks(class: &mut ClassDecl, namespace: &str) -> HookMatches {
    let mut hooks = HookMatches::default();
    for member in &mut class.body {
        if let ClassMember::Method(method) = member {
            if method.kind != MethodKind::Constructor && !method.is_static {
                hooks.extend(extract_hooks(&mut method.function.body, namespace));
            }
        }
    }
    hooks
}

/// Where new lifecycle methods go: before `render`, else last
fn lifecycle_slot(class: &ClassDecl) -> usize {
    class
        .body
        .iter()
        .position(|m| matches!(m, ClassMember::Method(method) if !method.is_static && method.key.is_named("render")))
        .unwrap_or(class.body.len())
}

/// Append to an existing lifecycle method or create it
fn append_lifecycle(class: &mut ClassDecl, name: &str, body: Vec<Stmt>) {
    match class.method_mut(name) {
        Some(method) => method.function.body.extend(body),
        None => {
            let at = lifecycle_slot(class);
            class.body.insert(at, ClassMember::Method(Method::new(name, body)));
        }
    }
}

/// Add state keys not yet present in an object literal
fn add_missing_keys(props: &mut Vec<Prop>, states: &[StateBinding]) {
    let present: Vec<String> = props
        .iter()
        .filter_map(|prop| match prop {
            Prop::KeyValue { key, .. } => key.static_name().map(str::to_string),
            Prop::Shorthand(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    let missing: Vec<StateBinding> = states
        .iter()
        .filter(|s| !present.contains(&s.state_name))
        .cloned()
        .collect();
    if let Expr::Object(extra) = state_object(&missing, true) {
        props.extend(extra);
    }
}

fn is_state_assignment(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Expr(Expr::Assign { op, left, .. })
            if op == "=" && matches!(left.as_ref(), Pattern::Expr(target) if **target == Expr::this_state())
    )
}

/// Merge state bindings into the class's existing state initialisation
fn merge_state(class: &mut ClassDecl, states: &[StateBinding]) -> Result<(), RuleError> {
    if let Some(field) = class
        .property_mut("state")
        .filter(|field| !field.is_static)
    {
        return match field.value.get_or_insert_with(|| Expr::Object(Vec::new())) {
            Expr::Object(props) => {
                add_missing_keys(props, states);
                Ok(())
            }
            other => Err(RuleError::invariant(
                RULE,
                format!("state field is initialised with {}, not an object", other.kind()),
            )),
        };
    }

    let has_super = class.super_class.is_some();
    if let Some(ctor) = class.constructor_mut() {
        let body = &mut ctor.function.body;
        return match body.iter_mut().find(|stmt| is_state_assignment(stmt)) {
            Some(Stmt::Expr(Expr::Assign { right, .. })) => match right.as_mut() {
                Expr::Object(props) => {
                    add_missing_keys(props, states);
                    Ok(())
                }
                other => Err(RuleError::invariant(
                    RULE,
                    format!("this.state is assigned {}, not an object", other.kind()),
                )),
            },
            _ => {
                body.push(Stmt::expr(Expr::assign(
                    Expr::this_state(),
                    state_object(states, true),
                )));
                Ok(())
            }
        };
    }

    let mut body = Vec::with_capacity(2);
    if has_super {
        body.push(Stmt::super_call(vec![Expr::ident("props")]));
    }
    body.push(Stmt::expr(Expr::assign(
        Expr::this_state(),
        state_object(states, true),
    )));
    class.body.insert(
        0,
        ClassMember::Method(Method::constructor(vec![Param::ident("props")], body)),
    );
    Ok(())
}

fn rewrite_members(class: &mut ClassDecl, states: &[StateBinding]) {
    let mut rewriter = StateRewriter::new(states);
    for member in &mut class.body {
        match member {
            ClassMember::Method(method) if method.kind != MethodKind::Constructor => {
                rewriter.visit_mut_function(&mut method.function);
            }
            ClassMember::Property(prop) => {
                if let Some(value) = &mut prop.value {
                    rewriter.visit_mut_expr(value);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use pretty_assertions::assert_eq;
    use remodel_syntax::{parse, print, Language, PrintOptions};
    use std::path::Path;

    fn run(source: &str) -> Result<(Outcome, String), RuleError> {
        let config = RuleConfig::default();
        let mut program = parse(source, Language::JavaScript).expect("parse");
        let ctx = RuleContext::new(Path::new("Widget.js"), &config);
        let outcome = HooksToLifecycle.apply(&mut program, &ctx)?;
        Ok((outcome, print(&program, &PrintOptions::default()).expect("print")))
    }

    #[test]
    fn appends_to_existing_did_mount() {
        let (outcome, out) = run(
            "class W extends React.Component {\n  componentDidMount() {\n    first();\n  }\n\n  render() {\n    useEffect(() => {\n      second();\n    }, []);\n    return null;\n  }\n}\n",
        )
        .expect("apply");
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(
            out,
            "class W extends React.Component {\n  componentDidMount() {\n    first();\n    second();\n  }\n\n  render() {\n    return null;\n  }\n}\n"
        );
    }

    #[test]
    fn synthesizes_constructor_and_lifecycle_methods() {
        let (_, out) = run(
            "class W extends Component {\n  render() {\n    const [n, setN] = useState(1);\n    useEffect(() => {\n      const id = start();\n      return () => stop(id);\n    }, []);\n    return <b onClick={() => setN(n + 1)} />;\n  }\n}\n",
        )
        .expect("apply");
        assert_eq!(
            out,
            "class W extends Component {\n  constructor(props) {\n    super(props);\n    this.state = { n: 1 };\n  }\n\n  componentDidMount() {\n    this.id = start();\n  }\n\n  componentWillUnmount() {\n    stop(this.id);\n  }\n\n  render() {\n    return <b onClick={() => this.setState({ n: this.state.n + 1 })} />;\n  }\n}\n"
        );
    }

    #[test]
    fn merges_into_state_field_and_keeps_existing_keys() {
        let (_, out) = run(
            "class W extends Component {\n  state = { a: 1 };\n\n  render() {\n    const [a, setA] = useState(5);\n    const [b, setB] = useState();\n    return a + b;\n  }\n}\n",
        )
        .expect("apply");
        assert!(out.contains("state = { a: 1, b: null };"));
        assert!(out.contains("return this.state.a + this.state.b;"));
    }

    #[test]
    fn appends_to_constructor_assignment() {
        let (_, out) = run(
            "class W extends Component {\n  constructor(props) {\n    super(props);\n    this.state = {};\n  }\n\n  render() {\n    const [open, setOpen] = useState(false);\n    return open;\n  }\n}\n",
        )
        .expect("apply");
        assert!(out.contains("this.state = { open: false };"));
        assert_eq!(out.matches("constructor").count(), 1);
    }

    #[test]
    fn non_object_state_is_rejected() {
        let err = run(
            "class W extends Component {\n  state = makeState();\n\n  render() {\n    const [a, setA] = useState(0);\n    return a;\n  }\n}\n",
        )
        .expect_err("invariant");
        assert!(matches!(err, RuleError::Invariant { rule: RULE, .. }));
    }

    #[test]
    fn second_run_is_a_no_op() {
        let source = "class W extends Component {\n  render() {\n    const [n, setN] = useState(0);\n    useEffect(() => {\n      go();\n    }, []);\n    return n;\n  }\n}\n";
        let (_, once) = run(source).expect("first");
        let (outcome, twice) = run(&once).expect("second");
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(once, twice);
    }
}
