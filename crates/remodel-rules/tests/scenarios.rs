//! End-to-end rule scenarios over parsed fixtures

use std::path::Path;

use pretty_assertions::assert_eq;
use remodel_rules::{
    AddMuiPropTypes, FixNextjsImports, FixReactImports, FunctionalToClass, HooksToLifecycle,
    Outcome, Rule, RuleConfig, RuleContext, RuleRegistry,
};
use remodel_syntax::{ClassMember, Expr, Prop, Stmt};
use remodel_test_utils::{
    assert_contains_in_order, assert_reparses, normalize_ws, parse_js, print_default,
    CLASS_WITH_HOOKS, DOCUMENT_PAGE, FUNCTION_COMPONENT, FUNCTION_COMPONENT_AS_CLASS,
    LIBRARY_FORM, LIBRARY_FORM_PROPS, NAMED_EXPORT_PAGE,
};

fn apply(rule: &dyn Rule, path: &str, source: &str) -> (Outcome, String) {
    let config = RuleConfig::default();
    let ctx = RuleContext::new(Path::new(path), &config);
    let mut program = parse_js(source);
    let outcome = rule.apply(&mut program, &ctx).expect("rule applies");
    let text = print_default(&program);
    assert_reparses(&text);
    (outcome, text)
}

#[test]
fn function_component_becomes_class() {
    let (outcome, out) = apply(&FunctionalToClass, "Foo.js", FUNCTION_COMPONENT);
    assert_eq!(outcome, Outcome::Changed);
    assert_eq!(out, FUNCTION_COMPONENT_AS_CLASS);
}

#[test]
fn document_gets_one_new_first_import() {
    let (_, out) = apply(&FixNextjsImports, "pages/_document.js", DOCUMENT_PAGE);
    let program = parse_js(&out);
    let imports: Vec<_> = program.imports().collect();
    assert_eq!(imports.len(), 1);
    let (index, decl) = imports[0];
    assert_eq!(index, 0);
    assert_eq!(decl.source, "next/document");
    assert_eq!(
        decl.local_names().collect::<Vec<_>>(),
        vec!["Document", "Html", "Head", "Main", "NextScript"]
    );
}

#[test]
fn library_components_get_prop_types() {
    let (outcome, out) = apply(&AddMuiPropTypes, "Form.js", LIBRARY_FORM);
    assert_eq!(outcome, Outcome::Changed);

    let program = parse_js(&out);
    assert!(program.imports().any(|(_, d)| d.source == "prop-types"
        && d.local_names().collect::<Vec<_>>() == ["PropTypes"]));

    let class = program.classes().next().expect("class");
    let value = class
        .body
        .iter()
        .find_map(|m| match m {
            ClassMember::Property(p) if p.is_static && p.key.is_named("propTypes") => {
                p.value.as_ref()
            }
            _ => None,
        })
        .expect("propTypes field");
    let Expr::Object(props) = value else {
        panic!("propTypes is not an object");
    };
    let mut keys = Vec::new();
    for prop in props {
        let Prop::KeyValue { key, value } = prop else {
            panic!("unexpected propTypes entry");
        };
        assert_eq!(value, &Expr::member(Expr::ident("PropTypes"), "any"));
        keys.push(key.static_name().expect("static key"));
    }
    assert_eq!(keys, LIBRARY_FORM_PROPS);
}

#[test]
fn page_named_export_becomes_default() {
    let (_, out) = apply(&FixNextjsImports, "components/widget.js", NAMED_EXPORT_PAGE);
    assert!(out.starts_with("export default function Bar() {"));
    assert!(matches!(parse_js(&out).body[0], Stmt::ExportDefault(_)));
}

#[test]
fn class_hooks_move_into_lifecycle() {
    let (outcome, out) = apply(&HooksToLifecycle, "Timer.js", CLASS_WITH_HOOKS);
    assert_eq!(outcome, Outcome::Changed);
    let flat = normalize_ws(&out);
    assert_contains_in_order(
        &flat,
        &[
            "constructor(props) { super(props); this.state = { ticks: 0 }; }",
            "componentDidMount() { this.started = Date.now(); this.id = setInterval(",
            "this.setState((state) => ({ ticks: ((t) => t + 1)(state.ticks) }))",
            "componentWillUnmount() { clearInterval(this.id); }",
            "render() { return <span>{this.state.ticks}</span>; }",
        ],
    );
    assert!(!out.contains("useState"));
    assert!(!out.contains("useEffect"));

    let (again, twice) = apply(&HooksToLifecycle, "Timer.js", &out);
    assert_eq!(again, Outcome::Unchanged);
    assert_eq!(twice, out);
}

#[test]
fn conversion_then_import_fix() {
    let source = format!("import React, {{ useState, useEffect }} from 'react';\n\n{FUNCTION_COMPONENT}");
    let (_, converted) = apply(&FunctionalToClass, "Foo.js", &source);
    let (outcome, fixed) = apply(&FixReactImports, "Foo.js", &converted);
    assert_eq!(outcome, Outcome::Changed);
    assert!(fixed.starts_with("import React, { Component } from 'react';\n\nclass Foo extends React.Component {"));
}

#[test]
fn every_rule_leaves_unrelated_code_alone() {
    let source = "import { join } from 'path';\n\nconst a = join('x', 'y');\n\nfunction plain(n) {\n  return n * 2;\n}\n";
    let registry = RuleRegistry::with_defaults();
    for rule in registry.iter() {
        let (outcome, out) = apply(rule, "util.js", source);
        assert_eq!(outcome, Outcome::Unchanged, "{}", rule.name());
        assert_eq!(out, source, "{}", rule.name());
    }
}
