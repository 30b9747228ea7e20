//! `fix-react-imports`: make framework imports match their usage

use remodel_syntax::visit::{walk_expr, walk_jsx_element};
use remodel_syntax::{Expr, ImportSpecifier, JsxElement, Program, Stmt, Visit};

use crate::error::RuleError;
use crate::imports::{ensure_named, referenced_names};
use crate::rule::{Outcome, Rule, RuleContext};

/// Narrows unused framework imports and adds `Component` for classes that
/// extend `<namespace>.Component`
#[derive(Debug, Default, Clone, Copy)]
pub struct FixReactImports;

impl Rule for FixReactImports {
    fn name(&self) -> &'static str {
        "fix-react-imports"
    }

    fn description(&self) -> &'static str {
        "Drop unused React imports and import Component for class components"
    }

    fn apply(&self, program: &mut Program, ctx: &RuleContext<'_>) -> Result<Outcome, RuleError> {
        let config = ctx.config();
        let mut changed = false;

        let mut usage = Usage::new(&config.react_namespace);
        usage.visit_program(program);
        if !usage.jsx && !usage.namespace_call {
            changed |= narrow_imports(program, &config.react_module);
        }

        let extends_component = program
            .classes()
            .any(|class| class.extends_member(&config.react_namespace, "Component"));
        if extends_component {
            changed |= ensure_named(program, &config.react_module, "Component");
        }
        Ok(Outcome::from_changed(changed))
    }
}

/// Keep only `Component` (when classes exist) and referenced bindings
fn narrow_imports(program: &mut Program, module: &str) -> bool {
    let has_classes = program.classes().next().is_some();
    let referenced = referenced_names(program);
    let mut changed = false;
    program.retain_stmts(|stmt| {
        let Stmt::Import(decl) = stmt else {
            return true;
        };
        if decl.source != module || decl.specifiers.is_empty() {
            return true;
        }
        let before = decl.specifiers.len();
        decl.specifiers.retain(|spec| {
            let keep_component = has_classes
                && matches!(spec, ImportSpecifier::Named { imported, .. } if imported == "Component");
            keep_component || referenced.contains(spec.local_name())
        });
        if decl.specifiers.len() != before {
            tracing::debug!(
                module,
                removed = before - decl.specifiers.len(),
                "narrowed unused framework import"
            );
            changed = true;
        }
        !decl.specifiers.is_empty()
    });
    changed
}

/// Whether a file renders JSX or calls the framework namespace directly
struct Usage<'a> {
    namespace: &'a str,
    jsx: bool,
    namespace_call: bool,
}

impl<'a> Usage<'a> {
    fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            jsx: false,
            namespace_call: false,
        }
    }
}

impl Visit for Usage<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::JsxFragment(_) => self.jsx = true,
            Expr::Call { callee, .. } => {
                let target = match callee.as_ref() {
                    Expr::Member { obj, .. } => obj.as_ref(),
                    other => other,
                };
                if target.as_ident() == Some(self.namespace) {
                    self.namespace_call = true;
                }
            }
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_jsx_element(&mut self, element: &JsxElement) {
        self.jsx = true;
        walk_jsx_element(self, element);
    }

    fn visit_raw(&mut self, text: &str) {
        if text.contains("</") || text.contains("/>") {
            self.jsx = true;
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

    fn run(source: &str) -> (Outcome, String) {
        let config = RuleConfig::default();
        let mut program = parse(source, Language::JavaScript).expect("parse");
        let ctx = RuleContext::new(Path::new("util.js"), &config);
        let outcome = FixReactImports.apply(&mut program, &ctx).expect("apply");
        (outcome, print(&program, &PrintOptions::default()).expect("print"))
    }

    #[test]
    fn removes_unused_import_without_jsx() {
        let (outcome, out) =
            run("import React, { useState } from 'react';\nexport const add = (a, b) => a + b;\n");
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(out, "export const add = (a, b) => a + b;\n");
    }

    #[test]
    fn narrows_to_component_when_classes_exist() {
        let (_, out) = run(
            "import React, { Component, useState } from 'react';\nclass Store extends Component {}\n",
        );
        assert_eq!(
            out,
            "import { Component } from 'react';\n\nclass Store extends Component {}\n"
        );
    }

    #[test]
    fn keeps_referenced_bindings() {
        let (_, out) = run(
            "import React, { useMemo } from 'react';\nexport const f = () => useMemo(() => 1, []);\n",
        );
        assert!(out.starts_with("import { useMemo } from 'react';\n"));
    }

    #[test]
    fn jsx_and_namespace_calls_keep_imports() {
        let (outcome, _) = run("import React from 'react';\nconst el = <div />;\n");
        assert_eq!(outcome, Outcome::Unchanged);
        let (outcome, _) = run("import React from 'react';\nconst el = React.createElement('div');\n");
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn side_effect_import_is_untouched() {
        let (outcome, _) = run("import 'react';\nrun();\n");
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn adds_component_for_namespace_superclass() {
        let (_, out) = run(
            "import React from 'react';\nclass A extends React.Component {\n  render() {\n    return <div />;\n  }\n}\n",
        );
        assert!(out.starts_with("import React, { Component } from 'react';\n"));
    }

    #[test]
    fn namespace_import_gets_a_separate_declaration() {
        let (_, out) = run(
            "import * as React from 'react';\nclass A extends React.Component {\n  render() {\n    return <div />;\n  }\n}\n",
        );
        assert!(out.starts_with(
            "import { Component } from 'react';\nimport * as React from 'react';\n"
        ));
    }
}
