//! `fix-nextjs-imports`: page-level import and export fixups

use std::collections::HashSet;

use remodel_syntax::visit::walk_jsx_element;
use remodel_syntax::{Decl, DefaultDecl, ImportSpecifier, JsxElement, Program, Stmt, Visit};

use crate::error::RuleError;
use crate::imports::{ensure_named, local_bindings, sort_named};
use crate::rule::{Outcome, Rule, RuleContext};

/// Named imports a custom document needs
const DOCUMENT_IMPORTS: [&str; 5] = ["Document", "Html", "Head", "Main", "NextScript"];

/// Library components added to the library import when used in JSX
const COMMON_COMPONENTS: [&str; 13] = [
    "Button",
    "Typography",
    "Paper",
    "Grid",
    "TextField",
    "AppBar",
    "Toolbar",
    "IconButton",
    "Drawer",
    "List",
    "ListItem",
    "ListItemText",
    "ListItemIcon",
];

/// Fixes `_document`/`_app` imports, turns page modules' named exports into
/// default exports and tidies the component library import
#[derive(Debug, Default, Clone, Copy)]
pub struct FixNextjsImports;

impl Rule for FixNextjsImports {
    fn name(&self) -> &'static str {
        "fix-nextjs-imports"
    }

    fn description(&self) -> &'static str {
        "Add next/document and next/app imports, default-export pages, tidy library imports"
    }

    fn apply(&self, program: &mut Program, ctx: &RuleContext<'_>) -> Result<Outcome, RuleError> {
        let mut changed = false;
        match ctx.logical_name() {
            "_document" => {
                for name in DOCUMENT_IMPORTS {
                    changed |= ensure_named(program, "next/document", name);
                }
            }
            "_app" => changed |= ensure_named(program, "next/app", "AppProps"),
            name if !name.starts_with('_') && name != "index" => {
                changed |= default_export_first_named(program);
            }
            _ => {}
        }
        changed |= tidy_library_import(program, &ctx.config().ui_library_module);
        Ok(Outcome::from_changed(changed))
    }
}

fn has_default_export(program: &Program) -> bool {
    program.body.iter().any(|stmt| match stmt {
        Stmt::ExportDefault(_) => true,
        // `export { Foo as default }` stays unmodelled
        Stmt::Verbatim(raw) => {
            raw.text.starts_with("export")
                && raw
                    .text
                    .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                    .any(|token| token == "default")
        }
        _ => false,
    })
}

/// Turn the first exported function or class declaration into the default
/// export, unless the module already has one
fn default_export_first_named(program: &mut Program) -> bool {
    if has_default_export(program) {
        return false;
    }
    let target = program.body.iter().position(|stmt| {
        matches!(
            stmt,
            Stmt::ExportDecl(Decl::Function(_) | Decl::Class(_))
        )
    });
    let Some(index) = target else {
        return false;
    };
    let stmt = std::mem::replace(&mut program.body[index], Stmt::Empty);
    program.body[index] = match stmt {
        Stmt::ExportDecl(Decl::Function(func)) => Stmt::ExportDefault(DefaultDecl::Function(func)),
        Stmt::ExportDecl(Decl::Class(class)) => Stmt::ExportDefault(DefaultDecl::Class(class)),
        other => other,
    };
    tracing::debug!(index, "named export turned into default export");
    true
}

/// Component element names used anywhere in JSX
#[derive(Default)]
struct JsxNames(HashSet<String>);

impl Visit for JsxNames {
    fn visit_jsx_element(&mut self, element: &JsxElement) {
        self.0.insert(element.name.clone());
        walk_jsx_element(self, element);
    }
}

/// Add used-but-missing common components to the first import from the
/// library and sort its named specifiers
fn tidy_library_import(program: &mut Program, module: &str) -> bool {
    let Some(index) = program
        .imports()
        .find(|(_, decl)| decl.source == module && !decl.has_namespace())
        .map(|(i, _)| i)
    else {
        return false;
    };

    let mut used = JsxNames::default();
    used.visit_program(program);
    let bound = local_bindings(program);
    let missing: Vec<&str> = COMMON_COMPONENTS
        .into_iter()
        .filter(|name| used.0.contains(*name) && !bound.contains(*name))
        .collect();

    let Stmt::Import(decl) = &mut program.body[index] else {
        return false;
    };
    for name in &missing {
        decl.specifiers.push(ImportSpecifier::named(*name));
    }
    if !missing.is_empty() {
        tracing::debug!(module, added = ?missing, "added library component imports");
    }
    let sorted = sort_named(decl);
    !missing.is_empty() || sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use pretty_assertions::assert_eq;
    use remodel_syntax::{parse, print, Language, PrintOptions};
    use std::path::Path;

    fn run(path: &str, source: &str) -> (Outcome, String) {
        let config = RuleConfig::default();
        let mut program = parse(source, Language::JavaScript).expect("parse");
        let ctx = RuleContext::new(Path::new(path), &config);
        let outcome = FixNextjsImports.apply(&mut program, &ctx).expect("apply");
        (outcome, print(&program, &PrintOptions::default()).expect("print"))
    }

    #[test]
    fn document_gets_all_five_imports() {
        let (outcome, out) = run(
            "pages/_document.js",
            "class MyDocument extends Document {\n  render() {\n    return <Html />;\n  }\n}\n\nexport default MyDocument;\n",
        );
        assert_eq!(outcome, Outcome::Changed);
        assert!(out.starts_with(
            "import { Document, Html, Head, Main, NextScript } from 'next/document';\n\nclass MyDocument"
        ));
    }

    #[test]
    fn document_default_import_is_not_duplicated() {
        let (_, out) = run(
            "_document.page.js",
            "import Document from 'next/document';\n\nexport default class D extends Document {}\n",
        );
        assert!(out.starts_with(
            "import Document, { Html, Head, Main, NextScript } from 'next/document';\n"
        ));
    }

    #[test]
    fn app_gets_app_props() {
        let (_, out) = run(
            "_app.tsx",
            "export default function App({ Component, pageProps }) {\n  return <Component {...pageProps} />;\n}\n",
        );
        assert!(out.starts_with("import { AppProps } from 'next/app';\n"));
    }

    #[test]
    fn page_named_export_becomes_default() {
        let (outcome, out) = run("widget.js", "export function Bar() {\n  return null;\n}\n");
        assert_eq!(outcome, Outcome::Changed);
        assert_eq!(out, "export default function Bar() {\n  return null;\n}\n");
    }

    #[test]
    fn only_one_default_export() {
        let source = "export function A() {}\n\nexport class B {}\n";
        let (_, out) = run("page.js", source);
        assert_eq!(out, "export default function A() {}\n\nexport class B {}\n");
        let (outcome, _) = run("page.js", &out);
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn index_and_private_modules_keep_named_exports() {
        let source = "export function Bar() {}\n";
        assert_eq!(run("index.js", source).0, Outcome::Unchanged);
        assert_eq!(run("_helpers.js", source).0, Outcome::Unchanged);
        let (outcome, _) = run("x.js", "function A() {}\nexport { A as default };\nexport function B() {}\n");
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn library_import_is_sorted_and_completed() {
        let (_, out) = run(
            "index.js",
            "import { Typography, Button } from '@material-ui/core';\n\nexport default function A() {\n  return <Paper><Button /><Typography /></Paper>;\n}\n",
        );
        assert!(out.starts_with("import { Button, Paper, Typography } from '@material-ui/core';\n"));
    }

    #[test]
    fn library_import_is_never_created() {
        let (outcome, _) = run("index.js", "export default () => <Button />;\n");
        assert_eq!(outcome, Outcome::Unchanged);
    }
}
