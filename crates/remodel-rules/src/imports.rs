//! Import normalizer
//!
//! Shared helpers for querying and editing import declarations. Every
//! mutating helper returns whether it changed the tree and refuses to bind a
//! local name that is already bound at module level.

use std::collections::HashSet;

use remodel_syntax::visit::{walk_expr, walk_jsx_element, walk_prop};
use remodel_syntax::{
    Decl, DefaultDecl, Expr, ImportDecl, ImportSpecifier, JsxElement, Lit, Program, Prop, Stmt,
    Visit,
};

/// Imports whose module path equals `module`
pub fn imports_from<'a>(
    program: &'a Program,
    module: &'a str,
) -> impl Iterator<Item = (usize, &'a ImportDecl)> + 'a {
    program.imports().filter(move |(_, decl)| decl.source == module)
}

/// Imports whose module path contains `needle`
pub fn imports_matching<'a>(
    program: &'a Program,
    needle: &'a str,
) -> impl Iterator<Item = (usize, &'a ImportDecl)> + 'a {
    program
        .imports()
        .filter(move |(_, decl)| decl.source.contains(needle))
}

/// Names bound at module level (imports, declarations, variables)
#[must_use]
pub fn local_bindings(program: &Program) -> HashSet<String> {
    let mut names = HashSet::new();
    for stmt in &program.body {
        match stmt {
            Stmt::Import(import) => names.extend(import.local_names().map(str::to_string)),
            Stmt::Decl(decl) | Stmt::ExportDecl(decl) => match decl {
                Decl::Function(func) => names.extend(func.name.clone()),
                Decl::Class(class) => names.extend(class.name.clone()),
                Decl::Var(var) => {
                    let mut bound = Vec::new();
                    for declarator in &var.decls {
                        declarator.name.bound_names(&mut bound);
                    }
                    names.extend(bound.into_iter().map(str::to_string));
                }
            },
            Stmt::ExportDefault(DefaultDecl::Function(func)) => names.extend(func.name.clone()),
            Stmt::ExportDefault(DefaultDecl::Class(class)) => names.extend(class.name.clone()),
            _ => {}
        }
    }
    names
}

/// Check whether `name` is bound at module level
#[must_use]
pub fn is_bound(program: &Program, name: &str) -> bool {
    local_bindings(program).contains(name)
}

/// Check whether some import from `module` brings in `imported` by name
#[must_use]
pub fn has_named(program: &Program, module: &str, imported: &str) -> bool {
    imports_from(program, module).any(|(_, decl)| decl.named(imported).is_some())
}

/// Index where a new import goes: first, after directives and a hashbang
fn insertion_index(program: &Program) -> usize {
    program
        .body
        .iter()
        .take_while(|stmt| match stmt {
            Stmt::Expr(Expr::Lit(Lit::Str(_))) | Stmt::TrailingComment(_) => true,
            Stmt::Verbatim(raw) => raw.text.starts_with("#!"),
            _ => false,
        })
        .count()
}

/// Insert a new import declaration at the top of the file
pub fn insert_import(program: &mut Program, decl: ImportDecl) {
    let at = insertion_index(program);
    program.body.insert(at, Stmt::Import(decl));
}

fn import_mut(program: &mut Program, index: usize) -> Option<&mut ImportDecl> {
    match program.body.get_mut(index) {
        Some(Stmt::Import(decl)) => Some(decl),
        _ => None,
    }
}

/// Guarantee a named import of `name` from `module`
///
/// Adds the specifier to the first value import from `module` that has no
/// namespace binding, or inserts a new declaration first in the file.
pub fn ensure_named(program: &mut Program, module: &str, name: &str) -> bool {
    if has_named(program, module, name) || is_bound(program, name) {
        return false;
    }
    let target = imports_from(program, module)
        .find(|(_, decl)| !decl.has_namespace() && !decl.type_only)
        .map(|(i, _)| i);
    match target.and_then(|i| import_mut(program, i)) {
        Some(decl) => decl.specifiers.push(ImportSpecifier::named(name)),
        None => insert_import(program, ImportDecl::new(module, vec![ImportSpecifier::named(name)])),
    }
    tracing::debug!(module, name, "added named import");
    true
}

/// Guarantee a default (or namespace) binding for `module`
///
/// Returns the local name to reference the module through and whether the
/// tree changed. An existing default or namespace binding is reused; a new
/// binding uses `preferred`, suffixed with a number when that name is taken.
pub fn ensure_default(program: &mut Program, module: &str, preferred: &str) -> (String, bool) {
    let existing = imports_from(program, module).find_map(|(_, decl)| {
        decl.specifiers.iter().find_map(|spec| match spec {
            ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => {
                Some(local.clone())
            }
            ImportSpecifier::Named { .. } => None,
        })
    });
    if let Some(local) = existing {
        return (local, false);
    }

    let bound = local_bindings(program);
    let local = if bound.contains(preferred) {
        (2..)
            .map(|n| format!("{preferred}{n}"))
            .find(|candidate| !bound.contains(candidate))
            .unwrap_or_else(|| preferred.to_string())
    } else {
        preferred.to_string()
    };

    let target = imports_from(program, module)
        .find(|(_, decl)| !decl.type_only)
        .map(|(i, _)| i);
    match target.and_then(|i| import_mut(program, i)) {
        Some(decl) => decl.specifiers.insert(0, ImportSpecifier::Default(local.clone())),
        None => insert_import(
            program,
            ImportDecl::new(module, vec![ImportSpecifier::Default(local.clone())]),
        ),
    }
    tracing::debug!(module, local = %local, "added default import");
    (local, true)
}

/// Sort named specifiers by imported name (case-sensitive), keeping default
/// and namespace bindings first
pub fn sort_named(decl: &mut ImportDecl) -> bool {
    let before = decl.specifiers.clone();
    decl.specifiers.sort_by(|a, b| match (a.imported_name(), b.imported_name()) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    decl.specifiers != before
}

/// Drop specifiers whose local name repeats an earlier one
pub fn dedupe(decl: &mut ImportDecl) -> bool {
    let mut seen = HashSet::new();
    let before = decl.specifiers.len();
    decl.specifiers
        .retain(|spec| seen.insert(spec.local_name().to_string()));
    decl.specifiers.len() != before
}

/// Deduplicate local names across every import of the file
///
/// Later duplicates are dropped; a declaration emptied this way is removed,
/// side-effect imports are kept as they are.
pub fn dedupe_program(program: &mut Program) -> bool {
    let mut seen = HashSet::new();
    let mut changed = false;
    program.retain_stmts(|stmt| {
        let Stmt::Import(decl) = stmt else {
            return true;
        };
        if decl.specifiers.is_empty() {
            return true;
        }
        let before = decl.specifiers.len();
        decl.specifiers
            .retain(|spec| seen.insert(spec.local_name().to_string()));
        changed |= decl.specifiers.len() != before;
        !decl.specifiers.is_empty()
    });
    changed
}

/// Names referenced outside import declarations
///
/// Covers identifier references, shorthand properties, JSX element roots and
/// identifier-like tokens inside raw text, so it errs on the side of keeping
/// an import.
#[must_use]
pub fn referenced_names(program: &Program) -> HashSet<String> {
    let mut collector = References::default();
    collector.visit_program(program);
    collector.names
}

#[derive(Default)]
struct References {
    names: HashSet<String>,
}

impl Visit for References {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Ident(name) = expr {
            self.names.insert(name.clone());
        }
        walk_expr(self, expr);
    }

    fn visit_prop(&mut self, prop: &Prop) {
        if let Prop::Shorthand(name) = prop {
            self.names.insert(name.clone());
        }
        walk_prop(self, prop);
    }

    fn visit_jsx_element(&mut self, element: &JsxElement) {
        if element.is_component() {
            self.names.insert(element.root_name().to_string());
        }
        walk_jsx_element(self, element);
    }

    fn visit_raw(&mut self, text: &str) {
        self.names.extend(
            text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .filter(|token| remodel_syntax::is_identifier(token))
                .map(str::to_string),
        );
    }
}
