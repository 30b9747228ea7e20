//! `add-mui-prop-types`: annotate class components with the props of the
//! library components they render

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use remodel_syntax::visit::walk_jsx_element;
use remodel_syntax::{
    ClassDecl, ClassMember, Expr, ImportSpecifier, JsxElement, Program, Stmt, Visit,
};

use crate::config::RuleConfig;
use crate::error::RuleError;
use crate::imports::{ensure_default, imports_matching};
use crate::rule::{Outcome, Rule, RuleContext};

/// Adds (or replaces) `static propTypes` on classes whose `render` uses
/// components from the UI library
#[derive(Debug, Default, Clone, Copy)]
pub struct AddMuiPropTypes;

impl Rule for AddMuiPropTypes {
    fn name(&self) -> &'static str {
        "add-mui-prop-types"
    }

    fn description(&self) -> &'static str {
        "Add static propTypes for UI library components rendered by class components"
    }

    fn apply(&self, program: &mut Program, ctx: &RuleContext<'_>) -> Result<Outcome, RuleError> {
        let config = ctx.config();
        let library = LibraryBindings::collect(program, &config.ui_library_module);
        if library.is_empty() {
            return Ok(Outcome::Unchanged);
        }

        let targets: Vec<(usize, IndexSet<String>)> = program
            .body
            .iter()
            .enumerate()
            .filter_map(|(index, stmt)| {
                let props = expected_props(stmt.as_class()?, &library, config);
                (!props.is_empty()).then_some((index, props))
            })
            .collect();
        if targets.is_empty() {
            return Ok(Outcome::Unchanged);
        }

        let before = program.body.len();
        let (local, mut changed) = ensure_default(
            program,
            &config.prop_types_module,
            &config.prop_types_namespace,
        );
        // A new import declaration lands above every class
        let shift = program.body.len() - before;
        for (index, props) in targets {
            let value = Expr::object(
                props
                    .into_iter()
                    .map(|prop| (prop, Expr::member(Expr::ident(local.clone()), "any"))),
            );
            let Some(class) = program.body.get_mut(index + shift).and_then(Stmt::as_class_mut) else {
                continue;
            };
            changed |= attach_prop_types(class, value);
        }
        Ok(Outcome::from_changed(changed))
    }
}

/// How library components are reachable in this file
#[derive(Debug, Default)]
struct LibraryBindings {
    /// Local name → component name
    components: HashMap<String, String>,
    /// Namespace imports (`import * as Mui from ...`)
    namespaces: HashSet<String>,
}

impl LibraryBindings {
    fn collect(program: &Program, module: &str) -> Self {
        let mut bindings = Self::default();
        for (_, decl) in imports_matching(program, module) {
            if decl.type_only {
                continue;
            }
            for spec in &decl.specifiers {
                match spec {
                    ImportSpecifier::Named { imported, .. } => {
                        bindings
                            .components
                            .insert(spec.local_name().to_string(), imported.clone());
                    }
                    // `import Button from '@material-ui/core/Button'`
                    ImportSpecifier::Default(local) if decl.source != module => {
                        bindings.components.insert(local.clone(), local.clone());
                    }
                    ImportSpecifier::Namespace(local) => {
                        bindings.namespaces.insert(local.clone());
                    }
                    ImportSpecifier::Default(_) => {}
                }
            }
        }
        bindings
    }

    fn is_empty(&self) -> bool {
        self.components.is_empty() && self.namespaces.is_empty()
    }

    /// Library component an element name refers to
    fn resolve<'a>(&'a self, element: &'a str) -> Option<&'a str> {
        if let Some(component) = self.components.get(element) {
            return Some(component.as_str());
        }
        let (namespace, member) = element.split_once('.')?;
        (self.namespaces.contains(namespace) && !member.contains('.')).then_some(member)
    }
}

/// Element names in order of first appearance
#[derive(Default)]
struct ElementOrder(IndexSet<String>);

impl Visit for ElementOrder {
    fn visit_jsx_element(&mut self, element: &JsxElement) {
        self.0.insert(element.name.clone());
        walk_jsx_element(self, element);
    }
}

/// Union of the expected props of every library component `render` uses
fn expected_props(
    class: &ClassDecl,
    library: &LibraryBindings,
    config: &RuleConfig,
) -> IndexSet<String> {
    let Some(render) = class.method("render") else {
        return IndexSet::new();
    };
    let mut elements = ElementOrder::default();
    elements.visit_function(&render.function);

    let mut props = IndexSet::new();
    for name in &elements.0 {
        if let Some(component) = library.resolve(name) {
            props.extend(config.props_for(component).into_iter().map(str::to_string));
        }
    }
    props
}

/// Replace or append `static propTypes`, returning whether the class changed
fn attach_prop_types(class: &mut ClassDecl, value: Expr) -> bool {
    let existing = class.body.iter_mut().find_map(|member| match member {
        ClassMember::Property(prop) if prop.is_static && prop.key.is_named("propTypes") => {
            Some(prop)
        }
        _ => None,
    });
    match existing {
        Some(prop) if prop.value.as_ref() == Some(&value) => false,
        Some(prop) => {
            prop.value = Some(value);
            true
        }
        None => {
            class
                .body
                .push(ClassMember::static_property("propTypes", value));
            true
        }
    }
}
