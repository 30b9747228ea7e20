//! Remodel rewrite rules
//!
//! Source-to-source rewrites for React code bases, each a [`Rule`] over a
//! [`remodel_syntax::Program`].
//!
//! # Rules
//!
//! - [`FunctionalToClass`] (`functional-to-class`): function components with
//!   state/mount-effect hooks become `React.Component` subclasses
//! - [`HooksToLifecycle`] (`hooks-to-lifecycle`): hooks left inside class
//!   methods become lifecycle methods and instance state
//! - [`FixReactImports`] (`fix-react-imports`): framework imports follow usage
//! - [`FixNextjsImports`] (`fix-nextjs-imports`): `_document`/`_app` imports,
//!   default-exported pages, tidy component library import
//! - [`AddMuiPropTypes`] (`add-mui-prop-types`): `static propTypes` for
//!   rendered library components
//!
//! Rules are looked up by name through [`RuleRegistry`].
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use remodel_rules::{RuleConfig, RuleContext, RuleRegistry};
//! use remodel_syntax::{parse, Language};
//!
//! let registry = RuleRegistry::with_defaults();
//! let rule = registry.get("fix-nextjs-imports").unwrap();
//!
//! let config = RuleConfig::default();
//! let ctx = RuleContext::new(Path::new("widget.js"), &config);
//! let mut program = parse("export function Bar() {}", Language::JavaScript).unwrap();
//! assert!(rule.apply(&mut program, &ctx).unwrap().is_changed());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod hooks;
pub mod imports;
mod registry;
mod rule;

// Rules
mod functional_to_class;
mod hooks_to_lifecycle;
mod nextjs_imports;
mod prop_types;
mod react_imports;

// Re-exports
pub use config::RuleConfig;
pub use error::RuleError;
pub use functional_to_class::FunctionalToClass;
pub use hooks_to_lifecycle::HooksToLifecycle;
pub use nextjs_imports::FixNextjsImports;
pub use prop_types::AddMuiPropTypes;
pub use react_imports::FixReactImports;
pub use registry::RuleRegistry;
pub use rule::{Outcome, Rule, RuleContext};
