//! Rule registry
//!
//! Provides [`RuleRegistry`] for looking up rewrite rules by their codemod
//! name.

use indexmap::IndexMap;

use crate::error::RuleError;
use crate::functional_to_class::FunctionalToClass;
use crate::hooks_to_lifecycle::HooksToLifecycle;
use crate::nextjs_imports::FixNextjsImports;
use crate::prop_types::AddMuiPropTypes;
use crate::react_imports::FixReactImports;
use crate::rule::Rule;

/// Registry of rewrite rules, in registration order
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: IndexMap<&'static str, Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Create registry with the built-in rules
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FunctionalToClass);
        registry.register(HooksToLifecycle);
        registry.register(FixReactImports);
        registry.register(FixNextjsImports);
        registry.register(AddMuiPropTypes);
        registry
    }

    /// Register a rule under its own name, replacing any rule with that name
    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.insert(rule.name(), Box::new(rule));
    }

    /// Look up a rule
    ///
    /// # Errors
    /// Returns [`RuleError::UnknownRule`] if nothing is registered under
    /// `name`.
    pub fn get(&self, name: &str) -> Result<&dyn Rule, RuleError> {
        self.rules
            .get(name)
            .map(Box::as_ref)
            .ok_or_else(|| RuleError::UnknownRule(name.to_string()))
    }

    /// Look up several rules, preserving the requested order
    ///
    /// # Errors
    /// Returns [`RuleError::UnknownRule`] for the first unknown name.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&dyn Rule>, RuleError> {
        names.iter().map(|name| self.get(name.as_ref())).collect()
    }

    /// Check if a rule exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// List registered rule names
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.keys().copied().collect()
    }

    /// Get number of registered rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over registered rules
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.values().map(Box::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_five_rules() {
        let registry = RuleRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "functional-to-class",
                "hooks-to-lifecycle",
                "fix-react-imports",
                "fix-nextjs-imports",
                "add-mui-prop-types",
            ]
        );
        assert!(registry.contains("fix-react-imports"));
        assert!(!RuleRegistry::new().contains("fix-react-imports"));
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let registry = RuleRegistry::with_defaults();
        let err = registry.get("class-to-hooks").map(|r| r.name()).unwrap_err();
        assert_eq!(err, RuleError::UnknownRule("class-to-hooks".to_string()));
        assert!(registry.resolve(&["hooks-to-lifecycle", "nope"]).is_err());
    }

    #[test]
    fn resolve_keeps_requested_order() {
        let registry = RuleRegistry::with_defaults();
        let rules = registry
            .resolve(&["add-mui-prop-types", "functional-to-class"])
            .expect("known rules");
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["add-mui-prop-types", "functional-to-class"]);
    }
}
