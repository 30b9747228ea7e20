//! Property tests for the import normalizer

use std::collections::HashSet;
use std::path::Path;

use proptest::prelude::*;
use remodel_rules::imports::{dedupe, has_named, sort_named};
use remodel_rules::{FixReactImports, Rule, RuleConfig, RuleContext};
use remodel_syntax::{ImportDecl, ImportSpecifier};
use remodel_test_utils::{assert_reparses, parse_js, print_default};

/// Identifiers that can never collide with a keyword
fn ident() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,6}".prop_map(|s| format!("v{s}"))
}

fn decl_from(names: &[String]) -> ImportDecl {
    ImportDecl::new(
        "lib",
        names.iter().map(|n| ImportSpecifier::named(n.clone())).collect(),
    )
}

proptest! {
    #[test]
    fn sorting_orders_and_is_stable(names in proptest::collection::vec(ident(), 0..12)) {
        let mut decl = decl_from(&names);
        sort_named(&mut decl);
        let sorted: Vec<_> = decl.local_names().map(str::to_string).collect();
        let mut expected = names.clone();
        expected.sort();
        prop_assert_eq!(sorted, expected);
        prop_assert!(!sort_named(&mut decl));
    }

    #[test]
    fn dedupe_keeps_first_of_each_local(names in proptest::collection::vec(ident(), 0..12)) {
        let mut decl = decl_from(&names);
        dedupe(&mut decl);
        let kept: Vec<_> = decl.local_names().map(str::to_string).collect();
        let mut seen = HashSet::new();
        let expected: Vec<_> = names.into_iter().filter(|n| seen.insert(n.clone())).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn referenced_imports_survive_narrowing(
        names in proptest::collection::hash_set(ident(), 1..8),
        used in proptest::collection::vec(any::<bool>(), 8),
    ) {
        let names: Vec<_> = names.into_iter().collect();
        let referenced: Vec<_> = names
            .iter()
            .zip(&used)
            .filter(|(_, used)| **used)
            .map(|(name, _)| name.clone())
            .collect();
        let source = format!(
            "import {{ {} }} from 'react';\nrun({});\n",
            names.join(", "),
            referenced.join(", ")
        );

        let config = RuleConfig::default();
        let ctx = RuleContext::new(Path::new("util.js"), &config);
        let mut program = parse_js(&source);
        FixReactImports.apply(&mut program, &ctx).expect("apply");

        for name in &referenced {
            prop_assert!(has_named(&program, "react", name), "{} was dropped", name);
        }
        assert_reparses(&print_default(&program));
    }
}
