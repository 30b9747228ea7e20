//! Batch runs over in-memory files and configuration files on disk

use std::io::Write;
use std::path::Path;

use pretty_assertions::assert_eq;
use remodel_engine::{BatchRunner, Config, Engine, FileStatus, SourceFile};
use remodel_rules::{FixNextjsImports, FunctionalToClass, HooksToLifecycle, Rule, RuleRegistry};
use remodel_test_utils::{
    assert_reparses, CLASS_WITH_HOOKS, FUNCTION_COMPONENT, FUNCTION_COMPONENT_AS_CLASS,
    NAMED_EXPORT_PAGE,
};

const BROKEN: &str = "export function Broken( {\n  return 1;\n";

#[test]
fn one_unparsable_file_does_not_stop_the_batch() {
    let engine = Engine::default();
    let rules: [&dyn Rule; 2] = [&HooksToLifecycle, &FixNextjsImports];
    let files = vec![
        SourceFile::new("components/widget.js", NAMED_EXPORT_PAGE),
        SourceFile::new("components/broken.js", BROKEN),
        SourceFile::new("components/Timer.js", CLASS_WITH_HOOKS),
    ];

    let report = BatchRunner::new(&engine).run(files, &rules);
    assert_eq!(report.totals.files, 3);
    assert_eq!(report.totals.changed, 2);
    assert_eq!(report.totals.failed, 1);

    let broken = report.get(Path::new("components/broken.js")).expect("broken");
    assert_eq!(broken.status, FileStatus::Failed);
    assert_eq!(broken.error_kind, Some("parse"));
    assert!(broken.output.is_none());

    let timer = report.get(Path::new("components/Timer.js")).expect("timer");
    assert_eq!(timer.rules, vec!["hooks-to-lifecycle"]);

    let widget = report.get(Path::new("components/widget.js")).expect("widget");
    assert_eq!(widget.rules, vec!["fix-nextjs-imports"]);

    for (_, text) in report.changed() {
        assert_reparses(text);
    }
}

#[test]
fn report_keeps_input_order() {
    let engine = Engine::default();
    let rules: [&dyn Rule; 1] = [&FunctionalToClass];
    let files: Vec<_> = (0..32)
        .map(|i| SourceFile::new(format!("c{i}.js"), FUNCTION_COMPONENT))
        .collect();
    let report = BatchRunner::new(&engine).run(files, &rules);
    let paths: Vec<_> = report.files.iter().map(|f| f.path.display().to_string()).collect();
    let expected: Vec<_> = (0..32).map(|i| format!("c{i}.js")).collect();
    assert_eq!(paths, expected);
    assert!(report.changed().all(|(_, text)| text == FUNCTION_COMPONENT_AS_CLASS));
}

#[test]
fn failing_rule_leaves_no_output() {
    let engine = Engine::default();
    let source = "class W extends Component {\n  state = makeState();\n\n  render() {\n    const [a, setA] = useState(0);\n    return a;\n  }\n}\n";
    let rules: [&dyn Rule; 2] = [&FixNextjsImports, &HooksToLifecycle];
    let report = BatchRunner::new(&engine).run(vec![SourceFile::new("W.js", source)], &rules);

    let file = &report.files[0];
    assert_eq!(file.status, FileStatus::Failed);
    assert_eq!(file.error_kind, Some("rule"));
    assert!(file.rules.is_empty());
    assert!(file.output.is_none());
    assert_eq!(report.changed().count(), 0);
}

#[test]
fn unmatched_files_are_untouched() {
    let engine = Engine::default();
    let source = "const   spaced   =   1\n";
    let registry = RuleRegistry::with_defaults();
    let rules: Vec<&dyn Rule> = registry.iter().collect();
    let report = BatchRunner::new(&engine).run(vec![SourceFile::new("util.js", source)], &rules);
    assert_eq!(report.files[0].status, FileStatus::Unchanged);
    assert_eq!(report.totals.unchanged, 1);
}

#[test]
fn report_serializes_statuses_and_totals() {
    let engine = Engine::default();
    let rules: [&dyn Rule; 1] = [&FixNextjsImports];
    let report = BatchRunner::new(&engine).run(
        vec![
            SourceFile::new("widget.js", NAMED_EXPORT_PAGE),
            SourceFile::new("broken.js", BROKEN),
        ],
        &rules,
    );
    let json: serde_json::Value = serde_json::from_str(&report.to_json().expect("json")).expect("parse");
    assert_eq!(json["files"][0]["status"], "changed");
    assert_eq!(json["files"][1]["status"], "failed");
    assert!(json["files"][1]["error"].as_str().expect("message").starts_with("parse error"));
    assert_eq!(json["totals"]["failed"], 1);
}

#[test]
fn config_file_drives_rules_and_printing() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        "[rules]\npreserve_initial_state = true\n\n[print]\nquote = \"double\"\n"
    )
    .expect("write");

    let config = Config::load(file.path()).expect("config");
    let engine = Engine::new(config);
    let source = "function Foo() {\n  const [name, setName] = useState('x');\n  return name;\n}\n";
    let result = engine
        .apply(&FunctionalToClass, &SourceFile::new("Foo.js", source))
        .expect("apply");
    assert!(result.text.contains("this.state = { name: \"x\" };"));
    assert!(result.text.contains("return this.state.name;"));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Config::load(&dir.path().join("remodel.toml")).unwrap_err();
    assert!(matches!(err, remodel_engine::ConfigError::Io { .. }));
}
