//! Runs the `remodel` binary against temporary project trees

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn remodel(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_remodel"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("run remodel")
}

fn write(root: &Path, name: &str, text: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, text).expect("write");
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn list_shows_every_rule() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = remodel(&["list"], dir.path());
    assert!(output.status.success());
    let text = stdout(&output);
    for name in [
        "functional-to-class",
        "hooks-to-lifecycle",
        "fix-react-imports",
        "fix-nextjs-imports",
        "add-mui-prop-types",
    ] {
        assert!(text.contains(name), "{name} missing from:\n{text}");
    }
}

#[test]
fn run_rewrites_files_in_place() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/widget.js", "export function Bar() {\n  return <div>bar</div>;\n}\n");
    write(root, "src/util.js", "export const answer = 42;\n");
    write(root, "src/node_modules/pkg/widget.js", "export function Skip() {}\n");

    let output = remodel(&["run", "--rule", "fix-nextjs-imports", "src"], root);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(
        fs::read_to_string(root.join("src/widget.js")).expect("read"),
        "export default function Bar() {\n  return <div>bar</div>;\n}\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("src/util.js")).expect("read"),
        "export const answer = 42;\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("src/node_modules/pkg/widget.js")).expect("read"),
        "export function Skip() {}\n"
    );
    assert!(stdout(&output).contains("2 files: 1 changed, 1 unchanged, 0 failed"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = "function Foo(){ const [x, setX] = useState(0); return x; }\n";
    write(dir.path(), "Foo.js", source);

    let output = remodel(&["run", "--dry-run", "-r", "functional-to-class", "Foo.js"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("would change"));
    assert_eq!(fs::read_to_string(dir.path().join("Foo.js")).expect("read"), source);
}

#[test]
fn failures_set_exit_code_and_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "good.js", "export function Good() {}\n");
    write(dir.path(), "bad.js", "export function Bad( {\n");

    let output = remodel(
        &["run", "--report-json", "--rule", "fix-nextjs-imports", "good.js", "bad.js"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["totals"]["changed"], 1);
    assert_eq!(report["totals"]["failed"], 1);
    let bad = report["files"]
        .as_array()
        .expect("files")
        .iter()
        .find(|f| f["path"] == "bad.js")
        .expect("bad.js entry");
    assert_eq!(bad["error_kind"], "parse");
    assert_eq!(
        fs::read_to_string(dir.path().join("good.js")).expect("read"),
        "export default function Good() {}\n"
    );
}

#[cfg(unix)]
#[test]
fn write_failure_is_reported_and_other_files_still_written() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "export function A() {}\n");
    write(dir.path(), "b.js", "export function B() {}\n");
    let locked = dir.path().join("a.js");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o444)).expect("chmod");
    if fs::OpenOptions::new().write(true).open(&locked).is_ok() {
        // privileged user, permissions are not enforced
        return;
    }

    let output = remodel(
        &["run", "--report-json", "--rule", "fix-nextjs-imports", "a.js", "b.js"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["totals"]["changed"], 1);
    assert_eq!(report["totals"]["failed"], 1);
    assert_eq!(report["files"][0]["path"], "a.js");
    assert_eq!(report["files"][0]["error_kind"], "io");
    assert_eq!(
        fs::read_to_string(dir.path().join("b.js")).expect("read"),
        "export default function B() {}\n"
    );
}

#[test]
fn missing_path_is_reported_without_stopping_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "page.js", "export function Page() {}\n");
    let output = remodel(&["run", "--rule", "fix-nextjs-imports", "gone.js", "page.js"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("failed gone.js"));
    assert_eq!(
        fs::read_to_string(dir.path().join("page.js")).expect("read"),
        "export default function Page() {}\n"
    );
}

#[test]
fn unknown_rule_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.js", "const a = 1;\n");
    let output = remodel(&["run", "--rule", "class-to-hooks", "a.js"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("class-to-hooks"));
    assert_eq!(fs::read_to_string(dir.path().join("a.js")).expect("read"), "const a = 1;\n");
}

#[test]
fn config_supplies_default_rules_and_style() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "remodel.toml",
        "[print]\nquote = \"double\"\n\n[engine]\ndefault_rules = [\"fix-nextjs-imports\"]\n",
    );
    write(dir.path(), "page.js", "export function Page() {\n  return 'hi';\n}\n");

    let output = remodel(&["run", "--config", "remodel.toml", "page.js"], dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("page.js")).expect("read"),
        "export default function Page() {\n  return \"hi\";\n}\n"
    );
}
