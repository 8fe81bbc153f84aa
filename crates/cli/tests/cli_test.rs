//! End-to-end runs of the `yamlstyle` binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

fn yamlstyle(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_yamlstyle"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start yamlstyle");
    // The binary may exit before reading stdin (bad config), so a broken
    // pipe here is not a failure.
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_clean_input() {
    let output = yamlstyle(&[], "a: 1\nb:\n  - c\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_parsable_indentation_problem() {
    let output = yamlstyle(
        &["-f", "parsable", "-d", r#"{"rules": {"indentation": {"spaces": 2}}}"#],
        "object:\n  k1:\n   - a\n",
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "stdin:3:4: [error] wrong indentation: expected 4 but found 3 (indentation)\n"
    );
}

#[test]
fn test_warnings_and_strict() {
    let config = r#"{"rules": {"key-duplicates": {"level": "warning"}}}"#;
    let source = "a: 1\na: 2\n";

    let output = yamlstyle(&["-f", "parsable", "-d", config], source);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "stdin:2:1: [warning] duplication of key \"a\" in mapping (key-duplicates)\n"
    );

    let output = yamlstyle(&["--strict", "-d", config], source);
    assert_eq!(output.status.code(), Some(2));

    let output = yamlstyle(&["--strict", "--no-warnings", "-d", config], source);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_json_output() {
    let output = yamlstyle(&["-f", "json", "-"], "a: 1\na: 2\nb: *nope\n");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules: Vec<_> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["file"].as_str().unwrap(), p["line"].as_u64().unwrap(), p["rule"].as_str().unwrap()))
        .collect();
    assert_eq!(rules, vec![("stdin", 2, "key-duplicates"), ("stdin", 3, "anchors")]);
}

#[test]
fn test_syntax_error_has_no_rule() {
    let output = yamlstyle(&["-f", "parsable"], "a: 'open\n");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.starts_with("stdin:2:1: [error] syntax error: "), "{}", text);
}

#[test]
fn test_invalid_config() {
    let output = yamlstyle(&["-d", r#"{"rules": {"tabs": "enable"}}"#], "a: 1\n");
    assert_eq!(output.status.code(), Some(255));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no such rule: \"tabs\""), "{}", stderr);
}

#[test]
fn test_standard_format_with_files() {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    let clean = dir.join("yamlstyle_clean.yaml");
    let dirty = dir.join("yamlstyle_dirty.yaml");
    std::fs::write(&clean, "a: 1\n").unwrap();
    std::fs::write(&dirty, "a: 1\na: 2\n").unwrap();

    let output = yamlstyle(&[clean.to_str().unwrap(), dirty.to_str().unwrap()], "");
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        format!(
            "{}\n  2:1       error    duplication of key \"a\" in mapping  (key-duplicates)\n\n",
            dirty.display()
        )
    );
}

#[test]
fn test_usage_error_exits_255() {
    let output = yamlstyle(&["--bogus"], "");
    assert_eq!(output.status.code(), Some(255));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--bogus"), "{}", stderr);

    let output = yamlstyle(&["-f", "xml"], "a: 1\n");
    assert_eq!(output.status.code(), Some(255));
}

#[test]
fn test_help_exits_0() {
    let output = yamlstyle(&["--help"], "");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn test_missing_file() {
    let output = yamlstyle(&["does/not/exist.yaml"], "");
    assert_eq!(output.status.code(), Some(255));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("cannot read does/not/exist.yaml"), "{}", stderr);
}
