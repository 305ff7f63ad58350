//! Integration tests for the rulebridge CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_cmd() -> Command {
    Command::cargo_bin("rulebridge").unwrap()
}

const DEFINITIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rules xmlns="http://example.org/rules">
  <rule>
    <key>AvoidPrintStackTrace</key>
    <name>Avoid printStackTrace</name>
    <tag>main-sources</tag>
  </rule>
  <rule>
    <key>JUnitTestsShouldIncludeAssert</key>
    <name>JUnit tests should include assert</name>
  </rule>
  <rule>
    <key>UnusedPrivateField</key>
    <name>Unused private field</name>
  </rule>
</rules>"#;

fn write_project(dir: &Path, engine_command: &str) {
    fs::create_dir_all(dir.join("rules")).unwrap();
    fs::create_dir_all(dir.join("src/main/java")).unwrap();
    fs::write(dir.join("rules/pmd.xml"), DEFINITIONS).unwrap();
    fs::write(
        dir.join("src/main/java/App.java"),
        "class App {\n  void run() {\n    e.printStackTrace();\n  }\n}\n",
    )
    .unwrap();
    fs::write(
        dir.join(".rulebridge.toml"),
        format!(
            r#"
rule_definitions = ["rules/pmd.xml"]

[engine]
command = "{}"

[[active_rules]]
repository = "pmd"
key = "AvoidPrintStackTrace"
internal_key = "category/java/bestpractices.xml/AvoidPrintStackTrace"
severity = "critical"

[[active_rules]]
repository = "pmd"
key = "JUnitTestsShouldIncludeAssert"
internal_key = "category/java/bestpractices.xml/JUnitTestsShouldIncludeAssert"

[[active_rules]]
repository = "pmd"
key = "UnusedPrivateField"
internal_key = "category/java/bestpractices.xml/UnusedPrivateField"
params = {{ ignoredAnnotations = "", reportLevel = "2" }}
"#,
            engine_command
        ),
    )
    .unwrap();
}

#[test]
fn test_help_lists_commands() {
    get_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("ruleset"))
        .stdout(predicate::str::contains("scopes"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_scopes_command_classifies_rules() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pmd.xml");
    fs::write(&path, DEFINITIONS).unwrap();

    get_cmd()
        .arg("scopes")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("AvoidPrintStackTrace\tMAIN"))
        .stdout(predicate::str::contains("JUnitTestsShouldIncludeAssert\tTEST"))
        .stdout(predicate::str::contains("UnusedPrivateField\tALL"));
}

#[test]
fn test_scopes_command_reports_unreadable_file() {
    get_cmd()
        .args(["scopes", "/nonexistent/rules.xml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("/nonexistent/rules.xml"));
}

#[test]
fn test_ruleset_command_filters_by_scope() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path(), "pmd");

    get_cmd()
        .arg("-C")
        .arg(temp_dir.path())
        .args(["ruleset", "--repository", "pmd", "--scope", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sonar Profile: pmd (MAIN)"))
        .stdout(predicate::str::contains(
            r#"ref="category/java/bestpractices.xml/AvoidPrintStackTrace""#,
        ))
        .stdout(predicate::str::contains("<priority>2</priority>"))
        .stdout(predicate::str::contains("UnusedPrivateField"))
        .stdout(predicate::str::contains("JUnitTestsShouldIncludeAssert").not())
        .stdout(predicate::str::contains("reportLevel"))
        .stdout(predicate::str::contains("ignoredAnnotations").not());
}

#[test]
fn test_ruleset_command_rejects_unknown_scope() {
    get_cmd()
        .args(["ruleset", "--repository", "pmd", "--scope", "integration"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scope"));
}

#[test]
fn test_ruleset_command_with_explicit_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    fs::write(
        &config,
        r#"
[[active_rules]]
repository = "pmd-apex"
key = "ApexCRUDViolation"
internal_key = "category/apex/security.xml/ApexCRUDViolation"
severity = "blocker"
"#,
    )
    .unwrap();

    get_cmd()
        .arg("-C")
        .arg(temp_dir.path())
        .arg("-c")
        .arg(&config)
        .args(["ruleset", "--repository", "pmd-apex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ApexCRUDViolation"))
        .stdout(predicate::str::contains("<priority>1</priority>"));
}

#[test]
fn test_import_command_prints_active_rules() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ruleset.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ruleset name="legacy" xmlns="http://pmd.sourceforge.net/ruleset/2.0.0">
  <rule ref="category/java/bestpractices.xml/AvoidPrintStackTrace">
    <priority>2</priority>
  </rule>
  <rule ref="category/java/design.xml/CyclomaticComplexity">
    <properties>
      <property name="methodReportLevel" value="12"/>
    </properties>
  </rule>
</ruleset>"#,
    )
    .unwrap();

    get_cmd()
        .arg("import")
        .arg(&path)
        .args(["--repository", "pmd"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[active_rules]]"))
        .stdout(predicate::str::contains(r#"key = "AvoidPrintStackTrace""#))
        .stdout(predicate::str::contains(r#"severity = "critical""#))
        .stdout(predicate::str::contains(r#"key = "CyclomaticComplexity""#))
        .stdout(predicate::str::contains("methodReportLevel"));
}

#[test]
fn test_import_command_rejects_invalid_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ruleset.xml");
    fs::write(&path, "<notaruleset/>").unwrap();

    get_cmd()
        .arg("import")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_analyze_without_engine_fails() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path(), "rulebridge-no-such-engine");

    get_cmd()
        .arg("-C")
        .arg(temp_dir.path())
        .arg("analyze")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("rulebridge-no-such-engine"));
}

#[test]
fn test_analyze_with_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".rulebridge.toml"), "languages = [\"cobol\"]").unwrap();

    get_cmd()
        .arg("-C")
        .arg(temp_dir.path())
        .arg("analyze")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[cfg(unix)]
#[test]
fn test_analyze_with_fake_engine() {
    use std::os::unix::fs::PermissionsExt;

    let engine_dir = TempDir::new().unwrap();
    let script = engine_dir.path().join("fake-pmd");
    fs::write(
        &script,
        r#"#!/bin/sh
report=""
list=""
while [ $# -gt 0 ]; do
  case "$1" in
    -r) report="$2" ;;
    --file-list) list="$2" ;;
  esac
  shift
done
{
  echo '<pmd>'
  while IFS= read -r f || [ -n "$f" ]; do
    echo "<file name=\"$f\"><violation beginline=\"3\" endline=\"1\" rule=\"AvoidPrintStackTrace\">Avoid printStackTrace()</violation></file>"
  done < "$list"
  echo '</pmd>'
} > "$report"
exit 4
"#,
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let project = TempDir::new().unwrap();
    write_project(project.path(), &script.display().to_string());

    let output = get_cmd()
        .arg("-C")
        .arg(project.path())
        .args(["analyze", "--format", "json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["issue_count"], 1);
    let issue = &value["issues"][0];
    assert_eq!(issue["rule_key"]["rule"], "AvoidPrintStackTrace");
    assert_eq!(issue["file"], "src/main/java/App.java");
    assert_eq!(issue["severity"], "critical");
    assert_eq!(issue["range"]["start_line"], 1);
    assert_eq!(issue["range"]["end_line"], 3);
    assert_eq!(value["passes"].as_array().unwrap().len(), 1);

    assert!(project.path().join(".rulebridge/pmd-main.xml").exists());
}
