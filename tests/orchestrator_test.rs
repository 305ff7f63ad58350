//! Integration tests for the execution orchestrator

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use rulebridge::config::ScannerConfig;
use rulebridge::engine::{
    ambient_classpath, AnalysisEngine, AnalysisReport, EngineRequest, ExecutionContext,
    ProcessingError, Violation,
};
use rulebridge::error::{BridgeError, ConfigError, EngineError};
use rulebridge::languages::Language;
use rulebridge::orchestrator::{ExecutionOptions, ExecutionOrchestrator, REPORT_FILENAME};
use rulebridge::recorder::ViolationRecorder;
use rulebridge::rules::{ActiveRule, ActiveRules, RuleKey, Scope, ScopeRegistry};
use rulebridge::ruleset::reader;
use rulebridge::scanner::Scanner;

const DEFINITIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rules>
  <rule>
    <key>A</key>
    <name>Rule A</name>
    <tag>main-sources</tag>
  </rule>
  <rule>
    <key>B</key>
    <name>Rule B</name>
    <tag>tests</tag>
  </rule>
</rules>"#;

/// One engine invocation as seen by the fake engine
#[derive(Debug, Clone)]
struct Call {
    language: Language,
    scope: Scope,
    files: usize,
    rules: Vec<String>,
    classpath: usize,
    java_version: String,
}

enum Behavior {
    /// Report a violation for every rule whose key appears in a file
    Match,
    /// Report one processing error per file
    ProcessingErrors,
    Fail,
    Panic,
}

struct FakeEngine {
    behavior: Behavior,
    calls: Mutex<Vec<Call>>,
}

impl FakeEngine {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl AnalysisEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn run(&self, request: &EngineRequest<'_>) -> Result<AnalysisReport, EngineError> {
        let ruleset = reader::parse(&fs::read_to_string(request.ruleset_path).unwrap()).unwrap();
        let rules: Vec<String> = ruleset
            .rules
            .iter()
            .filter_map(|rule| rule.reference.as_deref())
            .map(|reference| reference.rsplit('/').next().unwrap().to_string())
            .collect();

        self.calls.lock().unwrap().push(Call {
            language: request.language,
            scope: request.scope,
            files: request.files.len(),
            rules: rules.clone(),
            classpath: ambient_classpath().map(|cp| cp.len()).unwrap_or(0),
            java_version: request.java_source_version.to_string(),
        });

        let mut report = AnalysisReport::default();
        match self.behavior {
            Behavior::Match => {
                for file in &request.files {
                    let content = fs::read_to_string(&file.path).unwrap();
                    for rule in rules.iter().filter(|rule| content.contains(rule.as_str())) {
                        report.violations.push(Violation {
                            rule_name: rule.clone(),
                            file_path: file.path.clone(),
                            begin_line: 2,
                            end_line: 0,
                            description: format!("{} triggered", rule),
                        });
                    }
                }
            }
            Behavior::ProcessingErrors => {
                for file in &request.files {
                    report.processing_errors.push(ProcessingError {
                        file_path: file.path.display().to_string(),
                        message: "ParseException".to_string(),
                    });
                }
            }
            Behavior::Fail => {
                return Err(EngineError::Failed {
                    program: "fake".to_string(),
                    code: 1,
                    stderr: "boom".to_string(),
                })
            }
            Behavior::Panic => panic!("engine crashed"),
        }
        Ok(report)
    }
}

struct Fixture {
    dir: TempDir,
    registry: ScopeRegistry,
}

impl Fixture {
    /// A project with one main and one test Java file, triggering A and B
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/main/java")).unwrap();
        fs::create_dir_all(root.join("src/test/java")).unwrap();
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::write(root.join("src/main/java/App.java"), "class App { /* A B */ }\n").unwrap();
        fs::write(root.join("src/test/java/AppTest.java"), "class AppTest { /* A B */ }\n").unwrap();
        fs::write(root.join("lib/dep.jar"), "").unwrap();

        let registry = ScopeRegistry::new();
        registry.load_str("definitions", DEFINITIONS);

        Self { dir, registry }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn work_dir(&self) -> PathBuf {
        self.root().join(".rulebridge")
    }

    fn scanner(&self) -> Scanner {
        Scanner::new(self.root().to_path_buf(), &ScannerConfig::default()).unwrap()
    }

    fn options(&self) -> ExecutionOptions {
        ExecutionOptions {
            work_dir: self.work_dir(),
            generate_xml: true,
            languages: vec![Language::Java, Language::Kotlin],
            dependencies: vec![PathBuf::from("lib/dep.jar")],
            java_source_version: "11".to_string(),
        }
    }
}

fn rules_a_and_b() -> ActiveRules {
    ActiveRules::new(vec![
        ActiveRule::new("pmd", "A").with_internal_key("category/java/custom.xml/A"),
        ActiveRule::new("pmd", "B").with_internal_key("category/java/custom.xml/B"),
    ])
}

#[test]
fn test_main_and_test_rules_run_against_their_files() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);

    let report = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap();

    assert_eq!(report.violations.len(), 2);
    assert!(!report.has_errors());
    let main = report.violations.iter().find(|v| v.rule_name == "A").unwrap();
    assert!(main.file_path.ends_with("src/main/java/App.java"));
    let test = report.violations.iter().find(|v| v.rule_name == "B").unwrap();
    assert!(test.file_path.ends_with("src/test/java/AppTest.java"));

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].language, calls[0].scope), (Language::Java, Scope::Main));
    assert_eq!(calls[0].rules, vec!["A".to_string()]);
    assert_eq!((calls[1].language, calls[1].scope), (Language::Java, Scope::Test));
    assert_eq!(calls[1].rules, vec!["B".to_string()]);
    assert!(calls.iter().all(|call| call.files == 1 && call.classpath == 1));
}

#[test]
fn test_artifacts_are_written() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);

    ExecutionOrchestrator::new(&fixture.registry, &rules, &scanner, &engine, fixture.options())
        .execute()
        .unwrap();

    let work_dir = fixture.work_dir();
    assert!(work_dir.join("pmd-main.xml").exists());
    assert!(work_dir.join("pmd-test.xml").exists());
    let dump = fs::read_to_string(work_dir.join(REPORT_FILENAME)).unwrap();
    assert_eq!(dump.matches("<violation ").count(), 2);
}

#[test]
fn test_report_dump_is_optional() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);
    let options = ExecutionOptions {
        generate_xml: false,
        ..fixture.options()
    };

    ExecutionOrchestrator::new(&fixture.registry, &rules, &scanner, &engine, options)
        .execute()
        .unwrap();

    assert!(!fixture.work_dir().join(REPORT_FILENAME).exists());
}

#[test]
fn test_violations_become_issues() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);

    let report = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap();
    let issues = ViolationRecorder::new(&scanner, &rules).record_all(&report);

    assert_eq!(issues.len(), 2);
    let a = issues.iter().find(|i| i.rule_key == RuleKey::new("pmd", "A")).unwrap();
    assert_eq!(a.file, "src/main/java/App.java");
    assert_eq!((a.range.start_line, a.range.end_line), (2, 2));
}

#[test]
fn test_scope_without_rules_is_skipped() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = ActiveRules::new(vec![
        ActiveRule::new("pmd", "A").with_internal_key("category/java/custom.xml/A")
    ]);
    let engine = FakeEngine::new(Behavior::Match);

    let report = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].scope, Scope::Main);
    assert_eq!(report.violations.len(), 1);
    assert!(!report.has_errors());
}

#[test]
fn test_language_without_files_is_skipped() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = ActiveRules::new(vec![ActiveRule::new("pmd-kotlin", "A")]);
    let engine = FakeEngine::new(Behavior::Match);

    let report = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap();

    assert!(engine.calls().is_empty());
    assert!(report.is_empty());
}

#[test]
fn test_engine_errors_are_data() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::ProcessingErrors);

    let report = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap();

    assert_eq!(report.processing_errors.len(), 2);
    assert!(report.violations.is_empty());
}

#[test]
fn test_unresolvable_dependency_aborts_before_engine() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);
    let options = ExecutionOptions {
        dependencies: vec![PathBuf::from("lib/missing.jar")],
        ..fixture.options()
    };

    let err = ExecutionOrchestrator::new(&fixture.registry, &rules, &scanner, &engine, options)
        .execute()
        .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Config(ConfigError::UnresolvableDependency { .. })
    ));
    assert!(engine.calls().is_empty());
}

#[test]
fn test_expression_rule_without_expression_fails() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = ActiveRules::new(vec![ActiveRule::new("pmd", "MyRule")
        .with_internal_key("net.sourceforge.pmd.lang.rule.xpath.XPathRule")
        .with_param("message", "Do not")]);
    let engine = FakeEngine::new(Behavior::Match);

    let err = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Config(ConfigError::MissingExpressionProperty { property: "xpath", .. })
    ));
    assert!(engine.calls().is_empty());
    assert!(ambient_classpath().is_none());
}

#[test]
fn test_context_restored_when_engine_fails() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Fail);

    let err = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute()
    .unwrap_err();

    assert!(matches!(err, BridgeError::Engine(EngineError::Failed { .. })));
    // the first failure aborts the remaining scopes
    assert_eq!(engine.calls().len(), 1);
    assert!(ambient_classpath().is_none());
}

#[test]
fn test_outer_context_restored_when_engine_fails() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Fail);

    let outer = ExecutionContext::new(fixture.root(), &["lib/dep.jar"]).unwrap();
    let _outer_scope = outer.enter();
    let before = ambient_classpath();
    assert!(before.is_some());

    let options = ExecutionOptions {
        dependencies: Vec::new(),
        ..fixture.options()
    };
    let err = ExecutionOrchestrator::new(&fixture.registry, &rules, &scanner, &engine, options)
        .execute()
        .unwrap_err();

    assert!(matches!(err, BridgeError::Engine(EngineError::Failed { .. })));
    // the engine saw the run's own empty classpath, not the outer one
    assert_eq!(engine.calls()[0].classpath, 0);
    assert_eq!(ambient_classpath(), before);
}

#[test]
fn test_context_restored_when_engine_panics() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Panic);

    let result = catch_unwind(AssertUnwindSafe(|| {
        ExecutionOrchestrator::new(
            &fixture.registry,
            &rules,
            &scanner,
            &engine,
            fixture.options(),
        )
        .execute()
    }));

    assert!(result.is_err());
    assert!(ambient_classpath().is_none());
}

#[test]
fn test_invalid_java_version_aborts_before_engine() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);
    let options = ExecutionOptions {
        java_source_version: "abc".to_string(),
        ..fixture.options()
    };

    let err = ExecutionOrchestrator::new(&fixture.registry, &rules, &scanner, &engine, options)
        .execute()
        .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Config(ConfigError::InvalidJavaVersion(ref version)) if version == "abc"
    ));
    assert!(engine.calls().is_empty());
    assert!(!fixture.work_dir().exists());
}

#[test]
fn test_engine_receives_resolved_java_version() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);
    let options = ExecutionOptions {
        java_source_version: "17-preview".to_string(),
        ..fixture.options()
    };

    ExecutionOrchestrator::new(&fixture.registry, &rules, &scanner, &engine, options)
        .execute()
        .unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.java_version == "17"));
}

#[test]
fn test_timings_cover_each_pass() {
    let fixture = Fixture::new();
    let scanner = fixture.scanner();
    let rules = rules_a_and_b();
    let engine = FakeEngine::new(Behavior::Match);

    let (_, timing) = ExecutionOrchestrator::new(
        &fixture.registry,
        &rules,
        &scanner,
        &engine,
        fixture.options(),
    )
    .execute_timed()
    .unwrap();

    assert_eq!(timing.passes.len(), 2);
    assert!(timing.passes.iter().all(|pass| pass.rule_count == 1 && pass.violation_count == 1));
}
