//! Analyze command - Run the engine over the project and report issues

use super::{emit, AnalyzeArgs, OutputFormat, Project};
use crate::cli::exit_codes;
use crate::cli::output::{AnalysisSummary, JsonOutput, ReportRenderer, TerminalOutput};
use crate::engine::CommandEngine;
use crate::error::BridgeError;
use crate::orchestrator::{ExecutionOptions, ExecutionOrchestrator};
use crate::recorder::ViolationRecorder;
use crate::scanner::Scanner;

pub fn execute(args: AnalyzeArgs, project: &Project) -> Result<i32, BridgeError> {
    let config = &project.config;
    let registry = project.registry();
    let rules = config.active_rules();
    let scanner = Scanner::new(project.root.clone(), &config.scanner)?;
    let engine = CommandEngine::locate(&config.engine.command, config.engine.extra_args.clone())?;

    let orchestrator = ExecutionOrchestrator::new(
        &registry,
        &rules,
        &scanner,
        &engine,
        ExecutionOptions::from_config(config, &project.root),
    );
    let (report, timing) = orchestrator.execute_timed()?;
    let issues = ViolationRecorder::new(&scanner, &rules).record_all(&report);

    let project_name = project
        .root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| project.root.display().to_string());
    let summary = AnalysisSummary {
        project: &project_name,
        issues: &issues,
        report: &report,
        timing: &timing,
    };

    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
    };
    emit(args.output.as_deref(), &renderer.render_report(&summary)?)?;

    Ok(if issues.is_empty() {
        exit_codes::SUCCESS
    } else {
        exit_codes::ISSUES
    })
}
