// Copyright (C) Brian G. Milnes 2025

//! Fix: enum value naming reported by buf lint
//!
//! Rules:
//! 1. Enum values must be prefixed with ENUM_TYPE_NAME_
//! 2. The zero value must be suffixed with _UNSPECIFIED
//!
//! Runs the linter, renames the flagged values in place, then runs the
//! linter again and reports what is left.
//!
//! Binary: protofix-fix-enum-naming

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use protofix::naming_rules::naming_rules::check_tree;
use protofix::{
    fix_file, format_number, group_by_file, run_tool, BufLintParser, DiagnosticParser, FileReport, FileStatus,
    LintCommand, RootArgs, ToolConfig, ToolLogger, ViolationRecord,
};

const SEPARATOR_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "protofix-fix-enum-naming")]
#[command(about = "Rename enum values flagged by the linter's naming rules", long_about = None)]
struct Args {
    #[command(flatten)]
    root: RootArgs,

    /// Show the renames without writing files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Skip the verification lint run after fixing
    #[arg(long)]
    no_verify: bool,

    /// Check naming locally instead of running the linter
    #[arg(long)]
    offline: bool,

    /// Lint program to run as `<program> lint <proto-root>`
    #[arg(long, default_value = "buf")]
    lint_program: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn collect_violations(args: &Args, schema_root: &Path, logger: &mut ToolLogger) -> Result<Vec<ViolationRecord>> {
    if args.offline {
        return check_tree(schema_root);
    }

    let lint = LintCommand::buf(&args.lint_program, &args.root.repo, &args.root.proto_root);
    let report = lint.run()?;
    let parser = BufLintParser::new(&args.root.lint_path_prefix());
    let violations = parser.parse_output(&report.stdout);
    let exit_code = report.exit_code.map_or_else(|| "none".to_string(), |code| code.to_string());
    logger.log(&format!(
        "Linter reported {} enum lines, {} naming violations (exit code {exit_code})",
        format_number(report.enum_line_count()),
        format_number(violations.len())
    ));
    Ok(violations)
}

fn log_file_report(report: &FileReport, logger: &mut ToolLogger) {
    for violation in &report.plan.unresolved {
        logger.warn(&format!("Could not find enum for {violation}"));
    }
    for (violation, reason) in &report.plan.unexpected {
        logger.warn(&format!("{}:{}: {}", report.file, violation.line, reason));
    }
    for plan in &report.plan.plans {
        for edit in &plan.edits {
            logger.log(&format!("  {}.{} → {}", plan.block, edit.old, edit.new));
        }
    }

    match &report.status {
        FileStatus::Missing => logger.warn(&format!("{}: file not found, skipping", report.file)),
        FileStatus::Unchanged => logger.log("  No changes needed"),
        FileStatus::DryRun => logger.log(&format!("  Would apply {} fixes", report.plan.edit_count())),
        FileStatus::Applied => logger.log(&format!("  ✓ Applied {} fixes", report.plan.edit_count())),
        FileStatus::Rejected(reason) => logger.warn(&format!("{}: fixes skipped: {}", report.file, reason)),
    }
}

/// Everything one run found and did
#[derive(Serialize)]
struct RunOutcome {
    violations: usize,
    files: usize,
    applied: usize,
    /// Violations left after the verification run, when it ran
    remaining: Option<usize>,
    reports: Vec<FileReport>,
}

fn fix_tree(args: &Args, schema_root: &Path, logger: &mut ToolLogger) -> Result<RunOutcome> {
    logger.log("Analyzing enum errors...");
    let violations = collect_violations(args, schema_root, logger)?;
    let violation_count = violations.len();
    let by_file = group_by_file(violations);
    logger.log(&format!(
        "Found {} enum errors spanning {} files",
        format_number(violation_count),
        format_number(by_file.len())
    ));

    let mut reports = Vec::new();
    for (rel_path, file_violations) in &by_file {
        logger.log("");
        logger.log(&"=".repeat(SEPARATOR_WIDTH));
        logger.log(&format!("Processing: {rel_path}"));
        logger.log(&"=".repeat(SEPARATOR_WIDTH));

        match fix_file(schema_root, rel_path, file_violations, args.dry_run) {
            Ok(report) => {
                log_file_report(&report, logger);
                reports.push(report);
            }
            Err(e) => logger.warn(&format!("{rel_path}: {e:#}")),
        }
    }

    logger.log("");
    logger.log(&"=".repeat(SEPARATOR_WIDTH));
    if args.dry_run {
        logger.log("DRY RUN - No changes made");
    } else {
        logger.log("Enum naming fixes complete!");
    }
    logger.log(&"=".repeat(SEPARATOR_WIDTH));

    let mut remaining = None;
    if !args.dry_run && !args.no_verify {
        logger.log("");
        logger.log("Verifying...");
        let left = collect_violations(args, schema_root, logger)?.len();
        logger.log(&format!("Remaining enum errors: {}", format_number(left)));
        remaining = Some(left);
    }

    Ok(RunOutcome {
        violations: violation_count,
        files: by_file.len(),
        applied: reports.iter().map(FileReport::applied).sum(),
        remaining,
        reports,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    let schema_root = args.root.schema_root();

    if args.format == "json" {
        let mut logger = ToolLogger::new_quiet();
        let outcome = fix_tree(&args, &schema_root, &mut logger)?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let config = ToolConfig::new("fix-enum-naming", args.root.repo.clone()).with_logging(args.root.log);
    run_tool(config, |logger| {
        let outcome = fix_tree(&args, &schema_root, logger)?;
        Ok(format!(
            "Summary: {} violations in {} files, {} fixes applied, {} warnings",
            format_number(outcome.violations),
            format_number(outcome.files),
            format_number(outcome.applied),
            format_number(logger.warnings())
        ))
    })
}
