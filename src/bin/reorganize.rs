// Copyright (C) Brian G. Milnes 2025

//! Reorganize: move schema files to match their package, adding v1 versions
//!
//! Dry run by default: prints the plan. With --execute it updates package
//! declarations, moves files with git mv (preserving history) and rewrites
//! imports across the tree.
//!
//! Binary: protofix-reorganize

use anyhow::Result;
use clap::Parser;
use protofix::package_reorg::package_reorg::ExecutionReport;
use protofix::{
    execute, format_number, relative_display, run_tool, GitMover, PlanSummary, ReorgPlan, RootArgs, ToolConfig,
    ToolLogger,
};
use serde::Serialize;

const SEPARATOR_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "protofix-reorganize")]
#[command(about = "Move schema files under directories matching their versioned package", long_about = None)]
struct Args {
    #[command(flatten)]
    root: RootArgs,

    /// Apply the plan (default is a dry run)
    #[arg(long)]
    execute: bool,

    /// Output format for the plan (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,
}

/// Plan and, with --execute, the execution report
#[derive(Serialize)]
struct JsonOutput<'a> {
    plan: &'a ReorgPlan,
    summary: PlanSummary,
    report: Option<ExecutionReport>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let schema_root = args.root.schema_root();

    if args.format == "json" {
        let mut logger = ToolLogger::new_quiet();
        let plan = ReorgPlan::build(&schema_root)?;
        for file in &plan.without_package {
            logger.warn(&format!("No package found in {}", relative_display(file, &schema_root)));
        }
        let report = if args.execute {
            Some(execute(&plan, &mut GitMover::new(&args.root.repo), &mut logger)?)
        } else {
            None
        };
        let output = JsonOutput {
            plan: &plan,
            summary: plan.summary(),
            report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let config = ToolConfig::new("reorganize", args.root.repo.clone()).with_logging(args.root.log);

    run_tool(config, |logger| {
        let plan = ReorgPlan::build(&schema_root)?;
        for file in &plan.without_package {
            logger.warn(&format!("No package found in {}", relative_display(file, &schema_root)));
        }

        logger.log(&"=".repeat(SEPARATOR_WIDTH));
        logger.log("PROTO REORGANIZATION PLAN (Using git mv)");
        logger.log(&"=".repeat(SEPARATOR_WIDTH));
        logger.log("");
        for line in plan.describe() {
            logger.log(&line);
        }
        logger.log("");

        let summary = plan.summary();
        if !args.execute {
            logger.log(&"=".repeat(SEPARATOR_WIDTH));
            logger.log("DRY RUN - No changes made");
            logger.log("Run with --execute to apply changes");
            logger.log(&"=".repeat(SEPARATOR_WIDTH));
            return Ok(format!(
                "Summary: {} files planned, {} to move, {} package updates only",
                format_number(summary.total),
                format_number(summary.move_and_rename),
                format_number(summary.rename_only)
            ));
        }

        logger.log(&"=".repeat(SEPARATOR_WIDTH));
        logger.log("EXECUTING REORGANIZATION WITH GIT MV...");
        logger.log(&"=".repeat(SEPARATOR_WIDTH));
        logger.log("");

        let mut mover = GitMover::new(&args.root.repo);
        let report = execute(&plan, &mut mover, logger)?;

        logger.log("");
        logger.log("REORGANIZATION COMPLETE! Next step: check proto compilation with buf");

        Ok(format!(
            "Summary: {} package declarations updated, {} files moved, {} files rewritten",
            format_number(report.packages_updated),
            format_number(report.files_moved),
            format_number(report.files_rewritten)
        ))
    })
}
