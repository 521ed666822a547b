// Copyright (C) Brian G. Milnes 2025

//! Protofix - lint-driven migration fixes for protobuf schema trees
//!
//! One-shot tools for a schema migration:
//! - rename enum values the linter flags (prefix and zero-value rules)
//! - rewrite import paths after a directory reshuffle
//! - move files under directories matching their (versioned) package
//!
//! Everything is line-oriented text rewriting; there is no proto parser.

pub mod args;
pub mod affix;
pub mod lint_output;
pub mod enum_scanner;
pub mod rename_planner;
pub mod patch;
pub mod naming_rules;
pub mod enum_naming;
pub mod import_rewrite;
pub mod history_move;
pub mod package_reorg;
pub mod logging;
pub mod tool_runner;

// Re-export commonly used items
pub use args::args::{find_proto_files, format_number, relative_display, RootArgs, DEFAULT_PROTO_ROOT};
pub use affix::affix::{derive_prefix, zero_value_name};
pub use lint_output::lint_output::{AffixKind, BufLintParser, DiagnosticParser, LintCommand, LintReport, ViolationRecord};
pub use enum_scanner::enum_scanner::{scan_enums, EnumBlock, EnumMember, EnumScan};
pub use rename_planner::rename_planner::{apply_prefix, decide_rename, plan_file, FilePlan, RenameDecision, RenamePlan};
pub use patch::patch::{apply_line_edits, apply_to_file, LineEdit, PatchError};
pub use enum_naming::enum_naming::{fix_file, group_by_file, FileReport, FileStatus};
pub use import_rewrite::import_rewrite::{ImportChange, ImportRewriteMap, IMPORT_FIXES};
pub use history_move::history_move::{GitMover, HistoryMover};
pub use package_reorg::package_reorg::{execute, extract_package, versioned_package, PlanAction, PlanEntry, PlanSummary, ReorgPlan};
pub use logging::logging::ToolLogger;
pub use tool_runner::tool_runner::{run_tool, ToolConfig};
