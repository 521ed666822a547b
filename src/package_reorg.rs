// Copyright (C) Brian G. Milnes 2025

//! Package reorganization: move every schema file to the directory its
//! package names, adding a `.v1` version to unversioned packages.
//!
//! Execution runs in three phases, in this order:
//! 1. rewrite package declarations in place
//! 2. move files with a history-preserving mover
//! 3. rewrite imports and qualified package references in every file

pub mod package_reorg {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::OnceLock;

    use anyhow::{Context, Result};
    use regex::{Captures, Regex};
    use serde::Serialize;

    use crate::args::args::{find_proto_files, format_number, relative_display};
    use crate::history_move::history_move::HistoryMover;
    use crate::import_rewrite::import_rewrite::ImportRewriteMap;
    use crate::logging::logging::ToolLogger;

    /// Package namespaces owned by someone else; never versioned or moved
    pub const RESERVED_NAMESPACES: &[&str] = &["google"];

    /// Version appended to unversioned packages
    pub const DEFAULT_VERSION: &str = "v1";

    /// How many planned moves the summary lists
    pub const LISTED_MOVES: usize = 10;

    fn package_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^package\s+([\w.]+)\s*;").expect("package pattern is valid"))
    }

    fn version_suffix_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"\.v\d+$").expect("version pattern is valid"))
    }

    fn dotted_name_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)+").expect("dotted name pattern is valid")
        })
    }

    /// The package declared by the first `package NAME;` line
    pub fn extract_package(content: &str) -> Option<String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("package "))
            .find_map(|line| package_regex().captures(line).map(|caps| caps[1].to_string()))
    }

    pub fn has_version_suffix(package: &str) -> bool {
        version_suffix_regex().is_match(package)
    }

    pub fn is_reserved(package: &str) -> bool {
        RESERVED_NAMESPACES
            .iter()
            .any(|ns| package == *ns || package.starts_with(&format!("{ns}.")))
    }

    pub fn should_add_version(package: &str) -> bool {
        !has_version_suffix(package) && !is_reserved(package)
    }

    /// `ai.pipestream.data` -> `ai.pipestream.data.v1`; versioned and
    /// reserved packages come back unchanged
    pub fn versioned_package(package: &str) -> String {
        if should_add_version(package) {
            format!("{package}.{DEFAULT_VERSION}")
        } else {
            package.to_string()
        }
    }

    /// `ai.pipestream.data.v1` -> `ai/pipestream/data/v1`
    pub fn package_to_dir(package: &str) -> PathBuf {
        package.split('.').collect()
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PlanAction {
        /// File changes directory (and usually package)
        Move,
        /// Package declaration changes, file stays
        RenameOnly,
        NoChange,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct PlanEntry {
        pub current: PathBuf,
        pub old_package: String,
        pub new_package: String,
        pub target: PathBuf,
    }

    impl PlanEntry {
        /// Plan one file from its location and content
        pub fn for_file(schema_root: &Path, current: &Path, old_package: &str) -> Option<Self> {
            let file_name = current.file_name()?;
            let new_package = versioned_package(old_package);
            let target = schema_root.join(package_to_dir(&new_package)).join(file_name);
            Some(PlanEntry {
                current: current.to_path_buf(),
                old_package: old_package.to_string(),
                new_package,
                target,
            })
        }

        pub fn needs_move(&self) -> bool {
            self.current != self.target
        }

        pub fn needs_package_update(&self) -> bool {
            self.old_package != self.new_package
        }

        pub fn action(&self) -> PlanAction {
            if self.needs_move() {
                PlanAction::Move
            } else if self.needs_package_update() {
                PlanAction::RenameOnly
            } else {
                PlanAction::NoChange
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
    pub struct PlanSummary {
        pub total: usize,
        pub move_and_rename: usize,
        pub rename_only: usize,
        pub unchanged: usize,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ReorgPlan {
        pub schema_root: PathBuf,
        pub entries: Vec<PlanEntry>,
        /// Files with no package declaration, left where they are
        pub without_package: Vec<PathBuf>,
    }

    impl ReorgPlan {
        /// Plan every `.proto` file under `schema_root`
        pub fn build(schema_root: &Path) -> Result<Self> {
            let mut entries = Vec::new();
            let mut without_package = Vec::new();

            for file in find_proto_files(schema_root) {
                let content = fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                match extract_package(&content)
                    .and_then(|package| PlanEntry::for_file(schema_root, &file, &package))
                {
                    Some(entry) => entries.push(entry),
                    None => without_package.push(file),
                }
            }

            Ok(ReorgPlan {
                schema_root: schema_root.to_path_buf(),
                entries,
                without_package,
            })
        }

        pub fn summary(&self) -> PlanSummary {
            let mut summary = PlanSummary {
                total: self.entries.len(),
                ..PlanSummary::default()
            };
            for entry in &self.entries {
                match entry.action() {
                    PlanAction::Move => summary.move_and_rename += 1,
                    PlanAction::RenameOnly => summary.rename_only += 1,
                    PlanAction::NoChange => summary.unchanged += 1,
                }
            }
            summary
        }

        /// Entries that change directory, sorted by current location
        pub fn moves(&self) -> Vec<&PlanEntry> {
            let mut moves: Vec<&PlanEntry> = self.entries.iter().filter(|e| e.needs_move()).collect();
            moves.sort_by(|a, b| a.current.cmp(&b.current));
            moves
        }

        /// Old package -> new package for every planned file, unchanged
        /// packages included (they map to themselves)
        pub fn package_table(&self) -> BTreeMap<String, String> {
            self.entries
                .iter()
                .map(|e| (e.old_package.clone(), e.new_package.clone()))
                .collect()
        }

        /// Old import path -> new import path for every moved file
        pub fn import_map(&self) -> ImportRewriteMap {
            ImportRewriteMap::new(self.moves().into_iter().map(|e| {
                (
                    relative_display(&e.current, &self.schema_root),
                    relative_display(&e.target, &self.schema_root),
                )
            }))
        }

        /// Refuse plans that would put two files in one place or move a file
        /// onto any existing file. An occupant that is itself planned to move
        /// still blocks: moves run in path order, not dependency order.
        pub fn validate(&self) -> Result<()> {
            let mut seen: BTreeMap<&Path, &Path> = BTreeMap::new();
            for entry in &self.entries {
                if let Some(other) = seen.insert(entry.target.as_path(), entry.current.as_path()) {
                    return Err(anyhow::anyhow!(
                        "{} and {} would both move to {}",
                        relative_display(other, &self.schema_root),
                        relative_display(&entry.current, &self.schema_root),
                        relative_display(&entry.target, &self.schema_root)
                    ));
                }
            }

            for entry in self.moves() {
                if entry.target.exists() {
                    return Err(anyhow::anyhow!(
                        "{} already exists; cannot move {} there",
                        relative_display(&entry.target, &self.schema_root),
                        relative_display(&entry.current, &self.schema_root)
                    ));
                }
            }
            Ok(())
        }

        /// Human-readable summary and the first planned moves
        pub fn describe(&self) -> Vec<String> {
            let summary = self.summary();
            let mut lines = vec![
                "SUMMARY:".to_string(),
                format!("  Total files: {}", format_number(summary.total)),
                format!("  Need move + package update: {}", format_number(summary.move_and_rename)),
                format!("  Need package update only: {}", format_number(summary.rename_only)),
                format!("  No changes needed: {}", format_number(summary.unchanged)),
            ];

            let moves = self.moves();
            if !moves.is_empty() {
                lines.push(String::new());
                lines.push(format!("FILES TO MOVE ({}):", format_number(moves.len())));
                for entry in moves.iter().take(LISTED_MOVES) {
                    let package_change = if entry.needs_package_update() {
                        format!(" [{} → {}]", entry.old_package, entry.new_package)
                    } else {
                        String::new()
                    };
                    lines.push(format!("  {}", relative_display(&entry.current, &self.schema_root)));
                    lines.push(format!(
                        "    → {}{}",
                        relative_display(&entry.target, &self.schema_root),
                        package_change
                    ));
                }
                if moves.len() > LISTED_MOVES {
                    lines.push(format!("  ... and {} more files", format_number(moves.len() - LISTED_MOVES)));
                }
            }
            lines
        }
    }

    /// Replace the `package old;` declaration with `package new;`
    pub fn update_package_declaration(content: &str, old_package: &str, new_package: &str) -> String {
        let pattern = format!(r"(?m)^package\s+{}\s*;", regex::escape(old_package));
        match Regex::new(&pattern) {
            Ok(re) => re
                .replace_all(content, regex::NoExpand(&format!("package {new_package};")))
                .into_owned(),
            Err(_) => content.to_string(),
        }
    }

    /// Rewrite qualified references (`ai.pipestream.data.PipeDoc`) to the new
    /// packages.
    ///
    /// `package_table` maps every known old package to its new name, with
    /// unchanged packages mapping to themselves. The longest matching old
    /// package wins, so `ai.pipestream.data.module.v1.M` stays put when that
    /// package is unchanged even though `ai.pipestream.data` moves. Names
    /// already under the new package are left alone. Import and package
    /// lines are not touched here.
    pub fn rewrite_package_references(content: &str, package_table: &BTreeMap<String, String>) -> String {
        if package_table.iter().all(|(old, new)| old == new) {
            return content.to_string();
        }

        content
            .split_inclusive('\n')
            .map(|line| {
                let trimmed = line.trim_start();
                if trimmed.starts_with("import ") || trimmed.starts_with("package ") {
                    return line.to_string();
                }
                dotted_name_regex()
                    .replace_all(line, |caps: &Captures| rewrite_dotted_name(&caps[0], package_table))
                    .into_owned()
            })
            .collect()
    }

    fn rewrite_dotted_name(name: &str, package_table: &BTreeMap<String, String>) -> String {
        let boundaries = name
            .match_indices('.')
            .map(|(i, _)| i)
            .chain(std::iter::once(name.len()))
            .collect::<Vec<_>>();

        for &end in boundaries.iter().rev() {
            let candidate = &name[..end];
            let Some(new_package) = package_table.get(candidate) else {
                continue;
            };
            if candidate == new_package || name == new_package || name.starts_with(&format!("{new_package}.")) {
                return name.to_string();
            }
            return format!("{new_package}{}", &name[end..]);
        }
        name.to_string()
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
    pub struct ExecutionReport {
        pub packages_updated: usize,
        pub files_moved: usize,
        pub files_rewritten: usize,
    }

    /// Apply `plan`. A failed move aborts the run; earlier phases are not
    /// rolled back.
    pub fn execute(plan: &ReorgPlan, mover: &mut dyn HistoryMover, logger: &mut ToolLogger) -> Result<ExecutionReport> {
        plan.validate()?;
        let mut report = ExecutionReport::default();

        logger.log("Step 1: Updating package declarations...");
        for entry in plan.entries.iter().filter(|e| e.needs_package_update()) {
            let content = fs::read_to_string(&entry.current)
                .with_context(|| format!("Failed to read {}", entry.current.display()))?;
            let updated = update_package_declaration(&content, &entry.old_package, &entry.new_package);
            fs::write(&entry.current, updated)
                .with_context(|| format!("Failed to write {}", entry.current.display()))?;
            report.packages_updated += 1;
            logger.log(&format!("  ✓ Updated {}", relative_display(&entry.current, &plan.schema_root)));
        }

        logger.log("");
        logger.log("Step 2: Moving files (preserves history)...");
        for entry in plan.moves() {
            let from = relative_display(&entry.current, &plan.schema_root);
            let to = relative_display(&entry.target, &plan.schema_root);
            if let Err(e) = mover.move_file(&entry.current, &entry.target) {
                logger.log(&format!("  ✗ ERROR: {e:#}"));
                return Err(e.context(format!("Moving {from} to {to}")));
            }
            report.files_moved += 1;
            logger.log(&format!("  ✓ moved {from} → {to}"));
        }

        logger.log("");
        logger.log("Step 3: Updating import statements...");
        let import_map = plan.import_map();
        let package_table = plan.package_table();
        for file in find_proto_files(&plan.schema_root) {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let (imports_fixed, _) = import_map.rewrite(&content);
            let rewritten = rewrite_package_references(&imports_fixed, &package_table);
            if rewritten != content {
                fs::write(&file, rewritten).with_context(|| format!("Failed to write {}", file.display()))?;
                report.files_rewritten += 1;
            }
        }
        logger.log(&format!(
            "  ✓ Updated imports in {} files",
            format_number(report.files_rewritten)
        ));

        Ok(report)
    }
}
