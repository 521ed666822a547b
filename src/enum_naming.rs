// Copyright (C) Brian G. Milnes 2025

//! Enum naming fixes for one schema tree: group violations by file, scan each
//! file's enums, plan the renames and patch the file.

pub mod enum_naming {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;

    use anyhow::{Context, Result};
    use serde::Serialize;

    use crate::enum_scanner::enum_scanner::scan_enums;
    use crate::lint_output::lint_output::ViolationRecord;
    use crate::patch::patch::{apply_line_edits, apply_to_file, PatchError};
    use crate::rename_planner::rename_planner::{plan_file, FilePlan};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FileStatus {
        /// The reported file does not exist under the schema root
        Missing,
        /// Nothing to change
        Unchanged,
        /// Edits planned but not written
        DryRun,
        /// Edits written
        Applied,
        /// Edits could not be applied; the file is untouched
        Rejected(String),
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct FileReport {
        pub file: String,
        pub status: FileStatus,
        pub plan: FilePlan,
    }

    impl FileReport {
        pub fn applied(&self) -> usize {
            if self.status == FileStatus::Applied {
                self.plan.edit_count()
            } else {
                0
            }
        }
    }

    /// Group violations by schema-relative file, files sorted, report order
    /// kept within a file
    pub fn group_by_file(violations: Vec<ViolationRecord>) -> BTreeMap<String, Vec<ViolationRecord>> {
        let mut by_file: BTreeMap<String, Vec<ViolationRecord>> = BTreeMap::new();
        for violation in violations {
            by_file.entry(violation.file.clone()).or_default().push(violation);
        }
        by_file
    }

    /// Plan and (unless `dry_run`) apply the fixes for one file.
    ///
    /// A missing file or a rejected patch is reported in the returned status;
    /// only I/O failures on an existing file are errors.
    pub fn fix_file(
        schema_root: &Path,
        rel_path: &str,
        violations: &[ViolationRecord],
        dry_run: bool,
    ) -> Result<FileReport> {
        let path = schema_root.join(rel_path);
        if !path.is_file() {
            return Ok(FileReport {
                file: rel_path.to_string(),
                status: FileStatus::Missing,
                plan: FilePlan::default(),
            });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let plan = plan_file(violations, &scan_enums(&content));

        let status = if plan.edit_count() == 0 {
            FileStatus::Unchanged
        } else {
            let edits = plan.all_edits();
            if dry_run {
                match apply_line_edits(&content, &edits) {
                    Ok(_) => FileStatus::DryRun,
                    Err(e) => FileStatus::Rejected(e.to_string()),
                }
            } else {
                match apply_to_file(&path, &edits) {
                    Ok(_) => FileStatus::Applied,
                    Err(e) => match e.downcast_ref::<PatchError>() {
                        Some(patch_error) => FileStatus::Rejected(patch_error.to_string()),
                        None => return Err(e),
                    },
                }
            }
        };

        Ok(FileReport {
            file: rel_path.to_string(),
            status,
            plan,
        })
    }
}
