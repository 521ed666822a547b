// Copyright (C) Brian G. Milnes 2025

//! Local enum naming check, for runs without the external linter.
//!
//! Emits the same violation records the lint parser would, for the two rules
//! the enum fixer repairs: value prefix and zero-value suffix.

pub mod naming_rules {
    use std::fs;
    use std::path::Path;

    use anyhow::{Context, Result};

    use crate::affix::affix::{derive_prefix, SEPARATOR, UNSPECIFIED};
    use crate::args::args::{find_proto_files, relative_display};
    use crate::enum_scanner::enum_scanner::scan_enums;
    use crate::lint_output::lint_output::{AffixKind, ViolationRecord};

    /// Check one file's content. `file` is the schema-relative path recorded
    /// in each violation.
    pub fn check_content(file: &str, content: &str) -> Vec<ViolationRecord> {
        let zero_suffix = format!("{SEPARATOR}{UNSPECIFIED}");
        let mut violations = Vec::new();

        for block in scan_enums(content).blocks {
            let prefix = derive_prefix(&block.name);
            for member in &block.members {
                if member.number == 0 && !member.name.ends_with(&zero_suffix) {
                    violations.push(ViolationRecord {
                        file: file.to_string(),
                        line: member.line,
                        current: member.name.clone(),
                        affix: zero_suffix.clone(),
                        kind: AffixKind::ZeroValueSuffix,
                    });
                }
                if !member.name.starts_with(&prefix) {
                    violations.push(ViolationRecord {
                        file: file.to_string(),
                        line: member.line,
                        current: member.name.clone(),
                        affix: prefix.clone(),
                        kind: AffixKind::Prefix,
                    });
                }
            }
        }

        violations
    }

    /// Check every `.proto` file under `schema_root`
    pub fn check_tree(schema_root: &Path) -> Result<Vec<ViolationRecord>> {
        let mut violations = Vec::new();
        for file in find_proto_files(schema_root) {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            violations.extend(check_content(&relative_display(&file, schema_root), &content));
        }
        Ok(violations)
    }
}
