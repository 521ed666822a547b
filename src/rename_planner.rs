// Copyright (C) Brian G. Milnes 2025

//! Rename planner: decide the corrected enum value name for each violation
//!
//! Rules:
//! 1. Enum values must be prefixed with ENUM_TYPE_NAME_
//! 2. The zero value must be ENUM_TYPE_NAME_UNSPECIFIED

pub mod rename_planner {
    use std::collections::BTreeSet;

    use serde::Serialize;

    use crate::affix::affix::{words, zero_value_name, SEPARATOR, UNSPECIFIED};
    use crate::enum_scanner::enum_scanner::EnumScan;
    use crate::lint_output::lint_output::{AffixKind, ViolationRecord};
    use crate::patch::patch::LineEdit;

    /// Edits for the values of one enum
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct RenamePlan {
        pub block: String,
        /// Sorted by line, one edit per line
        pub edits: Vec<LineEdit>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RenameDecision {
        Rename(String),
        AlreadyCorrect,
        Unexpected(String),
    }

    /// Everything planned for one file, plus what could not be planned
    #[derive(Debug, Clone, Default, Serialize)]
    pub struct FilePlan {
        pub plans: Vec<RenamePlan>,
        /// Violations whose (line, name) matched no scanned enum member
        pub unresolved: Vec<ViolationRecord>,
        /// Violations with an affix shape the planner doesn't handle
        pub unexpected: Vec<(ViolationRecord, String)>,
    }

    impl FilePlan {
        pub fn edit_count(&self) -> usize {
            self.plans.iter().map(|p| p.edits.len()).sum()
        }

        /// All edits of all blocks, for the patch applier
        pub fn all_edits(&self) -> Vec<LineEdit> {
            self.plans.iter().flat_map(|p| p.edits.iter().cloned()).collect()
        }
    }

    /// Prepend `prefix` to `current`, dropping the words of `current` that the
    /// prefix already supplies.
    ///
    /// Two overlaps are recognized and the longer one wins:
    /// - leading words shared with the prefix (`CAPABILITY_PARSER` vs
    ///   `CAPABILITY_TYPE_`)
    /// - leading words that repeat the tail of the prefix (`TYPE_PARSER` vs
    ///   `CAPABILITY_TYPE_`)
    ///
    /// The rest of `current` is kept as written, doubled separators included
    /// (`LEGACY__RAW` with `FORMAT_` gives `FORMAT_LEGACY__RAW`).
    ///
    /// Returns `None` when nothing of `current` would be left.
    pub fn apply_prefix(current: &str, prefix: &str) -> Option<String> {
        let prefix_words = words(prefix);
        let current_words: Vec<&str> = current.split(SEPARATOR).collect();

        let leading = prefix_words
            .iter()
            .zip(current_words.iter())
            .take_while(|(p, c)| p == c)
            .count();

        let max_overlap = prefix_words.len().min(current_words.len());
        let tail = (1..=max_overlap)
            .rev()
            .find(|&k| prefix_words[prefix_words.len() - k..] == current_words[..k])
            .unwrap_or(0);

        let consumed = leading.max(tail);
        let remainder = current_words[consumed..].join(&SEPARATOR.to_string());
        if remainder.is_empty() {
            return None;
        }

        let mut fixed = prefix.to_string();
        if !fixed.ends_with(SEPARATOR) {
            fixed.push(SEPARATOR);
        }
        fixed.push_str(&remainder);
        Some(fixed)
    }

    /// Decide the replacement for one violation inside enum `block_name`
    pub fn decide_rename(violation: &ViolationRecord, block_name: &str) -> RenameDecision {
        let affix = violation.affix.as_str();
        let zero_suffix = format!("{SEPARATOR}{UNSPECIFIED}");

        let fixed = if affix.contains(&zero_suffix) {
            zero_value_name(block_name)
        } else if violation.kind == AffixKind::Prefix && affix.ends_with(SEPARATOR) {
            if violation.current.starts_with(affix) {
                return RenameDecision::AlreadyCorrect;
            }
            match apply_prefix(&violation.current, affix) {
                Some(fixed) => fixed,
                None => {
                    return RenameDecision::Unexpected(format!(
                        "prefixing {} with {} leaves an empty value name",
                        violation.current, affix
                    ))
                }
            }
        } else {
            return RenameDecision::Unexpected(format!("Unexpected affix pattern: {affix}"));
        };

        if fixed == violation.current {
            RenameDecision::AlreadyCorrect
        } else {
            RenameDecision::Rename(fixed)
        }
    }

    fn is_zero_value(violation: &ViolationRecord) -> bool {
        violation.affix.contains(&format!("{SEPARATOR}{UNSPECIFIED}"))
    }

    /// Plan the renames for one file.
    ///
    /// When the zero value is reported by both rules, only the zero-value
    /// rename is kept: `ENUM_UNSPECIFIED` satisfies the prefix rule as well.
    pub fn plan_file(violations: &[ViolationRecord], scan: &EnumScan) -> FilePlan {
        let mut result = FilePlan::default();

        let zero_lines: BTreeSet<(usize, &str)> = violations
            .iter()
            .filter(|v| is_zero_value(v))
            .map(|v| (v.line, v.current.as_str()))
            .collect();

        for violation in violations {
            let Some(block) = scan.owning_block(violation.line, &violation.current) else {
                result.unresolved.push(violation.clone());
                continue;
            };

            if !is_zero_value(violation) && zero_lines.contains(&(violation.line, violation.current.as_str())) {
                continue;
            }

            let new_name = match decide_rename(violation, &block.name) {
                RenameDecision::Rename(new_name) => new_name,
                RenameDecision::AlreadyCorrect => continue,
                RenameDecision::Unexpected(reason) => {
                    result.unexpected.push((violation.clone(), reason));
                    continue;
                }
            };

            let edit = LineEdit::new(violation.line, &violation.current, &new_name);
            match result.plans.iter_mut().find(|p| p.block == block.name) {
                Some(plan) => {
                    if !plan.edits.contains(&edit) {
                        plan.edits.push(edit);
                    }
                }
                None => result.plans.push(RenamePlan {
                    block: block.name.clone(),
                    edits: vec![edit],
                }),
            }
        }

        for plan in &mut result.plans {
            plan.edits.sort_by_key(|e| e.line);
        }

        result
    }
}
