// Copyright (C) Brian G. Milnes 2025

//! Patch applier: single-line token substitutions, applied to a whole file
//! in one read and one write.

pub mod patch {
    use std::fs;
    use std::path::Path;

    use anyhow::{Context, Result};
    use serde::Serialize;
    use thiserror::Error;

    /// Replace the first `old` on `line` (1-based) with `new`
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
    pub struct LineEdit {
        pub line: usize,
        pub old: String,
        pub new: String,
    }

    impl LineEdit {
        pub fn new(line: usize, old: &str, new: &str) -> Self {
            LineEdit {
                line,
                old: old.to_string(),
                new: new.to_string(),
            }
        }
    }

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum PatchError {
        #[error("line {line} is past the end of the file ({lines} lines)")]
        LineOutOfRange { line: usize, lines: usize },
        #[error("line {line} does not contain {old:?}")]
        TokenNotFound { line: usize, old: String },
        #[error("line {line} has conflicting edits: {first:?} -> {first_new:?} and {second:?} -> {second_new:?}")]
        Conflict {
            line: usize,
            first: String,
            first_new: String,
            second: String,
            second_new: String,
        },
    }

    /// Apply `edits` to `content`.
    ///
    /// Identical duplicate edits collapse into one; two different edits on the
    /// same line are a conflict and nothing is applied. Edits run from the
    /// bottom of the file up. Line terminators are kept byte for byte.
    pub fn apply_line_edits(content: &str, edits: &[LineEdit]) -> Result<String, PatchError> {
        let mut ordered: Vec<&LineEdit> = edits.iter().collect();
        ordered.sort_by(|a, b| b.cmp(a));
        ordered.dedup();

        for pair in ordered.windows(2) {
            if pair[0].line == pair[1].line {
                return Err(PatchError::Conflict {
                    line: pair[0].line,
                    first: pair[1].old.clone(),
                    first_new: pair[1].new.clone(),
                    second: pair[0].old.clone(),
                    second_new: pair[0].new.clone(),
                });
            }
        }

        let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

        for edit in ordered {
            if edit.line == 0 || edit.line > lines.len() {
                return Err(PatchError::LineOutOfRange {
                    line: edit.line,
                    lines: lines.len(),
                });
            }
            let target = &mut lines[edit.line - 1];
            if !target.contains(edit.old.as_str()) {
                return Err(PatchError::TokenNotFound {
                    line: edit.line,
                    old: edit.old.clone(),
                });
            }
            *target = target.replacen(edit.old.as_str(), &edit.new, 1);
        }

        Ok(lines.concat())
    }

    /// Read `path`, apply `edits`, write it back. Returns the number of edits
    /// applied after collapsing duplicates.
    pub fn apply_to_file(path: &Path, edits: &[LineEdit]) -> Result<usize> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let patched = apply_line_edits(&content, edits)
            .with_context(|| format!("Cannot patch {}", path.display()))?;
        fs::write(path, patched).with_context(|| format!("Failed to write {}", path.display()))?;

        let mut unique: Vec<&LineEdit> = edits.iter().collect();
        unique.sort();
        unique.dedup();
        Ok(unique.len())
    }
}
