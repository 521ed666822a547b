// Copyright (C) Brian G. Milnes 2025

//! Lint output: running the external linter and parsing its enum naming
//! diagnostics into violation records.
//!
//! The text format is an informal contract of the linter. All knowledge of it
//! lives in [`BufLintParser`]; callers only see [`DiagnosticParser`].
//!
//! Example line:
//! `src/main/proto/ai/pipestream/data/module/v1/module_service.proto:93:3:Enum value name "PARSER" should be prefixed with "CAPABILITY_TYPE_".`

pub mod lint_output {
    use std::fmt;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use std::sync::OnceLock;

    use anyhow::{Context, Result};
    use regex::Regex;
    use serde::Serialize;

    /// Exit status the linter uses when it ran fine and found problems
    pub const LINT_FINDINGS_EXIT_CODE: i32 = 100;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AffixKind {
        Prefix,
        ZeroValueSuffix,
    }

    /// One reported enum naming violation
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct ViolationRecord {
        /// Path relative to the schema root, forward slashes
        pub file: String,
        /// 1-based line number
        pub line: usize,
        pub current: String,
        pub affix: String,
        pub kind: AffixKind,
    }

    impl fmt::Display for ViolationRecord {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.kind {
                AffixKind::Prefix => write!(
                    f,
                    "{}:{}: value name \"{}\" should be prefixed with \"{}\"",
                    self.file, self.line, self.current, self.affix
                ),
                AffixKind::ZeroValueSuffix => write!(
                    f,
                    "{}:{}: zero value name \"{}\" should be suffixed with \"{}\"",
                    self.file, self.line, self.current, self.affix
                ),
            }
        }
    }

    /// Turns one line of linter output into a violation, or `None` when the
    /// line is not an enum naming diagnostic.
    pub trait DiagnosticParser {
        fn parse_line(&self, line: &str) -> Option<ViolationRecord>;

        fn parse_output(&self, output: &str) -> Vec<ViolationRecord> {
            output.lines().filter_map(|l| self.parse_line(l)).collect()
        }
    }

    /// Parser for buf's text diagnostics
    pub struct BufLintParser {
        path_prefix: String,
    }

    fn diagnostic_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(
                r#"^([^:]+):(\d+):\d+:Enum (zero )?value name "([^"]+)" should be (prefixed with|suffixed with) "([^"]+)""#,
            )
            .expect("diagnostic pattern is valid")
        })
    }

    impl BufLintParser {
        /// `path_prefix` is stripped from reported paths when present,
        /// e.g. `src/main/proto/`
        pub fn new(path_prefix: &str) -> Self {
            BufLintParser {
                path_prefix: path_prefix.to_string(),
            }
        }
    }

    impl DiagnosticParser for BufLintParser {
        fn parse_line(&self, line: &str) -> Option<ViolationRecord> {
            let caps = diagnostic_regex().captures(line.trim_end())?;

            let raw_path = &caps[1];
            let file = if !self.path_prefix.is_empty() {
                raw_path.strip_prefix(self.path_prefix.as_str()).unwrap_or(raw_path)
            } else {
                raw_path
            };
            let line_num: usize = caps[2].parse().ok()?;
            let kind = if &caps[5] == "suffixed with" {
                AffixKind::ZeroValueSuffix
            } else {
                AffixKind::Prefix
            };

            Some(ViolationRecord {
                file: file.to_string(),
                line: line_num,
                current: caps[4].to_string(),
                affix: caps[6].to_string(),
                kind,
            })
        }
    }

    /// Raw output of one linter run
    #[derive(Debug, Clone)]
    pub struct LintReport {
        pub stdout: String,
        pub exit_code: Option<i32>,
    }

    impl LintReport {
        /// Lines that mention enums at all, parsed or not
        pub fn enum_line_count(&self) -> usize {
            self.stdout
                .lines()
                .filter(|l| l.to_lowercase().contains("enum"))
                .count()
        }
    }

    /// How to invoke the external linter
    #[derive(Debug, Clone)]
    pub struct LintCommand {
        pub program: String,
        pub args: Vec<String>,
        /// Directory the linter runs in
        pub workdir: PathBuf,
    }

    impl LintCommand {
        /// `buf lint <proto_root>` run from `repo`
        pub fn buf(program: &str, repo: &Path, proto_root: &Path) -> Self {
            LintCommand {
                program: program.to_string(),
                args: vec!["lint".to_string(), proto_root.to_string_lossy().into_owned()],
                workdir: repo.to_path_buf(),
            }
        }

        /// Run the linter and capture its stdout (buf reports there, not on
        /// stderr). Exit 0 and the findings code are normal; anything else is
        /// a failure carrying the linter's own error text.
        pub fn run(&self) -> Result<LintReport> {
            let output = Command::new(&self.program)
                .args(&self.args)
                .current_dir(&self.workdir)
                .output()
                .with_context(|| format!("Failed to run {} {}", self.program, self.args.join(" ")))?;

            let exit_code = output.status.code();
            if !matches!(exit_code, Some(0) | Some(LINT_FINDINGS_EXIT_CODE)) {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(anyhow::anyhow!(
                    "{} {} failed ({}): {}",
                    self.program,
                    self.args.join(" "),
                    output.status,
                    stderr.trim()
                ));
            }

            Ok(LintReport {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                exit_code,
            })
        }
    }
}
