// Copyright (C) Brian G. Milnes 2025

//! Shared command-line arguments and file discovery for protofix tools
//!
//! Every tool works against an explicit repository directory and a schema
//! root inside it. Nothing changes the process working directory.

pub mod args {
    use std::path::{Path, PathBuf};

    use clap::Args;
    use walkdir::WalkDir;

    /// Default schema root, relative to the repository directory
    pub const DEFAULT_PROTO_ROOT: &str = "src/main/proto";

    /// Arguments common to every protofix binary
    #[derive(Args, Debug, Clone)]
    pub struct RootArgs {
        /// Repository directory (lint and git commands run here)
        #[arg(short = 'C', long = "repo", default_value = ".")]
        pub repo: PathBuf,

        /// Schema root relative to the repository directory
        #[arg(long, default_value = DEFAULT_PROTO_ROOT)]
        pub proto_root: PathBuf,

        /// Also write output to logs/<tool>/<date>/run-<time>.log
        #[arg(long)]
        pub log: bool,
    }

    impl RootArgs {
        pub fn new(repo: impl Into<PathBuf>, proto_root: impl Into<PathBuf>) -> Self {
            RootArgs {
                repo: repo.into(),
                proto_root: proto_root.into(),
                log: false,
            }
        }

        /// Absolute (or repo-relative) path of the schema root
        pub fn schema_root(&self) -> PathBuf {
            self.repo.join(&self.proto_root)
        }

        /// The prefix the lint tool puts in front of schema-relative paths,
        /// e.g. `src/main/proto/`
        pub fn lint_path_prefix(&self) -> String {
            let mut prefix = self.proto_root.to_string_lossy().replace('\\', "/");
            while prefix.starts_with("./") {
                prefix = prefix[2..].to_string();
            }
            if !prefix.is_empty() && !prefix.ends_with('/') {
                prefix.push('/');
            }
            prefix
        }
    }

    /// Find all `.proto` files under `root`, sorted
    pub fn find_proto_files(root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("proto"))
            .collect();
        files.sort();
        files
    }

    /// Path of `file` relative to `root` with forward slashes, or the full path
    /// when `file` is not under `root`
    pub fn relative_display(file: &Path, root: &Path) -> String {
        file.strip_prefix(root)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Format a number with thousands separators (1234 -> "1,234")
    pub fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

}
