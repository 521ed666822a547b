// Copyright (C) Brian G. Milnes 2025

//! History-preserving file moves

pub mod history_move {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Command;

    use anyhow::{Context, Result};

    /// Moves a file so version control keeps its history
    pub trait HistoryMover {
        fn move_file(&mut self, src: &Path, dest: &Path) -> Result<()>;
    }

    /// `git mv <src> <dest>` run inside the repository
    pub struct GitMover {
        repo: PathBuf,
    }

    impl GitMover {
        pub fn new(repo: &Path) -> Self {
            GitMover {
                repo: repo.to_path_buf(),
            }
        }
    }

    impl HistoryMover for GitMover {
        fn move_file(&mut self, src: &Path, dest: &Path) -> Result<()> {
            let parent = dest
                .parent()
                .with_context(|| format!("No parent directory for {}", dest.display()))?;
            let file_name = dest
                .file_name()
                .with_context(|| format!("No file name in {}", dest.display()))?;
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;

            // git runs inside the repo, so hand it absolute paths
            let src = fs::canonicalize(src)
                .with_context(|| format!("Cannot resolve {}", src.display()))?;
            let dest = fs::canonicalize(parent)
                .with_context(|| format!("Cannot resolve {}", parent.display()))?
                .join(file_name);

            let output = Command::new("git")
                .arg("mv")
                .arg(&src)
                .arg(&dest)
                .current_dir(&self.repo)
                .output()
                .context("Failed to run git mv")?;

            if !output.status.success() {
                return Err(anyhow::anyhow!(
                    "git mv failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ));
            }
            Ok(())
        }
    }
}
