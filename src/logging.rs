// Copyright (C) Brian G. Milnes 2025

//! Logging for protofix tools
//!
//! Output always goes to the terminal. With `--log`, every line is also
//! written to logs/<tool-name>/<YYYY-MM-DD>/run-<HH-MM-SS>.log so a migration
//! run leaves a record of exactly what was renamed and moved.

pub mod logging {
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use chrono::{DateTime, Local};

    pub struct ToolLogger {
        log_file: Option<fs::File>,
        log_path: Option<PathBuf>,
        start_time: DateTime<Local>,
        warnings: usize,
        /// Keep stdout free for machine-readable output
        quiet: bool,
    }

    impl ToolLogger {
        /// Terminal-only logger
        pub fn new_disabled() -> Self {
            ToolLogger {
                log_file: None,
                log_path: None,
                start_time: Local::now(),
                warnings: 0,
                quiet: false,
            }
        }

        /// Logger that prints nothing to stdout; warnings still go to stderr
        pub fn new_quiet() -> Self {
            let mut logger = Self::new_disabled();
            logger.quiet = true;
            logger
        }

        /// Logger that also writes under `log_root`/<tool-name>/<date>/.
        /// If the file cannot be created the run continues terminal-only.
        pub fn new(tool_name: &str, log_root: &Path) -> Self {
            let start_time = Local::now();
            let (log_file, log_path) = match Self::create_log_file(tool_name, log_root, &start_time) {
                Ok((file, path)) => (Some(file), Some(path)),
                Err(e) => {
                    eprintln!("Warning: Could not create log file: {e}");
                    eprintln!("Continuing without logging...");
                    (None, None)
                }
            };

            ToolLogger {
                log_file,
                log_path,
                start_time,
                warnings: 0,
                quiet: false,
            }
        }

        fn create_log_file(
            tool_name: &str,
            log_root: &Path,
            start_time: &DateTime<Local>,
        ) -> Result<(fs::File, PathBuf)> {
            let log_dir = log_root
                .join(tool_name)
                .join(start_time.format("%Y-%m-%d").to_string());
            fs::create_dir_all(&log_dir)?;

            let log_path = log_dir.join(format!("run-{}.log", start_time.format("%H-%M-%S")));
            let log_file = fs::File::create(&log_path)?;
            Ok((log_file, log_path))
        }

        /// Log a message to stdout and the log file
        pub fn log(&mut self, message: &str) {
            if !self.quiet {
                println!("{message}");
            }
            self.write_file(message);
        }

        /// Log a non-fatal problem to stderr and the log file
        pub fn warn(&mut self, message: &str) {
            self.warnings += 1;
            eprintln!("Warning: {message}");
            self.write_file(&format!("Warning: {message}"));
        }

        /// Number of warnings logged so far
        pub fn warnings(&self) -> usize {
            self.warnings
        }

        fn write_file(&mut self, message: &str) {
            if let Some(ref mut file) = self.log_file {
                let _ = writeln!(file, "{message}");
            }
        }

        /// Append the run summary: start, end, duration and log location
        pub fn finalize(&mut self, summary: &str) {
            let end_time = Local::now();
            let duration = end_time.signed_duration_since(self.start_time);

            self.write_file("");
            self.write_file("=== Run Summary ===");
            self.write_file(summary);
            self.write_file(&format!("Warnings: {}", self.warnings));
            self.write_file(&format!("Started: {}", self.start_time.format("%Y-%m-%d %H:%M:%S")));
            self.write_file(&format!("Ended: {}", end_time.format("%Y-%m-%d %H:%M:%S")));
            self.write_file(&format!("Duration: {}ms", duration.num_milliseconds()));

            if let Some(path) = self.log_path.clone() {
                self.log(&format!("Log saved to: {}", path.display()));
            }
        }
    }

    impl Drop for ToolLogger {
        fn drop(&mut self) {
            if let Some(ref mut file) = self.log_file {
                let _ = file.flush();
            }
        }
    }
}
