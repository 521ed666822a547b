// Copyright (C) Brian G. Milnes 2025

//! Tool runner shared by the protofix binaries
//!
//! Prints the directory context (for Emacs compile-mode), sets up the
//! logger, runs the tool body and prints its summary with timing.

pub mod tool_runner {
    use std::path::PathBuf;
    use std::time::Instant;

    use anyhow::Result;

    use crate::logging::logging::ToolLogger;

    pub struct ToolConfig {
        /// Name of the tool (log directory name)
        pub tool_name: String,
        /// Directory shown in "Entering directory"
        pub base_dir: PathBuf,
        /// Whether to also log to a file under `base_dir/logs`
        pub enable_logging: bool,
    }

    impl ToolConfig {
        pub fn new(tool_name: &str, base_dir: PathBuf) -> Self {
            ToolConfig {
                tool_name: tool_name.to_string(),
                base_dir,
                enable_logging: false,
            }
        }

        pub fn with_logging(mut self, enable: bool) -> Self {
            self.enable_logging = enable;
            self
        }
    }

    /// Run a tool body with standard context, timing and optional file logging.
    ///
    /// The body returns its one-line summary. Errors from the body propagate
    /// unchanged so `main` reports them and exits non-zero.
    pub fn run_tool<F>(config: ToolConfig, tool_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ToolLogger) -> Result<String>,
    {
        let start = Instant::now();

        let mut logger = if config.enable_logging {
            ToolLogger::new(&config.tool_name, &config.base_dir.join("logs"))
        } else {
            ToolLogger::new_disabled()
        };

        logger.log(&format!("Entering directory '{}'", config.base_dir.display()));
        logger.log("");

        let summary = tool_fn(&mut logger)?;

        logger.log("");
        logger.log(&summary);
        logger.log(&format!("Completed in {}ms", start.elapsed().as_millis()));

        if config.enable_logging {
            logger.finalize(&summary);
        }

        Ok(())
    }
}
