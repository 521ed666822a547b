// Copyright (C) Brian G. Milnes 2025

//! Fix: import paths after the schema directory reshuffle
//!
//! Rewrites `import "<old>"` to `import "<new>"` in every .proto file
//! under the schema root, using the built-in path table.
//!
//! Binary: protofix-fix-imports

use anyhow::Result;
use clap::Parser;
use protofix::{find_proto_files, format_number, relative_display, run_tool, ImportRewriteMap, RootArgs, ToolConfig};

#[derive(Parser)]
#[command(name = "protofix-fix-imports")]
#[command(about = "Rewrite schema import paths to the new directory layout", long_about = None)]
struct Args {
    #[command(flatten)]
    root: RootArgs,

    /// Show the rewrites without writing files
    #[arg(short = 'n', long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let schema_root = args.root.schema_root();
    let config = ToolConfig::new("fix-imports", args.root.repo.clone()).with_logging(args.root.log);

    run_tool(config, |logger| {
        let map = ImportRewriteMap::builtin();
        logger.log(&format!("Fixing import paths ({} mappings)...", format_number(map.len())));
        logger.log("");

        let files = find_proto_files(&schema_root);
        let mut fixed_count = 0;
        for file in &files {
            let changes = map.rewrite_file(file, args.dry_run)?;
            if changes.is_empty() {
                continue;
            }
            fixed_count += 1;
            let rel_path = relative_display(file, &schema_root);
            for change in &changes {
                logger.log(&format!("  {rel_path}: {} → {}", change.old, change.new));
            }
        }

        let verb = if args.dry_run { "Would fix" } else { "Fixed" };
        Ok(format!(
            "Summary: {} files checked, {verb} imports in {} files",
            format_number(files.len()),
            format_number(fixed_count)
        ))
    })
}
