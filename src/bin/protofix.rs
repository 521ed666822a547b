//! Protofix: dispatcher for the migration tools
//!
//! Usage: protofix <tool> [args...]
//!
//! Examples:
//!   protofix fix-enum-naming -C ~/src/pipestream-protos
//!   protofix fix-imports --dry-run
//!   protofix reorganize --execute

use std::env;
use std::process::{exit, Command};

const TOOLS: &[(&str, &str)] = &[
    ("fix-enum-naming", "Rename enum values flagged by buf lint"),
    ("fix-imports", "Rewrite import paths to the new layout"),
    ("reorganize", "Move files to match their versioned package"),
];

fn print_usage() {
    eprintln!("Usage: protofix <tool> [args...]");
    eprintln!();
    eprintln!("Available tools:");
    for (name, about) in TOOLS {
        eprintln!("  {name:<20} - {about}");
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  protofix fix-enum-naming -C ~/src/pipestream-protos");
    eprintln!("  protofix reorganize --execute");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        exit(1);
    }

    let tool_name = &args[1];
    if tool_name == "--help" || tool_name == "-h" {
        print_usage();
        exit(0);
    }
    if !TOOLS.iter().any(|(name, _)| name == tool_name) {
        eprintln!("Error: Unknown tool '{tool_name}'");
        eprintln!();
        print_usage();
        exit(1);
    }

    let binary_name = format!("protofix-{tool_name}");

    // Sibling binaries live next to this one
    let current_exe = env::current_exe().unwrap_or_else(|_| {
        eprintln!("Error: Could not determine current executable path");
        exit(1);
    });
    let bin_dir = current_exe.parent().unwrap_or_else(|| {
        eprintln!("Error: Could not determine binary directory");
        exit(1);
    });
    let target_binary = bin_dir.join(format!("{binary_name}{}", env::consts::EXE_SUFFIX));

    if !target_binary.exists() {
        eprintln!("Error: Tool '{tool_name}' not found");
        eprintln!("Expected binary: {}", target_binary.display());
        exit(1);
    }

    let status = Command::new(&target_binary)
        .args(&args[2..])
        .status()
        .unwrap_or_else(|e| {
            eprintln!("Error executing {binary_name}: {e}");
            exit(1);
        });

    exit(status.code().unwrap_or(1));
}
