// Copyright (C) Brian G. Milnes 2025

//! End-to-end tests for the protofix binaries and the dispatcher

mod common;

use std::process::{Command, Output};

use anyhow::Result;
use common::{get_binary_path, SchemaTree, CAPABILITY_PROTO};
use serial_test::serial;

fn run(binary: &str, args: &[&str]) -> Output {
    Command::new(get_binary_path(binary))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run {binary}: {e}"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok_and(|o| o.status.success())
}

fn git(tree: &SchemaTree, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(tree.repo())
        .status()
        .expect("git runs");
    assert!(status.success(), "git {args:?} failed");
}

#[test]
#[serial]
fn test_fix_enum_naming_offline() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("ai/pipestream/data/module/v1/module_service.proto", CAPABILITY_PROTO)?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix-fix-enum-naming", &["-C", &repo, "--offline"]);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("Entering directory"));
    assert!(out.contains("Processing: ai/pipestream/data/module/v1/module_service.proto"));
    assert!(out.contains("CapabilityType.TYPE_CHUNKER → CAPABILITY_TYPE_CHUNKER"));
    assert!(out.contains("Remaining enum errors: 0"));
    assert!(out.contains("Summary: 7 violations in 1 files, 5 fixes applied, 0 warnings"));
    assert!(out.contains("Completed in"));

    let fixed = tree.read("ai/pipestream/data/module/v1/module_service.proto")?;
    assert!(fixed.contains("  CAPABILITY_TYPE_UNSPECIFIED = 0;\n"));
    assert!(fixed.contains("  INTENT_UNSPECIFIED = 0;\n"));
    Ok(())
}

#[test]
#[serial]
fn test_fix_enum_naming_dry_run_leaves_files() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("a.proto", CAPABILITY_PROTO)?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix-fix-enum-naming", &["-C", &repo, "--offline", "--dry-run"]);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("Would apply 5 fixes"));
    assert!(out.contains("DRY RUN - No changes made"));
    assert!(out.contains("Summary: 7 violations in 1 files, 0 fixes applied, 0 warnings"));
    assert!(!out.contains("Verifying..."));
    assert_eq!(tree.read("a.proto")?, CAPABILITY_PROTO);
    Ok(())
}

#[cfg(unix)]
#[test]
#[serial]
fn test_fix_enum_naming_with_lint_program() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tree = SchemaTree::new()?;
    tree.write("a.proto", CAPABILITY_PROTO)?;

    // Reports PARSER until it has been renamed
    let script = tree.repo().join("fake-buf.sh");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         if grep -q ' PARSER = 1;' src/main/proto/a.proto; then\n\
         \x20 echo 'src/main/proto/a.proto:11:3:Enum value name \"PARSER\" should be prefixed with \"CAPABILITY_TYPE_\".'\n\
         \x20 exit 100\n\
         fi\n\
         exit 0\n",
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    let repo = tree.repo().to_string_lossy().into_owned();
    let program = script.to_string_lossy().into_owned();
    let output = run("protofix-fix-enum-naming", &["-C", &repo, "--lint-program", &program]);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("Linter reported 1 enum lines, 1 naming violations"));
    assert!(out.contains("Remaining enum errors: 0"));
    assert!(out.contains("Summary: 1 violations in 1 files, 1 fixes applied, 0 warnings"));

    let fixed = tree.read("a.proto")?;
    assert!(fixed.contains("  CAPABILITY_TYPE_PARSER = 1;\n"));
    // Values the linter did not report stay as they were
    assert!(fixed.contains("  TYPE_CHUNKER = 2;\n"));
    Ok(())
}

#[test]
#[serial]
fn test_fix_enum_naming_missing_lint_program_fails() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("a.proto", CAPABILITY_PROTO)?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run(
        "protofix-fix-enum-naming",
        &["-C", &repo, "--lint-program", "protofix-no-such-linter"],
    );
    assert!(!output.status.success());
    assert_eq!(tree.read("a.proto")?, CAPABILITY_PROTO);
    Ok(())
}

#[test]
#[serial]
fn test_fix_imports() -> Result<()> {
    let tree = SchemaTree::new()?;
    let original = "syntax = \"proto3\";\nimport \"core/pipeline_core_types.proto\";\n";
    tree.write("ai/pipestream/engine/v1/engine.proto", original)?;
    tree.write("ai/pipestream/other/v1/other.proto", "syntax = \"proto3\";\n")?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix-fix-imports", &["-C", &repo, "--dry-run"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Summary: 2 files checked, Would fix imports in 1 files"));
    assert_eq!(tree.read("ai/pipestream/engine/v1/engine.proto")?, original);

    let output = run("protofix-fix-imports", &["-C", &repo]);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains(
        "ai/pipestream/engine/v1/engine.proto: core/pipeline_core_types.proto → ai/pipestream/data/v1/pipeline_core_types.proto"
    ));
    assert!(out.contains("Summary: 2 files checked, Fixed imports in 1 files"));
    assert!(tree
        .read("ai/pipestream/engine/v1/engine.proto")?
        .contains("import \"ai/pipestream/data/v1/pipeline_core_types.proto\";"));
    Ok(())
}

#[test]
#[serial]
fn test_reorganize_dry_run() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("core/pipeline_core_types.proto", "package ai.pipestream.data;\n")?;
    tree.write("ai/pipestream/engine/v1/engine.proto", "package ai.pipestream.engine.v1;\n")?;
    tree.write("loose.proto", "syntax = \"proto3\";\n")?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix-reorganize", &["-C", &repo]);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Warning: No package found in loose.proto"));
    assert!(out.contains("PROTO REORGANIZATION PLAN"));
    assert!(out.contains("FILES TO MOVE (1):"));
    assert!(out.contains("DRY RUN - No changes made"));
    assert!(out.contains("Summary: 2 files planned, 1 to move, 0 package updates only"));

    assert!(tree.exists("core/pipeline_core_types.proto"));
    assert!(!tree.exists("ai/pipestream/data/v1/pipeline_core_types.proto"));
    Ok(())
}

#[test]
#[serial]
fn test_reorganize_execute_with_git() -> Result<()> {
    if !git_available() {
        eprintln!("git not found, skipping");
        return Ok(());
    }
    let tree = SchemaTree::new()?;
    tree.write("core/pipeline_core_types.proto", "package ai.pipestream.data;\n\nmessage PipeDoc {}\n")?;
    tree.write(
        "ai/pipestream/engine/v1/engine.proto",
        "package ai.pipestream.engine.v1;\n\nimport \"core/pipeline_core_types.proto\";\n\nmessage Step {\n  ai.pipestream.data.PipeDoc doc = 1;\n}\n",
    )?;
    git(&tree, &["init", "-q"]);
    git(&tree, &["add", "-A"]);

    let repo = tree.repo().to_string_lossy().into_owned();
    let output = run("protofix-reorganize", &["-C", &repo, "--execute"]);
    let out = stdout(&output);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(out.contains("Summary: 1 package declarations updated, 1 files moved, 1 files rewritten"));

    assert!(!tree.exists("core/pipeline_core_types.proto"));
    assert!(tree
        .read("ai/pipestream/data/v1/pipeline_core_types.proto")?
        .starts_with("package ai.pipestream.data.v1;\n"));
    let engine = tree.read("ai/pipestream/engine/v1/engine.proto")?;
    assert!(engine.contains("import \"ai/pipestream/data/v1/pipeline_core_types.proto\";"));
    assert!(engine.contains("ai.pipestream.data.v1.PipeDoc doc = 1;"));
    Ok(())
}

#[test]
#[serial]
fn test_dispatcher_no_args() {
    let output = run("protofix", &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage: protofix <tool>"));
}

#[test]
#[serial]
fn test_dispatcher_help() {
    let output = run("protofix", &["--help"]);
    assert!(output.status.success());
    let err = stderr(&output);
    for tool in ["fix-enum-naming", "fix-imports", "reorganize"] {
        assert!(err.contains(tool), "usage should list {tool}");
    }
}

#[test]
#[serial]
fn test_dispatcher_unknown_tool() {
    let output = run("protofix", &["nonexistent"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown tool 'nonexistent'"));
}

#[test]
#[serial]
fn test_dispatcher_forwards_arguments() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("a.proto", "import \"module/module_service.proto\";\n")?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix", &["fix-imports", "-C", &repo, "-n"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Would fix imports in 1 files"));
    Ok(())
}

#[test]
#[serial]
fn test_fix_enum_naming_json_output_is_pure_json() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("a.proto", CAPABILITY_PROTO)?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix-fix-enum-naming", &["-C", &repo, "--offline", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(report["violations"], 7);
    assert_eq!(report["applied"], 5);
    assert_eq!(report["remaining"], 0);
    assert_eq!(report["reports"][0]["file"], "a.proto");
    assert_eq!(report["reports"][0]["status"], "applied");
    Ok(())
}

#[test]
#[serial]
fn test_reorganize_json_output_is_pure_json() -> Result<()> {
    let tree = SchemaTree::new()?;
    tree.write("core/pipeline_core_types.proto", "package ai.pipestream.data;\n")?;
    let repo = tree.repo().to_string_lossy().into_owned();

    let output = run("protofix-reorganize", &["-C", &repo, "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let plan: serde_json::Value = serde_json::from_str(&stdout(&output))?;
    assert_eq!(plan["summary"]["move_and_rename"], 1);
    assert_eq!(plan["plan"]["entries"][0]["new_package"], "ai.pipestream.data.v1");
    assert!(plan["report"].is_null());
    assert!(tree.exists("core/pipeline_core_types.proto"));
    Ok(())
}
