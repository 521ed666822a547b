// Copyright (C) Brian G. Milnes 2025

//! Common test utilities for integration tests

#![allow(dead_code)]

use anyhow::{Context, Result};
use protofix::EnumScan;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway repository with a schema root at src/main/proto
pub struct SchemaTree {
    dir: TempDir,
}

impl SchemaTree {
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        fs::create_dir_all(dir.path().join(protofix::DEFAULT_PROTO_ROOT))?;
        Ok(SchemaTree { dir })
    }

    pub fn repo(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join(protofix::DEFAULT_PROTO_ROOT)
    }

    /// Write a file relative to the schema root
    pub fn write(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Read a file relative to the schema root
    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.root().join(rel);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root().join(rel).exists()
    }
}

/// Path of a binary built alongside the test executable
pub fn get_binary_path(binary_name: &str) -> PathBuf {
    let mut path = std::env::current_exe().expect("test executable path");
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps'
    path.push(format!("{binary_name}{}", std::env::consts::EXE_SUFFIX));
    path
}

/// (line, name) pairs per scanned enum block, in file order
pub fn members_by_block(scan: &EnumScan) -> Vec<(&str, Vec<(usize, &str)>)> {
    scan.blocks
        .iter()
        .map(|b| {
            let members = b.members.iter().map(|m| (m.line, m.name.as_str())).collect();
            (b.name.as_str(), members)
        })
        .collect()
}

pub const CAPABILITY_PROTO: &str = r#"syntax = "proto3";

package ai.pipestream.data.module;

message Capability {
  string name = 1;
}

enum CapabilityType {
  UNKNOWN = 0;
  PARSER = 1;
  TYPE_CHUNKER = 2;
  CAPABILITY_EMBEDDER = 3;
}

enum Intent {
  ZERO = 0;
  INTENT_SEARCH = 1;
}
"#;
