// Copyright (C) Brian G. Milnes 2025

//! Enum scanner: line-oriented discovery of enum blocks and their values.
//!
//! Not a proto parser. A block opens on a line like `enum Name {`, members
//! are lines like `NAME = 3;`, and the block closes when the brace depth
//! returns to zero. Anything that doesn't fit those line shapes is skipped.

pub mod enum_scanner {
    use std::sync::OnceLock;

    use regex::Regex;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct EnumMember {
        /// 1-based line number
        pub line: usize,
        pub name: String,
        pub number: i64,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct EnumBlock {
        pub name: String,
        /// Members in source order
        pub members: Vec<EnumMember>,
    }

    /// All enum blocks of one file, in the order they open
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
    pub struct EnumScan {
        pub blocks: Vec<EnumBlock>,
    }

    impl EnumScan {
        /// The block declaring `name` on `line`, if any
        pub fn owning_block(&self, line: usize, name: &str) -> Option<&EnumBlock> {
            self.blocks
                .iter()
                .find(|b| b.members.iter().any(|m| m.line == line && m.name == name))
        }
    }

    fn enum_open_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*enum\s+(\w+)\s*\{").expect("enum pattern is valid"))
    }

    fn member_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\s*(\w+)\s*=\s*(-?\d+)\s*;").expect("member pattern is valid"))
    }

    fn brace_delta(line: &str) -> i64 {
        line.chars().fold(0, |depth, c| match c {
            '{' => depth + 1,
            '}' => depth - 1,
            _ => depth,
        })
    }

    /// Scan file content for enum blocks
    pub fn scan_enums(content: &str) -> EnumScan {
        let mut scan = EnumScan::default();
        // Index into scan.blocks of the block currently open
        let mut current: Option<usize> = None;
        let mut depth: i64 = 0;

        for (idx, line) in content.lines().enumerate() {
            let line_num = idx + 1;

            if let Some(caps) = enum_open_regex().captures(line) {
                scan.blocks.push(EnumBlock {
                    name: caps[1].to_string(),
                    members: Vec::new(),
                });
                depth = brace_delta(line);
                current = (depth > 0).then(|| scan.blocks.len() - 1);
                continue;
            }

            let Some(block_idx) = current else {
                continue;
            };

            depth += brace_delta(line);

            if let Some(caps) = member_regex().captures(line) {
                if let Ok(number) = caps[2].parse::<i64>() {
                    scan.blocks[block_idx].members.push(EnumMember {
                        line: line_num,
                        name: caps[1].to_string(),
                        number,
                    });
                }
            }

            if depth <= 0 {
                current = None;
            }
        }

        scan
    }
}
