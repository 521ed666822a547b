// Copyright (C) Brian G. Milnes 2025

//! Import path rewriting after the schema directory reshuffle
//!
//! `import "core/pipeline_core_types.proto";` becomes
//! `import "ai/pipestream/data/v1/pipeline_core_types.proto";`.
//! `public` and `weak` imports keep their modifier.

pub mod import_rewrite {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;
    use std::sync::OnceLock;

    use anyhow::{Context, Result};
    use regex::{Captures, Regex};

    /// Old import path -> new import path for the directory reshuffle
    pub const IMPORT_FIXES: &[(&str, &str)] = &[
        ("core/pipeline_core_types.proto", "ai/pipestream/data/v1/pipeline_core_types.proto"),
        ("core/pipeline_config_models.proto", "ai/pipestream/config/v1/pipeline_config_models.proto"),
        ("core/repository_service_data.proto", "ai/pipestream/repository/v1/repository_service_data.proto"),
        ("module/module_service.proto", "ai/pipestream/data/module/v1/module_service.proto"),
        ("opensearch-manager/opensearch_document.proto", "ai/pipestream/opensearch/v1/opensearch_document.proto"),
        // Tika metadata
        ("module/parser/tika/tika_base_metadata.proto", "ai/pipestream/parsed/data/tika/base/v1/tika_base_metadata.proto"),
        ("module/parser/tika/dublin_core.proto", "ai/pipestream/parsed/data/dublin/v1/dublin_core.proto"),
        ("module/parser/tika/office_metadata.proto", "ai/pipestream/parsed/data/office/v1/office_metadata.proto"),
        ("module/parser/tika/pdf_metadata.proto", "ai/pipestream/parsed/data/pdf/v1/pdf_metadata.proto"),
        ("module/parser/tika/image_metadata.proto", "ai/pipestream/parsed/data/image/v1/image_metadata.proto"),
        ("module/parser/tika/email_metadata.proto", "ai/pipestream/parsed/data/email/v1/email_metadata.proto"),
        ("module/parser/tika/media_metadata.proto", "ai/pipestream/parsed/data/media/v1/media_metadata.proto"),
        ("module/parser/tika/html_metadata.proto", "ai/pipestream/parsed/data/html/v1/html_metadata.proto"),
        ("module/parser/tika/rtf_metadata.proto", "ai/pipestream/parsed/data/rtf/v1/rtf_metadata.proto"),
        ("module/parser/tika/database_metadata.proto", "ai/pipestream/parsed/data/database/v1/database_metadata.proto"),
        ("module/parser/tika/font_metadata.proto", "ai/pipestream/parsed/data/tika/font/v1/font_metadata.proto"),
        ("module/parser/tika/epub_metadata.proto", "ai/pipestream/parsed/data/epub/v1/epub_metadata.proto"),
        ("module/parser/tika/warc_metadata.proto", "ai/pipestream/parsed/data/warc/v1/warc_metadata.proto"),
        ("module/parser/tika/climate_forecast_metadata.proto", "ai/pipestream/parsed/data/climate/v1/climate_forecast_metadata.proto"),
        ("module/parser/tika/creative_commons_metadata.proto", "ai/pipestream/parsed/data/creative_commons/v1/creative_commons_metadata.proto"),
        ("module/parser/tika/generic_metadata.proto", "ai/pipestream/parsed/data/generic/v1/generic_metadata.proto"),
    ];

    /// A fixed old -> new import path table
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ImportRewriteMap {
        paths: BTreeMap<String, String>,
    }

    /// One substitution made in a file
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ImportChange {
        pub old: String,
        pub new: String,
    }

    fn import_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"\bimport(\s+(?:public|weak))?\s+"([^"]+)""#).expect("import pattern is valid")
        })
    }

    impl ImportRewriteMap {
        pub fn new<I, S, T>(pairs: I) -> Self
        where
            I: IntoIterator<Item = (S, T)>,
            S: Into<String>,
            T: Into<String>,
        {
            ImportRewriteMap {
                paths: pairs
                    .into_iter()
                    .map(|(old, new)| (old.into(), new.into()))
                    .filter(|(old, new)| old != new)
                    .collect(),
            }
        }

        /// The built-in reshuffle table
        pub fn builtin() -> Self {
            Self::new(IMPORT_FIXES.iter().copied())
        }

        pub fn len(&self) -> usize {
            self.paths.len()
        }

        pub fn is_empty(&self) -> bool {
            self.paths.is_empty()
        }

        pub fn get(&self, old: &str) -> Option<&str> {
            self.paths.get(old).map(String::as_str)
        }

        /// Rewrite every mapped import in `content`, in one pass so that a
        /// rewritten path is never looked up again.
        pub fn rewrite(&self, content: &str) -> (String, Vec<ImportChange>) {
            let mut changes = Vec::new();
            let rewritten = import_regex().replace_all(content, |caps: &Captures| match self.get(&caps[2]) {
                Some(new) => {
                    changes.push(ImportChange {
                        old: caps[2].to_string(),
                        new: new.to_string(),
                    });
                    let modifier = caps.get(1).map_or("", |m| m.as_str());
                    format!("import{modifier} \"{new}\"")
                }
                None => caps[0].to_string(),
            });
            (rewritten.into_owned(), changes)
        }

        /// Rewrite imports in one file. The file is only written when
        /// something changed.
        pub fn rewrite_file(&self, path: &Path, dry_run: bool) -> Result<Vec<ImportChange>> {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let (rewritten, changes) = self.rewrite(&content);
            if !changes.is_empty() && !dry_run {
                fs::write(path, rewritten).with_context(|| format!("Failed to write {}", path.display()))?;
            }
            Ok(changes)
        }
    }
}
