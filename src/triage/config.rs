//! Configuration for the triage module.
//!
//! Provides centralized configuration for all classification stages with
//! sensible defaults. Every section deserializes with defaults for missing
//! fields, so a partial JSON document only overrides what it names.

use crate::core::signature::Category;
use crate::error::{Result, UnmaskError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Master configuration for the classification pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// I/O configuration for the bounded file reader.
    pub io: IOConfig,
    /// Text heuristic thresholds.
    pub text: TextConfig,
    /// Shebang line limits.
    pub shebang: ShebangConfig,
    /// Extension table and risk policy.
    pub risk: RiskConfig,
}

impl TriageConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| UnmaskError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that would make a stage meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.text.sample_size == 0 {
            return Err(UnmaskError::Config("text.sample_size must be > 0".into()));
        }
        if !(self.text.min_text_ratio > 0.0 && self.text.min_text_ratio <= 1.0) {
            return Err(UnmaskError::Config(format!(
                "text.min_text_ratio must be in (0, 1], got {}",
                self.text.min_text_ratio
            )));
        }
        if self.shebang.max_line_len == 0 {
            return Err(UnmaskError::Config("shebang.max_line_len must be > 0".into()));
        }
        if self.io.max_read_bytes == 0 {
            return Err(UnmaskError::Config("io.max_read_bytes must be > 0".into()));
        }
        for (ext, rule) in &self.risk.extensions {
            if ext.is_empty() || ext.starts_with('.') || ext.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(UnmaskError::Config(format!(
                    "extension key {:?} must be lowercase without a leading dot",
                    ext
                )));
            }
            if rule.category == Category::Unknown {
                return Err(UnmaskError::Config(format!(
                    "extension {:?} cannot claim the unknown category",
                    ext
                )));
            }
        }
        Ok(())
    }
}

/// I/O configuration for file reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOConfig {
    /// Maximum bytes to read from a file (default: 65536).
    pub max_read_bytes: u64,
    /// Maximum file size to process (default: 104857600 = 100MB).
    pub max_file_size: u64,
}

impl Default for IOConfig {
    fn default() -> Self {
        Self {
            max_read_bytes: 65536,
            max_file_size: 104857600, // 100MB
        }
    }
}

/// Text heuristic configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Prefix length sampled for the text decision (default: 1024).
    pub sample_size: usize,
    /// Minimum fraction of text-like bytes (default: 0.95).
    pub min_text_ratio: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            sample_size: 1024,
            min_text_ratio: 0.95,
        }
    }
}

/// Shebang detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShebangConfig {
    /// Maximum bytes of the `#!` line kept, marker included (default: 128).
    pub max_line_len: usize,
}

impl Default for ShebangConfig {
    fn default() -> Self {
        Self { max_line_len: 128 }
    }
}

/// What a file extension claims about its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRule {
    pub category: Category,
    /// Registry type names also acceptable for this extension,
    /// e.g. `docx` files are ZIP containers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepts: Vec<String>,
}

impl ExtensionRule {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            accepts: Vec::new(),
        }
    }

    pub fn accepting(category: Category, type_names: &[&str]) -> Self {
        Self {
            category,
            accepts: type_names.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Risk classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Lowercase extension (no dot) to claimed category.
    pub extensions: BTreeMap<String, ExtensionRule>,
    /// Consult `mime_guess` for extensions missing from the table.
    pub mime_fallback: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            extensions: default_extension_table(),
            mime_fallback: true,
        }
    }
}

fn default_extension_table() -> BTreeMap<String, ExtensionRule> {
    use Category::*;

    const GROUPS: &[(Category, &[&str])] = &[
        (
            Image,
            &["png", "jpg", "jpeg", "jpe", "gif", "bmp", "webp", "tif", "tiff", "ico"],
        ),
        (Document, &["pdf", "doc", "xls", "ppt", "msg", "rtf"]),
        (
            Archive,
            &["zip", "tar", "gz", "tgz", "bz2", "xz", "zst", "7z", "rar"],
        ),
        (
            Executable,
            &["exe", "dll", "sys", "scr", "so", "dylib", "elf", "class", "wasm"],
        ),
        (
            Script,
            &[
                "sh", "bash", "zsh", "ksh", "csh", "fish", "py", "pl", "rb", "php", "phtml",
                "js", "mjs", "lua", "tcl", "ps1", "bat", "cmd", "vbs",
            ],
        ),
        (
            Text,
            &["txt", "md", "csv", "tsv", "log", "json", "xml", "yaml", "yml", "toml", "ini", "cfg", "conf", "html", "htm", "svg", "css"],
        ),
        (Other, &["sqlite", "db", "wav", "ogg", "mp3", "amr"]),
    ];

    let mut table: BTreeMap<String, ExtensionRule> = GROUPS
        .iter()
        .flat_map(|(cat, exts)| {
            exts.iter()
                .map(move |e| (e.to_string(), ExtensionRule::new(*cat)))
        })
        .collect();

    // Office Open XML, OpenDocument, and Java/Android packages are ZIP containers.
    for ext in ["docx", "xlsx", "pptx", "odt", "ods", "odp", "epub"] {
        table.insert(ext.into(), ExtensionRule::accepting(Document, &["ZIP"]));
    }
    for ext in ["jar", "war", "apk"] {
        table.insert(ext.into(), ExtensionRule::accepting(Archive, &["ZIP"]));
    }
    // A .tar.gz is a GZIP stream at the byte level.
    table.insert("tgz".into(), ExtensionRule::accepting(Archive, &["GZIP"]));

    table
}
