//! Filename sniffer: what a name claims about its content.
//!
//! Uses the configured extension table first and `mime_guess` as an
//! optional fallback for extensions the table does not list. Nothing here
//! looks at file bytes.

use crate::core::signature::Category;
use crate::triage::config::{ExtensionRule, RiskConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

const MAX_EXTENSION_LEN: usize = 10;

/// Where a claimed category came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimSource {
    Table,
    MimeGuess,
}

/// Extension-like suffixes of a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    /// Final path component as given.
    pub base: String,
    /// Lowercased suffixes after the stem, in order.
    pub extensions: Vec<String>,
    /// Lowercased last segment when it is extension-like.
    pub trailing: Option<String>,
}

impl FileName {
    /// Split a caller-supplied name into its extension-like suffixes.
    ///
    /// Directories (`/` or `\`) are dropped, leading dots mark hidden files
    /// rather than extensions, and trailing dots or spaces are ignored the
    /// way Windows ignores them when creating the file.
    pub fn parse(name: &str) -> Self {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let body = base
            .trim_end_matches(['.', ' '])
            .trim_start_matches('.');

        let mut segments = body.split('.');
        segments.next(); // stem
        let suffixes: Vec<&str> = segments.collect();

        let extensions: Vec<String> = suffixes
            .iter()
            .filter(|s| is_extension_like(s))
            .map(|s| s.to_ascii_lowercase())
            .collect();
        let trailing = suffixes
            .last()
            .filter(|s| is_extension_like(s))
            .map(|s| s.to_ascii_lowercase());

        Self {
            base: base.to_string(),
            extensions,
            trailing,
        }
    }

    /// Extension-like suffixes before the last one, e.g. `php` in
    /// `shell.php.png`.
    pub fn inner_extensions(&self) -> &[String] {
        match self.extensions.split_last() {
            Some((_, inner)) => inner,
            None => &[],
        }
    }
}

fn is_extension_like(s: &str) -> bool {
    (1..=MAX_EXTENSION_LEN).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_alphanumeric())
        && s.bytes().any(|b| b.is_ascii_alphabetic())
}

/// The category a filename's trailing extension claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionClaim {
    pub extension: String,
    pub rule: ExtensionRule,
    pub source: ClaimSource,
}

impl ExtensionClaim {
    pub fn category(&self) -> Category {
        self.rule.category
    }
}

/// Sniffer for extension-based category claims.
pub struct ExtensionSniffer;

impl ExtensionSniffer {
    /// Look up the claim of `name`'s trailing extension.
    pub fn sniff(name: &FileName, config: &RiskConfig) -> Option<ExtensionClaim> {
        Self::lookup(name.trailing.as_ref()?, config)
    }

    /// Claim of a single lowercase extension, if it is a recognized one.
    pub fn lookup(ext: &str, config: &RiskConfig) -> Option<ExtensionClaim> {
        if let Some(rule) = config.extensions.get(ext) {
            return Some(ExtensionClaim {
                extension: ext.to_string(),
                rule: rule.clone(),
                source: ClaimSource::Table,
            });
        }

        if !config.mime_fallback {
            return None;
        }
        let mime = mime_guess::from_ext(ext).first()?;
        let category = Self::mime_to_category(mime.essence_str());
        debug!(extension = %ext, mime = %mime, ?category, "Extension resolved via mime_guess");
        category.map(|category| ExtensionClaim {
            extension: ext.to_string(),
            rule: ExtensionRule::new(category),
            source: ClaimSource::MimeGuess,
        })
    }

    /// Convert a MIME type to a coarse category.
    fn mime_to_category(mime: &str) -> Option<Category> {
        let (top, sub) = mime.split_once('/')?;
        match top {
            "image" => Some(Category::Image),
            "text" => {
                if ["javascript", "x-sh", "x-python", "x-perl", "x-php"]
                    .iter()
                    .any(|s| sub.contains(s))
                {
                    Some(Category::Script)
                } else {
                    Some(Category::Text)
                }
            }
            "audio" | "video" | "font" => Some(Category::Other),
            "application" => {
                if ["zip", "x-tar", "gzip", "x-7z", "x-rar", "x-bzip", "x-xz", "zstd", "java-archive"]
                    .iter()
                    .any(|s| sub.contains(s))
                {
                    Some(Category::Archive)
                } else if ["pdf", "msword", "vnd.ms-", "vnd.openxmlformats", "vnd.oasis", "rtf"]
                    .iter()
                    .any(|s| sub.contains(s))
                {
                    Some(Category::Document)
                } else if ["x-msdownload", "x-executable", "x-sharedlib", "x-dosexec", "x-mach-binary", "wasm"]
                    .iter()
                    .any(|s| sub.contains(s))
                {
                    Some(Category::Executable)
                } else if ["javascript", "x-sh", "x-csh", "x-python", "x-perl", "x-httpd-php", "x-ruby"]
                    .iter()
                    .any(|s| sub.contains(s))
                {
                    Some(Category::Script)
                } else if ["json", "xml", "yaml", "toml"].iter().any(|s| sub.contains(s)) {
                    Some(Category::Text)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
