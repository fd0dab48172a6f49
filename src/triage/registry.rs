//! Signature registry.
//!
//! Loads the signature source once, validates it, and keeps the entries in
//! matcher order: longest pattern first, then lowest offset. Nothing mutates
//! a registry after construction, so a single instance can be shared by any
//! number of concurrent classifications.

use crate::core::signature::{Category, Pattern, SignatureEntry};
use crate::error::{RegistryError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Signature set compiled into the binary.
pub const BUILTIN_SIGNATURES: &str = include_str!("../../data/signatures.json");

/// Entry as written in a signature source. Accepts both the list form
/// (`pattern`, `type_name`) and the legacy map form (`magic`, keyed by name).
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    type_name: Option<String>,
    #[serde(alias = "magic")]
    pattern: String,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    category: Option<String>,
}

/// Immutable, pre-sorted set of signatures.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<SignatureEntry>,
    max_window: usize,
}

impl Registry {
    /// Parse a JSON signature source.
    ///
    /// The source is either a list of entries or an object keyed by type
    /// name. Any parse or schema problem fails the whole load.
    pub fn load(source: &str) -> std::result::Result<Self, RegistryError> {
        let value: Value = serde_json::from_str(source).map_err(|e| {
            warn!(error = %e, "Rejected signature source");
            RegistryError::Malformed(e.to_string())
        })?;

        let entries = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    let raw = raw_entry(item, &format!("entry {}", i))?;
                    let name = raw.type_name.clone().ok_or_else(|| {
                        RegistryError::Malformed(format!("entry {}: missing type_name", i))
                    })?;
                    let category = raw.category.as_deref().ok_or_else(|| {
                        RegistryError::Malformed(format!("entry {} ({}): missing category", i, name))
                    })?;
                    build_entry(name, category, &raw)
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Value::Object(map) => map
                .into_iter()
                .map(|(name, item)| {
                    let raw = raw_entry(item, &name)?;
                    let category = raw.category.clone().unwrap_or_else(|| "other".into());
                    build_entry(name, &category, &raw)
                })
                .collect::<std::result::Result<Vec<_>, _>>()?,
            other => {
                return Err(RegistryError::Malformed(format!(
                    "expected a list or object of signatures, found {}",
                    json_kind(&other)
                )))
            }
        };

        Self::from_entries(entries)
    }

    /// Read and load a signature file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading signature source");
        let source = std::fs::read_to_string(path)?;
        Ok(Self::load(&source)?)
    }

    /// The compiled-in default signature set.
    pub fn builtin() -> std::result::Result<Self, RegistryError> {
        Self::load(BUILTIN_SIGNATURES)
    }

    /// Validate, de-duplicate, and sort programmatically built entries.
    pub fn from_entries(mut entries: Vec<SignatureEntry>) -> std::result::Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Malformed("signature source is empty".into()));
        }

        let mut seen: HashMap<(usize, &Pattern), &str> = HashMap::with_capacity(entries.len());
        for e in &entries {
            if e.type_name.trim().is_empty() {
                return Err(RegistryError::Malformed(format!(
                    "signature at offset {} has an empty type_name",
                    e.offset
                )));
            }
            if is_reserved_name(&e.type_name) {
                return Err(RegistryError::Malformed(format!(
                    "{}: type name is reserved for heuristic results",
                    e.type_name
                )));
            }
            if !e.category.is_declarable() {
                return Err(RegistryError::Malformed(format!(
                    "{}: category {} cannot be declared by a signature",
                    e.type_name, e.category
                )));
            }
            if let Some(first) = seen.insert((e.offset, &e.pattern), &e.type_name) {
                return Err(RegistryError::Duplicate {
                    offset: e.offset,
                    pattern: e.pattern.to_string(),
                    first: first.to_string(),
                    second: e.type_name.clone(),
                });
            }
        }

        // Stable: source order settles entries with equal length and offset.
        entries.sort_by(|a, b| {
            b.pattern
                .len()
                .cmp(&a.pattern.len())
                .then(a.offset.cmp(&b.offset))
        });
        let max_window = entries.iter().map(SignatureEntry::min_len).max().unwrap_or(0);

        info!(
            signatures = entries.len(),
            max_window, "Signature registry loaded"
        );
        Ok(Self {
            entries,
            max_window,
        })
    }

    /// Entries in matcher order.
    pub fn candidates(&self) -> &[SignatureEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes needed to evaluate every entry; reading more never changes a match.
    pub fn max_window(&self) -> usize {
        self.max_window
    }
}

/// Names that would read back as a non-signature `DetectedType`.
fn is_reserved_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("TEXT")
        || name.eq_ignore_ascii_case("UNKNOWN")
        || name
            .get(..SHEBANG_PREFIX.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(SHEBANG_PREFIX))
}

const SHEBANG_PREFIX: &str = "SHEBANG:";

fn raw_entry(item: Value, what: &str) -> std::result::Result<RawEntry, RegistryError> {
    serde_json::from_value(item)
        .map_err(|e| RegistryError::Malformed(format!("{}: {}", what, e)))
}

fn build_entry(
    name: String,
    category: &str,
    raw: &RawEntry,
) -> std::result::Result<SignatureEntry, RegistryError> {
    let category: Category = category
        .parse()
        .map_err(|e| RegistryError::Malformed(format!("{}: {}", name, e)))?;
    let pattern = Pattern::parse_hex(&raw.pattern).map_err(|e| match e {
        RegistryError::Malformed(msg) => RegistryError::Malformed(format!("{}: {}", name, msg)),
        other => other,
    })?;
    Ok(SignatureEntry::new(name, category, raw.offset, pattern))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
