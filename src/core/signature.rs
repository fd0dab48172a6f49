//! Signature data: byte patterns, offsets, and coarse categories.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse class of a file.
///
/// The first five variants are the ones a signature may declare; `Script`,
/// `Text`, and `Unknown` only arise from the heuristic fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Archive,
    Executable,
    Document,
    Other,
    Script,
    Text,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Archive => "archive",
            Category::Executable => "executable",
            Category::Document => "document",
            Category::Other => "other",
            Category::Script => "script",
            Category::Text => "text",
            Category::Unknown => "unknown",
        }
    }

    /// Whether a signature entry may declare this category.
    pub fn is_declarable(&self) -> bool {
        matches!(
            self,
            Category::Image
                | Category::Archive
                | Category::Executable
                | Category::Document
                | Category::Other
        )
    }

    /// Categories whose content can run code on the host.
    pub fn is_runnable(&self) -> bool {
        matches!(self, Category::Script | Category::Executable)
    }

    /// Categories an attacker typically claims to slip past upload filters.
    pub fn is_inert_container(&self) -> bool {
        matches!(
            self,
            Category::Image | Category::Document | Category::Archive
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Category::Image),
            "archive" => Ok(Category::Archive),
            "executable" => Ok(Category::Executable),
            "document" => Ok(Category::Document),
            "other" => Ok(Category::Other),
            "script" => Ok(Category::Script),
            "text" => Ok(Category::Text),
            "unknown" => Ok(Category::Unknown),
            other => Err(format!("unknown category {:?}", other)),
        }
    }
}

/// One position of a signature pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternByte {
    Exact(u8),
    /// Matches any byte; used for variable fields such as RIFF sizes.
    Any,
}

impl PatternByte {
    #[inline]
    pub fn matches(self, b: u8) -> bool {
        match self {
            PatternByte::Exact(v) => v == b,
            PatternByte::Any => true,
        }
    }
}

/// Ordered, non-empty byte pattern with optional wildcard positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<PatternByte>);

impl Pattern {
    /// Build a pattern from exact bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RegistryError> {
        Self::new(bytes.iter().copied().map(PatternByte::Exact).collect())
    }

    pub fn new(bytes: Vec<PatternByte>) -> Result<Self, RegistryError> {
        if bytes.is_empty() {
            return Err(RegistryError::Malformed("empty pattern".into()));
        }
        Ok(Self(bytes))
    }

    /// Parse a hex pattern such as `"89 50 4E 47"` or `"52494646????????57454250"`.
    ///
    /// Whitespace is ignored; `??` marks a wildcard byte.
    pub fn parse_hex(s: &str) -> Result<Self, RegistryError> {
        let digits: Vec<u8> = s
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        if digits.len() % 2 != 0 {
            return Err(RegistryError::Malformed(format!(
                "pattern {:?} has an odd number of hex digits",
                s
            )));
        }
        let mut out = Vec::with_capacity(digits.len() / 2);
        for pair in digits.chunks_exact(2) {
            if pair == b"??" {
                out.push(PatternByte::Any);
                continue;
            }
            let mut byte = [0u8; 1];
            hex::decode_to_slice(pair, &mut byte).map_err(|e| {
                RegistryError::Malformed(format!("pattern {:?}: {}", s, e))
            })?;
            out.push(PatternByte::Exact(byte[0]));
        }
        Self::new(out)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bytes(&self) -> &[PatternByte] {
        &self.0
    }

    /// Compare against a window of exactly `self.len()` bytes.
    pub fn matches(&self, window: &[u8]) -> bool {
        window.len() == self.0.len()
            && self
                .0
                .iter()
                .zip(window)
                .all(|(p, &b)| p.matches(b))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match p {
                PatternByte::Exact(b) => f.write_str(&hex::encode_upper([*b]))?,
                PatternByte::Any => f.write_str("??")?,
            }
        }
        Ok(())
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pattern::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A known binary signature, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureEntry {
    pub pattern: Pattern,
    pub offset: usize,
    pub type_name: String,
    pub category: Category,
}

impl SignatureEntry {
    pub fn new(
        type_name: impl Into<String>,
        category: Category,
        offset: usize,
        pattern: Pattern,
    ) -> Self {
        Self {
            pattern,
            offset,
            type_name: type_name.into(),
            category,
        }
    }

    /// Minimum input length for this entry to be eligible.
    pub fn min_len(&self) -> usize {
        self.offset.saturating_add(self.pattern.len())
    }

    /// Check the entry's window in `data`; short inputs simply do not match.
    pub fn matches(&self, data: &[u8]) -> bool {
        match data.get(self.offset..self.min_len()) {
            Some(window) => self.pattern.matches(window),
            None => false,
        }
    }
}
