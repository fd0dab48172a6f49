//! Classification result types.

use crate::core::signature::{Category, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The structural type detected from content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DetectedType {
    /// A registry `type_name`, e.g. "PNG".
    Signature(String),
    Text,
    /// Interpreter named by a `#!` line, e.g. "/bin/bash".
    Shebang(String),
    Unknown,
}

impl DetectedType {
    pub fn is_unknown(&self) -> bool {
        matches!(self, DetectedType::Unknown)
    }

    /// Registry type name when the detection came from a signature.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            DetectedType::Signature(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DetectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedType::Signature(name) => f.write_str(name),
            DetectedType::Text => f.write_str("TEXT"),
            DetectedType::Shebang(interp) => write!(f, "SHEBANG:{}", interp),
            DetectedType::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

impl FromStr for DetectedType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "TEXT" => DetectedType::Text,
            "UNKNOWN" => DetectedType::Unknown,
            _ => match s.strip_prefix("SHEBANG:") {
                Some(interp) => DetectedType::Shebang(interp.to_string()),
                None => DetectedType::Signature(s.to_string()),
            },
        })
    }
}

impl Serialize for DetectedType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DetectedType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse::<DetectedType>().unwrap_or_else(|never| match never {}))
    }
}

/// Statistics gathered by the text heuristic over the sampled prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextStats {
    /// Bytes inspected.
    pub sample_len: usize,
    /// Printable ASCII, ASCII whitespace, or bytes of valid UTF-8 sequences.
    pub text_bytes: usize,
    /// Control bytes and invalid UTF-8.
    pub binary_bytes: usize,
    /// Bytes of an incomplete UTF-8 sequence cut off by the sample end.
    pub truncated_bytes: usize,
    pub has_nul: bool,
    /// Sample starts with a UTF-8 byte-order mark.
    pub bom: bool,
}

impl TextStats {
    /// Fraction of counted bytes that look like text; 0.0 for an empty sample.
    pub fn text_ratio(&self) -> f64 {
        let counted = self.text_bytes + self.binary_bytes;
        if counted == 0 {
            0.0
        } else {
            self.text_bytes as f64 / counted as f64
        }
    }
}

/// What justified the detected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    Signature {
        type_name: String,
        pattern: Pattern,
        offset: usize,
    },
    Shebang {
        /// First line after `#!`, arguments included.
        directive: String,
        interpreter: String,
        /// Program that runs the script, with `env` resolved (`python3`).
        program: String,
    },
    Text(TextStats),
    /// Nothing matched; the text statistics explain why the heuristic declined.
    Inconclusive(TextStats),
}

/// Named masquerade indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    DoubleExtension,
    ExtensionMismatch,
    ExecutableMasquerade,
}

impl RiskFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::DoubleExtension => "double_extension",
            RiskFlag::ExtensionMismatch => "extension_mismatch",
            RiskFlag::ExecutableMasquerade => "executable_masquerade",
        }
    }

    pub fn severity(&self) -> RiskLevel {
        match self {
            RiskFlag::DoubleExtension => RiskLevel::Medium,
            RiskFlag::ExtensionMismatch | RiskFlag::ExecutableMasquerade => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall verdict, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("LOW"),
            RiskLevel::Medium => f.write_str("MEDIUM"),
            RiskLevel::High => f.write_str("HIGH"),
        }
    }
}

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub detected_type: DetectedType,
    pub category: Category,
    pub evidence: Evidence,
    pub risk_flags: BTreeSet<RiskFlag>,
    pub risk_level: RiskLevel,
}

impl ClassificationResult {
    /// Content-only result; risk fields are filled in by the risk stage.
    pub fn new(detected_type: DetectedType, category: Category, evidence: Evidence) -> Self {
        Self {
            detected_type,
            category,
            evidence,
            risk_flags: BTreeSet::new(),
            risk_level: RiskLevel::Low,
        }
    }

    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.risk_flags.contains(&flag)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
