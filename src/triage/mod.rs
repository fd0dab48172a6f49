//! Classification runtime.
//!
//! This module provides the staged classification pipeline: signature
//! registry and matcher, shebang and text fallbacks, and the filename risk
//! pass that runs over the finalized content result.

pub mod api;
pub mod config;
pub mod io;
pub mod matcher;
pub mod registry;
pub mod risk;
pub mod shebang;
pub mod sniffers;
pub mod text;

// Re-export key types from core for convenience
pub use crate::core::classification::{
    ClassificationResult, DetectedType, Evidence, RiskFlag, RiskLevel, TextStats,
};
pub use crate::core::signature::{Category, Pattern, PatternByte, SignatureEntry};
pub use api::{classify, classify_with, Classifier};
pub use registry::Registry;
