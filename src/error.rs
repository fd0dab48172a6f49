//! Error types for the unmask classification engine.
//!
//! Classification itself is total and never fails; the only errors are
//! raised while loading signatures or configuration, before any input is
//! classified.

use thiserror::Error;

/// Errors raised while building a [`Registry`](crate::triage::registry::Registry).
///
/// Both variants are fatal at startup: an engine without a trustworthy
/// signature set refuses to run rather than classify with a partial one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The signature source could not be parsed into valid entries.
    #[error("Malformed signature source: {0}")]
    Malformed(String),

    /// Two entries share the same offset and pattern.
    #[error("Duplicate signature at offset {offset}: {pattern} ({first} and {second})")]
    Duplicate {
        offset: usize,
        pattern: String,
        first: String,
        second: String,
    },
}

/// Main error type for unmask's outer surfaces (file loading, configuration).
#[derive(Debug, Error)]
pub enum UnmaskError {
    /// Signature registry could not be built
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Resource limit exceeded
    #[error("Resource limit exceeded: {resource} ({used}/{limit})")]
    ResourceExhausted {
        resource: String,
        used: u64,
        limit: u64,
    },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for unmask operations
pub type Result<T> = std::result::Result<T, UnmaskError>;
