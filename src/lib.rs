//! Content-based file type identification.
//!
//! `unmask` decides what a file is from its leading bytes (offset-aware
//! magic numbers, then shebang and text heuristics) and then flags
//! filenames that disagree with the content.
//!
//! ```
//! use unmask::triage::{classify, Registry, RiskFlag};
//!
//! let registry = Registry::builtin().expect("built-in signatures");
//! let result = classify(b"#!/bin/sh\nid\n", "shell.php.png", &registry);
//! assert_eq!(result.detected_type.to_string(), "SHEBANG:/bin/sh");
//! assert!(result.has_flag(RiskFlag::ExecutableMasquerade));
//! ```

/// Core data types module
pub mod core;
pub mod error;
pub mod logging;
pub mod triage;

pub use error::{RegistryError, Result, UnmaskError};
