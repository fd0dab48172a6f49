//! Interpreter directive (`#!`) detection.

use crate::triage::config::ShebangConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

const MARKER: &[u8] = b"#!";

/// A parsed `#!` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shebang {
    /// Everything after `#!` on the first line, arguments included.
    pub directive: String,
    /// First token of the directive, e.g. `/usr/bin/env`.
    pub interpreter: String,
}

impl Shebang {
    fn parse(directive: String) -> Option<Self> {
        let interpreter = directive.split_whitespace().next()?.to_string();
        Some(Self {
            directive,
            interpreter,
        })
    }

    /// Arguments following the interpreter.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.directive.split_whitespace().skip(1)
    }

    /// Program that actually runs the script.
    ///
    /// `/usr/bin/env [-S] python3` resolves to `python3`; otherwise the
    /// interpreter's basename.
    pub fn program(&self) -> &str {
        let base = basename(&self.interpreter);
        if base == "env" {
            if let Some(prog) = self
                .args()
                .find(|a| !a.starts_with('-') && !a.contains('='))
            {
                return basename(prog);
            }
        }
        base
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Detect a `#!` directive at offset 0.
///
/// Reads up to the first newline or `max_line_len` bytes, whichever comes
/// first. A missing marker or an empty directive yields `None`.
pub fn detect_shebang(data: &[u8], config: &ShebangConfig) -> Option<Shebang> {
    if !data.starts_with(MARKER) {
        return None;
    }

    let line = &data[..data.len().min(config.max_line_len)];
    let line = match memchr::memchr(b'\n', line) {
        Some(end) => &line[..end],
        None => line,
    };
    let directive = String::from_utf8_lossy(&line[MARKER.len().min(line.len())..])
        .trim()
        .to_string();

    let shebang = Shebang::parse(directive);
    match &shebang {
        Some(s) => debug!(directive = %s.directive, program = s.program(), "Shebang detected"),
        None => debug!("Empty shebang directive ignored"),
    }
    shebang
}
