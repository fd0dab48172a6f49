//! Offset-aware binary signature matching.

use crate::core::signature::SignatureEntry;
use crate::triage::registry::Registry;
use tracing::{debug, trace};

/// A registry entry that matched the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureMatch<'r> {
    pub entry: &'r SignatureEntry,
}

impl<'r> SignatureMatch<'r> {
    pub fn type_name(&self) -> &'r str {
        &self.entry.type_name
    }
}

/// Return the first registry candidate whose window matches `data`.
///
/// Candidates are visited in registry order, so a longer pattern beats any
/// shorter one it extends, and a lower offset beats a higher one of equal
/// length. Candidates that need more bytes than `data` holds are skipped.
pub fn match_signature<'r>(data: &[u8], registry: &'r Registry) -> Option<SignatureMatch<'r>> {
    if data.is_empty() {
        return None;
    }

    for entry in registry.candidates() {
        if entry.min_len() > data.len() {
            trace!(
                type_name = %entry.type_name,
                need = entry.min_len(),
                have = data.len(),
                "Signature ineligible"
            );
            continue;
        }
        if entry.matches(data) {
            debug!(
                type_name = %entry.type_name,
                offset = entry.offset,
                pattern = %entry.pattern,
                "Signature matched"
            );
            return Some(SignatureMatch { entry });
        }
    }

    debug!("No signature matched {} bytes", data.len());
    None
}
