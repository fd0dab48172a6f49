//! Masquerade risk assessment.
//!
//! A pure post-processing stage: it compares the finalized, content-derived
//! result with what the caller-supplied filename claims. It never reads
//! file bytes and never fails.

use crate::core::classification::{ClassificationResult, RiskFlag, RiskLevel};
use crate::core::signature::Category;
use crate::triage::config::{ExtensionRule, RiskConfig};
use crate::triage::sniffers::{ExtensionClaim, ExtensionSniffer, FileName};
use std::collections::BTreeSet;
use tracing::debug;

/// Whether `rule` is satisfied by the detected content.
fn accepts(rule: &ExtensionRule, result: &ClassificationResult) -> bool {
    if rule.category == result.category {
        return true;
    }
    if let Some(name) = result.detected_type.type_name() {
        if rule.accepts.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            return true;
        }
    }
    // Scripts without a `#!` line are indistinguishable from plain text.
    rule.category == Category::Script && result.category == Category::Text
}

/// Flags raised by `filename` against `result`.
pub fn assess(
    result: &ClassificationResult,
    filename: Option<&str>,
    config: &RiskConfig,
) -> BTreeSet<RiskFlag> {
    let mut flags = BTreeSet::new();
    let Some(filename) = filename.filter(|f| !f.trim().is_empty()) else {
        return flags;
    };

    let name = FileName::parse(filename);
    // Dotted words in a stem (`john.smith.txt`) are not extensions.
    if name
        .inner_extensions()
        .iter()
        .any(|ext| ExtensionSniffer::lookup(ext, config).is_some())
    {
        flags.insert(RiskFlag::DoubleExtension);
    }

    if let Some(claim) = ExtensionSniffer::sniff(&name, config) {
        if !accepts(&claim.rule, result) {
            flags.insert(RiskFlag::ExtensionMismatch);
        }
        if result.category.is_runnable() && claim.category().is_inert_container() {
            flags.insert(RiskFlag::ExecutableMasquerade);
        }
        log_claim(&claim, result, &flags);
    }

    flags
}

/// Overall level: the most severe flag, or `Medium` for unrecognized content
/// that a recognizable extension vouches for.
pub fn risk_level(
    result: &ClassificationResult,
    flags: &BTreeSet<RiskFlag>,
    filename: Option<&str>,
) -> RiskLevel {
    let from_flags = flags
        .iter()
        .map(RiskFlag::severity)
        .max()
        .unwrap_or(RiskLevel::Low);

    let unvouched = result.detected_type.is_unknown()
        && filename
            .map(|f| FileName::parse(f).trailing.is_some())
            .unwrap_or(false);

    if unvouched {
        from_flags.max(RiskLevel::Medium)
    } else {
        from_flags
    }
}

fn log_claim(claim: &ExtensionClaim, result: &ClassificationResult, flags: &BTreeSet<RiskFlag>) {
    debug!(
        extension = %claim.extension,
        claimed = %claim.category(),
        source = ?claim.source,
        detected = %result.detected_type,
        detected_category = %result.category,
        flags = ?flags,
        "Risk assessed"
    );
}
