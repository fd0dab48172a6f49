//! Classification engine.
//!
//! Content analysis runs first and is finalized before the filename is
//! looked at: signature match, then shebang, then the text heuristic, with
//! `UNKNOWN` as the terminal fallback. Risk assessment is a separate pass
//! over that finalized result.

use crate::core::classification::{ClassificationResult, DetectedType, Evidence};
use crate::core::signature::Category;
use crate::triage::config::TriageConfig;
use crate::triage::matcher::match_signature;
use crate::triage::registry::Registry;
use crate::triage::risk;
use crate::triage::shebang::detect_shebang;
use crate::triage::text::{analyze_text, is_text};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, debug_span};

static DEFAULT_CONFIG: Lazy<TriageConfig> = Lazy::new(TriageConfig::default);

/// Classify `data` against `registry` with default settings.
///
/// An empty `filename` is treated as "no filename". Total over all inputs.
pub fn classify(data: &[u8], filename: &str, registry: &Registry) -> ClassificationResult {
    let filename = Some(filename).filter(|f| !f.is_empty());
    classify_with(data, filename, registry, &DEFAULT_CONFIG)
}

/// Classify with an explicit configuration.
pub fn classify_with(
    data: &[u8],
    filename: Option<&str>,
    registry: &Registry,
    config: &TriageConfig,
) -> ClassificationResult {
    let _span = debug_span!("classify", size = data.len(), filename = ?filename).entered();

    let mut result = classify_content(data, registry, config);
    result.risk_flags = risk::assess(&result, filename, &config.risk);
    result.risk_level = risk::risk_level(&result, &result.risk_flags, filename);

    debug!(
        detected = %result.detected_type,
        category = %result.category,
        level = %result.risk_level,
        "Classification complete"
    );
    result
}

/// Content-only classification; the returned result carries no risk flags.
pub fn classify_content(
    data: &[u8],
    registry: &Registry,
    config: &TriageConfig,
) -> ClassificationResult {
    if let Some(m) = match_signature(data, registry) {
        let e = m.entry;
        return ClassificationResult::new(
            DetectedType::Signature(e.type_name.clone()),
            e.category,
            Evidence::Signature {
                type_name: e.type_name.clone(),
                pattern: e.pattern.clone(),
                offset: e.offset,
            },
        );
    }

    if let Some(shebang) = detect_shebang(data, &config.shebang) {
        let program = shebang.program().to_string();
        return ClassificationResult::new(
            DetectedType::Shebang(shebang.interpreter.clone()),
            Category::Script,
            Evidence::Shebang {
                directive: shebang.directive,
                interpreter: shebang.interpreter,
                program,
            },
        );
    }

    let stats = analyze_text(data, &config.text);
    if is_text(&stats, &config.text) {
        ClassificationResult::new(DetectedType::Text, Category::Text, Evidence::Text(stats))
    } else {
        ClassificationResult::new(
            DetectedType::Unknown,
            Category::Unknown,
            Evidence::Inconclusive(stats),
        )
    }
}

/// Reusable classifier holding a shared registry and configuration.
#[derive(Debug, Clone)]
pub struct Classifier {
    registry: Arc<Registry>,
    config: TriageConfig,
}

impl Classifier {
    pub fn new(registry: Arc<Registry>, config: TriageConfig) -> Self {
        Self { registry, config }
    }

    /// Classifier over the built-in signatures and default settings.
    pub fn builtin() -> Result<Self, crate::error::RegistryError> {
        Ok(Self::new(Arc::new(Registry::builtin()?), TriageConfig::default()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Number of leading bytes that can influence a result.
    ///
    /// Callers reading from disk need no more than this.
    pub fn window(&self) -> usize {
        self.registry
            .max_window()
            .max(self.config.text.sample_size)
            .max(self.config.shebang.max_line_len)
    }

    pub fn classify(&self, data: &[u8], filename: Option<&str>) -> ClassificationResult {
        classify_with(data, filename, &self.registry, &self.config)
    }
}
