//! ASCII / UTF-8 text heuristic for inputs without a binary signature.

use crate::core::classification::TextStats;
use crate::triage::config::TextConfig;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Collect text statistics over the sampled prefix of `data`.
pub fn analyze_text(data: &[u8], config: &TextConfig) -> TextStats {
    let sample = &data[..data.len().min(config.sample_size)];
    let mut stats = TextStats {
        sample_len: sample.len(),
        has_nul: memchr::memchr(0, sample).is_some(),
        bom: sample.starts_with(UTF8_BOM),
        ..Default::default()
    };

    let mut rest = sample;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                tally(valid, &mut stats);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // `valid_up_to` guarantees this prefix decodes.
                tally(std::str::from_utf8(valid).unwrap_or_default(), &mut stats);
                match e.error_len() {
                    Some(n) => {
                        stats.binary_bytes += n;
                        rest = &after[n..];
                    }
                    None => {
                        // Sequence cut off by the end of the sample.
                        stats.truncated_bytes = after.len();
                        break;
                    }
                }
            }
        }
    }

    stats
}

fn tally(valid: &str, stats: &mut TextStats) {
    for c in valid.chars() {
        if !c.is_ascii() {
            stats.text_bytes += c.len_utf8();
        } else if (c.is_ascii_graphic() || c.is_ascii_whitespace()) && c != '\x7f' {
            stats.text_bytes += 1;
        } else {
            stats.binary_bytes += 1;
        }
    }
}

/// Decide whether already-gathered statistics describe text.
pub fn is_text(stats: &TextStats, config: &TextConfig) -> bool {
    if stats.sample_len == 0 || stats.has_nul {
        return false;
    }
    if stats.bom {
        return true;
    }
    stats.text_ratio() >= config.min_text_ratio
}

/// Classify `data` as text. Never fails; a `false` means "treat as binary".
pub fn classify_text(data: &[u8], config: &TextConfig) -> bool {
    let stats = analyze_text(data, config);
    let verdict = is_text(&stats, config);
    debug!(
        sample = stats.sample_len,
        ratio = stats.text_ratio(),
        nul = stats.has_nul,
        bom = stats.bom,
        verdict,
        "Text heuristic"
    );
    verdict
}
