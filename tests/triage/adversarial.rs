//! Crafted inputs aimed at confusing the classifier.

use unmask::triage::config::TriageConfig;
use unmask::triage::{classify, classify_with, Category, DetectedType, RiskFlag};

use crate::common::{builtin, PNG_MAGIC};
use crate::common::test_data::*;

#[test]
fn truncated_magic_does_not_match() {
    let registry = builtin();
    for n in 0..PNG_MAGIC.len() {
        let r = classify(&PNG_MAGIC[..n], "", &registry);
        assert_ne!(r.detected_type, DetectedType::Signature("PNG".into()));
    }
}

#[test]
fn shebang_padded_into_tar_is_an_archive() {
    // Binary evidence wins over a #! line; the archive claim is what counts.
    let registry = builtin();
    let mut data = tar_header("payload");
    data[..12].copy_from_slice(b"#!/bin/sh\nid");
    let r = classify(&data, "payload.sh", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("TAR".into()));
    assert!(r.has_flag(RiskFlag::ExtensionMismatch));
    assert!(!r.has_flag(RiskFlag::ExecutableMasquerade));
}

#[test]
fn gif_header_with_php_payload() {
    let registry = builtin();
    let data = b"GIF89a<?php echo shell_exec($_GET['e']); ?>";
    let r = classify(data, "avatar.php", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("GIF".into()));
    assert_eq!(r.category, Category::Image);
    assert!(r.has_flag(RiskFlag::ExtensionMismatch));
}

#[test]
fn executable_behind_trailing_dots_and_spaces() {
    let registry = builtin();
    let r = classify(&elf64(), "invoice.pdf.exe. . ", &registry);
    assert!(r.has_flag(RiskFlag::DoubleExtension));
    assert!(!r.has_flag(RiskFlag::ExtensionMismatch));

    let r = classify(&elf64(), "invoice.exe.pdf", &registry);
    assert!(r.has_flag(RiskFlag::ExecutableMasquerade));
}

#[test]
fn path_components_do_not_count_as_extensions() {
    let registry = builtin();
    let r = classify(b"plain text\n", "/srv/www.example.com/uploads/readme.txt", &registry);
    assert!(r.risk_flags.is_empty());
}

#[test]
fn filename_never_changes_content_verdict() {
    let registry = builtin();
    let data = script("/bin/sh", "rm -rf /tmp/x\n");
    let names = ["", "a.png", "a.sh", "a.php.jpg", "README", "../../etc/passwd"];
    let first = classify(&data, names[0], &registry);
    for name in names {
        let r = classify(&data, name, &registry);
        assert_eq!(r.detected_type, first.detected_type);
        assert_eq!(r.category, first.category);
        assert_eq!(r.evidence, first.evidence);
    }
}

#[test]
fn nul_heavy_text_lookalike_is_unknown() {
    let registry = builtin();
    let data = "h\0e\0l\0l\0o\0 \0w\0o\0r\0l\0d\0".as_bytes();
    let r = classify(data, "", &registry);
    assert_eq!(r.detected_type, DetectedType::Unknown);
}

#[test]
fn large_input_is_bounded_by_sampling() {
    let registry = builtin();
    let mut data = vec![b'a'; 8 * 1024 * 1024];
    data[4096] = 0;
    // NUL lies beyond the text sample, so the prefix decides.
    let r = classify(&data, "", &registry);
    assert_eq!(r.detected_type, DetectedType::Text);
}

#[test]
fn lenient_config_changes_text_verdict() {
    let registry = builtin();
    let mut data = vec![b'x'; 90];
    data.extend_from_slice(&[0x07; 10]);
    assert_eq!(classify(&data, "", &registry).detected_type, DetectedType::Unknown);

    let mut cfg = TriageConfig::default();
    cfg.text.min_text_ratio = 0.85;
    assert_eq!(
        classify_with(&data, None, &registry, &cfg).detected_type,
        DetectedType::Text
    );
}

#[test]
fn text_starting_with_bm_or_mz_stays_text() {
    let registry = builtin();
    let r = classify(b"BMW,320i,2019\nAudi,A4,2020\n", "cars.csv", &registry);
    assert_eq!(r.detected_type, DetectedType::Text);
    assert!(r.risk_flags.is_empty());

    let r = classify(b"MZ notes about the release\n", "notes.txt", &registry);
    assert_eq!(r.detected_type, DetectedType::Text);
    assert!(r.risk_flags.is_empty());
}

#[test]
fn real_bmp_and_dos_headers_still_match() {
    let registry = builtin();
    let mut bmp = b"BM".to_vec();
    bmp.extend_from_slice(&[0x46, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x36, 0x00]);
    let r = classify(&bmp, "pixel.bmp", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("BMP".into()));
    assert!(r.risk_flags.is_empty());

    let mut pe = b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00\xFF\xFF".to_vec();
    pe.resize(64, 0);
    let r = classify(&pe, "setup.jpg", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("PE".into()));
    assert!(r.has_flag(RiskFlag::ExecutableMasquerade));
}

#[test]
fn amr_audio_is_not_a_script() {
    let registry = builtin();
    let mut data = b"#!AMR\n".to_vec();
    data.extend_from_slice(&[0x3C, 0x91, 0x17, 0x16, 0xBE, 0x66, 0x78, 0x00]);
    let r = classify(&data, "voice.amr", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("AMR".into()));
    assert_eq!(r.category, Category::Other);
    assert!(r.risk_flags.is_empty());

    let r = classify(b"#!AMR-WB\n\x04\x10", "", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("AMR-WB".into()));
}
