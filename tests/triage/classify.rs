//! End-to-end classification of synthesized inputs.

use unmask::triage::{classify, Category, DetectedType, Evidence, RiskFlag, RiskLevel};

use crate::common::builtin;
use crate::common::test_data::*;
use crate::common::TAR_MAGIC_OFFSET;

#[test]
fn png_with_arbitrary_trailer() {
    let registry = builtin();
    for trailer in [&b""[..], b"\x00\x00\x00\rIHDR", &[0xFFu8; 300][..]] {
        let r = classify(&png(trailer), "", &registry);
        assert_eq!(r.detected_type.to_string(), "PNG");
        assert_eq!(r.category, Category::Image);
    }
}

#[test]
fn tar_magic_only_counts_at_offset_257() {
    let registry = builtin();
    let data = tar_header("hello.txt");
    let r = classify(&data, "bundle.tar", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("TAR".into()));
    assert_eq!(r.category, Category::Archive);
    assert!(r.risk_flags.is_empty());
    match r.evidence {
        Evidence::Signature { offset, .. } => assert_eq!(offset, TAR_MAGIC_OFFSET),
        other => panic!("unexpected evidence {:?}", other),
    }

    for offset in [0usize, 1, 256, 258, 300] {
        let mut moved = vec![0u8; 600];
        moved[offset..offset + 5].copy_from_slice(b"ustar");
        let r = classify(&moved, "", &registry);
        assert_ne!(
            r.detected_type,
            DetectedType::Signature("TAR".into()),
            "ustar at offset {} must not be TAR",
            offset
        );
    }
}

#[test]
fn bash_script_is_script_not_text() {
    let registry = builtin();
    let data = script("/bin/bash", "echo 'hello'\nexit 0\n");
    let r = classify(&data, "", &registry);
    assert_eq!(r.category, Category::Script);
    assert_eq!(r.detected_type, DetectedType::Shebang("/bin/bash".into()));
    match &r.evidence {
        Evidence::Shebang {
            directive,
            interpreter,
            program,
        } => {
            assert_eq!(directive, "/bin/bash");
            assert_eq!(interpreter, "/bin/bash");
            assert_eq!(program, "bash");
        }
        other => panic!("unexpected evidence {:?}", other),
    }
}

#[test]
fn shell_php_png_with_script_content() {
    let registry = builtin();
    let r = classify(
        &script("/usr/bin/php", "<?php system($_GET['c']); ?>"),
        "shell.php.png",
        &registry,
    );
    assert!(r.has_flag(RiskFlag::DoubleExtension));
    assert!(r.has_flag(RiskFlag::ExecutableMasquerade));
    assert_eq!(r.risk_level, RiskLevel::High);
}

#[test]
fn shell_php_png_with_executable_content() {
    let registry = builtin();
    let r = classify(&elf64(), "shell.php.png", &registry);
    assert_eq!(r.category, Category::Executable);
    assert!(r.has_flag(RiskFlag::DoubleExtension));
    assert!(r.has_flag(RiskFlag::ExecutableMasquerade));
}

#[test]
fn noise_without_extension_is_unknown_and_unflagged() {
    let registry = builtin();
    for seed in 1..20u64 {
        let data = noise(2048, seed);
        let r = classify(&data, "upload", &registry);
        assert_eq!(r.detected_type, DetectedType::Unknown, "seed {}", seed);
        assert_eq!(r.category, Category::Unknown);
        assert!(r.risk_flags.is_empty());
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert!(matches!(r.evidence, Evidence::Inconclusive(_)));
    }
}

#[test]
fn noise_claiming_image_is_mismatched() {
    let registry = builtin();
    let r = classify(&noise(512, 7), "photo.jpg", &registry);
    assert_eq!(r.detected_type, DetectedType::Unknown);
    assert!(r.has_flag(RiskFlag::ExtensionMismatch));
    assert!(!r.has_flag(RiskFlag::ExecutableMasquerade));
}

#[test]
fn utf8_prose_is_text() {
    let registry = builtin();
    let body = "Ünïcödé prose, naïve café, 東京, Ελληνικά.\n".repeat(40);
    let r = classify(body.as_bytes(), "readme.md", &registry);
    assert_eq!(r.detected_type, DetectedType::Text);
    assert_eq!(r.category, Category::Text);
    assert!(r.risk_flags.is_empty());
    match r.evidence {
        Evidence::Text(stats) => {
            assert_eq!(stats.sample_len, 1024);
            assert!(stats.text_ratio() >= 0.95);
        }
        other => panic!("unexpected evidence {:?}", other),
    }
}

#[test]
fn empty_file_is_unknown() {
    let registry = builtin();
    let r = classify(&[], "empty", &registry);
    assert_eq!(r.detected_type.to_string(), "UNKNOWN");
    assert!(r.risk_flags.is_empty());
}

#[test]
fn office_document_is_zip_without_mismatch() {
    let registry = builtin();
    let mut data = b"PK\x03\x04\x14\x00\x06\x00".to_vec();
    data.extend_from_slice(b"[Content_Types].xml");
    let r = classify(&data, "quarterly.xlsx", &registry);
    assert_eq!(r.detected_type.to_string(), "ZIP");
    assert!(r.risk_flags.is_empty());

    let r = classify(&data, "quarterly.png", &registry);
    assert_eq!(
        r.risk_flags.iter().copied().collect::<Vec<_>>(),
        vec![RiskFlag::ExtensionMismatch]
    );
}
