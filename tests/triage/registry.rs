use unmask::triage::{classify, DetectedType, Registry};
use unmask::{RegistryError, UnmaskError};

use crate::common::file_utils::temp_file_with;

#[test]
fn load_from_file() {
    let src = br#"[
        {"type_name": "CUSTOM", "pattern": "CA FE ?? ??", "offset": 0, "category": "executable"},
        {"type_name": "MARK", "pattern": "4D 41 52 4B", "offset": 16, "category": "other"}
    ]"#;
    let file = temp_file_with(src, ".json");
    let registry = Registry::from_path(file.path()).expect("load registry");
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.max_window(), 20);

    let r = classify(&[0xCA, 0xFE, 0x12, 0x34, 0x00], "", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("CUSTOM".into()));

    let mut data = vec![b'.'; 16];
    data.extend_from_slice(b"MARK");
    let r = classify(&data, "", &registry);
    assert_eq!(r.detected_type, DetectedType::Signature("MARK".into()));
}

#[test]
fn legacy_map_form() {
    let src = r#"{
        "PNG": {"magic": "89504E470D0A1A0A"},
        "PDF": {"magic": "25 50 44 46", "category": "document"}
    }"#;
    let registry = Registry::load(src).expect("load map form");
    assert_eq!(registry.len(), 2);

    let png = classify(b"\x89PNG\r\n\x1a\n....", "", &registry);
    assert_eq!(png.detected_type, DetectedType::Signature("PNG".into()));
    assert_eq!(png.category.as_str(), "other");

    let pdf = classify(b"%PDF-1.7\n", "", &registry);
    assert_eq!(pdf.category.as_str(), "document");
}

#[test]
fn duplicate_signatures_fail_the_load() {
    let src = r#"[
        {"type_name": "A", "pattern": "01 02", "category": "other"},
        {"type_name": "B", "pattern": "0102", "category": "image"}
    ]"#;
    assert!(matches!(
        Registry::load(src),
        Err(RegistryError::Duplicate { offset: 0, .. })
    ));
}

#[test]
fn malformed_sources_are_rejected() {
    let cases = [
        "",
        "not json",
        "42",
        "[]",
        r#"[{"type_name": "X", "pattern": "ZZ", "category": "other"}]"#,
        r#"[{"type_name": "X", "pattern": "ABC", "category": "other"}]"#,
        r#"[{"type_name": "X", "pattern": "", "category": "other"}]"#,
        r#"[{"type_name": "X", "pattern": "AB", "category": "weird"}]"#,
        r#"[{"type_name": "X", "pattern": "AB", "category": "unknown"}]"#,
        r#"[{"type_name": "X", "pattern": "AB"}]"#,
        r#"[{"pattern": "AB", "category": "other"}]"#,
        r#"[{"type_name": "X", "pattern": "AB", "offset": -1, "category": "other"}]"#,
    ];
    for src in cases {
        assert!(
            matches!(Registry::load(src), Err(RegistryError::Malformed(_))),
            "accepted {:?}",
            src
        );
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Registry::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, UnmaskError::Io(_)));

    let file = temp_file_with(b"{ broken", ".json");
    let err = Registry::from_path(file.path()).unwrap_err();
    assert!(matches!(err, UnmaskError::Registry(RegistryError::Malformed(_))));
}

#[test]
fn reserved_type_names_fail_the_load() {
    for name in ["TEXT", "UNKNOWN", "SHEBANG:/bin/sh"] {
        let src = format!(
            r#"[{{"type_name": "{}", "pattern": "AB CD", "category": "other"}}]"#,
            name
        );
        assert!(
            matches!(Registry::load(&src), Err(RegistryError::Malformed(_))),
            "accepted {}",
            name
        );
    }
}

#[test]
fn custom_results_roundtrip_through_json() {
    let src = r#"[{"type_name": "TEXTURE", "pattern": "AB CD", "category": "image"}]"#;
    let registry = Registry::load(src).expect("load");
    let r = classify(&[0xAB, 0xCD, 0x00], "", &registry);
    let json = r.to_json_string().expect("json");
    let back = unmask::triage::ClassificationResult::from_json_str(&json).expect("parse");
    assert_eq!(back, r);
}
