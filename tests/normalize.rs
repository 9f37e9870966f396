use granthika::normalize::{normalize, ResultRecord};

#[test]
fn array_round_trip_preserves_order_and_fields() {
    let raw = r#"[
        {"hindi_ocr": "पहला", "english_translation": "first"},
        {"hindi_ocr": "दूसरा", "english_translation": "second"},
        {"hindi_ocr": "तीसरा", "english_translation": "third"}
    ]"#;
    let records = normalize(raw, 3);
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        ResultRecord::Success {
            hindi_ocr: "पहला".into(),
            english_translation: "first".into(),
        }
    );
    assert_eq!(
        records[2],
        ResultRecord::Success {
            hindi_ocr: "तीसरा".into(),
            english_translation: "third".into(),
        }
    );
}

#[test]
fn normalize_is_idempotent() {
    let raw = r#"[{"hindi_ocr": "क", "english_translation": "ka"}]"#;
    assert_eq!(normalize(raw, 1), normalize(raw, 1));
}

#[test]
fn malformed_json_degrades_to_single_failure() {
    for expected in [1, 2, 5] {
        let records = normalize("{not json", expected);
        assert_eq!(records.len(), 1);
        match &records[0] {
            ResultRecord::Failure { error, raw } => {
                assert!(error.contains("Invalid JSON response from API"));
                assert_eq!(raw.as_deref(), Some("{not json"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}

#[test]
fn single_object_for_multi_file_batch_is_wrapped() {
    let raw = r#"{"hindi_ocr": "a", "english_translation": "b"}"#;
    let records = normalize(raw, 2);
    // Mismatch is surfaced to the caller, not corrected here.
    assert_eq!(records.len(), 1);
    assert!(records[0].is_success());
}

#[test]
fn element_with_error_key_becomes_failure() {
    let raw = r#"[
        {"hindi_ocr": "ठीक", "english_translation": "fine"},
        {"error": "page illegible", "raw": "smudged"}
    ]"#;
    let records = normalize(raw, 2);
    assert!(records[0].is_success());
    assert_eq!(records[1].error(), Some("page illegible"));
}

#[test]
fn missing_success_fields_default_to_empty() {
    let records = normalize(r#"[{"hindi_ocr": "केवल"}]"#, 1);
    assert_eq!(
        records[0],
        ResultRecord::Success {
            hindi_ocr: "केवल".into(),
            english_translation: String::new(),
        }
    );
}

#[test]
fn non_object_element_becomes_failure_with_raw() {
    let records = normalize(r#"["just a string"]"#, 1);
    match &records[0] {
        ResultRecord::Failure { raw, .. } => {
            assert_eq!(raw.as_deref(), Some("\"just a string\""));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn length_mismatch_is_tolerated() {
    let raw = r#"[
        {"hindi_ocr": "a", "english_translation": "b"},
        {"hindi_ocr": "c", "english_translation": "d"}
    ]"#;
    // Three files submitted, two records back: passed through as-is.
    assert_eq!(normalize(raw, 3).len(), 2);
}
