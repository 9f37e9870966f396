use granthika::assemble::{assemble, ContentPart};
use granthika::document::{mime_for_filename, SourceDocument};
use granthika::error::TranslateError;

fn doc(name: &str, data: &[u8]) -> SourceDocument {
    SourceDocument::from_bytes(data.to_vec(), name, &mime_for_filename(name))
}

#[test]
fn single_file_directive() {
    let req = assemble(&[doc("page.jpg", b"x")], "base prompt").unwrap();
    assert!(req.instruction.starts_with("base prompt"));
    assert!(req.instruction.contains("single JSON object"));
    assert!(!req.instruction.contains("JSON ARRAY"));
}

#[test]
fn multi_file_directive() {
    let docs = [doc("a.jpg", b"x"), doc("b.png", b"y")];
    let req = assemble(&docs, "base prompt").unwrap();
    assert!(req.instruction.contains("JSON ARRAY"));
    assert!(!req.instruction.contains("single JSON object"));
}

#[test]
fn parts_are_blob_then_label_in_order() {
    let docs = [doc("a.jpg", b"aaa"), doc("b.png", b"bbb")];
    let req = assemble(&docs, "p").unwrap();
    assert_eq!(req.parts.len(), 4);

    match &req.parts[0] {
        ContentPart::Blob { data, mime_type } => {
            assert_eq!(data, b"aaa");
            assert_eq!(mime_type, "image/jpeg");
        }
        other => panic!("expected blob, got {other:?}"),
    }
    match &req.parts[1] {
        ContentPart::Text { text } => assert_eq!(text, "File 1: a.jpg"),
        other => panic!("expected label, got {other:?}"),
    }
    match &req.parts[3] {
        ContentPart::Text { text } => assert_eq!(text, "File 2: b.png"),
        other => panic!("expected label, got {other:?}"),
    }
}

#[test]
fn mime_lookup_table() {
    assert_eq!(mime_for_filename("scan.pdf"), "application/pdf");
    assert_eq!(mime_for_filename("scan.JPG"), "image/jpeg");
    assert_eq!(mime_for_filename("scan.jpeg"), "image/jpeg");
    assert_eq!(mime_for_filename("scan.png"), "image/png");
    // Best-effort fallback, deliberately unvalidated.
    assert_eq!(mime_for_filename("scan.tiff"), "image/tiff");
    assert_eq!(mime_for_filename("noext"), "application/octet-stream");
}

#[test]
fn empty_batch_is_rejected() {
    let err = assemble(&[], "p").unwrap_err();
    assert!(matches!(err, TranslateError::Configuration(_)));
}

#[test]
fn unreadable_path_aborts_batch() {
    let missing = SourceDocument::from_path(std::path::Path::new("does-not-exist.png"));
    let docs = [doc("a.jpg", b"x"), missing];
    let err = assemble(&docs, "p").unwrap_err();
    match err {
        TranslateError::DocumentRead { name, .. } => assert_eq!(name, "does-not-exist.png"),
        other => panic!("expected DocumentRead, got {other:?}"),
    }
}

#[test]
fn reads_bytes_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaf.png");
    std::fs::write(&path, b"png-bytes").unwrap();

    let doc = SourceDocument::from_path(&path);
    assert_eq!(doc.mime_type(), "image/png");
    assert_eq!(doc.stem(), "leaf");

    let req = assemble(std::slice::from_ref(&doc), "p").unwrap();
    match &req.parts[0] {
        ContentPart::Blob { data, .. } => assert_eq!(data, b"png-bytes"),
        other => panic!("expected blob, got {other:?}"),
    }
}
