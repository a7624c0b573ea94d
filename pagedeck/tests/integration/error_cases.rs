//! Integration tests for error handling.

use image::ImageFormat;
use pagedeck::EditorSession;
use pagedeck::document::{DocumentLoader, LoadOptions};
use pagedeck::error::PageDeckError;
use pagedeck::input::InputFile;
use pagedeck::io::InputReader;
use tempfile::TempDir;

use crate::common::{image_upload, pdf_upload};

#[tokio::test]
async fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let result = InputReader::new()
        .read_all(&[dir.path().join("nope.pdf")])
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, PageDeckError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_corrupt_pdf_rejects_whole_upload() {
    let mut session = EditorSession::new();
    session
        .upload(vec![pdf_upload("first.pdf", &[(612.0, 792.0)])])
        .await
        .unwrap();
    let before = session.collection().ids();

    let err = session
        .upload(vec![
            pdf_upload("good.pdf", &[(612.0, 792.0)]),
            InputFile::new("bad.pdf", b"%PDF-1.4\nthis is not a pdf".to_vec()),
        ])
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(err.exit_code(), 3);
    assert_eq!(session.collection().ids(), before);
}

#[tokio::test]
async fn test_broken_image_rejects_upload() {
    let mut session = EditorSession::new();
    let err = session
        .upload(vec![InputFile::new("photo.png", b"\x89PNG garbage".to_vec())])
        .await
        .unwrap_err();

    assert!(matches!(err, PageDeckError::ImageDecode { .. }));
    assert!(session.collection().is_empty());
}

#[tokio::test]
async fn test_unsupported_file_loaded_directly() {
    let err = DocumentLoader::new()
        .load(
            InputFile::new("archive.zip", vec![0x50, 0x4b, 0x03, 0x04]),
            &LoadOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PageDeckError::UnsupportedInput { .. }));
}

#[tokio::test]
async fn test_only_unsupported_files_add_nothing() {
    let mut session = EditorSession::new();
    let report = session
        .upload(vec![
            InputFile::new("a.zip", vec![1, 2, 3]),
            InputFile::new("b.docx", vec![4, 5, 6]),
        ])
        .await
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.files_skipped.len(), 2);
    assert!(matches!(
        session.export().await,
        Err(PageDeckError::EmptyDocument)
    ));
}

#[tokio::test]
async fn test_failed_upload_after_images_keeps_previous_state() {
    let mut session = EditorSession::new();
    session
        .upload(vec![image_upload("a.png", 10, 10, ImageFormat::Png)])
        .await
        .unwrap();

    let result = session
        .upload(vec![
            image_upload("b.png", 10, 10, ImageFormat::Png),
            InputFile::new("c.jpg", b"not a jpeg".to_vec()),
        ])
        .await;

    assert!(result.is_err());
    assert_eq!(session.page_count_label(), "1 page");
}
