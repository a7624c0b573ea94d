//! Integration tests for reading, exporting and writing documents.

use pagedeck::EditorSession;
use pagedeck::assemble::{AssembleOptions, MetadataManager};
use pagedeck::config::{CompressionLevel, Metadata};
use pagedeck::io::{InputReader, PdfWriter};
use tempfile::TempDir;

use crate::common::{page_sizes, pdf_bytes, temp_output_path, write_file};

#[tokio::test]
async fn test_single_page_round_trip_from_disk() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "letter.pdf", &pdf_bytes(&[(612.0, 792.0)]));
    let output = temp_output_path();

    let files = InputReader::new().read_all(&[input]).await.unwrap();
    let mut session = EditorSession::new();
    session.upload(files).await.unwrap();

    let exported = session.export().await.unwrap();
    let stats = PdfWriter::new().write(&exported.bytes, &output).await.unwrap();

    let written = std::fs::read(&output).unwrap();
    assert_eq!(page_sizes(&written), vec![(612.0, 792.0)]);
    assert_eq!(stats.file_size, written.len() as u64);
}

#[tokio::test]
async fn test_export_page_count_matches_collection() {
    let dir = TempDir::new().unwrap();
    let sizes = [(100.0, 200.0), (300.0, 400.0), (500.0, 600.0)];
    let input = write_file(dir.path(), "three.pdf", &pdf_bytes(&sizes));

    let files = InputReader::new().read_all(&[input]).await.unwrap();
    let mut session = EditorSession::new();
    session.upload(files).await.unwrap();

    let exported = session.export().await.unwrap();
    let output_sizes = page_sizes(&exported.bytes);

    assert_eq!(output_sizes.len(), session.collection().len());
    for (page, size) in session.pages().iter().zip(&output_sizes) {
        assert_eq!((page.geometry.width, page.geometry.height), *size);
    }
}

#[tokio::test]
async fn test_exported_document_is_reloadable() {
    let mut session = EditorSession::new();
    session
        .upload(vec![pagedeck::input::InputFile::new(
            "a.pdf",
            pdf_bytes(&[(612.0, 792.0), (612.0, 792.0)]),
        )])
        .await
        .unwrap();
    let first = session.export().await.unwrap();

    let mut again = EditorSession::new();
    again
        .upload(vec![pagedeck::input::InputFile::new(
            first.file_name,
            first.bytes,
        )])
        .await
        .unwrap();

    assert_eq!(again.page_count_label(), "2 pages");
}

#[tokio::test]
async fn test_metadata_and_compression_on_export() {
    let mut session = EditorSession::new();
    session.set_assemble_options(AssembleOptions {
        metadata: Metadata::new(
            Some("Quarterly".to_string()),
            Some("Finance".to_string()),
            None,
            None,
        ),
        compression: CompressionLevel::Maximum,
    });
    session
        .upload(vec![pagedeck::input::InputFile::new(
            "a.pdf",
            pdf_bytes(&[(612.0, 792.0)]),
        )])
        .await
        .unwrap();

    let exported = session.export().await.unwrap();
    let doc = lopdf::Document::load_mem(&exported.bytes).unwrap();
    let metadata = MetadataManager::new().get_metadata(&doc);

    assert_eq!(metadata.title.as_deref(), Some("Quarterly"));
    assert_eq!(metadata.author.as_deref(), Some("Finance"));
}
