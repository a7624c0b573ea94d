//! Integration tests for image uploads.

use image::ImageFormat;
use pagedeck::EditorSession;
use pagedeck::config::ImageSizing;
use pagedeck::io::InputReader;
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{image_bytes, image_upload, page_sizes, pdf_upload, write_file};

#[rstest]
#[case("photo.png", ImageFormat::Png)]
#[case("photo.jpg", ImageFormat::Jpeg)]
#[case("photo.gif", ImageFormat::Gif)]
#[case("photo.bmp", ImageFormat::Bmp)]
#[tokio::test]
async fn test_image_becomes_page_of_intrinsic_size(
    #[case] name: &str,
    #[case] format: ImageFormat,
) {
    let mut session = EditorSession::new();
    session
        .upload(vec![image_upload(name, 120, 80, format)])
        .await
        .unwrap();

    let exported = session.export().await.unwrap();
    assert_eq!(page_sizes(&exported.bytes), vec![(120.0, 80.0)]);
}

#[tokio::test]
async fn test_large_image_is_scaled_down() {
    let mut session = EditorSession::new();
    session
        .upload(vec![image_upload("wide.png", 4000, 2000, ImageFormat::Png)])
        .await
        .unwrap();

    let exported = session.export().await.unwrap();
    assert_eq!(page_sizes(&exported.bytes), vec![(2000.0, 1000.0)]);
}

#[tokio::test]
async fn test_match_first_page_fits_images() {
    let mut session = EditorSession::new().with_image_sizing(ImageSizing::MatchFirstPage);
    session
        .upload(vec![
            pdf_upload("cover.pdf", &[(400.0, 400.0)]),
            image_upload("wide.png", 200, 100, ImageFormat::Png),
            image_upload("tall.jpg", 50, 100, ImageFormat::Jpeg),
        ])
        .await
        .unwrap();

    let exported = session.export().await.unwrap();
    assert_eq!(
        page_sizes(&exported.bytes),
        vec![(400.0, 400.0), (400.0, 400.0), (400.0, 400.0)]
    );
}

#[tokio::test]
async fn test_images_read_from_disk_classified_by_extension() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_file(dir.path(), "scan.JPEG", &image_bytes(30, 40, ImageFormat::Jpeg)),
        write_file(dir.path(), "notes.txt", b"not an upload"),
        write_file(dir.path(), "logo.png", &image_bytes(16, 16, ImageFormat::Png)),
    ];

    let files = InputReader::new().read_all(&paths).await.unwrap();
    let mut session = EditorSession::new();
    let report = session.upload(files).await.unwrap();

    assert_eq!(report.pages_added, 2);
    assert_eq!(report.files_skipped, vec!["notes.txt".to_string()]);

    let exported = session.export().await.unwrap();
    assert_eq!(page_sizes(&exported.bytes), vec![(30.0, 40.0), (16.0, 16.0)]);
}
