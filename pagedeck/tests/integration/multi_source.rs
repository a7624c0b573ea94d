//! Integration tests for collections drawing on several sources.

use pagedeck::EditorSession;
use pagedeck::assemble::Assembler;
use pagedeck::collection::{ClearConfirmation, PageCollection};
use pagedeck::config::PageRange;
use pagedeck::document::{DocumentLoader, LoadOptions};

use crate::common::{page_sizes, pdf_upload};

#[tokio::test]
async fn test_interleaved_pages_keep_collection_order() {
    let loader = DocumentLoader::new();
    let options = LoadOptions::default();
    let a = loader
        .load(pdf_upload("a.pdf", &[(100.0, 100.0), (110.0, 110.0)]), &options)
        .await
        .unwrap();
    let b = loader
        .load(pdf_upload("b.pdf", &[(200.0, 200.0), (220.0, 220.0)]), &options)
        .await
        .unwrap();

    let mut collection = PageCollection::new();
    collection.append(a).unwrap();
    collection.append(b).unwrap();
    let ids = collection.ids();

    // a1 b1 a2 b2
    collection.move_to(&ids[2], 1);

    let output = Assembler::new().assemble(collection.as_slice()).await.unwrap();

    assert_eq!(output.statistics.sources_parsed, 2);
    assert_eq!(output.statistics.pages_copied, 4);
    assert_eq!(
        page_sizes(&output.bytes),
        vec![(100.0, 100.0), (200.0, 200.0), (110.0, 110.0), (220.0, 220.0)]
    );
}

#[tokio::test]
async fn test_same_file_uploaded_twice() {
    let mut session = EditorSession::new();
    let upload = pdf_upload("a.pdf", &[(300.0, 300.0)]);

    session.upload(vec![upload.clone(), upload]).await.unwrap();
    let ids = session.collection().ids();

    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    let exported = session.export().await.unwrap();
    assert_eq!(exported.statistics.sources_parsed, 2);
    assert_eq!(page_sizes(&exported.bytes).len(), 2);
}

#[tokio::test]
async fn test_reorder_and_remove_then_export() {
    let mut session = EditorSession::new();
    session
        .upload(vec![
            pdf_upload("a.pdf", &[(10.0, 10.0), (20.0, 20.0)]),
            pdf_upload("b.pdf", &[(30.0, 30.0), (40.0, 40.0)]),
        ])
        .await
        .unwrap();

    session.reorder(&PageRange::parse("4,2-3").unwrap()).unwrap();
    session.remove_pages(&PageRange::parse("2").unwrap()).unwrap();

    let exported = session.export().await.unwrap();
    assert_eq!(
        page_sizes(&exported.bytes),
        vec![(40.0, 40.0), (30.0, 30.0)]
    );
}

#[tokio::test]
async fn test_clear_then_upload_again() {
    let mut session = EditorSession::new();
    session
        .upload(vec![pdf_upload("a.pdf", &[(10.0, 10.0)])])
        .await
        .unwrap();

    session.clear(ClearConfirmation::confirmed());
    assert!(session.export().await.is_err());

    session
        .upload(vec![pdf_upload("b.pdf", &[(50.0, 60.0)])])
        .await
        .unwrap();
    let exported = session.export().await.unwrap();
    assert_eq!(page_sizes(&exported.bytes), vec![(50.0, 60.0)]);
}
