//! Output document assembly.
//!
//! Pages are copied structurally, in collection order, from their source
//! documents into a fresh output document. Nothing is re-rendered.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lopdf::{Document, Object, dictionary};
use serde::Serialize;
use tokio::task;
use tracing::{debug, info};

use super::copier::ParsedSource;
use super::metadata::MetadataManager;
use crate::config::{CompressionLevel, Metadata};
use crate::document::pages::parse_pdf;
use crate::document::{FileToken, PageDescriptor, SourceFile};
use crate::error::{PageDeckError, Result};
use crate::utils::format_file_size;

/// Options for finishing the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Document information to set.
    pub metadata: Metadata,

    /// Compression applied before serialization.
    pub compression: CompressionLevel,
}

/// Statistics about an assembly run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyStatistics {
    /// Pages in the output.
    pub pages_copied: usize,

    /// Distinct source documents parsed.
    pub sources_parsed: usize,

    /// Time taken to assemble and serialize.
    pub elapsed: Duration,

    /// Size of the serialized output in bytes.
    pub output_size: u64,
}

impl AssemblyStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// A serialized output document.
#[derive(Clone)]
pub struct AssembledDocument {
    /// PDF bytes.
    pub bytes: Vec<u8>,

    /// Statistics about the run.
    pub statistics: AssemblyStatistics,
}

impl std::fmt::Debug for AssembledDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssembledDocument")
            .field("len", &self.bytes.len())
            .field("statistics", &self.statistics)
            .finish()
    }
}

/// Copies ordered pages into one output PDF.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: AssembleOptions,
    metadata_manager: MetadataManager,
}

impl Assembler {
    /// Create an assembler with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler with custom options.
    pub fn with_options(options: AssembleOptions) -> Self {
        Self {
            options,
            metadata_manager: MetadataManager::new(),
        }
    }

    /// Options in use.
    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Assemble `pages`, in order, into one PDF.
    ///
    /// Each distinct source is parsed at most once per call. The work runs on
    /// a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `pages` is empty
    /// - A source cannot be parsed
    /// - A page index is outside its source
    /// - The output cannot be serialized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pagedeck::assemble::Assembler;
    /// # use pagedeck::collection::PageCollection;
    /// # async fn example(collection: &PageCollection) -> Result<(), Box<dyn std::error::Error>> {
    /// let assembler = Assembler::new();
    /// let output = assembler.assemble(collection.as_slice()).await?;
    /// println!("{} pages, {}", output.statistics.pages_copied, output.statistics.format_output_size());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn assemble(&self, pages: &[PageDescriptor]) -> Result<AssembledDocument> {
        if pages.is_empty() {
            return Err(PageDeckError::EmptyDocument);
        }

        let requests: Vec<(Arc<SourceFile>, usize)> = pages
            .iter()
            .map(|page| (Arc::clone(&page.source), page.source_page_index))
            .collect();
        let options = self.options.clone();
        let metadata_manager = self.metadata_manager;

        task::spawn_blocking(move || assemble_blocking(&requests, &options, metadata_manager))
            .await
            .map_err(|e| PageDeckError::other(format!("Assembly task failed: {e}")))?
    }
}

fn assemble_blocking(
    requests: &[(Arc<SourceFile>, usize)],
    options: &AssembleOptions,
    metadata_manager: MetadataManager,
) -> Result<AssembledDocument> {
    let start = Instant::now();

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    let mut sources: HashMap<FileToken, ParsedSource> = HashMap::new();
    let mut kids = Vec::with_capacity(requests.len());

    for (source, index) in requests {
        let parsed = match sources.entry(source.token.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let document = parse_pdf(&source.name, &source.bytes)?;
                debug!("Parsed source {} ({})", source.name, source.token);
                entry.insert(ParsedSource::new(document))
            }
        };

        let page_id = parsed.copy_page(&mut output, &source.name, *index, pages_id)?;
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    output.trailer.set("Root", catalog_id);

    metadata_manager.set_metadata(&mut output, &options.metadata)?;

    match options.compression {
        CompressionLevel::None => {}
        CompressionLevel::Standard => {
            output.compress();
        }
        CompressionLevel::Maximum => {
            output.compress();
            output.prune_objects();
            output.renumber_objects();
        }
    }

    let mut bytes = Vec::new();
    output
        .save_to(&mut bytes)
        .map_err(|e| PageDeckError::assembly_failed(format!("Failed to serialize output: {e}")))?;

    let statistics = AssemblyStatistics {
        pages_copied: requests.len(),
        sources_parsed: sources.len(),
        elapsed: start.elapsed(),
        output_size: bytes.len() as u64,
    };

    info!(
        "Assembled {} page(s) from {} source(s) in {:.2}s ({})",
        statistics.pages_copied,
        statistics.sources_parsed,
        statistics.elapsed.as_secs_f64(),
        statistics.format_output_size()
    );

    Ok(AssembledDocument { bytes, statistics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentLoader, LoadOptions};
    use crate::input::InputFile;
    use crate::test_support::{media_boxes, pdf_file, png_file};

    async fn load(file: InputFile) -> Vec<PageDescriptor> {
        DocumentLoader::new()
            .load(file, &LoadOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_assemble_empty_is_refused() {
        let err = Assembler::new().assemble(&[]).await.unwrap_err();
        assert!(matches!(err, PageDeckError::EmptyDocument));
    }

    #[tokio::test]
    async fn test_single_page_round_trip() {
        let pages = load(pdf_file("one.pdf", &[(420.0, 595.0)])).await;
        let output = Assembler::new().assemble(&pages).await.unwrap();

        assert_eq!(media_boxes(&output.bytes), vec![(420.0, 595.0)]);
        assert_eq!(output.statistics.pages_copied, 1);
        assert_eq!(output.statistics.sources_parsed, 1);
        assert_eq!(output.statistics.output_size, output.bytes.len() as u64);
    }

    #[tokio::test]
    async fn test_interleaved_sources_parsed_once() {
        let a = load(pdf_file("a.pdf", &[(100.0, 100.0), (101.0, 101.0)])).await;
        let b = load(pdf_file("b.pdf", &[(200.0, 200.0), (201.0, 201.0)])).await;
        let order = vec![a[0].clone(), b[0].clone(), a[1].clone(), b[1].clone()];

        let output = Assembler::new().assemble(&order).await.unwrap();

        assert_eq!(output.statistics.sources_parsed, 2);
        assert_eq!(
            media_boxes(&output.bytes),
            vec![(100.0, 100.0), (200.0, 200.0), (101.0, 101.0), (201.0, 201.0)]
        );
    }

    #[tokio::test]
    async fn test_subset_and_reverse_order() {
        let pages = load(pdf_file(
            "four.pdf",
            &[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0), (40.0, 40.0)],
        ))
        .await;
        let order = vec![pages[3].clone(), pages[0].clone()];

        let output = Assembler::new().assemble(&order).await.unwrap();
        assert_eq!(media_boxes(&output.bytes), vec![(40.0, 40.0), (10.0, 10.0)]);
    }

    #[tokio::test]
    async fn test_images_and_pdfs_mixed() {
        let mut pages = load(png_file("scan.png", 100, 50)).await;
        pages.extend(load(pdf_file("doc.pdf", &[(612.0, 792.0)])).await);

        let output = Assembler::new().assemble(&pages).await.unwrap();
        assert_eq!(
            media_boxes(&output.bytes),
            vec![(100.0, 50.0), (612.0, 792.0)]
        );
    }

    #[tokio::test]
    async fn test_page_out_of_range_aborts() {
        let mut pages = load(pdf_file("one.pdf", &[(612.0, 792.0)])).await;
        pages[0].source_page_index = 4;

        let err = Assembler::new().assemble(&pages).await.unwrap_err();
        assert!(matches!(err, PageDeckError::PageOutOfRange { index: 4, .. }));
    }

    #[tokio::test]
    async fn test_corrupt_source_aborts() {
        let mut pages = load(pdf_file("one.pdf", &[(612.0, 792.0)])).await;
        let mut broken = (*pages[0].source).clone();
        broken.bytes = b"garbage".to_vec();
        pages[0].source = Arc::new(broken);

        let result = Assembler::new().assemble(&pages).await;
        assert!(matches!(result, Err(PageDeckError::FailedToLoadPdf { .. })));
    }

    #[tokio::test]
    async fn test_compression_levels_produce_valid_output() {
        let pages = load(pdf_file("two.pdf", &[(612.0, 792.0), (300.0, 300.0)])).await;

        for compression in [
            CompressionLevel::None,
            CompressionLevel::Standard,
            CompressionLevel::Maximum,
        ] {
            let assembler = Assembler::with_options(AssembleOptions {
                compression,
                ..Default::default()
            });
            let output = assembler.assemble(&pages).await.unwrap();
            assert_eq!(
                media_boxes(&output.bytes),
                vec![(612.0, 792.0), (300.0, 300.0)],
                "{compression:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_metadata_written() {
        let pages = load(pdf_file("one.pdf", &[(612.0, 792.0)])).await;
        let metadata = Metadata::new(Some("Receipts".to_string()), None, None, None);
        let assembler = Assembler::with_options(AssembleOptions {
            metadata: metadata.clone(),
            ..Default::default()
        });

        let output = assembler.assemble(&pages).await.unwrap();
        let doc = Document::load_mem(&output.bytes).unwrap();
        assert_eq!(MetadataManager::new().get_metadata(&doc), metadata);
    }
}
