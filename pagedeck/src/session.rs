//! The editing session: upload, arrange, export.
//!
//! An [`EditorSession`] ties a [`DocumentLoader`], a [`PageCollection`] and an
//! [`Assembler`] together. Every operation either completes or leaves the
//! collection exactly as it was.
//!
//! # Examples
//!
//! ```no_run
//! use pagedeck::input::InputFile;
//! use pagedeck::session::EditorSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = EditorSession::new();
//! session
//!     .upload(vec![
//!         InputFile::new("contract.pdf", std::fs::read("contract.pdf")?),
//!         InputFile::new("signature.jpg", std::fs::read("signature.jpg")?),
//!     ])
//!     .await?;
//!
//! let exported = session.export().await?;
//! std::fs::write(&exported.file_name, &exported.bytes)?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::assemble::{AssembleOptions, Assembler, AssemblyStatistics};
use crate::collection::{ClearConfirmation, PageCollection};
use crate::config::{ImageSizing, PageRange};
use crate::document::{DocumentLoader, LoadOptions, PageDescriptor, PageId};
use crate::error::{PageDeckError, Result};
use crate::input::InputFile;

/// File name offered for an exported document.
pub const EXPORT_FILE_NAME: &str = "edited-document.pdf";

/// Media type of an exported document.
pub const EXPORT_MIME_TYPE: &str = "application/pdf";

/// Outcome of an upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    /// Pages appended to the collection.
    pub pages_added: usize,

    /// Files that contributed pages.
    pub files_loaded: usize,

    /// Names of files skipped as unsupported.
    pub files_skipped: Vec<String>,

    /// Time taken to load the batch.
    pub elapsed: Duration,
}

impl UploadReport {
    /// Whether the upload added nothing.
    pub fn is_empty(&self) -> bool {
        self.pages_added == 0
    }
}

/// A finished document ready to hand to the user.
#[derive(Clone)]
pub struct ExportedDocument {
    /// Suggested file name.
    pub file_name: &'static str,

    /// Media type of `bytes`.
    pub mime_type: &'static str,

    /// PDF bytes.
    pub bytes: Vec<u8>,

    /// Statistics from assembly.
    pub statistics: AssemblyStatistics,
}

impl std::fmt::Debug for ExportedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedDocument")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A single user's page editing session.
#[derive(Debug, Default)]
pub struct EditorSession {
    loader: DocumentLoader,
    assembler: Assembler,
    collection: PageCollection,
    image_sizing: ImageSizing,
}

impl EditorSession {
    /// Create an empty session with default loader and assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from its parts.
    pub fn with_parts(loader: DocumentLoader, assembler: Assembler) -> Self {
        Self {
            loader,
            assembler,
            ..Default::default()
        }
    }

    /// Choose how image uploads are sized.
    pub fn with_image_sizing(mut self, image_sizing: ImageSizing) -> Self {
        self.image_sizing = image_sizing;
        self
    }

    /// Replace the assembly options used by [`export`](Self::export).
    pub fn set_assemble_options(&mut self, options: AssembleOptions) {
        self.assembler = Assembler::with_options(options);
    }

    /// Load a batch of uploads and append their pages.
    ///
    /// Unsupported files are skipped. Pages are committed only if every
    /// supported file loads.
    ///
    /// # Errors
    ///
    /// Returns the first load error; the collection is left unchanged.
    pub async fn upload(&mut self, files: Vec<InputFile>) -> Result<UploadReport> {
        let options = self.load_options();
        let report = self.loader.load_batch(files, &options).await?;

        if report.is_empty() {
            debug!(
                "Upload added no pages ({} file(s) skipped)",
                report.files_skipped.len()
            );
        }

        let pages_added = report.pages.len();
        self.collection.append(report.pages)?;

        if pages_added > 0 {
            info!(
                "Added {} page(s), session now has {}",
                pages_added,
                self.collection.page_count_label()
            );
        }

        Ok(UploadReport {
            pages_added,
            files_loaded: report.files_loaded,
            files_skipped: report.files_skipped,
            elapsed: report.elapsed,
        })
    }

    fn load_options(&self) -> LoadOptions {
        match self.image_sizing {
            ImageSizing::Intrinsic => LoadOptions::default(),
            ImageSizing::MatchFirstPage => match self.collection.first() {
                Some(first) => LoadOptions::with_target(first.geometry.as_page_size()),
                None => LoadOptions {
                    fit_to_first_loaded: true,
                    ..Default::default()
                },
            },
        }
    }

    /// Move a page to `new_index`. Returns whether the order changed.
    pub fn move_page(&mut self, id: &PageId, new_index: usize) -> bool {
        self.collection.move_to(id, new_index)
    }

    /// Remove a page, returning it if it was present.
    pub fn remove_page(&mut self, id: &PageId) -> Option<PageDescriptor> {
        self.collection.remove(id)
    }

    /// Discard every page.
    pub fn clear(&mut self, confirmation: ClearConfirmation) {
        self.collection.clear(confirmation);
    }

    /// Keep only the pages at the 1-based positions in `range`, in the order
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`PageDeckError::InvalidConfig`] if `range` names a position
    /// past the end. Nothing is changed in that case.
    pub fn reorder(&mut self, range: &PageRange) -> Result<()> {
        let keep = self.ids_at(range)?;

        for id in self.collection.ids() {
            if !keep.contains(&id) {
                self.collection.remove(&id);
            }
        }
        for (index, id) in keep.iter().enumerate() {
            self.collection.move_to(id, index);
        }

        debug!("Reordered to {}", self.collection.page_count_label());
        Ok(())
    }

    /// Remove the pages at the 1-based positions in `range`.
    ///
    /// Returns the number of pages removed.
    ///
    /// # Errors
    ///
    /// Returns [`PageDeckError::InvalidConfig`] if `range` names a position
    /// past the end. Nothing is changed in that case.
    pub fn remove_pages(&mut self, range: &PageRange) -> Result<usize> {
        let ids = self.ids_at(range)?;
        Ok(ids
            .iter()
            .filter(|id| self.collection.remove(id).is_some())
            .count())
    }

    fn ids_at(&self, range: &PageRange) -> Result<Vec<PageId>> {
        let ids = self.collection.ids();
        let positions = range
            .ordered_positions(ids.len() as u32)
            .map_err(|e| PageDeckError::invalid_config(e.to_string()))?;
        Ok(positions
            .into_iter()
            .map(|position| ids[position as usize - 1].clone())
            .collect())
    }

    /// Assemble the collection into a PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PageDeckError::EmptyDocument`] when there are no pages, or
    /// the assembly error. The collection is not modified either way.
    pub async fn export(&self) -> Result<ExportedDocument> {
        if self.collection.is_empty() {
            return Err(PageDeckError::EmptyDocument);
        }

        let assembled = self.assembler.assemble(self.collection.as_slice()).await?;
        Ok(ExportedDocument {
            file_name: EXPORT_FILE_NAME,
            mime_type: EXPORT_MIME_TYPE,
            bytes: assembled.bytes,
            statistics: assembled.statistics,
        })
    }

    /// Human readable page count.
    pub fn page_count_label(&self) -> String {
        self.collection.page_count_label()
    }

    /// The page collection.
    pub fn collection(&self) -> &PageCollection {
        &self.collection
    }

    /// Pages in order.
    pub fn pages(&self) -> &[PageDescriptor] {
        self.collection.as_slice()
    }
}
