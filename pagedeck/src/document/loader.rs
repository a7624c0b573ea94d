//! Document loading: uploads in, page descriptors out.
//!
//! The loader classifies each upload, normalizes images into one-page PDFs,
//! parses the result to read page geometry, and emits one [`PageDescriptor`]
//! per page. Previews are requested from an optional external renderer.
//!
//! # Examples
//!
//! ```no_run
//! use pagedeck::document::{DocumentLoader, LoadOptions};
//! use pagedeck::input::InputFile;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = DocumentLoader::new();
//! let file = InputFile::new("scan.png", std::fs::read("scan.png")?);
//! let pages = loader.load(file, &LoadOptions::default()).await?;
//! println!("Loaded {} page(s)", pages.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task;
use tracing::{debug, info, warn};

use super::pages::{page_geometry, page_ids, parse_pdf};
use super::preview::{PreviewHandle, PreviewRenderer, THUMBNAIL_SCALE};
use super::source::random_token;
use super::{FileToken, PageDescriptor, PageGeometry, PageId, SourceFile, SourceOrigin, SourceUrl};
use crate::error::{PageDeckError, Result};
use crate::input::{ImageNormalizer, InputFile, InputKind, PageSize, classify};

const SESSION_ID_LEN: usize = 8;

/// Options controlling how uploads become pages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadOptions {
    /// Page size images are fitted into. `None` sizes pages from the image.
    pub target_page_size: Option<PageSize>,

    /// In a batch without a target, fit images into the first page loaded.
    pub fit_to_first_loaded: bool,
}

impl LoadOptions {
    /// Fit images into `size`.
    pub fn with_target(size: PageSize) -> Self {
        Self {
            target_page_size: Some(size),
            ..Default::default()
        }
    }
}

/// Outcome of a batch load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// New descriptors, in upload order.
    pub pages: Vec<PageDescriptor>,

    /// Number of files that were loaded.
    pub files_loaded: usize,

    /// Names of files skipped as unsupported.
    pub files_skipped: Vec<String>,

    /// Time taken for the whole batch.
    pub elapsed: Duration,
}

impl LoadReport {
    /// Whether the batch produced no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Parsed and normalized upload, before a token is minted.
struct Prepared {
    name: String,
    bytes: Vec<u8>,
    origin: SourceOrigin,
    geometries: Vec<PageGeometry>,
}

/// Turns uploads into page descriptors.
#[derive(Clone)]
pub struct DocumentLoader {
    session: String,
    normalizer: ImageNormalizer,
    renderer: Option<Arc<dyn PreviewRenderer>>,
}

impl std::fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentLoader")
            .field("session", &self.session)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl DocumentLoader {
    /// Create a loader with a fresh session id and no preview renderer.
    pub fn new() -> Self {
        Self {
            session: random_token(SESSION_ID_LEN),
            normalizer: ImageNormalizer::new(),
            renderer: None,
        }
    }

    /// Attach a preview renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn PreviewRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Session id used in source URLs.
    pub fn session_id(&self) -> &str {
        &self.session
    }

    /// Load a single upload.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is neither a PDF nor a supported image
    /// - The image cannot be normalized
    /// - The PDF cannot be parsed, is encrypted, or has no pages
    pub async fn load(&self, file: InputFile, options: &LoadOptions) -> Result<Vec<PageDescriptor>> {
        let kind = classify(&file);
        if !kind.is_supported() {
            return Err(PageDeckError::unsupported(&file.name));
        }

        let normalizer = self.normalizer;
        let target = options.target_page_size;
        let prepared = task::spawn_blocking(move || prepare(normalizer, file, kind, target))
            .await
            .map_err(|e| PageDeckError::other(format!("Load task failed: {e}")))??;

        let token = FileToken::generate();
        let page_count = prepared.geometries.len();
        let source = Arc::new(SourceFile {
            url: SourceUrl::new(&self.session, &token, &prepared.name),
            token: token.clone(),
            name: prepared.name,
            bytes: prepared.bytes,
            page_count,
            origin: prepared.origin,
        });

        let previews = self.render_previews(&source).await;

        debug!(
            "Loaded {} as {} ({} page(s))",
            source.name, source.token, page_count
        );

        Ok(prepared
            .geometries
            .into_iter()
            .zip(previews)
            .enumerate()
            .map(|(index, (geometry, preview))| PageDescriptor {
                id: PageId::new(&token, index),
                source: Arc::clone(&source),
                source_page_index: index,
                display_ordinal: index + 1,
                geometry,
                preview,
            })
            .collect())
    }

    /// Load a batch of uploads in order.
    ///
    /// Files are loaded one at a time, previews included. Unsupported files
    /// are skipped. Any failure aborts the batch and no descriptors are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the first load error encountered.
    pub async fn load_batch(&self, files: Vec<InputFile>, options: &LoadOptions) -> Result<LoadReport> {
        let start = Instant::now();
        let mut pages: Vec<PageDescriptor> = Vec::new();
        let mut files_loaded = 0;
        let mut files_skipped = Vec::new();
        let mut options = *options;

        for file in files {
            if !classify(&file).is_supported() {
                debug!("Skipping unsupported file: {}", file.name);
                files_skipped.push(file.name);
                continue;
            }

            let loaded = self.load(file, &options).await?;

            if options.fit_to_first_loaded
                && options.target_page_size.is_none()
                && let Some(first) = loaded.first()
            {
                options.target_page_size = Some(first.geometry.as_page_size());
            }

            files_loaded += 1;
            pages.extend(loaded);
        }

        let elapsed = start.elapsed();
        if files_loaded > 0 {
            info!(
                "Loaded {} file(s) into {} page(s) in {:.2}s",
                files_loaded,
                pages.len(),
                elapsed.as_secs_f64()
            );
        }

        Ok(LoadReport {
            pages,
            files_loaded,
            files_skipped,
            elapsed,
        })
    }

    /// One preview per page, or none at all if any page fails.
    async fn render_previews(&self, source: &Arc<SourceFile>) -> Vec<Option<PreviewHandle>> {
        let page_count = source.page_count;
        let Some(renderer) = self.renderer.clone() else {
            return vec![None; page_count];
        };

        let task_source = Arc::clone(source);
        let rendered = task::spawn_blocking(move || {
            (0..task_source.page_count)
                .map(|index| {
                    renderer
                        .render(&task_source, index, THUMBNAIL_SCALE)
                        .map(PreviewHandle::new)
                })
                .collect::<std::result::Result<Vec<_>, _>>()
        })
        .await;

        match rendered {
            Ok(Ok(previews)) => previews.into_iter().map(Some).collect(),
            Ok(Err(err)) => {
                warn!("No previews for {}: {}", source.name, err);
                vec![None; page_count]
            }
            Err(err) => {
                warn!("Preview task for {} failed: {}", source.name, err);
                vec![None; page_count]
            }
        }
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn prepare(
    normalizer: ImageNormalizer,
    file: InputFile,
    kind: InputKind,
    target: Option<PageSize>,
) -> Result<Prepared> {
    let (bytes, origin) = match kind {
        InputKind::Pdf => (file.bytes, SourceOrigin::Pdf),
        InputKind::Image(image_kind) => {
            let normalized = normalizer.normalize(&file, image_kind, target)?;
            (normalized.bytes, SourceOrigin::Image(normalized.embedding))
        }
        InputKind::Unsupported => return Err(PageDeckError::unsupported(&file.name)),
    };

    let doc = parse_pdf(&file.name, &bytes)?;
    let geometries = page_ids(&doc)
        .into_iter()
        .map(|id| page_geometry(&doc, id))
        .collect();

    Ok(Prepared {
        name: file.name,
        bytes,
        origin,
        geometries,
    })
}
