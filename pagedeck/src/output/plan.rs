//! The export plan shown by `--dry-run`.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{CompressionLevel, Config, ImageSizing, Metadata};
use crate::document::{PageDescriptor, PageSummary};

/// What an export would produce, without producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportPlan {
    /// Destination path.
    pub output: PathBuf,

    /// Pages in output order.
    pub pages: Vec<PageSummary>,

    /// Inputs that were skipped as unsupported.
    pub skipped: Vec<String>,

    /// Compression level.
    pub compression: CompressionLevel,

    /// How images are sized.
    pub image_sizing: ImageSizing,

    /// Document information to set.
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl ExportPlan {
    /// Describe exporting `pages` under `config`.
    pub fn new(config: &Config, pages: &[PageDescriptor], skipped: Vec<String>) -> Self {
        Self {
            output: config.output.clone(),
            pages: pages.iter().map(PageDescriptor::summary).collect(),
            skipped,
            compression: config.compression,
            image_sizing: config.image_sizing,
            metadata: config.metadata.clone(),
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
