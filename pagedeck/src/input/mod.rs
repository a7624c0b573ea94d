//! Input handling: classification of uploads and image normalization.
//!
//! Every upload enters the engine as an [`InputFile`]. The classifier decides
//! once whether it is a PDF, a raster image or something we cannot use, and
//! images are turned into single-page PDFs before the loader ever sees them.

pub mod classify;
pub mod normalize;

pub use classify::{ACCEPTED_EXTENSIONS, ImageKind, InputKind, accept_attribute, classify};
pub use normalize::{
    ImageEmbedding, ImageNormalizer, ImagePlacement, MAX_INTRINSIC_SIDE, NormalizedImage, PageSize,
};

use std::fmt;

/// An uploaded file held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct InputFile {
    /// File name as supplied by the user, including the extension.
    pub name: String,
    /// Declared content type, if the source provided one.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl InputFile {
    /// Create an upload without a declared content type.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Attach a declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for InputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
