//! Preview rendering seam.
//!
//! Thumbnail rendering lives outside the engine. A renderer is handed the
//! normalized source and a page index and returns a bitmap; the loader
//! attaches the result to each page descriptor.

use std::sync::Arc;

use super::SourceFile;

/// Scale used for page thumbnails.
pub const THUMBNAIL_SCALE: f32 = 0.5;

/// Failure reported by a [`PreviewRenderer`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("preview rendering failed: {message}")]
pub struct PreviewError {
    /// Renderer message.
    pub message: String,
}

impl PreviewError {
    /// Create a preview error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A rendered page image.
#[derive(Clone, PartialEq, Eq)]
pub struct PreviewBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded image data, as produced by the renderer.
    pub data: Vec<u8>,
}

impl std::fmt::Debug for PreviewBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Cheap-to-clone handle to a rendered preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle(Arc<PreviewBitmap>);

impl PreviewHandle {
    /// Wrap a rendered bitmap.
    pub fn new(bitmap: PreviewBitmap) -> Self {
        Self(Arc::new(bitmap))
    }

    /// The rendered bitmap.
    pub fn bitmap(&self) -> &PreviewBitmap {
        &self.0
    }
}

/// Renders page thumbnails.
///
/// Called from blocking threads; implementations must not share mutable
/// state with the assembler.
pub trait PreviewRenderer: Send + Sync {
    /// Render page `page_index` (zero-based) of `source` at `scale`.
    fn render(
        &self,
        source: &SourceFile,
        page_index: usize,
        scale: f32,
    ) -> Result<PreviewBitmap, PreviewError>;
}
