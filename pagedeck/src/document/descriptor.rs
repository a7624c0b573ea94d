//! Page descriptors: one record per page destined for the output.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::{FileToken, PreviewHandle, SourceFile};
use crate::input::PageSize;

/// Opaque page identity, `"{file-token}-{page-index}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Identity of page `index` of the load identified by `token`.
    pub fn new(token: &FileToken, index: usize) -> Self {
        Self(format!("{token}-{index}"))
    }

    /// Identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Page width and height in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageGeometry {
    /// US Letter, used when a page has no readable media box.
    pub const LETTER: Self = Self {
        width: 612.0,
        height: 792.0,
    };

    /// Create a geometry.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Geometry as a page size for image fitting.
    pub fn as_page_size(&self) -> PageSize {
        PageSize::new(self.width, self.height)
    }
}

impl fmt::Display for PageGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} x {:.0} pt", self.width, self.height)
    }
}

/// One page in the collection.
///
/// Descriptors carry no position; order lives in the collection.
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    /// Unique identity, the reorder/delete key.
    pub id: PageId,
    /// Normalized source shared by every page of the same load.
    pub source: Arc<SourceFile>,
    /// Zero-based page index inside `source`.
    pub source_page_index: usize,
    /// Original 1-based position within `source`, for display.
    pub display_ordinal: usize,
    /// Size from the page's media box at load time.
    pub geometry: PageGeometry,
    /// Rendered thumbnail, if one was produced.
    pub preview: Option<PreviewHandle>,
}

impl PageDescriptor {
    /// Name of the file the page came from.
    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    /// Summary suitable for serialization.
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id.clone(),
            source: self.source.name.clone(),
            url: self.source.url.to_string(),
            page: self.display_ordinal,
            geometry: self.geometry,
            has_preview: self.preview.is_some(),
        }
    }
}

/// Serializable view of a [`PageDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    /// Page identity.
    pub id: PageId,
    /// Source file name.
    pub source: String,
    /// Source URL.
    pub url: String,
    /// 1-based page number in the source.
    pub page: usize,
    /// Page size.
    pub geometry: PageGeometry,
    /// Whether a thumbnail is attached.
    pub has_preview: bool,
}
