//! Loaded documents and their pages.
//!
//! This module provides:
//! - [`SourceFile`]: normalized PDF bytes shared by all pages of one load
//! - [`PageDescriptor`]: one page destined for the output
//! - [`DocumentLoader`]: turns uploads into descriptors
//! - [`PreviewRenderer`]: the seam for external thumbnail rendering

pub mod descriptor;
pub mod loader;
pub mod pages;
pub mod preview;
pub mod source;

pub use descriptor::{PageDescriptor, PageGeometry, PageId, PageSummary};
pub use loader::{DocumentLoader, LoadOptions, LoadReport};
pub use preview::{PreviewBitmap, PreviewError, PreviewHandle, PreviewRenderer, THUMBNAIL_SCALE};
pub use source::{FileToken, SourceFile, SourceOrigin, SourceUrl};
