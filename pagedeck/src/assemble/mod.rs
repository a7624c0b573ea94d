//! Document assembly: ordered pages in, one PDF out.
//!
//! This module provides:
//! - [`Assembler`]: structural page copying into a new document
//! - [`MetadataManager`]: document information for the output
//!
//! Each assembly run keeps its own cache of parsed sources, keyed by file
//! token, so a source contributing several pages is parsed once and its
//! shared resources are copied once.

pub mod assembler;
mod copier;
pub mod metadata;

pub use assembler::{AssembleOptions, AssembledDocument, Assembler, AssemblyStatistics};
pub use metadata::{MetadataManager, format_pdf_date};
