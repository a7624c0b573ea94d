//! pagedeck - Assemble, reorder and export PDF pages.
//!
//! This library turns a batch of PDF and image uploads into one ordered page
//! collection that can be rearranged and exported as a single PDF. It
//! supports:
//!
//! - Classification of uploads by media type or extension
//! - Images placed on their own pages, at intrinsic size or fitted to a page
//! - Structural page copying without re-rendering
//! - Reordering and removal by stable page identity
//! - Document information and compression on export
//!
//! # Examples
//!
//! ## Editing Session
//!
//! ```no_run
//! use pagedeck::input::InputFile;
//! use pagedeck::session::EditorSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = EditorSession::new();
//! session
//!     .upload(vec![
//!         InputFile::new("report.pdf", std::fs::read("report.pdf")?),
//!         InputFile::new("photo.jpg", std::fs::read("photo.jpg")?),
//!     ])
//!     .await?;
//!
//! // put the photo first
//! let photo = session.collection().ids().last().cloned().unwrap();
//! session.move_page(&photo, 0);
//!
//! let exported = session.export().await?;
//! println!("Exported {}", exported.file_name);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pagedeck::assemble::Assembler;
//! use pagedeck::collection::PageCollection;
//! use pagedeck::document::{DocumentLoader, LoadOptions};
//! use pagedeck::io::{InputReader, PdfWriter};
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let file = InputReader::new().read(&PathBuf::from("input.pdf")).await?;
//! let pages = DocumentLoader::new().load(file, &LoadOptions::default()).await?;
//!
//! let mut collection = PageCollection::new();
//! collection.append(pages)?;
//!
//! let output = Assembler::new().assemble(collection.as_slice()).await?;
//! PdfWriter::new().write(&output.bytes, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod input;
pub mod io;
pub mod output;
pub mod session;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use error::{PageDeckError, Result};
pub use session::EditorSession;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
