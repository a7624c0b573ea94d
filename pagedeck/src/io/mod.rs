//! Filesystem input and output.
//!
//! - [`InputReader`]: paths to [`InputFile`](crate::input::InputFile)s
//! - [`PdfWriter`]: atomic writes of exported documents

pub mod reader;
pub mod writer;

pub use reader::{InputReader, ReadStatistics};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
