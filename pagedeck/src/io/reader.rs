//! Reading uploads from the filesystem.
//!
//! Files read from disk carry no declared media type, so classification falls
//! back to the file extension.
//!
//! # Examples
//!
//! ```no_run
//! use pagedeck::io::InputReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = InputReader::new();
//! let files = reader
//!     .read_all(&[PathBuf::from("a.pdf"), PathBuf::from("scan.jpg")])
//!     .await?;
//! println!("Read {} file(s)", files.len());
//! # Ok(())
//! # }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{PageDeckError, Result};
use crate::input::InputFile;
use crate::utils::format_file_size;

/// Statistics for a batch read.
#[derive(Debug, Clone, Default)]
pub struct ReadStatistics {
    /// Number of files read.
    pub file_count: usize,

    /// Total bytes read.
    pub total_size: u64,

    /// Time taken for all reads.
    pub total_time: Duration,
}

impl ReadStatistics {
    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads input files into memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputReader;

impl InputReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single file.
    ///
    /// The upload is named after the final path component.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path is not a regular file
    /// - The file cannot be read
    pub async fn read(&self, path: &Path) -> Result<InputFile> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| access_error(path, e))?;
        if !metadata.is_file() {
            return Err(PageDeckError::not_a_file(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| access_error(path, e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Read {} ({})", path.display(), format_file_size(bytes.len() as u64));

        Ok(InputFile::new(name, bytes))
    }

    /// Read files in order, stopping at the first error.
    pub async fn read_all(&self, paths: &[PathBuf]) -> Result<Vec<InputFile>> {
        let (files, _) = self.read_all_with_stats(paths).await?;
        Ok(files)
    }

    /// Read files in order and report aggregate statistics.
    pub async fn read_all_with_stats(
        &self,
        paths: &[PathBuf],
    ) -> Result<(Vec<InputFile>, ReadStatistics)> {
        let start = Instant::now();
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            files.push(self.read(path).await?);
        }

        let stats = ReadStatistics {
            file_count: files.len(),
            total_size: files.iter().map(|f| f.len() as u64).sum(),
            total_time: start.elapsed(),
        };
        Ok((files, stats))
    }
}

fn access_error(path: &Path, err: std::io::Error) -> PageDeckError {
    if err.kind() == ErrorKind::NotFound {
        PageDeckError::file_not_found(path.to_path_buf())
    } else {
        PageDeckError::FileNotAccessible {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
