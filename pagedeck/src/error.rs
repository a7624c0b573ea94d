//! Error types for pagedeck.
//!
//! Errors are grouped by the stage that raises them:
//!
//! - **Input errors**: unsupported files, unreadable paths
//! - **Decode errors**: images or PDFs that cannot be decoded or parsed
//! - **Collection errors**: operations that would break collection invariants
//! - **Export errors**: empty documents, assembly and write failures

use std::io;
use std::path::PathBuf;

/// Result type alias for pagedeck operations.
pub type Result<T> = std::result::Result<T, PageDeckError>;

/// Main error type for pagedeck operations.
#[derive(Debug, thiserror::Error)]
pub enum PageDeckError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input path is a directory or another non-file entry.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// File is neither a PDF nor a supported image.
    #[error("Unsupported file type: {name}")]
    UnsupportedInput {
        /// Name of the rejected file.
        name: String,
    },

    /// Image bytes could not be decoded.
    #[error("Failed to decode image: {name}\n  Reason: {reason}")]
    ImageDecode {
        /// Name of the image file.
        name: String,
        /// Decoder message.
        reason: String,
    },

    /// Re-encoding an image produced no bytes.
    #[error("Image conversion produced no data: {name}")]
    EmptyEncoding {
        /// Name of the image file.
        name: String,
    },

    /// Failed to parse a PDF.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Name of the PDF file.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// PDF parsed but its structure is unusable.
    #[error("Corrupted or invalid PDF: {name}\n  Details: {details}")]
    CorruptedPdf {
        /// Name of the PDF file.
        name: String,
        /// Details about the corruption.
        details: String,
    },

    /// PDF is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Name of the PDF file.
        name: String,
    },

    /// A page index does not exist in its source document.
    #[error("Page index {index} is out of range for {name} ({page_count} page(s))")]
    PageOutOfRange {
        /// Name of the source file.
        name: String,
        /// Requested zero-based index.
        index: usize,
        /// Pages in the source.
        page_count: usize,
    },

    /// A page with this identity is already in the collection.
    #[error("Duplicate page identity: {id}")]
    DuplicatePage {
        /// The colliding identity.
        id: String,
    },

    /// There are no pages to export.
    #[error("No pages to export")]
    EmptyDocument,

    /// Page copying or output serialization failed.
    #[error("Failed to assemble document: {reason}")]
    AssemblyFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PageDeckError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for PageDeckError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PageDeckError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an UnsupportedInput error.
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedInput { name: name.into() }
    }

    /// Create an ImageDecode error.
    pub fn image_decode(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::ImageDecode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            name: name.into(),
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(name: impl Into<String>) -> Self {
        Self::EncryptedPdf { name: name.into() }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an AssemblyFailed error.
    pub fn assembly_failed(reason: impl Into<String>) -> Self {
        Self::AssemblyFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Map a `lopdf` parse failure for `name`, recognising encrypted input.
    pub fn from_parse(name: &str, err: &lopdf::Error) -> Self {
        let msg = err.to_string();
        let lowered = msg.to_lowercase();
        if lowered.contains("encrypt") || lowered.contains("password") {
            Self::encrypted_pdf(name)
        } else {
            Self::failed_to_load_pdf(name, msg)
        }
    }

    /// Whether the error concerns a single input file rather than the whole run.
    ///
    /// Used to decide which failures are reported as "failed to load" to the
    /// user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedInput { .. }
                | Self::ImageDecode { .. }
                | Self::EmptyEncoding { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
                | Self::EncryptedPdf { .. }
        )
    }

    /// Check if this error should stop all processing immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EmptyDocument
                | Self::FailedToCreateOutput { .. }
                | Self::FailedToWrite { .. }
                | Self::Cancelled
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::UnsupportedInput { .. } => 3,
            Self::ImageDecode { .. } => 3,
            Self::EmptyEncoding { .. } => 3,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::PageOutOfRange { .. } => 6,
            Self::DuplicatePage { .. } => 6,
            Self::EmptyDocument => 1,
            Self::AssemblyFailed { .. } => 6,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // SIGINT
            Self::Io(_) => 5,
            Self::Other { .. } => 1,
        }
    }
}
