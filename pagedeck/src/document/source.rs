//! Normalized source files shared by page descriptors.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::input::ImageEmbedding;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 10;

/// Random base-36 string of `len` characters.
pub(crate) fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Random token minted once per load.
///
/// Prefixes every page identity of the load and keys the assembler's
/// parsed-source cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileToken(String);

impl FileToken {
    /// Mint a fresh random token.
    pub fn generate() -> Self {
        Self(random_token(TOKEN_LEN))
    }

    /// Token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session-scoped reference to a loaded source, `pagedeck://<session>/<token>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Build the URL for a source in `session`.
    pub fn new(session: &str, token: &FileToken, name: &str) -> Self {
        let name: String = name
            .chars()
            .map(|c| if c == '/' || c == '\\' || c.is_whitespace() { '_' } else { c })
            .collect();
        Self(format!("pagedeck://{session}/{token}/{name}"))
    }

    /// URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a source's PDF bytes came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "embedding")]
pub enum SourceOrigin {
    /// Uploaded as a PDF.
    Pdf,
    /// Generated from an image.
    Image(ImageEmbedding),
}

/// A normalized, guaranteed-PDF source. Immutable once created.
#[derive(Clone, PartialEq)]
pub struct SourceFile {
    /// Load token.
    pub token: FileToken,
    /// Original upload name.
    pub name: String,
    /// Session-scoped reference shared by every page of the load.
    pub url: SourceUrl,
    /// Serialized PDF.
    pub bytes: Vec<u8>,
    /// Number of pages in `bytes`.
    pub page_count: usize,
    /// Whether the bytes were uploaded or synthesized from an image.
    pub origin: SourceOrigin,
}

impl SourceFile {
    /// Size of the PDF bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("len", &self.bytes.len())
            .field("page_count", &self.page_count)
            .field("origin", &self.origin)
            .finish()
    }
}
