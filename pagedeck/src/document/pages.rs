//! Page tree helpers shared by the loader and the assembler.
//!
//! This module handles the page-level reads both stages need:
//! - Parsing source bytes with encryption detection
//! - Ordered page lookup
//! - Attribute inheritance through the page tree
//! - Media box geometry

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use super::PageGeometry;
use crate::error::{PageDeckError, Result};

/// Page attributes a page may inherit from its ancestors.
pub const INHERITABLE_KEYS: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

// Guards against cyclic Parent chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Parse PDF bytes.
///
/// This does CPU-bound parsing; async callers should run it on a blocking
/// thread.
///
/// # Errors
///
/// - [`PageDeckError::EncryptedPdf`] if the document is encrypted
/// - [`PageDeckError::FailedToLoadPdf`] if parsing fails
/// - [`PageDeckError::CorruptedPdf`] if the document has no pages
pub fn parse_pdf(name: &str, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| PageDeckError::from_parse(name, &e))?;

    if doc.is_encrypted() {
        return Err(PageDeckError::encrypted_pdf(name));
    }

    if doc.get_pages().is_empty() {
        return Err(PageDeckError::corrupted_pdf(name, "PDF has no pages"));
    }

    debug!("Parsed {} ({} objects)", name, doc.objects.len());
    Ok(doc)
}

/// Page object ids in page order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Look up `key` on a page, walking up the `Parent` chain if needed.
///
/// Returns the value as stored, so references are not resolved.
pub fn inherited_attribute(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    if let Ok(value) = page.get(key) {
        return Some(value.clone());
    }

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Width and height of a page from its (inherited) media box.
///
/// Falls back to US Letter when the box is missing or malformed.
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return PageGeometry::LETTER;
    };

    inherited_attribute(doc, page, b"MediaBox")
        .and_then(|value| rectangle(doc, &value))
        .map(|[x0, y0, x1, y1]| PageGeometry::new((x1 - x0).abs(), (y1 - y0).abs()))
        .filter(|g| g.width > 0.0 && g.height > 0.0)
        .unwrap_or(PageGeometry::LETTER)
}

fn rectangle(doc: &Document, value: &Object) -> Option<[f32; 4]> {
    let array = match value {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    if array.len() != 4 {
        return None;
    }

    let mut rect = [0.0; 4];
    for (slot, item) in rect.iter_mut().zip(array) {
        *slot = match item {
            Object::Reference(id) => doc.get_object(*id).ok()?.as_float().ok()?,
            other => other.as_float().ok()?,
        };
    }
    Some(rect)
}
