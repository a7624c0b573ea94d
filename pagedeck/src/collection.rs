//! The ordered page collection.
//!
//! List position is the only source of output order. Besides [`append`],
//! the collection changes only through [`move_to`], [`remove`] and
//! [`clear`], so no page is ever duplicated or lost along the way.
//!
//! [`append`]: PageCollection::append
//! [`move_to`]: PageCollection::move_to
//! [`remove`]: PageCollection::remove
//! [`clear`]: PageCollection::clear

use std::collections::HashSet;

use tracing::debug;

use crate::document::{PageDescriptor, PageId};
use crate::error::{PageDeckError, Result};

/// Proof that the user agreed to discard every page.
///
/// Construct it only after asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearConfirmation(());

impl ClearConfirmation {
    /// The user confirmed.
    pub fn confirmed() -> Self {
        Self(())
    }
}

/// Ordered list of page descriptors.
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    pages: Vec<PageDescriptor>,
}

impl PageCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch at the end, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`PageDeckError::DuplicatePage`] and leaves the collection
    /// unchanged if any identity is already present or repeated in `batch`.
    pub fn append(&mut self, batch: Vec<PageDescriptor>) -> Result<()> {
        let mut seen: HashSet<&PageId> = self.pages.iter().map(|p| &p.id).collect();
        for page in &batch {
            if !seen.insert(&page.id) {
                return Err(PageDeckError::DuplicatePage {
                    id: page.id.to_string(),
                });
            }
        }

        debug!("Appending {} page(s) after {}", batch.len(), self.pages.len());
        self.pages.extend(batch);
        Ok(())
    }

    /// Move a page so it ends up at `new_index`.
    ///
    /// The page is taken out and reinserted at `new_index` of the remaining
    /// sequence; indices past the end are clamped. Returns whether the order
    /// changed. An unknown `id` leaves the collection untouched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pagedeck::collection::PageCollection;
    /// # fn example(collection: &mut PageCollection) {
    /// let last = collection.ids().last().cloned().unwrap();
    /// collection.move_to(&last, 0);
    /// # }
    /// ```
    pub fn move_to(&mut self, id: &PageId, new_index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };

        let to = new_index.min(self.pages.len() - 1);
        if from == to {
            return false;
        }

        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        true
    }

    /// Remove a page, returning it if it was present.
    pub fn remove(&mut self, id: &PageId) -> Option<PageDescriptor> {
        let index = self.position(id)?;
        Some(self.pages.remove(index))
    }

    /// Discard every page.
    pub fn clear(&mut self, _confirmation: ClearConfirmation) {
        debug!("Clearing {} page(s)", self.pages.len());
        self.pages.clear();
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the collection has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageDescriptor> {
        self.pages.iter()
    }

    /// Page at `index`.
    pub fn get(&self, index: usize) -> Option<&PageDescriptor> {
        self.pages.get(index)
    }

    /// Position of the page with identity `id`.
    pub fn position(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| &p.id == id)
    }

    /// Identities in order.
    pub fn ids(&self) -> Vec<PageId> {
        self.pages.iter().map(|p| p.id.clone()).collect()
    }

    /// First page, if any.
    pub fn first(&self) -> Option<&PageDescriptor> {
        self.pages.first()
    }

    /// Pages as a slice, ready for assembly.
    pub fn as_slice(&self) -> &[PageDescriptor] {
        &self.pages
    }

    /// Human readable page count, e.g. `"1 page"` or `"12 pages"`.
    pub fn page_count_label(&self) -> String {
        match self.pages.len() {
            1 => "1 page".to_string(),
            n => format!("{n} pages"),
        }
    }
}

impl<'a> IntoIterator for &'a PageCollection {
    type Item = &'a PageDescriptor;
    type IntoIter = std::slice::Iter<'a, PageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
