//! Structural object copying between documents.
//!
//! Objects reachable from a page are copied into the output with fresh ids.
//! The id remap is kept per source document, so resources shared by several
//! pages of one source are copied once.

use std::collections::{HashMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::document::pages::{INHERITABLE_KEYS, inherited_attribute};
use crate::error::{PageDeckError, Result};

/// A parsed source and its copy state for one assembly run.
pub(crate) struct ParsedSource {
    document: Document,
    page_ids: Vec<ObjectId>,
    remap: HashMap<ObjectId, ObjectId>,
    placed: HashSet<ObjectId>,
}

impl ParsedSource {
    pub(crate) fn new(document: Document) -> Self {
        let page_ids = crate::document::pages::page_ids(&document);
        Self {
            document,
            page_ids,
            remap: HashMap::new(),
            placed: HashSet::new(),
        }
    }

    pub(crate) fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Copy page `index` into `output` as a child of `parent`.
    ///
    /// Inherited attributes are materialized on the copy. Returns the new
    /// page's object id.
    pub(crate) fn copy_page(
        &mut self,
        output: &mut Document,
        name: &str,
        index: usize,
        parent: ObjectId,
    ) -> Result<ObjectId> {
        let Some(&page_id) = self.page_ids.get(index) else {
            return Err(PageDeckError::PageOutOfRange {
                name: name.to_string(),
                index,
                page_count: self.page_count(),
            });
        };

        let page = self
            .document
            .get_dictionary(page_id)
            .map_err(|e| PageDeckError::corrupted_pdf(name, format!("page {}: {e}", index + 1)))?;

        let mut dict = page.clone();
        for key in INHERITABLE_KEYS {
            if !dict.has(key)
                && let Some(value) = inherited_attribute(&self.document, page, key)
            {
                dict.set(key.to_vec(), value);
            }
        }
        dict.remove(b"Parent");

        // reserve the id before copying so references back to this page resolve
        let target = match self.remap.get(&page_id) {
            Some(id) if !self.placed.contains(id) => *id,
            Some(_) => output.new_object_id(),
            None => {
                let id = output.new_object_id();
                self.remap.insert(page_id, id);
                id
            }
        };

        let mut copied = copy_dictionary(output, &self.document, &dict, &mut self.remap)
            .map_err(|e| PageDeckError::assembly_failed(format!("{name}, page {}: {e}", index + 1)))?;
        copied.set("Parent", Object::Reference(parent));

        output.objects.insert(target, Object::Dictionary(copied));
        self.placed.insert(target);
        Ok(target)
    }
}

/// Deep copy `obj` from `source` into `output`, remapping every reference.
///
/// Ids are reserved before their object is copied, so reference cycles
/// terminate. Dangling references become `null`. Other pages (link
/// destinations, annotation parents) are not copied: they get a `null`
/// placeholder that [`ParsedSource::copy_page`] fills if the page is placed
/// later in the run.
pub(crate) fn copy_object(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    remap: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = remap.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            remap.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) if is_page(referenced) => Object::Null,
                Ok(referenced) => copy_object(output, source, referenced, remap)?,
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, remap,
        )?)),
        Object::Array(items) => {
            let copied = items
                .iter()
                .map(|item| copy_object(output, source, item, remap))
                .collect::<lopdf::Result<Vec<_>>>()?;
            Ok(Object::Array(copied))
        }
        Object::Stream(stream) => {
            let mut copied = stream.clone();
            copied.dict = copy_dictionary(output, source, &stream.dict, remap)?;
            copied.start_position = None;
            Ok(Object::Stream(copied))
        }
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    remap: &mut HashMap<ObjectId, ObjectId>,
) -> lopdf::Result<Dictionary> {
    if type_name(dict) == Some(b"Pages".as_slice()) {
        // page tree nodes are rebuilt by the assembler
        return Ok(Dictionary::new());
    }

    let mut copied = Dictionary::new();
    for (key, value) in dict.iter() {
        copied.set(key.clone(), copy_object(output, source, value, remap)?);
    }
    Ok(copied)
}

fn type_name(dict: &Dictionary) -> Option<&[u8]> {
    dict.get(b"Type").and_then(Object::as_name).ok()
}

fn is_page(obj: &Object) -> bool {
    obj.as_dict()
        .is_ok_and(|dict| type_name(dict) == Some(b"Page".as_slice()))
}
