use crate::collector::{AttachmentSource, Candidate, DuplicatePolicy, UNNAMED};
use crate::{Result, ViewerError};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use tracing::debug;

// ── Embedded files ───────────────────────────────────────────────────────────

/// Attachments stored in the document catalog's `/Names /EmbeddedFiles`
/// name tree.
pub struct EmbeddedFileSource<'a> {
    document: &'a Document,
}

impl<'a> EmbeddedFileSource<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Name-tree keys in tree order. Duplicates are reported as they occur.
    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    /// Content of the first embedded file registered under `name`.
    pub fn content(&self, name: &str) -> Result<Vec<u8>> {
        let (_, spec) = self
            .entries()
            .into_iter()
            .find(|(key, _)| key == name)
            .ok_or_else(|| extraction_error(name, "not in the /EmbeddedFiles name tree"))?;
        read_file_spec(self.document, spec, name)
    }

    /// `(key, file specification)` pairs from every leaf of the name tree.
    fn entries(&self) -> Vec<(String, &'a Object)> {
        let catalog = match self.document.catalog() {
            Ok(catalog) => catalog,
            Err(_) => return Vec::new(),
        };

        let names_dict = match catalog
            .get(b"Names")
            .ok()
            .and_then(|v| resolve_dict(self.document, v))
        {
            Some(dict) => dict,
            None => return Vec::new(),
        };

        let root = match names_dict.get(b"EmbeddedFiles") {
            Ok(root) => root,
            Err(_) => return Vec::new(),
        };

        let mut out = Vec::new();
        let mut visited = HashSet::new();
        self.walk_name_tree(root, &mut visited, &mut out);
        out
    }

    /// Depth-first walk over `/Kids`, collecting `/Names` leaf pairs.
    /// Already visited nodes are skipped so a cyclic tree terminates.
    fn walk_name_tree(
        &self,
        node: &'a Object,
        visited: &mut HashSet<ObjectId>,
        out: &mut Vec<(String, &'a Object)>,
    ) {
        if let Object::Reference(id) = node {
            if !visited.insert(*id) {
                return;
            }
        }

        let dict = match resolve_dict(self.document, node) {
            Some(dict) => dict,
            None => return,
        };

        if let Some(pairs) = dict
            .get(b"Names")
            .ok()
            .and_then(|v| resolve_array(self.document, v))
        {
            for pair in pairs.chunks_exact(2) {
                if let Ok(key) = pair[0].as_str() {
                    out.push((text_string(key), &pair[1]));
                }
            }
        }

        if let Some(kids) = dict
            .get(b"Kids")
            .ok()
            .and_then(|v| resolve_array(self.document, v))
        {
            for kid in kids {
                self.walk_name_tree(kid, visited, out);
            }
        }
    }
}

impl AttachmentSource for EmbeddedFileSource<'_> {
    fn enumerate(&self) -> Vec<Candidate> {
        self.entries()
            .into_iter()
            .map(|(name, spec)| {
                let content = read_file_spec(self.document, spec, &name);
                if let Err(ref e) = content {
                    debug!(%name, error = %e, "skipping embedded file");
                }
                Candidate::new(name, content)
            })
            .collect()
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::NameOnly
    }
}

// ── File-attachment annotations ──────────────────────────────────────────────

/// Attachments carried by `/FileAttachment` annotations, page by page.
pub struct AnnotationSource<'a> {
    document: &'a Document,
}

impl<'a> AnnotationSource<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// File specifications of every `/FileAttachment` annotation on a page.
    fn page_file_specs(&self, page_id: ObjectId) -> Vec<&'a Object> {
        let page = match self.document.get_object(page_id).and_then(Object::as_dict) {
            Ok(page) => page,
            Err(_) => return Vec::new(),
        };

        let annots = match page
            .get(b"Annots")
            .ok()
            .and_then(|v| resolve_array(self.document, v))
        {
            Some(annots) => annots,
            None => return Vec::new(),
        };

        annots
            .iter()
            .filter_map(|annot| resolve_dict(self.document, annot))
            .filter(|dict| is_file_attachment(dict))
            .filter_map(|dict| dict.get(b"FS").ok())
            .collect()
    }
}

impl AttachmentSource for AnnotationSource<'_> {
    fn enumerate(&self) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for (page_number, page_id) in self.document.get_pages() {
            for spec in self.page_file_specs(page_id) {
                let name = resolve_dict(self.document, spec)
                    .and_then(declared_filename)
                    .unwrap_or_else(|| UNNAMED.to_string());

                let content = read_file_spec(self.document, spec, &name).and_then(|data| {
                    if data.is_empty() {
                        Err(extraction_error(&name, "attachment is empty"))
                    } else {
                        Ok(data)
                    }
                });
                if let Err(ref e) = content {
                    debug!(page = page_number, %name, error = %e, "skipping annotation attachment");
                }

                candidates.push(Candidate::new(name, content));
            }
        }

        candidates
    }

    fn duplicate_policy(&self) -> DuplicatePolicy {
        DuplicatePolicy::NameAndContent
    }
}

fn is_file_attachment(annot: &Dictionary) -> bool {
    annot
        .get(b"Subtype")
        .and_then(Object::as_name)
        .map(|subtype| subtype == b"FileAttachment")
        .unwrap_or(false)
}

// ── File specifications ──────────────────────────────────────────────────────

/// Read the embedded stream behind a file specification.
///
/// ```text
/// << /Type /Filespec
///    /F  (ascii name)  /UF (unicode name)
///    /EF << /F <stream-ref>  /UF <stream-ref> >>
/// >>
/// ```
///
/// `/EF` and the spec itself may be inline or indirect; `/UF` is preferred
/// over `/F` inside `/EF`.
fn read_file_spec(document: &Document, spec: &Object, name: &str) -> Result<Vec<u8>> {
    let spec_dict = resolve(document, spec)?
        .as_dict()
        .map_err(|_| extraction_error(name, "file spec is not a dictionary"))?;

    let ef = spec_dict
        .get(b"EF")
        .map_err(|_| extraction_error(name, "missing /EF entry"))?;
    let ef_dict = resolve(document, ef)?
        .as_dict()
        .map_err(|_| extraction_error(name, "/EF is not a dictionary"))?;

    let stream_obj = ef_dict
        .get(b"UF")
        .or_else(|_| ef_dict.get(b"F"))
        .map_err(|_| extraction_error(name, "/EF has neither /F nor /UF"))?;

    let stream = resolve(document, stream_obj)?
        .as_stream()
        .map_err(|_| extraction_error(name, "embedded file is not a stream"))?;

    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| extraction_error(name, &format!("cannot decode stream: {e}")))
}

/// Filename declared by a file specification: `/UF` over `/F`.
fn declared_filename(spec_dict: &Dictionary) -> Option<String> {
    [b"UF" as &[u8], b"F"].into_iter().find_map(|key| {
        spec_dict
            .get(key)
            .and_then(Object::as_str)
            .ok()
            .map(text_string)
            .filter(|s| !s.is_empty())
    })
}

// ── Object helpers ───────────────────────────────────────────────────────────

fn resolve<'d>(document: &'d Document, object: &'d Object) -> lopdf::Result<&'d Object> {
    match object {
        Object::Reference(id) => document.get_object(*id),
        other => Ok(other),
    }
}

fn resolve_dict<'d>(document: &'d Document, object: &'d Object) -> Option<&'d Dictionary> {
    resolve(document, object).ok()?.as_dict().ok()
}

fn resolve_array<'d>(document: &'d Document, object: &'d Object) -> Option<&'d Vec<Object>> {
    resolve(document, object).ok()?.as_array().ok()
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// otherwise treated as (lossy) UTF-8.
fn text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn extraction_error(name: &str, message: &str) -> ViewerError {
    ViewerError::ExtractionError(name.into(), message.into())
}
