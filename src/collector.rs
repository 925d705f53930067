use crate::sources::{AnnotationSource, EmbeddedFileSource};
use crate::{Attachment, Result};
use lopdf::Document;
use std::collections::HashSet;

/// Number of leading bytes compared when checking two payloads for equality.
pub const CONTENT_PREFIX_LEN: usize = 100;

/// Name given to annotation attachments that declare no filename.
pub const UNNAMED: &str = "unnamed";

// ── Sources ──────────────────────────────────────────────────────────────────

/// How candidates from a source are checked against what is already collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Drop a candidate whose name has already been accepted.
    NameOnly,
    /// Additionally drop a candidate whose content looks like an already
    /// collected attachment (same length, same first [`CONTENT_PREFIX_LEN`]
    /// bytes), whatever its name.
    NameAndContent,
}

/// One attachment offered by a source. A failed read is carried as `Err` and
/// simply contributes nothing.
#[derive(Debug)]
pub struct Candidate {
    pub name: String,
    pub content: Result<Vec<u8>>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, content: Result<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

/// Anything that can enumerate attachments of a document.
pub trait AttachmentSource {
    /// Candidates in source order.
    fn enumerate(&self) -> Vec<Candidate>;

    fn duplicate_policy(&self) -> DuplicatePolicy;
}

// ── Collection ───────────────────────────────────────────────────────────────

/// Collect every attachment of `document`.
///
/// Embedded files are taken first, then `/FileAttachment` annotations page by
/// page. The result holds unique names sorted case-insensitively; unreadable
/// items are left out and the call itself never fails.
pub fn collect(document: &Document) -> Vec<Attachment> {
    let embedded = EmbeddedFileSource::new(document);
    let annotations = AnnotationSource::new(document);
    collect_from_sources(&[&embedded, &annotations])
}

/// Merge the candidates of `sources`, in order, into one deduplicated list
/// sorted by name (case-insensitive, ascending).
pub fn collect_from_sources(sources: &[&dyn AttachmentSource]) -> Vec<Attachment> {
    let mut attachments: Vec<Attachment> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for source in sources {
        let policy = source.duplicate_policy();

        for candidate in source.enumerate() {
            let content = match candidate.content {
                Ok(content) => content,
                Err(_) => continue,
            };

            if policy == DuplicatePolicy::NameAndContent
                && attachments.iter().any(|a| same_content(&a.content, &content))
            {
                continue;
            }

            if seen.contains(&candidate.name) {
                continue;
            }

            seen.insert(candidate.name.clone());
            attachments.push(Attachment {
                name: candidate.name,
                content,
            });
        }
    }

    attachments.sort_by_cached_key(|a| a.name.to_lowercase());
    attachments
}

/// Cheap equality heuristic: equal length and equal leading bytes.
fn same_content(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let n = a.len().min(CONTENT_PREFIX_LEN);
    a[..n] == b[..n]
}
